//! In-process mock of the lending backend
//!
//! Responses are canned per (method, path); every call is recorded so tests
//! can assert on what the client sent.

#![allow(dead_code)]

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use lend_a_read::api::ApiClient;
use lend_a_read::auth::Session;
use lend_a_read::storage::{LocalStorage, MemoryStorage, TOKEN_KEY, USER_KEY};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

#[derive(Default)]
struct Shared {
    routes: HashMap<(String, String), (u16, Value)>,
    calls: Vec<Recorded>,
}

#[derive(Clone)]
pub struct MockBackend {
    pub base_url: String,
    shared: Arc<Mutex<Shared>>,
}

impl MockBackend {
    pub async fn start() -> Self {
        let shared = Arc::new(Mutex::new(Shared::default()));
        let app = Router::new().fallback(handle).with_state(shared.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}/api", addr),
            shared,
        }
    }

    /// Answer `method path` with `status` and `body` from now on
    pub fn on(&self, method: &str, path: &str, status: u16, body: Value) -> &Self {
        self.shared
            .lock()
            .unwrap()
            .routes
            .insert((method.to_string(), path.to_string()), (status, body));
        self
    }

    pub fn calls(&self) -> Vec<Recorded> {
        self.shared.lock().unwrap().calls.clone()
    }

    pub fn calls_to(&self, method: &str, path: &str) -> Vec<Recorded> {
        self.calls()
            .into_iter()
            .filter(|c| c.method == method && c.path == path)
            .collect()
    }

    /// A client over fresh in-memory storage
    pub fn client(&self) -> (ApiClient, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        let session = Arc::new(Session::new(storage.clone()));
        let api = ApiClient::with_http(reqwest::Client::new(), &self.base_url, session);
        (api, storage)
    }

    /// A client whose storage already holds a signed-in `user`
    pub async fn signed_in_client(&self, user: &Value) -> (ApiClient, Arc<MemoryStorage>) {
        let (api, storage) = self.client();
        storage.set(TOKEN_KEY, "test-token").await.unwrap();
        storage.set(USER_KEY, &user.to_string()).await.unwrap();

        let user = serde_json::from_value(user.clone()).unwrap();
        api.session()
            .establish("test-token".to_string(), user)
            .await
            .unwrap();
        (api, storage)
    }
}

async fn handle(
    State(shared): State<Arc<Mutex<Shared>>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().trim_start_matches("/api").to_string();
    let mut shared = shared.lock().unwrap();

    shared.calls.push(Recorded {
        method: method.to_string(),
        path: path.clone(),
        query: uri.query().map(str::to_string),
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_slice(&body).ok(),
    });

    match shared.routes.get(&(method.to_string(), path.clone())) {
        Some((status, body)) => {
            (StatusCode::from_u16(*status).unwrap(), Json(body.clone())).into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": format!("No route for {} {}", method, path)})),
        )
            .into_response(),
    }
}

pub fn user(id: i64, apartment: &str, name: &str) -> Value {
    json!({
        "id": id,
        "apartment_number": apartment,
        "name": name,
        "created_at": "2025-01-10T09:00:00"
    })
}

pub fn book(id: i64, owner_id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "title": format!("Book {}", id),
        "author": "Ursula K. Le Guin",
        "cover_image": "",
        "genre": "Fantasy",
        "status": status,
        "owner_id": owner_id,
        "borrower_id": null,
        "created_at": "2025-03-01T10:00:00",
        "owner": {"id": owner_id, "name": "Owner", "apartment_number": "1A"}
    })
}

pub fn request(id: i64, book_id: i64, borrower_id: i64, lender_id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "book_id": book_id,
        "borrower_id": borrower_id,
        "lender_id": lender_id,
        "status": status,
        "message": "Could I borrow this?",
        "requested_at": "2025-03-02T08:30:00",
        "responded_at": null,
        "returned_at": null,
        "book": {"id": book_id, "title": format!("Book {}", book_id), "author": "Ursula K. Le Guin"},
        "borrower": {"id": borrower_id, "name": "Borrower", "apartment_number": "2B"},
        "lender": {"id": lender_id, "name": "Lender", "apartment_number": "1A"}
    })
}

pub fn notification(id: i64, is_read: bool) -> Value {
    json!({
        "id": id,
        "user_id": 1,
        "message": format!("Notification {}", id),
        "is_read": is_read,
        "notification_type": "borrow_request",
        "created_at": "2025-03-02T08:30:00"
    })
}

pub fn pagination(page: u32, per_page: u32, total: u64) -> Value {
    let pages = ((total + per_page as u64 - 1) / per_page as u64).max(1) as u32;
    json!({
        "page": page,
        "per_page": per_page,
        "total": total,
        "pages": pages,
        "has_next": page < pages,
        "has_prev": page > 1
    })
}

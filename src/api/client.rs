//! HTTP client for the lending backend
//!
//! Every call goes through `ApiClient::execute`, which attaches the stored
//! bearer credential and turns a 401 from any endpoint into a session purge
//! plus a redirect to the login route.

use crate::auth::session::Session;
use crate::core::config::ApiConfig;
use crate::core::error::{ErrorBody, LendError, Result};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: Arc<Session>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, session: Arc<Session>) -> Result<Self> {
        let http = Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| LendError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_http(http, &config.base_url, session))
    }

    /// Build on an existing `reqwest::Client`
    pub fn with_http(http: Client, base_url: &str, session: Arc<Session>) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, self.url(path))
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.execute(Method::GET, path, self.request(Method::GET, path))
            .await
    }

    pub(crate) async fn get_with<Q, T>(&self, path: &str, query: &Q) -> Result<T>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::GET, path).query(query);
        self.execute(Method::GET, path, builder).await
    }

    pub(crate) async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::POST, path).json(body);
        self.execute(Method::POST, path, builder).await
    }

    pub(crate) async fn put<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::PUT, path).json(body);
        self.execute(Method::PUT, path, builder).await
    }

    /// PUT with no request body, used by the state-transition endpoints
    pub(crate) async fn put_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.execute(Method::PUT, path, self.request(Method::PUT, path))
            .await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.execute(Method::DELETE, path, self.request(Method::DELETE, path))
            .await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        mut builder: RequestBuilder,
    ) -> Result<T> {
        if let Some(token) = self.session.credential().await? {
            builder = builder.bearer_auth(token);
        }

        debug!(method = %method, path, "API request");

        let response = builder.send().await.map_err(|e| {
            warn!(method = %method, path, error = %e, "API request failed");
            LendError::Network(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let err = self.failure(status, response).await;
            warn!(
                method = %method,
                path,
                status = status.as_u16(),
                error_type = err.error_type(),
                "API call rejected"
            );
            return Err(err);
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            warn!(method = %method, path, error = %e, "Unexpected response body");
            LendError::Decode(e.to_string())
        })
    }

    async fn failure(&self, status: StatusCode, response: Response) -> LendError {
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status.canonical_reason().unwrap_or("Request failed").to_string(),
        };

        if status == StatusCode::UNAUTHORIZED {
            self.session.invalidate(&message).await;
            return LendError::Unauthorized(message);
        }

        LendError::Server {
            status: status.as_u16(),
            message,
        }
    }
}

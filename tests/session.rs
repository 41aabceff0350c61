mod common;

use common::{book, user, MockBackend};
use lend_a_read::app::Route;
use lend_a_read::auth::{AuthService, SessionState};
use lend_a_read::storage::{LocalStorage, TOKEN_KEY, USER_KEY};
use lend_a_read::LendError;
use serde_json::json;

#[tokio::test]
async fn test_any_401_purges_session_and_redirects() {
    let backend = MockBackend::start().await;
    backend.on("GET", "/books/genres", 401, json!({"error": "Token has expired"}));

    let (api, storage) = backend.signed_in_client(&user(1, "4B", "Ada")).await;
    api.session().navigator().push(Route::Books);

    let err = api.genres().await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.user_message("x"), "Token has expired");

    assert!(storage.get(TOKEN_KEY).await.unwrap().is_none());
    assert!(storage.get(USER_KEY).await.unwrap().is_none());
    assert_eq!(api.session().state(), SessionState::Unauthenticated);
    assert_eq!(api.session().navigator().current(), Route::Login);
}

#[tokio::test]
async fn test_bearer_credential_attached() {
    let backend = MockBackend::start().await;
    backend.on("GET", "/books/1", 200, json!({"status": "success", "data": book(1, 2, "available")}));

    let (api, _storage) = backend.signed_in_client(&user(1, "4B", "Ada")).await;
    api.get_book(1).await.unwrap();

    let calls = backend.calls_to("GET", "/books/1");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].authorization.as_deref(), Some("Bearer test-token"));
}

#[tokio::test]
async fn test_no_credential_no_header() {
    let backend = MockBackend::start().await;
    backend.on("GET", "/books/genres", 200, json!({"status": "success", "data": ["Fantasy"]}));

    let (api, _storage) = backend.client();
    assert_eq!(api.genres().await.unwrap(), vec!["Fantasy".to_string()]);
    assert!(backend.calls()[0].authorization.is_none());
}

#[tokio::test]
async fn test_initialize_revalidates_stored_session() {
    let backend = MockBackend::start().await;
    backend.on("GET", "/auth/profile", 200, json!({"user": user(1, "4B", "Ada Lovelace")}));

    let (api, storage) = backend.client();
    storage.set(TOKEN_KEY, "stored-token").await.unwrap();
    storage
        .set(USER_KEY, &user(1, "4B", "Ada").to_string())
        .await
        .unwrap();

    let auth = AuthService::new(api);
    let state = auth.initialize().await.unwrap();

    match state {
        SessionState::Authenticated { user, token } => {
            assert_eq!(user.name, "Ada Lovelace");
            assert_eq!(token, "stored-token");
        }
        other => panic!("unexpected state {:?}", other),
    }

    let cached = storage.get(USER_KEY).await.unwrap().unwrap();
    assert!(cached.contains("Ada Lovelace"));
    assert_eq!(
        backend.calls()[0].authorization.as_deref(),
        Some("Bearer stored-token")
    );
}

#[tokio::test]
async fn test_initialize_without_stored_session() {
    let backend = MockBackend::start().await;
    let (api, storage) = backend.client();
    // A token with no user is not a session
    storage.set(TOKEN_KEY, "orphan").await.unwrap();

    let auth = AuthService::new(api);
    assert_eq!(auth.initialize().await.unwrap(), SessionState::Unauthenticated);
    assert!(backend.calls().is_empty());
    assert!(storage.get(TOKEN_KEY).await.unwrap().is_none());
}

#[tokio::test]
async fn test_failed_revalidation_purges() {
    let backend = MockBackend::start().await;
    backend.on("GET", "/auth/profile", 500, json!({"error": "Database unavailable"}));

    let (api, storage) = backend.client();
    storage.set(TOKEN_KEY, "stored-token").await.unwrap();
    storage
        .set(USER_KEY, &user(1, "4B", "Ada").to_string())
        .await
        .unwrap();

    let auth = AuthService::new(api);
    assert_eq!(auth.initialize().await.unwrap(), SessionState::Unauthenticated);
    assert!(storage.get(TOKEN_KEY).await.unwrap().is_none());
    assert_eq!(auth.session().navigator().current(), Route::Login);
}

#[tokio::test]
async fn test_login_establishes_session() {
    let backend = MockBackend::start().await;
    backend.on(
        "POST",
        "/auth/login",
        200,
        json!({"message": "Login successful", "token": "fresh", "user": user(7, "4B", "Ada")}),
    );

    let (api, storage) = backend.client();
    api.session().navigator().replace(Route::Login);
    let auth = AuthService::new(api);

    let signed_in = auth.login("  4B ", "secret1").await.unwrap();
    assert_eq!(signed_in.id, 7);
    assert_eq!(storage.get(TOKEN_KEY).await.unwrap().as_deref(), Some("fresh"));
    assert_eq!(auth.session().navigator().current(), Route::Dashboard);

    let body = backend.calls_to("POST", "/auth/login")[0].body.clone().unwrap();
    assert_eq!(body, json!({"apartment_number": "4B", "password": "secret1"}));
}

#[tokio::test]
async fn test_login_validation_skips_network() {
    let backend = MockBackend::start().await;
    let (api, _storage) = backend.client();
    let auth = AuthService::new(api);

    let err = auth.login("4B", "   ").await.unwrap_err();
    assert!(matches!(err, LendError::Validation(_)));
    assert_eq!(err.user_message("x"), "Please fill in all fields");
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn test_register_server_error_message() {
    let backend = MockBackend::start().await;
    backend.on(
        "POST",
        "/auth/register",
        400,
        json!({"error": "Apartment number already registered"}),
    );

    let (api, _storage) = backend.client();
    let auth = AuthService::new(api);

    let err = auth
        .register("4B", "Ada", "secret1", "secret1")
        .await
        .unwrap_err();
    assert_eq!(
        err.user_message("Registration failed. Please try again."),
        "Apartment number already registered"
    );
    assert!(!auth.session().is_authenticated());
}

#[tokio::test]
async fn test_logout_clears_storage() {
    let backend = MockBackend::start().await;
    let (api, storage) = backend.signed_in_client(&user(1, "4B", "Ada")).await;
    let auth = AuthService::new(api);

    auth.logout().await;
    assert!(storage.get(TOKEN_KEY).await.unwrap().is_none());
    assert_eq!(auth.session().navigator().current(), Route::Login);
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn test_update_name_refreshes_cached_user() {
    let backend = MockBackend::start().await;
    backend.on(
        "PUT",
        "/auth/profile",
        200,
        json!({"message": "Profile updated", "user": user(1, "4B", "Ada L.")}),
    );

    let (api, storage) = backend.signed_in_client(&user(1, "4B", "Ada")).await;
    let auth = AuthService::new(api);

    auth.update_name(" Ada L. ").await.unwrap();
    assert_eq!(auth.session().current_user().unwrap().name, "Ada L.");
    assert!(storage.get(USER_KEY).await.unwrap().unwrap().contains("Ada L."));

    let body = backend.calls_to("PUT", "/auth/profile")[0].body.clone().unwrap();
    assert_eq!(body, json!({"name": "Ada L."}));
}

#[tokio::test]
async fn test_restore_trusts_storage_until_revalidation_fails() {
    let backend = MockBackend::start().await;
    backend.on("GET", "/auth/profile", 500, json!({"error": "Database unavailable"}));

    let (api, storage) = backend.client();
    storage.set(TOKEN_KEY, "stored-token").await.unwrap();
    storage
        .set(USER_KEY, &user(1, "4B", "Ada").to_string())
        .await
        .unwrap();

    let auth = AuthService::new(api);
    let restored = auth.restore().await.unwrap();
    assert!(restored.is_authenticated());
    assert!(auth.session().state().is_authenticated());
    assert!(backend.calls().is_empty());

    assert!(auth.revalidate().await.is_err());
    assert_eq!(auth.session().state(), SessionState::Unauthenticated);
    assert!(storage.get(USER_KEY).await.unwrap().is_none());
}

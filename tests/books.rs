mod common;

use common::{book, request, user, MockBackend};
use lend_a_read::api::models::BookStatus;
use lend_a_read::app::Route;
use lend_a_read::books::{AddBookForm, BookAction, BookDetailView, BookLookup, MyBorrowedView};
use lend_a_read::lending::{RequestAction, RequestsView, ViewerRole};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

const OWNER: i64 = 1;
const NEIGHBOUR: i64 = 2;

fn envelope(data: serde_json::Value) -> serde_json::Value {
    json!({"status": "success", "data": data})
}

#[tokio::test]
async fn test_borrow_request_omits_blank_message() {
    let backend = MockBackend::start().await;
    backend.on("GET", "/books/5", 200, envelope(book(5, OWNER, "available")));
    backend.on(
        "POST",
        "/requests",
        201,
        envelope(request(30, 5, NEIGHBOUR, OWNER, "pending")),
    );

    let (api, _storage) = backend.signed_in_client(&user(NEIGHBOUR, "2B", "Bo")).await;
    let mut view = BookDetailView::new(api, 5);
    view.refresh().await.unwrap();
    assert_eq!(view.actions(), vec![BookAction::RequestBorrow]);

    let sent = view.request_borrow("   ").await.unwrap();
    assert_eq!(sent.id, 30);

    let body = backend.calls_to("POST", "/requests")[0].body.clone().unwrap();
    assert_eq!(body, json!({"book_id": 5}));
    assert!(view.flash().success().is_some());
}

#[tokio::test]
async fn test_owner_cannot_borrow_own_book() {
    let backend = MockBackend::start().await;
    backend.on("GET", "/books/5", 200, envelope(book(5, OWNER, "available")));

    let (api, _storage) = backend.signed_in_client(&user(OWNER, "1A", "Lena")).await;
    let mut view = BookDetailView::new(api, 5);
    view.refresh().await.unwrap();

    assert!(view.is_owner());
    assert_eq!(view.actions(), vec![BookAction::Edit, BookAction::Delete]);
    assert!(view.request_borrow("please").await.is_err());
    assert!(backend.calls_to("POST", "/requests").is_empty());
}

#[tokio::test]
async fn test_delete_navigates_to_shelf() {
    let backend = MockBackend::start().await;
    backend.on("GET", "/books/5", 200, envelope(book(5, OWNER, "available")));
    backend.on("DELETE", "/books/5", 200, json!({"message": "Book deleted successfully"}));

    let (api, _storage) = backend.signed_in_client(&user(OWNER, "1A", "Lena")).await;
    let mut view = BookDetailView::new(api.clone(), 5);
    view.refresh().await.unwrap();

    view.delete().await.unwrap();
    assert_eq!(api.session().navigator().current(), Route::MyBooks);
}

#[tokio::test]
async fn test_add_book_navigates_to_details() {
    let backend = MockBackend::start().await;
    backend.on("POST", "/books", 201, envelope(book(42, OWNER, "available")));

    let (api, _storage) = backend.signed_in_client(&user(OWNER, "1A", "Lena")).await;
    let mut form = AddBookForm::new();
    form.enter_manual_mode();
    form.title = "  A Wizard of Earthsea ".to_string();
    form.author = "Ursula K. Le Guin".to_string();

    let created = form.submit(&api).await.unwrap();
    assert_eq!(created.id, 42);
    assert_eq!(api.session().navigator().current(), Route::BookDetails { id: 42 });

    let body = backend.calls_to("POST", "/books")[0].body.clone().unwrap();
    assert_eq!(body["title"], "A Wizard of Earthsea");
    assert_eq!(body["genre"], "General");
}

#[tokio::test]
async fn test_add_another_clears_form() {
    let backend = MockBackend::start().await;
    backend.on("POST", "/books", 201, envelope(book(43, OWNER, "available")));

    let (api, _storage) = backend.signed_in_client(&user(OWNER, "1A", "Lena")).await;
    let mut form = AddBookForm::new();
    form.title = "Tehanu".to_string();
    form.author = "Ursula K. Le Guin".to_string();

    form.submit_and_add_another(&api).await.unwrap();
    assert!(form.title.is_empty());
    assert_eq!(form.genre, "General");
}

#[tokio::test]
async fn test_give_back_uses_active_request() {
    let backend = MockBackend::start().await;
    backend.on(
        "GET",
        "/books/my-borrowed",
        200,
        json!({"data": [book(5, OWNER, "borrowed")], "total": 1}),
    );
    backend.on(
        "GET",
        "/requests/history",
        200,
        json!({"data": [
            request(20, 5, NEIGHBOUR, OWNER, "returned"),
            request(21, 5, NEIGHBOUR, OWNER, "approved")
        ], "total": 2}),
    );
    backend.on(
        "PUT",
        "/requests/21/return",
        200,
        envelope(request(21, 5, NEIGHBOUR, OWNER, "returned")),
    );

    let (api, _storage) = backend.signed_in_client(&user(NEIGHBOUR, "2B", "Bo")).await;
    let mut view = MyBorrowedView::new(api);
    view.refresh().await.unwrap();
    assert_eq!(view.active_request(5).map(|r| r.id), Some(21));

    view.return_book(5).await.unwrap();
    assert_eq!(backend.calls_to("PUT", "/requests/21/return").len(), 1);
    assert!(view.return_book(99).await.is_err());
}

#[tokio::test]
async fn test_lookup_against_backend() {
    let backend = MockBackend::start().await;
    backend.on(
        "GET",
        "/google-books/search",
        200,
        json!({"status": "success", "data": [{
            "google_id": "abc",
            "title": "The Dispossessed",
            "author": "Ursula K. Le Guin",
            "cover_image": "",
            "genre": "",
            "published_date": "1974",
            "isbn": ""
        }]}),
    );

    let (api, _storage) = backend.signed_in_client(&user(OWNER, "1A", "Lena")).await;
    let lookup = BookLookup::new(Arc::new(api), Duration::from_millis(10), 3);

    assert!(lookup.search_now("di").await.unwrap().is_empty());
    assert!(backend.calls().is_empty());

    let results = lookup.search_now("dispossessed").await.unwrap();
    assert_eq!(results[0].title, "The Dispossessed");
    assert_eq!(
        backend.calls()[0].query.as_deref(),
        Some("q=dispossessed")
    );

    let mut form = AddBookForm::new();
    form.apply_suggestion(&results[0]);
    assert_eq!(form.title, "The Dispossessed");
    assert_eq!(form.genre, "General");
}

#[tokio::test]
async fn test_borrow_message_is_trimmed_and_book_stays_available() {
    let backend = MockBackend::start().await;
    backend.on("GET", "/books/5", 200, envelope(book(5, OWNER, "available")));
    backend.on(
        "POST",
        "/requests",
        201,
        envelope(request(31, 5, NEIGHBOUR, OWNER, "pending")),
    );

    let (api, _storage) = backend.signed_in_client(&user(NEIGHBOUR, "2B", "Bo")).await;
    let mut view = BookDetailView::new(api, 5);
    view.refresh().await.unwrap();

    view.request_borrow("  Can I grab this next week? ").await.unwrap();

    let body = backend.calls_to("POST", "/requests")[0].body.clone().unwrap();
    assert_eq!(
        body,
        json!({"book_id": 5, "message": "Can I grab this next week?"})
    );
    // A pending request does not take the book off the shelf
    assert_eq!(backend.calls_to("GET", "/books/5").len(), 2);
    assert_eq!(view.book().unwrap().status, BookStatus::Available);
}

#[tokio::test]
async fn test_detail_after_approval_shows_borrower() {
    let backend = MockBackend::start().await;
    let mut lent = book(5, OWNER, "borrowed");
    lent["borrower_id"] = json!(NEIGHBOUR);
    lent["borrower"] = json!({"id": NEIGHBOUR, "name": "Bo", "apartment_number": "2B"});
    backend.on(
        "GET",
        "/requests/incoming",
        200,
        json!({"data": [request(10, 5, NEIGHBOUR, OWNER, "pending")], "total": 1}),
    );
    backend.on(
        "PUT",
        "/requests/10/approve",
        200,
        envelope(request(10, 5, NEIGHBOUR, OWNER, "approved")),
    );
    backend.on("GET", "/books/5", 200, envelope(lent));

    let (api, _storage) = backend.signed_in_client(&user(OWNER, "1A", "Lena")).await;
    let mut requests = RequestsView::new(api.clone());
    requests.set_tab(ViewerRole::Lender).await.unwrap();
    requests.act(10, RequestAction::Approve).await.unwrap();

    let mut view = BookDetailView::new(api, 5);
    view.refresh().await.unwrap();
    let shown = view.book().unwrap();
    assert_eq!(shown.status, BookStatus::Borrowed);
    assert_eq!(shown.borrower_id, Some(NEIGHBOUR));
    assert_eq!(shown.borrower.as_ref().map(|b| b.name.as_str()), Some("Bo"));
    assert_eq!(view.actions(), vec![BookAction::MarkReturned]);
}

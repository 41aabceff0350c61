//! Single-book page

use crate::api::models::{Book, BookStatus, BorrowRequest, CreateBorrowRequest, UpdateBookRequest};
use crate::api::ApiClient;
use crate::app::navigation::Route;
use crate::auth::validation::validate_book_fields;
use crate::core::error::{LendError, Result};
use crate::core::feedback::Flash;
use std::fmt;
use tracing::{info, warn};

pub const LOAD_FAILED: &str = "Failed to load book details";
pub const BORROW_SENT: &str =
    "Borrow request sent successfully! The lender will review your request.";
pub const BORROW_FAILED: &str = "Failed to send borrow request";
pub const MARKED_RETURNED: &str = "Book marked as returned and is now available again.";
pub const MARK_RETURNED_FAILED: &str = "Failed to mark book as returned";
pub const DELETED: &str = "Book removed from library successfully.";
pub const DELETE_FAILED: &str = "Failed to delete book";
pub const UPDATED: &str = "Book updated successfully!";
pub const UPDATE_FAILED: &str = "Failed to update book";

/// Buttons on the book page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookAction {
    RequestBorrow,
    Edit,
    Delete,
    MarkReturned,
}

impl BookAction {
    pub fn label(&self) -> &'static str {
        match self {
            BookAction::RequestBorrow => "Request to Borrow",
            BookAction::Edit => "Edit",
            BookAction::Delete => "Delete",
            BookAction::MarkReturned => "Mark as Returned",
        }
    }
}

impl fmt::Display for BookAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Actions offered to `viewer_id` on `book`.
///
/// The owner may edit or delete a book that is not lent out and mark a lent
/// book returned; anyone else may ask to borrow an available book.
pub fn book_actions(book: &Book, viewer_id: Option<i64>) -> Vec<BookAction> {
    let is_owner = viewer_id == Some(book.owner_id);

    match (is_owner, book.status) {
        (true, BookStatus::Available) => vec![BookAction::Edit, BookAction::Delete],
        (true, BookStatus::Borrowed) => vec![BookAction::MarkReturned],
        (false, BookStatus::Available) => vec![BookAction::RequestBorrow],
        (false, BookStatus::Borrowed) => Vec::new(),
    }
}

pub struct BookDetailView {
    api: ApiClient,
    book_id: i64,
    book: Option<Book>,
    flash: Flash,
}

impl BookDetailView {
    pub fn new(api: ApiClient, book_id: i64) -> Self {
        Self {
            api,
            book_id,
            book: None,
            flash: Flash::new(),
        }
    }

    pub fn book(&self) -> Option<&Book> {
        self.book.as_ref()
    }

    pub fn flash(&self) -> &Flash {
        &self.flash
    }

    pub fn is_owner(&self) -> bool {
        match (&self.book, self.api.session().current_user()) {
            (Some(book), Some(user)) => book.owner_id == user.id,
            _ => false,
        }
    }

    pub fn actions(&self) -> Vec<BookAction> {
        let viewer = self.api.session().current_user().map(|u| u.id);
        self.book
            .as_ref()
            .map(|book| book_actions(book, viewer))
            .unwrap_or_default()
    }

    pub async fn refresh(&mut self) -> Result<()> {
        match self.api.get_book(self.book_id).await {
            Ok(book) => {
                self.book = Some(book);
                Ok(())
            }
            Err(e) => {
                warn!(book_id = self.book_id, error = %e, "Failed to load book");
                self.flash.set_error(LOAD_FAILED);
                Err(e)
            }
        }
    }

    /// Ask the owner to lend this book; a blank message is omitted
    pub async fn request_borrow(&mut self, message: &str) -> Result<BorrowRequest> {
        self.flash.clear();
        let outcome = self.try_request_borrow(message).await;
        let outcome = self.settle(outcome, BORROW_SENT, BORROW_FAILED);
        if outcome.is_ok() {
            let _ = self.refresh().await;
        }
        outcome
    }

    async fn try_request_borrow(&self, message: &str) -> Result<BorrowRequest> {
        self.ensure_offered(BookAction::RequestBorrow)?;

        let message = message.trim();
        let body = CreateBorrowRequest {
            book_id: self.book_id,
            message: (!message.is_empty()).then(|| message.to_string()),
        };
        let request = self.api.create_request(&body).await?;
        info!(book_id = self.book_id, request_id = request.id, "Borrow request sent");
        Ok(request)
    }

    pub async fn mark_returned(&mut self) -> Result<Book> {
        self.flash.clear();
        let outcome = match self.ensure_offered(BookAction::MarkReturned) {
            Ok(()) => self.api.mark_book_returned(self.book_id).await,
            Err(e) => Err(e),
        };
        let outcome = self.settle(outcome, MARKED_RETURNED, MARK_RETURNED_FAILED);
        if outcome.is_ok() {
            let _ = self.refresh().await;
        }
        outcome
    }

    /// Save edited fields; the page shows the server's copy afterwards
    pub async fn edit(&mut self, title: &str, author: &str, genre: &str) -> Result<Book> {
        self.flash.clear();
        let outcome = self.try_edit(title, author, genre).await;
        let outcome = self.settle(outcome, UPDATED, UPDATE_FAILED);
        if let Ok(book) = &outcome {
            self.book = Some(book.clone());
        }
        outcome
    }

    async fn try_edit(&self, title: &str, author: &str, genre: &str) -> Result<Book> {
        self.ensure_offered(BookAction::Edit)?;
        validate_book_fields(title, author)?;

        let update = UpdateBookRequest {
            title: Some(title.trim().to_string()),
            author: Some(author.trim().to_string()),
            genre: Some(genre.to_string()),
            ..Default::default()
        };
        self.api.update_book(self.book_id, &update).await
    }

    /// Remove the book and go to the owner's shelf
    pub async fn delete(&mut self) -> Result<()> {
        self.flash.clear();
        let outcome = match self.ensure_offered(BookAction::Delete) {
            Ok(()) => self.api.delete_book(self.book_id).await.map(|_| ()),
            Err(e) => Err(e),
        };
        self.settle(outcome, DELETED, DELETE_FAILED)?;

        info!(book_id = self.book_id, "Book deleted");
        self.api.session().navigator().push(Route::MyBooks);
        Ok(())
    }

    fn ensure_offered(&self, action: BookAction) -> Result<()> {
        if self.actions().contains(&action) {
            Ok(())
        } else {
            Err(LendError::Validation(format!(
                "{} is not available for this book",
                action.label()
            )))
        }
    }

    fn settle<T>(&mut self, outcome: Result<T>, success: &str, fallback: &str) -> Result<T> {
        match &outcome {
            Ok(_) => self.flash.set_success(success),
            Err(e) => self.flash.set_error(e.user_message(fallback)),
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(status: BookStatus) -> Book {
        Book {
            id: 3,
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            cover_image: String::new(),
            genre: "Science Fiction".to_string(),
            status,
            owner_id: 1,
            borrower_id: None,
            created_at: None,
            updated_at: None,
            owner: None,
            borrower: None,
        }
    }

    #[test]
    fn test_owner_actions() {
        assert_eq!(
            book_actions(&book(BookStatus::Available), Some(1)),
            vec![BookAction::Edit, BookAction::Delete]
        );
        assert_eq!(
            book_actions(&book(BookStatus::Borrowed), Some(1)),
            vec![BookAction::MarkReturned]
        );
    }

    #[test]
    fn test_visitor_actions() {
        assert_eq!(
            book_actions(&book(BookStatus::Available), Some(2)),
            vec![BookAction::RequestBorrow]
        );
        assert!(book_actions(&book(BookStatus::Borrowed), Some(2)).is_empty());
        assert_eq!(
            book_actions(&book(BookStatus::Available), None),
            vec![BookAction::RequestBorrow]
        );
    }
}

//! The signed-in user's own shelves: books they lend and books they borrow

use crate::api::models::{Book, BookStatus, BorrowRequest, RequestStatus};
use crate::api::ApiClient;
use crate::core::error::{LendError, Result};
use crate::core::feedback::Flash;
use tracing::warn;

use super::detail::{DELETED, DELETE_FAILED, MARKED_RETURNED, MARK_RETURNED_FAILED};

pub const MY_BOOKS_FAILED: &str = "Failed to fetch your books";
pub const BORROWED_FAILED: &str = "Failed to fetch borrowed books";
pub const RETURNED: &str = "Book returned successfully!";
pub const RETURN_FAILED: &str = "Failed to return book";

/// Books the user has listed, optionally narrowed by status
pub struct MyBooksView {
    api: ApiClient,
    status_filter: Option<BookStatus>,
    books: Vec<Book>,
    flash: Flash,
}

impl MyBooksView {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            status_filter: None,
            books: Vec::new(),
            flash: Flash::new(),
        }
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn status_filter(&self) -> Option<BookStatus> {
        self.status_filter
    }

    pub fn flash(&self) -> &Flash {
        &self.flash
    }

    /// Carry a message over from the page that navigated here
    pub fn flash_mut(&mut self) -> &mut Flash {
        &mut self.flash
    }

    pub fn count(&self, status: BookStatus) -> usize {
        self.books.iter().filter(|b| b.status == status).count()
    }

    pub async fn refresh(&mut self) -> Result<()> {
        match self.api.my_books(self.status_filter).await {
            Ok(books) => {
                self.books = books;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch own books");
                self.flash.set_error(MY_BOOKS_FAILED);
                Err(e)
            }
        }
    }

    pub async fn set_status_filter(&mut self, status: Option<BookStatus>) -> Result<()> {
        self.status_filter = status;
        self.refresh().await
    }

    pub async fn mark_returned(&mut self, book_id: i64) -> Result<()> {
        self.flash.clear();
        match self.api.mark_book_returned(book_id).await {
            Ok(_) => {
                self.flash.set_success(MARKED_RETURNED);
                let _ = self.refresh().await;
                Ok(())
            }
            Err(e) => {
                self.flash.set_error(e.user_message(MARK_RETURNED_FAILED));
                Err(e)
            }
        }
    }

    pub async fn delete(&mut self, book_id: i64) -> Result<()> {
        self.flash.clear();
        match self.api.delete_book(book_id).await {
            Ok(_) => {
                self.flash.set_success(DELETED);
                let _ = self.refresh().await;
                Ok(())
            }
            Err(e) => {
                self.flash.set_error(e.user_message(DELETE_FAILED));
                Err(e)
            }
        }
    }
}

/// Books lent to the user, with the request history used to return them
pub struct MyBorrowedView {
    api: ApiClient,
    books: Vec<Book>,
    history: Vec<BorrowRequest>,
    flash: Flash,
}

impl MyBorrowedView {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            books: Vec::new(),
            history: Vec::new(),
            flash: Flash::new(),
        }
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn history(&self) -> &[BorrowRequest] {
        &self.history
    }

    pub fn flash(&self) -> &Flash {
        &self.flash
    }

    /// Fetch the borrowed list and history together; either failing fails both
    pub async fn refresh(&mut self) -> Result<()> {
        let fetched = futures::try_join!(self.api.my_borrowed(), self.api.request_history());

        match fetched {
            Ok((books, history)) => {
                self.books = books;
                self.history = history;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch borrowed books");
                self.flash.set_error(BORROWED_FAILED);
                Err(e)
            }
        }
    }

    /// The approved request that put `book_id` on this shelf
    pub fn active_request(&self, book_id: i64) -> Option<&BorrowRequest> {
        self.history
            .iter()
            .find(|r| r.book_id == book_id && r.status == RequestStatus::Approved)
    }

    pub async fn return_book(&mut self, book_id: i64) -> Result<()> {
        self.flash.clear();

        let request_id = match self.active_request(book_id) {
            Some(request) => request.id,
            None => {
                let err = LendError::NotFound(format!(
                    "No approved request found for book {}",
                    book_id
                ));
                self.flash.set_error(err.user_message(RETURN_FAILED));
                return Err(err);
            }
        };

        match self.api.return_request(request_id).await {
            Ok(_) => {
                self.flash.set_success(RETURNED);
                let _ = self.refresh().await;
                Ok(())
            }
            Err(e) => {
                self.flash.set_error(e.user_message(RETURN_FAILED));
                Err(e)
            }
        }
    }
}

//! Add-book form

use crate::api::models::{Book, CreateBookRequest, ExternalBook, DEFAULT_GENRE, GENRE_SUGGESTIONS};
use crate::api::ApiClient;
use crate::app::navigation::Route;
use crate::auth::validation::validate_book_fields;
use crate::core::error::Result;
use tracing::info;

pub const ADD_FAILED: &str = "Failed to add book. Please try again.";
pub const ADDED: &str = "Book added successfully!";

/// Fields of the add-book page.
///
/// A lookup suggestion pre-fills the fields; nothing is stored until one of
/// the submit methods runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddBookForm {
    pub title: String,
    pub author: String,
    pub cover_image: String,
    pub genre: String,
    manual_mode: bool,
    selected: Option<ExternalBook>,
}

impl Default for AddBookForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            author: String::new(),
            cover_image: String::new(),
            genre: DEFAULT_GENRE.to_string(),
            manual_mode: false,
            selected: None,
        }
    }
}

impl AddBookForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn genre_suggestions() -> &'static [&'static str] {
        &GENRE_SUGGESTIONS
    }

    pub fn is_manual(&self) -> bool {
        self.manual_mode
    }

    pub fn selected(&self) -> Option<&ExternalBook> {
        self.selected.as_ref()
    }

    /// Pre-fill from a lookup result
    pub fn apply_suggestion(&mut self, book: &ExternalBook) {
        self.title = book.title.clone();
        self.author = book.author.clone();
        self.cover_image = book.cover_image.clone();
        self.genre = if book.genre.is_empty() {
            DEFAULT_GENRE.to_string()
        } else {
            book.genre.clone()
        };
        self.manual_mode = false;
        self.selected = Some(book.clone());
    }

    /// Empty form for typing everything in by hand
    pub fn enter_manual_mode(&mut self) {
        *self = Self {
            manual_mode: true,
            ..Self::default()
        };
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn to_request(&self) -> Result<CreateBookRequest> {
        validate_book_fields(&self.title, &self.author)?;

        Ok(CreateBookRequest {
            title: self.title.trim().to_string(),
            author: self.author.trim().to_string(),
            cover_image: self.cover_image.trim().to_string(),
            genre: self.genre.clone(),
        })
    }

    /// Create the book and navigate to its details page
    pub async fn submit(&self, api: &ApiClient) -> Result<Book> {
        let book = api.create_book(&self.to_request()?).await?;
        info!(book_id = book.id, title = %book.title, "Book added");

        api.session()
            .navigator()
            .push(Route::BookDetails { id: book.id });
        Ok(book)
    }

    /// Create the book and reset the form for the next one
    pub async fn submit_and_add_another(&mut self, api: &ApiClient) -> Result<Book> {
        let book = api.create_book(&self.to_request()?).await?;
        info!(book_id = book.id, title = %book.title, "Book added");

        self.clear();
        Ok(book)
    }
}

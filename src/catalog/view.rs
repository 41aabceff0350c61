//! Community catalog listing

use super::query::CatalogQuery;
use crate::api::models::{Book, Pagination, StatusFilter};
use crate::api::ApiClient;
use crate::core::error::Result;
use tracing::warn;

/// The shared catalog page: filters, the current page of books and the
/// genre list used to populate the genre filter.
///
/// Each filter change fetches again from page 1; results are never cached
/// across changes.
pub struct CatalogView {
    api: ApiClient,
    query: CatalogQuery,
    books: Vec<Book>,
    pagination: Option<Pagination>,
    genres: Vec<String>,
}

impl CatalogView {
    pub fn new(api: ApiClient, per_page: u32) -> Self {
        Self {
            api,
            query: CatalogQuery::new(per_page),
            books: Vec::new(),
            pagination: None,
            genres: Vec::new(),
        }
    }

    pub fn query(&self) -> &CatalogQuery {
        &self.query
    }

    /// Adjust several filters before a single `refresh`
    pub fn query_mut(&mut self) -> &mut CatalogQuery {
        &mut self.query
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn pagination(&self) -> Option<&Pagination> {
        self.pagination.as_ref()
    }

    pub fn genres(&self) -> &[String] {
        &self.genres
    }

    /// Fetch the genre filter options; a failure leaves the list empty
    pub async fn load_genres(&mut self) {
        match self.api.genres().await {
            Ok(genres) => self.genres = genres,
            Err(e) => warn!(error = %e, "Failed to fetch genres"),
        }
    }

    /// Fetch the page described by the current query.
    ///
    /// On failure the previous page stays on screen.
    pub async fn refresh(&mut self) -> Result<()> {
        match self.api.list_books(&self.query.to_query()).await {
            Ok(page) => {
                self.books = page.data;
                self.pagination = Some(page.pagination);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, page = self.query.page(), "Failed to fetch books");
                Err(e)
            }
        }
    }

    pub async fn set_search(&mut self, search: impl Into<String>) -> Result<()> {
        self.query.set_search(search);
        self.refresh().await
    }

    pub async fn set_genre(&mut self, genre: impl Into<String>) -> Result<()> {
        self.query.set_genre(genre);
        self.refresh().await
    }

    pub async fn set_status(&mut self, status: StatusFilter) -> Result<()> {
        self.query.set_status(status);
        self.refresh().await
    }

    pub async fn go_to_page(&mut self, page: u32) -> Result<()> {
        let previous = self.query.page();
        self.query.set_page(page);
        self.settle_page(previous).await
    }

    /// Returns whether a fetch happened
    pub async fn next_page(&mut self) -> Result<bool> {
        let previous = self.query.page();
        if !self.query.next(self.pagination.as_ref()) {
            return Ok(false);
        }
        self.settle_page(previous).await.map(|_| true)
    }

    pub async fn prev_page(&mut self) -> Result<bool> {
        let previous = self.query.page();
        if !self.query.prev(self.pagination.as_ref()) {
            return Ok(false);
        }
        self.settle_page(previous).await.map(|_| true)
    }

    /// Fetch the moved-to page; on failure the query goes back to the page
    /// still on screen
    async fn settle_page(&mut self, previous: u32) -> Result<()> {
        let result = self.refresh().await;
        if result.is_err() {
            self.query.set_page(previous);
        }
        result
    }
}

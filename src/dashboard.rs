//! Dashboard and profile summaries

use crate::api::models::{
    Book, BookQuery, BookStatus, BorrowRequest, RequestQuery, RequestStatus, Stats, StatusFilter,
};
use crate::api::ApiClient;
use crate::core::error::Result;
use tracing::debug;

/// Everything the landing page shows, loaded in one go
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub stats: Stats,
    /// Newest available books in the community
    pub recent_books: Vec<Book>,
    pub my_books: Vec<Book>,
    /// Incoming requests waiting on the user
    pub pending_requests: Vec<BorrowRequest>,
}

impl Dashboard {
    /// Run the four fetches concurrently; the first failure fails the load
    pub async fn load(api: &ApiClient, recent: u32) -> Result<Self> {
        let recent_query = BookQuery {
            search: String::new(),
            genre: String::new(),
            status: StatusFilter::Available.as_str(),
            page: 1,
            per_page: recent,
        };
        let pending_query = RequestQuery {
            status: Some(RequestStatus::Pending),
        };

        let (stats, recent_books, my_books, pending_requests) = futures::try_join!(
            api.stats(),
            api.list_books(&recent_query),
            api.my_books(None),
            api.incoming_requests(&pending_query),
        )?;

        debug!(
            recent = recent_books.data.len(),
            mine = my_books.len(),
            pending = pending_requests.len(),
            "Dashboard loaded"
        );

        Ok(Self {
            stats,
            recent_books: recent_books.data,
            my_books,
            pending_requests,
        })
    }

    /// "You have 2 pending borrow requests." or nothing
    pub fn pending_banner(&self) -> Option<String> {
        match self.pending_requests.len() {
            0 => None,
            1 => Some("You have 1 pending borrow request.".to_string()),
            n => Some(format!("You have {} pending borrow requests.", n)),
        }
    }
}

/// Counters on the profile page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProfileStats {
    pub listed: usize,
    pub currently_lent: usize,
    pub borrowed: usize,
    pub total_requests: usize,
}

impl ProfileStats {
    pub async fn load(api: &ApiClient) -> Result<Self> {
        let (my_books, borrowed, history) = futures::try_join!(
            api.my_books(None),
            api.my_borrowed(),
            api.request_history(),
        )?;

        Ok(Self::from_lists(&my_books, &borrowed, &history))
    }

    pub fn from_lists(my_books: &[Book], borrowed: &[Book], history: &[BorrowRequest]) -> Self {
        Self {
            listed: my_books.len(),
            currently_lent: my_books
                .iter()
                .filter(|b| b.status == BookStatus::Borrowed)
                .count(),
            borrowed: borrowed.len(),
            total_requests: history.len(),
        }
    }
}

//! Debounced third-party book lookup

use crate::api::models::ExternalBook;
use crate::api::ApiClient;
use crate::core::error::Result;
use crate::core::tasks::Debouncer;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Source of lookup results
#[async_trait]
pub trait BookSearch: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<ExternalBook>>;
}

#[async_trait]
impl BookSearch for ApiClient {
    async fn search(&self, query: &str) -> Result<Vec<ExternalBook>> {
        self.search_external(query).await
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupState {
    /// Latest input, as typed
    pub query: String,
    pub results: Vec<ExternalBook>,
    pub searching: bool,
    /// Whether the results dropdown is open
    pub show_results: bool,
}

/// Search-as-you-type against the lookup endpoint.
///
/// Input shorter than the minimum clears the results and fires nothing.
/// Otherwise one search runs per quiet period; results for a query that is
/// no longer the current input are discarded.
pub struct BookLookup {
    source: Arc<dyn BookSearch>,
    debouncer: Debouncer,
    min_chars: usize,
    state: Arc<watch::Sender<LookupState>>,
}

impl BookLookup {
    pub fn new(source: Arc<dyn BookSearch>, debounce: Duration, min_chars: usize) -> Self {
        let (state, _) = watch::channel(LookupState::default());
        Self {
            source,
            debouncer: Debouncer::new(debounce),
            min_chars,
            state: Arc::new(state),
        }
    }

    pub fn state(&self) -> LookupState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<LookupState> {
        self.state.subscribe()
    }

    /// Feed the current contents of the search box
    pub fn input(&self, query: &str) {
        let query = query.to_string();
        self.state.send_modify(|s| s.query = query.clone());

        let term = query.trim().to_string();
        if term.chars().count() < self.min_chars {
            self.debouncer.cancel();
            self.state.send_modify(|s| {
                s.results.clear();
                s.searching = false;
                s.show_results = false;
            });
            return;
        }

        let source = self.source.clone();
        let state = self.state.clone();
        self.debouncer.schedule(async move {
            state.send_modify(|s| s.searching = true);

            let results = match source.search(&term).await {
                Ok(results) => results,
                Err(e) => {
                    warn!(query = %term, error = %e, "Book lookup failed");
                    Vec::new()
                }
            };
            debug!(query = %term, count = results.len(), "Book lookup finished");

            // A newer search may be in flight; leave its state alone
            state.send_modify(|s| {
                if s.query == query {
                    s.searching = false;
                    s.results = results;
                    s.show_results = true;
                }
            });
        });
    }

    /// Close the dropdown, keeping the results
    pub fn dismiss(&self) {
        self.state.send_modify(|s| s.show_results = false);
    }

    /// Forget the input and any pending search
    pub fn reset(&self) {
        self.debouncer.cancel();
        self.state.send_replace(LookupState::default());
    }

    /// Search once without waiting out the debounce.
    ///
    /// Input shorter than the minimum yields nothing and makes no call.
    pub async fn search_now(&self, query: &str) -> Result<Vec<ExternalBook>> {
        self.debouncer.cancel();

        let term = query.trim();
        if term.chars().count() < self.min_chars {
            return Ok(Vec::new());
        }

        let results = self.source.search(term).await?;
        self.state.send_modify(|s| {
            s.query = query.to_string();
            s.results = results.clone();
            s.searching = false;
            s.show_results = true;
        });
        Ok(results)
    }
}

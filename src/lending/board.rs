//! Incoming/outgoing requests board

use super::lifecycle::{available_actions, RequestAction, ViewerRole};
use crate::api::models::{BorrowRequest, RequestQuery, RequestStatus};
use crate::api::ApiClient;
use crate::core::error::{LendError, Result};
use crate::core::feedback::Flash;
use tracing::warn;

pub const FETCH_FAILED: &str = "Failed to fetch requests";

/// Two tabs of requests with a shared status filter.
///
/// Switching tabs clears the filter. Only the active tab is fetched; the
/// other keeps whatever it last loaded.
pub struct RequestsView {
    api: ApiClient,
    tab: ViewerRole,
    status_filter: Option<RequestStatus>,
    incoming: Vec<BorrowRequest>,
    outgoing: Vec<BorrowRequest>,
    flash: Flash,
}

impl RequestsView {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            tab: ViewerRole::Lender,
            status_filter: None,
            incoming: Vec::new(),
            outgoing: Vec::new(),
            flash: Flash::new(),
        }
    }

    pub fn tab(&self) -> ViewerRole {
        self.tab
    }

    pub fn status_filter(&self) -> Option<RequestStatus> {
        self.status_filter
    }

    pub fn flash(&self) -> &Flash {
        &self.flash
    }

    pub fn flash_mut(&mut self) -> &mut Flash {
        &mut self.flash
    }

    pub fn requests(&self) -> &[BorrowRequest] {
        self.list(self.tab)
    }

    pub fn list(&self, tab: ViewerRole) -> &[BorrowRequest] {
        match tab {
            ViewerRole::Lender => &self.incoming,
            ViewerRole::Borrower => &self.outgoing,
        }
    }

    /// Pending requests in a tab, shown as its badge
    pub fn pending_count(&self, tab: ViewerRole) -> usize {
        self.list(tab)
            .iter()
            .filter(|r| r.status == RequestStatus::Pending)
            .count()
    }

    /// Buttons for a request in the active tab
    pub fn actions_for(&self, request: &BorrowRequest) -> &'static [RequestAction] {
        available_actions(self.tab, request.status)
    }

    pub async fn set_tab(&mut self, tab: ViewerRole) -> Result<()> {
        self.tab = tab;
        self.status_filter = None;
        self.refresh().await
    }

    pub async fn set_status_filter(&mut self, status: Option<RequestStatus>) -> Result<()> {
        self.status_filter = status;
        self.refresh().await
    }

    /// Fetch the active tab with the current filter
    pub async fn refresh(&mut self) -> Result<()> {
        let query = RequestQuery {
            status: self.status_filter,
        };

        let fetched = match self.tab {
            ViewerRole::Lender => self.api.incoming_requests(&query).await,
            ViewerRole::Borrower => self.api.outgoing_requests(&query).await,
        };

        match fetched {
            Ok(requests) => {
                match self.tab {
                    ViewerRole::Lender => self.incoming = requests,
                    ViewerRole::Borrower => self.outgoing = requests,
                }
                Ok(())
            }
            Err(e) => {
                warn!(tab = self.tab.tab_name(), error = %e, "Failed to fetch requests");
                self.flash.set_error(FETCH_FAILED);
                Err(e)
            }
        }
    }

    /// Run `action` on a request from the active tab, then refetch.
    ///
    /// The outcome lands in the flash either way; the error is also returned.
    pub async fn act(&mut self, request_id: i64, action: RequestAction) -> Result<()> {
        self.flash.clear();

        let request = match self.requests().iter().find(|r| r.id == request_id) {
            Some(request) => request.clone(),
            None => {
                let err = LendError::NotFound(format!(
                    "Request {} is not in the {} list",
                    request_id,
                    self.tab.tab_name()
                ));
                self.flash.set_error(err.user_message(action.failure_fallback()));
                return Err(err);
            }
        };

        match action.perform(&self.api, self.tab, &request).await {
            Ok(()) => {
                // A failed refetch replaces the success message with its own
                if self.refresh().await.is_ok() {
                    self.flash.set_success(action.success_message());
                }
                Ok(())
            }
            Err(e) => {
                self.flash.set_error(e.user_message(action.failure_fallback()));
                Err(e)
            }
        }
    }
}

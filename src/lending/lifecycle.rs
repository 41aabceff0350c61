//! Borrow-request actions per viewer
//!
//! The server owns every transition. What the client decides is which
//! buttons a viewer sees for a request in a given status:
//!
//! | role     | pending          | approved      | terminal |
//! |----------|------------------|---------------|----------|
//! | lender   | approve, reject  | mark returned | none     |
//! | borrower | cancel           | return book   | none     |

use crate::api::models::{BorrowRequest, RequestStatus};
use crate::api::ApiClient;
use crate::core::error::{LendError, Result};
use std::fmt;
use std::str::FromStr;
use tracing::info;

/// Which side of a request the viewer is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewerRole {
    /// Owner of the book; sees the request as incoming
    Lender,
    /// Requester; sees the request as outgoing
    Borrower,
}

impl ViewerRole {
    /// Role of `user_id` on `request`, if they are part of it
    pub fn of(user_id: i64, request: &BorrowRequest) -> Option<Self> {
        if request.lender_id == user_id {
            Some(ViewerRole::Lender)
        } else if request.borrower_id == user_id {
            Some(ViewerRole::Borrower)
        } else {
            None
        }
    }

    pub fn tab_name(&self) -> &'static str {
        match self {
            ViewerRole::Lender => "incoming",
            ViewerRole::Borrower => "outgoing",
        }
    }
}

impl FromStr for ViewerRole {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "incoming" | "lender" => Ok(ViewerRole::Lender),
            "outgoing" | "borrower" => Ok(ViewerRole::Borrower),
            other => Err(format!("unknown request tab: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestAction {
    Approve,
    Reject,
    Cancel,
    /// Borrower hands the book back
    Return,
    /// Lender confirms the book is back, via the book resource
    MarkReturned,
}

const LENDER_PENDING: &[RequestAction] = &[RequestAction::Approve, RequestAction::Reject];
const LENDER_APPROVED: &[RequestAction] = &[RequestAction::MarkReturned];
const BORROWER_PENDING: &[RequestAction] = &[RequestAction::Cancel];
const BORROWER_APPROVED: &[RequestAction] = &[RequestAction::Return];
const NONE: &[RequestAction] = &[];

/// Buttons shown to `role` for a request in `status`
pub fn available_actions(role: ViewerRole, status: RequestStatus) -> &'static [RequestAction] {
    match (role, status) {
        (ViewerRole::Lender, RequestStatus::Pending) => LENDER_PENDING,
        (ViewerRole::Lender, RequestStatus::Approved) => LENDER_APPROVED,
        (ViewerRole::Borrower, RequestStatus::Pending) => BORROWER_PENDING,
        (ViewerRole::Borrower, RequestStatus::Approved) => BORROWER_APPROVED,
        _ => NONE,
    }
}

impl RequestAction {
    pub const ALL: [RequestAction; 5] = [
        RequestAction::Approve,
        RequestAction::Reject,
        RequestAction::Cancel,
        RequestAction::Return,
        RequestAction::MarkReturned,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RequestAction::Approve => "Approve",
            RequestAction::Reject => "Reject",
            RequestAction::Cancel => "Cancel Request",
            RequestAction::Return => "Return Book",
            RequestAction::MarkReturned => "Mark Returned",
        }
    }

    /// Status the server moves the request to
    pub fn target_status(&self) -> RequestStatus {
        match self {
            RequestAction::Approve => RequestStatus::Approved,
            RequestAction::Reject => RequestStatus::Rejected,
            RequestAction::Cancel => RequestStatus::Cancelled,
            RequestAction::Return | RequestAction::MarkReturned => RequestStatus::Returned,
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            RequestAction::Approve => "Request approved successfully!",
            RequestAction::Reject => "Request rejected.",
            RequestAction::Cancel => "Request cancelled.",
            RequestAction::Return | RequestAction::MarkReturned => "Book returned successfully!",
        }
    }

    /// Shown when the failure carries no server message
    pub fn failure_fallback(&self) -> &'static str {
        match self {
            RequestAction::Approve => "Failed to approve request",
            RequestAction::Reject => "Failed to reject request",
            RequestAction::Cancel => "Failed to cancel request",
            RequestAction::Return | RequestAction::MarkReturned => "Failed to return book",
        }
    }

    /// Fire the endpoint for this action.
    ///
    /// Refuses locally when the table does not offer the action, so no call
    /// is made for a button that would not be shown.
    pub async fn perform(
        &self,
        api: &ApiClient,
        role: ViewerRole,
        request: &BorrowRequest,
    ) -> Result<()> {
        if !available_actions(role, request.status).contains(self) {
            return Err(LendError::Validation(format!(
                "Cannot {} a {} request as the {}",
                self.label().to_lowercase(),
                request.status,
                match role {
                    ViewerRole::Lender => "lender",
                    ViewerRole::Borrower => "borrower",
                }
            )));
        }

        match self {
            RequestAction::Approve => api.approve_request(request.id).await.map(|_| ())?,
            RequestAction::Reject => api.reject_request(request.id).await.map(|_| ())?,
            RequestAction::Cancel => api.cancel_request(request.id).await.map(|_| ())?,
            RequestAction::Return => api.return_request(request.id).await.map(|_| ())?,
            RequestAction::MarkReturned => {
                api.mark_book_returned(request.book_id).await.map(|_| ())?
            }
        }

        info!(
            request_id = request.id,
            action = self.label(),
            status = %self.target_status(),
            "Request action completed"
        );
        Ok(())
    }
}

impl fmt::Display for RequestAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn request(status: RequestStatus) -> BorrowRequest {
        BorrowRequest {
            id: 10,
            book_id: 3,
            borrower_id: 2,
            lender_id: 1,
            status,
            message: None,
            requested_at: "2025-01-01T10:00:00".to_string(),
            responded_at: None,
            returned_at: None,
            book: None,
            borrower: None,
            lender: None,
        }
    }

    #[test]
    fn test_action_table() {
        use RequestAction::*;
        use RequestStatus::*;

        assert_eq!(available_actions(ViewerRole::Lender, Pending), &[Approve, Reject]);
        assert_eq!(available_actions(ViewerRole::Lender, Approved), &[MarkReturned]);
        assert_eq!(available_actions(ViewerRole::Borrower, Pending), &[Cancel]);
        assert_eq!(available_actions(ViewerRole::Borrower, Approved), &[Return]);
        assert!(available_actions(ViewerRole::Lender, Returned).is_empty());
        assert!(available_actions(ViewerRole::Borrower, Rejected).is_empty());
    }

    #[test]
    fn test_role_of_request() {
        let req = request(RequestStatus::Pending);
        assert_eq!(ViewerRole::of(1, &req), Some(ViewerRole::Lender));
        assert_eq!(ViewerRole::of(2, &req), Some(ViewerRole::Borrower));
        assert_eq!(ViewerRole::of(99, &req), None);
    }

    #[test]
    fn test_messages() {
        assert_eq!(RequestAction::Reject.success_message(), "Request rejected.");
        assert_eq!(
            RequestAction::MarkReturned.failure_fallback(),
            "Failed to return book"
        );
        assert_eq!("incoming".parse::<ViewerRole>().unwrap(), ViewerRole::Lender);
    }

    fn role() -> impl Strategy<Value = ViewerRole> {
        prop_oneof![Just(ViewerRole::Lender), Just(ViewerRole::Borrower)]
    }

    fn status() -> impl Strategy<Value = RequestStatus> {
        proptest::sample::select(RequestStatus::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn test_terminal_requests_offer_nothing(role in role(), status in status()) {
            let actions = available_actions(role, status);
            prop_assert_eq!(actions.is_empty(), status.is_terminal());
        }

        #[test]
        fn test_actions_move_forward(role in role(), status in status()) {
            for action in available_actions(role, status) {
                let target = action.target_status();
                prop_assert_ne!(target, status);
                prop_assert_ne!(target, RequestStatus::Pending);
                if status == RequestStatus::Approved {
                    prop_assert_eq!(target, RequestStatus::Returned);
                }
            }
        }

        #[test]
        fn test_roles_never_share_actions(status in status()) {
            let lender = available_actions(ViewerRole::Lender, status);
            let borrower = available_actions(ViewerRole::Borrower, status);
            prop_assert!(lender.iter().all(|a| !borrower.contains(a)));
        }
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::books::BookSummary;
use super::common::UserSummary;

/// Borrow request status.
///
/// `pending` moves to `approved`, `rejected` or `cancelled`; `approved` moves
/// only to `returned`. Every transition happens server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Returned,
    Cancelled,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 5] = [
        RequestStatus::Pending,
        RequestStatus::Approved,
        RequestStatus::Rejected,
        RequestStatus::Returned,
        RequestStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
            RequestStatus::Returned => "returned",
            RequestStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RequestStatus::Rejected | RequestStatus::Returned | RequestStatus::Cancelled
        )
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        RequestStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == needle)
            .ok_or_else(|| format!("unknown request status: {}", s))
    }
}

/// A borrower's request for a lender's book
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BorrowRequest {
    pub id: i64,
    pub book_id: i64,
    pub borrower_id: i64,
    pub lender_id: i64,
    pub status: RequestStatus,
    #[serde(default)]
    pub message: Option<String>,
    pub requested_at: String,
    #[serde(default)]
    pub responded_at: Option<String>,
    #[serde(default)]
    pub returned_at: Option<String>,
    #[serde(default)]
    pub book: Option<BookSummary>,
    #[serde(default)]
    pub borrower: Option<UserSummary>,
    #[serde(default)]
    pub lender: Option<UserSummary>,
}

impl BorrowRequest {
    pub fn book_title(&self) -> &str {
        self.book
            .as_ref()
            .map(|b| b.title.as_str())
            .unwrap_or("Unknown Book")
    }
}

/// Request body for `POST /requests`
#[derive(Debug, Clone, Serialize)]
pub struct CreateBorrowRequest {
    pub book_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Query string for the incoming/outgoing lists
#[derive(Debug, Clone, Default, Serialize)]
pub struct RequestQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RequestStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!RequestStatus::Pending.is_terminal());
        assert!(!RequestStatus::Approved.is_terminal());
        assert!(RequestStatus::Rejected.is_terminal());
        assert!(RequestStatus::Returned.is_terminal());
        assert!(RequestStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("Approved".parse::<RequestStatus>().unwrap(), RequestStatus::Approved);
        assert!("lost".parse::<RequestStatus>().is_err());
    }

    #[test]
    fn test_request_parses_backend_shape() {
        let request: BorrowRequest = serde_json::from_str(
            r#"{
                "id": 11, "book_id": 3, "borrower_id": 2, "lender_id": 1, "status": "pending",
                "message": "Can I grab this next week?", "requested_at": "2025-01-05T09:00:00",
                "responded_at": null, "returned_at": null,
                "book": {"id": 3, "title": "Dune", "author": "Frank Herbert"},
                "borrower": {"id": 2, "name": "Lin", "apartment_number": "7C"},
                "lender": {"id": 1, "name": "Ada", "apartment_number": "4B"}
            }"#,
        )
        .unwrap();

        assert_eq!(request.status, RequestStatus::Pending);
        assert_eq!(request.book_title(), "Dune");
        assert_eq!(request.message.as_deref(), Some("Can I grab this next week?"));
        assert!(request.responded_at.is_none());
    }

    #[test]
    fn test_query_serializes_status() {
        let query = RequestQuery {
            status: Some(RequestStatus::Pending),
        };
        assert_eq!(serde_json::to_string(&query).unwrap(), r#"{"status":"pending"}"#);
        assert_eq!(serde_json::to_string(&RequestQuery::default()).unwrap(), "{}");
    }
}

use serde::{Deserialize, Serialize};

use super::common::Pagination;

/// What a notification is about; unknown tags from newer backends map to `Other`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    BorrowRequest,
    RequestApproved,
    RequestRejected,
    BookReturned,
    Return,
    RequestCancelled,
    #[serde(other)]
    Other,
}

impl NotificationType {
    pub fn label(&self) -> &'static str {
        match self {
            NotificationType::BorrowRequest => "borrow request",
            NotificationType::RequestApproved => "approved",
            NotificationType::RequestRejected => "rejected",
            NotificationType::BookReturned => "returned",
            NotificationType::Return => "return",
            NotificationType::RequestCancelled => "cancelled",
            NotificationType::Other => "info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub message: String,
    pub is_read: bool,
    pub notification_type: NotificationType,
    pub created_at: String,
}

/// `GET /notifications` response
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationPage {
    pub data: Vec<Notification>,
    pub unread_count: u64,
    pub pagination: Pagination,
}

/// `GET /notifications/count` response
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct UnreadCount {
    pub unread_count: u64,
}

/// Query string for `GET /notifications`
#[derive(Debug, Clone, Serialize)]
pub struct NotificationQuery {
    pub page: u32,
    pub per_page: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unread: Option<&'static str>,
}

use serde::Deserialize;

/// Community-wide counters from `GET /stats`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Stats {
    pub total_users: u64,
    pub total_books: u64,
    pub available_books: u64,
    pub borrowed_books: u64,
    pub total_requests: u64,
    pub pending_requests: u64,
    #[serde(default)]
    pub total_notifications: u64,
    #[serde(default)]
    pub unread_notifications: u64,
}

/// `GET /health` response
#[derive(Debug, Clone, Deserialize)]
pub struct Health {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl Health {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

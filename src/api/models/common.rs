use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// `{ "status": "success", "data": ... }` wrapper used by most endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    pub data: T,
}

/// Unpaginated list with its length
#[derive(Debug, Clone, Deserialize)]
pub struct ListEnvelope<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub total: usize,
}

/// Paginated list
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

/// Pagination metadata as reported by the backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
    pub pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

/// Acknowledgement returned by mutations that carry no resource
#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Short user reference embedded in books and requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i64,
    pub name: String,
    pub apartment_number: String,
}

/// Render a backend timestamp as "Mar 4, 2025 14:05".
///
/// The backend emits naive ISO-8601 (UTC); RFC 3339 is accepted too. Anything
/// else is shown as received.
pub fn format_timestamp(raw: &str) -> String {
    const DISPLAY: &str = "%b %-d, %Y %H:%M";

    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return naive.format(DISPLAY).to_string();
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format(DISPLAY).to_string();
    }
    raw.to_string()
}

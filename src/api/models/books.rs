use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::common::UserSummary;

/// Genre pre-selected on the add-book form
pub const DEFAULT_GENRE: &str = "General";

/// Genre suggestions offered when adding or editing a book.
/// Genre stays free text; these are only suggestions.
pub const GENRE_SUGGESTIONS: [&str; 20] = [
    "General",
    "Fiction",
    "Non-Fiction",
    "Science Fiction",
    "Fantasy",
    "Mystery",
    "Thriller",
    "Romance",
    "Horror",
    "Biography",
    "History",
    "Science",
    "Self-Help",
    "Technology",
    "Philosophy",
    "Poetry",
    "Children",
    "Young Adult",
    "Comics",
    "Other",
];

/// Availability of a book, flipped server-side by the request lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookStatus {
    Available,
    Borrowed,
}

impl BookStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::Available => "available",
            BookStatus::Borrowed => "borrowed",
        }
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalog status filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum StatusFilter {
    #[default]
    Available,
    Borrowed,
    All,
}

impl StatusFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::Available => "available",
            StatusFilter::Borrowed => "borrowed",
            StatusFilter::All => "all",
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "available" => Ok(StatusFilter::Available),
            "borrowed" => Ok(StatusFilter::Borrowed),
            "all" => Ok(StatusFilter::All),
            other => Err(format!("unknown status filter: {}", other)),
        }
    }
}

impl FromStr for BookStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "available" => Ok(BookStatus::Available),
            "borrowed" => Ok(BookStatus::Borrowed),
            other => Err(format!("unknown book status: {}", other)),
        }
    }
}

/// Book listed in the community catalog
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    /// Cover image URL; empty when none was given
    #[serde(default)]
    pub cover_image: String,
    #[serde(default = "default_genre")]
    pub genre: String,
    pub status: BookStatus,
    pub owner_id: i64,
    #[serde(default)]
    pub borrower_id: Option<i64>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub owner: Option<UserSummary>,
    /// Only present when the viewer owns the book
    #[serde(default)]
    pub borrower: Option<UserSummary>,
}

impl Book {
    pub fn is_available(&self) -> bool {
        self.status == BookStatus::Available
    }

    pub fn cover_url(&self) -> Option<&str> {
        Some(self.cover_image.as_str()).filter(|url| !url.is_empty())
    }
}

fn default_genre() -> String {
    DEFAULT_GENRE.to_string()
}

/// Short book reference embedded in borrow requests
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BookSummary {
    pub id: i64,
    pub title: String,
    pub author: String,
}

/// Query string for `GET /books`
#[derive(Debug, Clone, Serialize)]
pub struct BookQuery {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub search: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub genre: String,
    pub status: &'static str,
    pub page: u32,
    pub per_page: u32,
}

/// Request body for listing a new book
#[derive(Debug, Clone, Serialize)]
pub struct CreateBookRequest {
    pub title: String,
    pub author: String,
    pub cover_image: String,
    pub genre: String,
}

/// Request body for editing a book; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateBookRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_parses_backend_shape() {
        let book: Book = serde_json::from_str(
            r#"{
                "id": 3, "title": "Dune", "author": "Frank Herbert", "cover_image": "",
                "genre": "Science Fiction", "status": "borrowed", "owner_id": 1, "borrower_id": 2,
                "created_at": "2025-01-01T10:00:00", "updated_at": "2025-01-02T10:00:00",
                "owner": {"id": 1, "name": "Ada", "apartment_number": "4B"},
                "borrower": {"id": 2, "name": "Lin", "apartment_number": "7C"}
            }"#,
        )
        .unwrap();

        assert_eq!(book.status, BookStatus::Borrowed);
        assert!(!book.is_available());
        assert_eq!(book.cover_url(), None);
        assert_eq!(book.borrower.as_ref().map(|b| b.id), Some(2));
    }

    #[test]
    fn test_book_defaults_missing_optional_fields() {
        let book: Book = serde_json::from_str(
            r#"{"id": 1, "title": "T", "author": "A", "status": "available", "owner_id": 9}"#,
        )
        .unwrap();
        assert_eq!(book.genre, DEFAULT_GENRE);
        assert!(book.owner.is_none());
        assert!(book.borrower_id.is_none());
    }

    #[test]
    fn test_query_skips_empty_filters() {
        let query = BookQuery {
            search: String::new(),
            genre: "Fantasy".to_string(),
            status: StatusFilter::All.as_str(),
            page: 2,
            per_page: 12,
        };
        let value = serde_json::to_value(&query).unwrap();
        assert!(value.get("search").is_none());
        assert_eq!(value["genre"], "Fantasy");
        assert_eq!(value["status"], "all");
    }

    #[test]
    fn test_status_filter_parse() {
        assert_eq!("All".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert!("lent".parse::<StatusFilter>().is_err());
        assert_eq!(StatusFilter::default(), StatusFilter::Available);
    }
}

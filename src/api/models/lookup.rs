use serde::Deserialize;

/// A match from the third-party catalog, used to pre-fill the add-book form
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExternalBook {
    #[serde(default)]
    pub google_id: String,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub cover_image: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub published_date: String,
    #[serde(default)]
    pub isbn: String,
}

/// `GET /google-books/search` response.
///
/// Provider failures arrive as 200 with `status: "error"` and an empty list.
#[derive(Debug, Clone, Deserialize)]
pub struct LookupResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub data: Vec<ExternalBook>,
}

use crate::api::client::ApiClient;
use crate::api::models::{ExternalBook, LookupResponse};
use crate::core::error::Result;
use tracing::warn;

impl ApiClient {
    /// Search the third-party catalog.
    ///
    /// A provider failure reported inside a 200 yields whatever list came
    /// with it, normally empty.
    pub async fn search_external(&self, query: &str) -> Result<Vec<ExternalBook>> {
        let response: LookupResponse = self
            .get_with("/google-books/search", &[("q", query)])
            .await?;

        if response.status.as_deref() == Some("error") {
            warn!(
                query,
                error = response.error.as_deref().unwrap_or("unknown"),
                "Book lookup provider failed"
            );
        }

        Ok(response.data)
    }
}

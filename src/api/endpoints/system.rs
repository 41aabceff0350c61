use crate::api::client::ApiClient;
use crate::api::models::{Envelope, Health, Stats};
use crate::core::error::Result;

impl ApiClient {
    pub async fn stats(&self) -> Result<Stats> {
        let envelope: Envelope<Stats> = self.get("/stats").await?;
        Ok(envelope.data)
    }

    pub async fn health(&self) -> Result<Health> {
        self.get("/health").await
    }
}

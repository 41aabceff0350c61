use crate::api::client::ApiClient;
use crate::api::models::{BorrowRequest, CreateBorrowRequest, Envelope, ListEnvelope, RequestQuery};
use crate::core::error::Result;

impl ApiClient {
    pub async fn create_request(&self, request: &CreateBorrowRequest) -> Result<BorrowRequest> {
        let envelope: Envelope<BorrowRequest> = self.post("/requests", request).await?;
        Ok(envelope.data)
    }

    /// Requests for books the signed-in user owns
    pub async fn incoming_requests(&self, query: &RequestQuery) -> Result<Vec<BorrowRequest>> {
        let list: ListEnvelope<BorrowRequest> =
            self.get_with("/requests/incoming", query).await?;
        Ok(list.data)
    }

    /// Requests the signed-in user has made
    pub async fn outgoing_requests(&self, query: &RequestQuery) -> Result<Vec<BorrowRequest>> {
        let list: ListEnvelope<BorrowRequest> =
            self.get_with("/requests/outgoing", query).await?;
        Ok(list.data)
    }

    pub async fn get_request(&self, id: i64) -> Result<BorrowRequest> {
        let envelope: Envelope<BorrowRequest> = self.get(&format!("/requests/{}", id)).await?;
        Ok(envelope.data)
    }

    pub async fn approve_request(&self, id: i64) -> Result<BorrowRequest> {
        self.transition(id, "approve").await
    }

    pub async fn reject_request(&self, id: i64) -> Result<BorrowRequest> {
        self.transition(id, "reject").await
    }

    /// Borrower-side return
    pub async fn return_request(&self, id: i64) -> Result<BorrowRequest> {
        self.transition(id, "return").await
    }

    pub async fn cancel_request(&self, id: i64) -> Result<BorrowRequest> {
        self.transition(id, "cancel").await
    }

    /// Every request the signed-in user took part in, either side
    pub async fn request_history(&self) -> Result<Vec<BorrowRequest>> {
        let list: ListEnvelope<BorrowRequest> = self.get("/requests/history").await?;
        Ok(list.data)
    }

    async fn transition(&self, id: i64, verb: &str) -> Result<BorrowRequest> {
        let envelope: Envelope<BorrowRequest> =
            self.put_empty(&format!("/requests/{}/{}", id, verb)).await?;
        Ok(envelope.data)
    }
}

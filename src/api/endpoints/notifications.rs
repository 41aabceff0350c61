use crate::api::client::ApiClient;
use crate::api::models::{
    Envelope, MessageResponse, Notification, NotificationPage, NotificationQuery, UnreadCount,
};
use crate::core::error::Result;

impl ApiClient {
    pub async fn notifications(&self, query: &NotificationQuery) -> Result<NotificationPage> {
        self.get_with("/notifications", query).await
    }

    pub async fn unread_count(&self) -> Result<u64> {
        let count: UnreadCount = self.get("/notifications/count").await?;
        Ok(count.unread_count)
    }

    pub async fn mark_notification_read(&self, id: i64) -> Result<Notification> {
        let envelope: Envelope<Notification> =
            self.put_empty(&format!("/notifications/{}/read", id)).await?;
        Ok(envelope.data)
    }

    pub async fn mark_all_notifications_read(&self) -> Result<MessageResponse> {
        self.put_empty("/notifications/read-all").await
    }

    pub async fn delete_notification(&self, id: i64) -> Result<MessageResponse> {
        self.delete(&format!("/notifications/{}", id)).await
    }

    pub async fn clear_read_notifications(&self) -> Result<MessageResponse> {
        self.delete("/notifications/clear-read").await
    }

    pub async fn clear_all_notifications(&self) -> Result<MessageResponse> {
        self.delete("/notifications/clear-all").await
    }
}

//! Notification feed with local optimistic updates

use crate::api::models::{Notification, NotificationQuery, Pagination};
use crate::api::ApiClient;
use crate::core::error::Result;
use crate::core::feedback::Flash;
use chrono::{DateTime, Datelike, NaiveDateTime, Utc};
use tracing::warn;

pub const FETCH_FAILED: &str = "Failed to fetch notifications";
pub const MARK_READ_FAILED: &str = "Failed to mark notification as read";
pub const MARK_ALL_FAILED: &str = "Failed to mark all as read";
pub const DELETE_FAILED: &str = "Failed to delete notification";
pub const CLEAR_FAILED: &str = "Failed to clear notifications";

/// One page of the signed-in user's notifications.
///
/// Mutations update the local list and unread counter before the call is
/// sent and are not rolled back when it fails; the next `refresh` brings
/// the page back in line with the server.
pub struct NotificationFeed {
    api: ApiClient,
    page_size: u32,
    page: u32,
    unread_only: bool,
    notifications: Vec<Notification>,
    unread_count: u64,
    pagination: Option<Pagination>,
    flash: Flash,
}

impl NotificationFeed {
    pub fn new(api: ApiClient, page_size: u32) -> Self {
        Self {
            api,
            page_size: page_size.max(1),
            page: 1,
            unread_only: false,
            notifications: Vec::new(),
            unread_count: 0,
            pagination: None,
            flash: Flash::new(),
        }
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn unread_count(&self) -> u64 {
        self.unread_count
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn unread_only(&self) -> bool {
        self.unread_only
    }

    pub fn pagination(&self) -> Option<&Pagination> {
        self.pagination.as_ref()
    }

    pub fn flash(&self) -> &Flash {
        &self.flash
    }

    pub fn flash_mut(&mut self) -> &mut Flash {
        &mut self.flash
    }

    pub async fn refresh(&mut self) -> Result<()> {
        let query = NotificationQuery {
            page: self.page,
            per_page: self.page_size,
            unread: self.unread_only.then_some("true"),
        };

        match self.api.notifications(&query).await {
            Ok(page) => {
                self.notifications = page.data;
                self.unread_count = page.unread_count;
                self.pagination = Some(page.pagination);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch notifications");
                self.flash.set_error(FETCH_FAILED);
                Err(e)
            }
        }
    }

    /// Toggle the unread-only filter; goes back to the first page
    pub async fn set_unread_only(&mut self, unread_only: bool) -> Result<()> {
        self.unread_only = unread_only;
        self.page = 1;
        self.refresh().await
    }

    pub async fn go_to_page(&mut self, page: u32) -> Result<()> {
        self.move_to(page.max(1)).await
    }

    pub async fn next_page(&mut self) -> Result<bool> {
        match self.pagination {
            Some(p) if p.has_next => self.move_to(self.page + 1).await.map(|_| true),
            _ => Ok(false),
        }
    }

    pub async fn prev_page(&mut self) -> Result<bool> {
        match self.pagination {
            Some(p) if p.has_prev && self.page > 1 => {
                self.move_to(self.page - 1).await.map(|_| true)
            }
            _ => Ok(false),
        }
    }

    /// The page only changes once its fetch succeeds
    async fn move_to(&mut self, page: u32) -> Result<()> {
        let previous = self.page;
        self.page = page;
        let result = self.refresh().await;
        if result.is_err() {
            self.page = previous;
        }
        result
    }

    pub async fn mark_read(&mut self, id: i64) -> Result<()> {
        if let Some(n) = self.notifications.iter_mut().find(|n| n.id == id) {
            n.is_read = true;
        }
        self.unread_count = self.unread_count.saturating_sub(1);

        let result = self.api.mark_notification_read(id).await.map(|_| ());
        self.report(result, MARK_READ_FAILED, None)
    }

    pub async fn mark_all_read(&mut self) -> Result<()> {
        self.flash.clear();
        for n in &mut self.notifications {
            n.is_read = true;
        }
        self.unread_count = 0;

        let result = self.api.mark_all_notifications_read().await.map(|_| ());
        self.report(result, MARK_ALL_FAILED, Some("All notifications marked as read"))
    }

    pub async fn delete(&mut self, id: i64) -> Result<()> {
        if let Some(pos) = self.notifications.iter().position(|n| n.id == id) {
            let removed = self.notifications.remove(pos);
            if !removed.is_read {
                self.unread_count = self.unread_count.saturating_sub(1);
            }
        }

        let result = self.api.delete_notification(id).await.map(|_| ());
        self.report(result, DELETE_FAILED, None)
    }

    pub async fn clear_read(&mut self) -> Result<()> {
        self.flash.clear();
        self.notifications.retain(|n| !n.is_read);

        let result = self.api.clear_read_notifications().await.map(|_| ());
        self.report(result, CLEAR_FAILED, Some("Read notifications cleared"))
    }

    pub async fn clear_all(&mut self) -> Result<()> {
        self.flash.clear();
        self.notifications.clear();
        self.unread_count = 0;

        let result = self.api.clear_all_notifications().await.map(|_| ());
        self.report(result, CLEAR_FAILED, Some("All notifications cleared"))
    }

    fn report(&mut self, result: Result<()>, fallback: &str, success: Option<&str>) -> Result<()> {
        match result {
            Ok(()) => {
                if let Some(message) = success {
                    self.flash.set_success(message);
                }
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Notification update failed");
                self.flash.set_error(e.user_message(fallback));
                Err(e)
            }
        }
    }
}

/// "Just now", "5m ago", "3h ago", "2d ago", then a short date
pub fn relative_time(created_at: &str, now: DateTime<Utc>) -> String {
    let parsed = NaiveDateTime::parse_from_str(created_at, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .or_else(|_| DateTime::parse_from_rfc3339(created_at).map(|dt| dt.with_timezone(&Utc)));

    let Ok(at) = parsed else {
        return created_at.to_string();
    };

    let elapsed = now.signed_duration_since(at);
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if hours < 24 {
        format!("{}h ago", hours)
    } else if days < 7 {
        format!("{}d ago", days)
    } else if at.year() == now.year() {
        at.format("%b %-d").to_string()
    } else {
        at.format("%b %-d, %Y").to_string()
    }
}

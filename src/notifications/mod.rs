//! Notification feed and unread badge

pub mod feed;
pub mod poller;

pub use feed::NotificationFeed;
pub use poller::UnreadCountPoller;

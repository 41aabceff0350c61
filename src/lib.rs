//! Lend-a-Read Client Library
//!
//! This library provides the client side of the Lend-a-Read community
//! book-lending service: the API client, session handling, and one view
//! model per page of the app, plus the terminal front end built on them.

pub mod api;
pub mod app;
pub mod auth;
pub mod books;
pub mod catalog;
pub mod cli;
pub mod core;
pub mod dashboard;
pub mod lending;
pub mod notifications;
pub mod storage;

// Re-export commonly used types
pub use api::ApiClient;
pub use auth::{AuthService, Session, SessionState};
pub use crate::core::{Config, LendError};
pub use storage::{FileStorage, LocalStorage, MemoryStorage};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

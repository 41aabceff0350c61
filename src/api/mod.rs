//! Backend API access
//!
//! This module provides the typed HTTP layer including:
//! - `ApiClient`, which attaches credentials and handles 401s globally
//! - Endpoint groups for auth, books, requests, notifications, stats and lookup
//! - Serde wire models for every request and response body

pub mod client;
mod endpoints;
pub mod models;

pub use client::ApiClient;

//! Authentication module
//!
//! This module provides the client side of authentication including:
//! - The process-wide session context and its durable credential
//! - Login, registration, logout and profile flows
//! - Form validation run before any call is made

pub mod service;
pub mod session;
pub mod validation;

pub use service::AuthService;
pub use session::{Session, SessionState};

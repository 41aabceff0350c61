//! Core client infrastructure
//!
//! This module provides the ambient layer shared by every view:
//! - Configuration management
//! - Structured logging system
//! - Error handling and type system
//! - Cancellable background tasks
//! - Inline action feedback

pub mod config;
pub mod error;
pub mod feedback;
pub mod logging;
pub mod tasks;

pub use config::Config;
pub use error::{LendError, Result};
pub use feedback::Flash;
pub use logging::Logger;
pub use tasks::{Debouncer, PeriodicTask};

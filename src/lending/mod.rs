//! Borrow-request lifecycle as seen by lenders and borrowers

pub mod board;
pub mod lifecycle;

pub use board::RequestsView;
pub use lifecycle::{available_actions, RequestAction, ViewerRole};

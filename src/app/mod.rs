//! Application shell: routes and navigation

pub mod navigation;

pub use navigation::{guard, Guard, Navigator, Route};

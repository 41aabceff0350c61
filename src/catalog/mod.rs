//! Shared catalog browsing

pub mod query;
pub mod view;

pub use query::CatalogQuery;
pub use view::CatalogView;

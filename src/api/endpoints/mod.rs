//! Typed endpoint groups, one `impl ApiClient` block per resource

mod auth;
mod books;
mod lookup;
mod notifications;
mod requests;
mod system;

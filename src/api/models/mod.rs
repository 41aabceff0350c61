//! Wire models for the backend REST API

pub mod books;
pub mod common;
pub mod lookup;
pub mod notifications;
pub mod requests;
pub mod system;
pub mod users;

pub use books::*;
pub use common::*;
pub use lookup::*;
pub use notifications::*;
pub use requests::*;
pub use system::*;
pub use users::*;

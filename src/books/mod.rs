//! Book pages: adding, looking up, viewing and the personal shelves

pub mod add;
pub mod detail;
pub mod lookup;
pub mod shelves;

pub use add::AddBookForm;
pub use detail::{book_actions, BookAction, BookDetailView};
pub use lookup::{BookLookup, BookSearch, LookupState};
pub use shelves::{MyBooksView, MyBorrowedView};

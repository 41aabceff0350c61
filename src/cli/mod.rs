//! Terminal front end
//!
//! Each subcommand plays the part of one page of the web client and goes
//! through the same session, guards and views.

mod commands;
pub mod render;

pub use commands::{run, CliError, Context};

use crate::api::models::{BookStatus, RequestStatus, StatusFilter};
use crate::app::navigation::Route;
use crate::core::config::CliArgs;
use crate::lending::ViewerRole;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "lend-a-read")]
#[command(about = "Borrow and lend books with your neighbours", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub args: CliArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in with your apartment number
    Login {
        apartment: String,
        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Create an account
    Register {
        apartment: String,
        name: String,
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        confirm: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show who is signed in
    Whoami,

    /// Show or change your profile
    Profile {
        #[command(subcommand)]
        action: Option<ProfileCommand>,
    },

    /// Community stats, recent books and requests waiting on you
    Dashboard,

    /// Browse and manage books
    Books {
        #[command(subcommand)]
        command: BooksCommand,
    },

    /// Search the external catalog for a title to add
    Lookup { query: String },

    /// Borrow requests
    Requests {
        #[command(subcommand)]
        command: RequestsCommand,
    },

    /// Your notifications
    Notifications {
        #[command(subcommand)]
        command: NotificationsCommand,
    },

    /// Community-wide counters
    Stats,

    /// Check that the backend is up
    Health,
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    /// Change your display name
    Name { name: String },

    /// Change your password
    Password {
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        confirm: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum BooksCommand {
    /// List the community catalog
    List {
        /// Match against title or author
        #[arg(short, long)]
        search: Option<String>,
        #[arg(short, long)]
        genre: Option<String>,
        /// available, borrowed or all
        #[arg(long, default_value = "available")]
        status: StatusFilter,
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },

    /// Show one book and what you can do with it
    Show { id: i64 },

    /// List a book of yours
    Add {
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        cover: Option<String>,
        #[arg(long)]
        genre: Option<String>,
        /// Pre-fill from the external catalog
        #[arg(long, value_name = "QUERY")]
        lookup: Option<String>,
        /// Which lookup result to use (1-based)
        #[arg(long, default_value_t = 1, requires = "lookup")]
        pick: usize,
    },

    /// Edit one of your books
    Edit {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        genre: Option<String>,
    },

    /// Remove one of your books
    Delete { id: i64 },

    /// Books you lend out
    Mine {
        #[arg(long)]
        status: Option<BookStatus>,
    },

    /// Books you are borrowing
    Borrowed,

    /// Give back a book you borrowed
    GiveBack { id: i64 },

    /// Mark one of your lent books as returned
    Return { id: i64 },

    /// Genres present in the catalog
    Genres,
}

#[derive(Subcommand, Debug)]
pub enum RequestsCommand {
    /// Ask to borrow a book
    Create {
        book_id: i64,
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Incoming or outgoing requests
    List {
        /// incoming or outgoing
        #[arg(long, default_value = "incoming")]
        tab: ViewerRole,
        #[arg(long)]
        status: Option<RequestStatus>,
    },

    /// Show one request
    Show { id: i64 },

    Approve { id: i64 },

    Reject { id: i64 },

    /// Return the book (borrower) or mark it returned (lender)
    Return { id: i64 },

    Cancel { id: i64 },

    /// Every request you took part in
    History,
}

#[derive(Subcommand, Debug)]
pub enum NotificationsCommand {
    List {
        #[arg(long)]
        unread: bool,
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },

    /// Unread count
    Count,

    /// Mark one notification read
    Read { id: i64 },

    ReadAll,

    Delete { id: i64 },

    ClearRead,

    ClearAll,

    /// Print the unread count whenever it changes
    Watch,
}

impl Command {
    /// Page this command stands in for; `None` for commands that need no session
    pub fn route(&self) -> Option<Route> {
        let route = match self {
            Command::Login { .. } => Route::Login,
            Command::Register { .. } => Route::Register,
            Command::Logout | Command::Health => return None,
            Command::Whoami | Command::Profile { .. } => Route::Profile,
            Command::Dashboard | Command::Stats => Route::Dashboard,
            Command::Lookup { .. } => Route::AddBook,
            Command::Books { command } => match command {
                BooksCommand::List { .. } | BooksCommand::Genres => Route::Books,
                BooksCommand::Show { id } | BooksCommand::Edit { id, .. } => {
                    Route::BookDetails { id: *id }
                }
                BooksCommand::Delete { id } => Route::BookDetails { id: *id },
                BooksCommand::Add { .. } => Route::AddBook,
                BooksCommand::Mine { .. } | BooksCommand::Return { .. } => Route::MyBooks,
                BooksCommand::Borrowed | BooksCommand::GiveBack { .. } => Route::MyBorrowed,
            },
            Command::Requests { command } => match command {
                RequestsCommand::Create { book_id, .. } => Route::BookDetails { id: *book_id },
                _ => Route::Requests,
            },
            Command::Notifications { .. } => Route::Notifications,
        };
        Some(route)
    }
}

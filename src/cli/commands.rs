use super::{render, BooksCommand, Command, NotificationsCommand, ProfileCommand, RequestsCommand};
use crate::api::models::{BookStatus, RequestStatus, StatusFilter};
use crate::api::ApiClient;
use crate::app::navigation::{guard, Guard, Route};
use crate::auth::service::{
    AuthService, LOGIN_FAILED, NAME_UPDATED, NAME_UPDATE_FAILED, PASSWORD_UPDATED,
    PASSWORD_UPDATE_FAILED, REGISTRATION_FAILED,
};
use crate::auth::session::Session;
use crate::books::{add, detail, shelves, AddBookForm, BookDetailView, BookLookup, MyBooksView, MyBorrowedView};
use crate::catalog::CatalogView;
use crate::core::config::Config;
use crate::core::error::{LendError, Result};
use crate::dashboard::{Dashboard, ProfileStats};
use crate::lending::{available_actions, RequestAction, RequestsView, ViewerRole};
use crate::notifications::{feed, NotificationFeed, UnreadCountPoller};
use crate::storage::FileStorage;
use chrono::Utc;
use std::io::{BufRead, Write};
use std::sync::Arc;
use tracing::{debug, info};

/// How a command failed, already phrased for the terminal
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Failed(String),

    #[error("Not signed in. Run `lend-a-read login <apartment>` first.")]
    NotSignedIn,

    #[error("Your session has ended. Run `lend-a-read login <apartment>` to sign in again.")]
    SessionEnded,
}

type CliResult = std::result::Result<(), CliError>;

trait OrShow<T> {
    /// Phrase a failure the way the page would: server text or `fallback`
    fn or_show(self, fallback: &str) -> std::result::Result<T, CliError>;

    /// Like `or_show`, but a 401 is a rejected credential rather than a lost session
    fn or_reject(self, fallback: &str) -> std::result::Result<T, CliError>;
}

impl<T> OrShow<T> for Result<T> {
    fn or_show(self, fallback: &str) -> std::result::Result<T, CliError> {
        self.map_err(|e| {
            if e.is_unauthorized() {
                CliError::SessionEnded
            } else {
                CliError::Failed(e.user_message(fallback))
            }
        })
    }

    fn or_reject(self, fallback: &str) -> std::result::Result<T, CliError> {
        self.map_err(|e| CliError::Failed(e.user_message(fallback)))
    }
}

/// Everything a command needs, built once per process
pub struct Context {
    pub config: Config,
    pub api: ApiClient,
    pub auth: AuthService,
}

impl Context {
    /// Open durable storage in the data dir and wire the client to it
    pub async fn open(config: Config) -> Result<Self> {
        let storage = FileStorage::open(&config.storage.data_dir).await?;
        debug!(path = %storage.path().display(), "Using session storage");

        let session = Arc::new(Session::new(Arc::new(storage)));
        let api = ApiClient::new(&config.api, session)?;
        Ok(Self::with_api(config, api))
    }

    pub fn with_api(config: Config, api: ApiClient) -> Self {
        let auth = AuthService::new(api.clone());
        Self { config, api, auth }
    }

    fn session(&self) -> &Arc<Session> {
        self.api.session()
    }
}

/// Restore the session, apply the route guard and run `command`
pub async fn run(ctx: &Context, command: Command) -> CliResult {
    let route = match command.route() {
        Some(route) => route,
        None => return run_unguarded(ctx, command).await,
    };

    let state = ctx
        .auth
        .initialize()
        .await
        .or_show("Failed to restore session")?;

    match guard(&route, &state) {
        Guard::Allow => {}
        Guard::Redirect(Route::Login) | Guard::Pending => return Err(CliError::NotSignedIn),
        Guard::Redirect(_) => {
            if let Some(user) = state.user() {
                println!(
                    "Already signed in as {}. Run `lend-a-read logout` first.",
                    render::user(user)
                );
            }
            return Ok(());
        }
    }

    ctx.session().navigator().push(route);
    dispatch(ctx, command).await
}

async fn run_unguarded(ctx: &Context, command: Command) -> CliResult {
    match command {
        Command::Logout => {
            ctx.auth.logout().await;
            println!("Signed out.");
            Ok(())
        }
        Command::Health => {
            let health = ctx.api.health().await.or_show("Backend unreachable")?;
            println!(
                "{}: {}",
                health.status,
                health.message.as_deref().unwrap_or("no message")
            );
            if health.is_healthy() {
                Ok(())
            } else {
                Err(CliError::Failed("Backend reports unhealthy".to_string()))
            }
        }
        other => Err(CliError::Failed(format!("{:?} needs a session", other))),
    }
}

async fn dispatch(ctx: &Context, command: Command) -> CliResult {
    match command {
        Command::Login {
            apartment,
            password,
        } => {
            let password = password_or_prompt(password, "Password")?;
            let user = ctx
                .auth
                .login(&apartment, &password)
                .await
                .or_reject(LOGIN_FAILED)?;
            println!("Welcome back, {}!", user.name);
            Ok(())
        }
        Command::Register {
            apartment,
            name,
            password,
            confirm,
        } => {
            let password = password_or_prompt(password, "Password")?;
            let confirm = password_or_prompt(confirm, "Confirm password")?;
            let user = ctx
                .auth
                .register(&apartment, &name, &password, &confirm)
                .await
                .or_reject(REGISTRATION_FAILED)?;
            println!("Welcome to Lend-a-Read, {}!", user.name);
            Ok(())
        }
        Command::Whoami => {
            match ctx.session().current_user() {
                Some(user) => println!("{}", render::user(&user)),
                None => return Err(CliError::NotSignedIn),
            }
            Ok(())
        }
        Command::Profile { action } => profile(ctx, action).await,
        Command::Dashboard => dashboard(ctx).await,
        Command::Stats => {
            let stats = ctx.api.stats().await.or_show("Failed to fetch stats")?;
            print!("{}", render::stats(&stats));
            Ok(())
        }
        Command::Lookup { query } => lookup(ctx, &query).await,
        Command::Books { command } => books(ctx, command).await,
        Command::Requests { command } => requests(ctx, command).await,
        Command::Notifications { command } => notifications(ctx, command).await,
        Command::Logout => run_unguarded(ctx, Command::Logout).await,
        Command::Health => run_unguarded(ctx, Command::Health).await,
    }
}

async fn profile(ctx: &Context, action: Option<ProfileCommand>) -> CliResult {
    match action {
        None => {
            let user = ctx
                .auth
                .refresh_profile()
                .await
                .or_show("Failed to load profile")?;
            let stats = ProfileStats::load(&ctx.api)
                .await
                .or_show("Failed to load profile")?;

            println!("{}", render::user(&user));
            println!("  Books listed:    {}", stats.listed);
            println!("  Currently lent:  {}", stats.currently_lent);
            println!("  Books borrowed:  {}", stats.borrowed);
            println!("  Total requests:  {}", stats.total_requests);
        }
        Some(ProfileCommand::Name { name }) => {
            let user = ctx
                .auth
                .update_name(&name)
                .await
                .or_show(NAME_UPDATE_FAILED)?;
            println!("{} Now showing as {}.", NAME_UPDATED, user.name);
        }
        Some(ProfileCommand::Password { password, confirm }) => {
            let password = password_or_prompt(password, "New password")?;
            let confirm = password_or_prompt(confirm, "Confirm new password")?;
            ctx.auth
                .change_password(&password, &confirm)
                .await
                .or_show(PASSWORD_UPDATE_FAILED)?;
            println!("{}", PASSWORD_UPDATED);
        }
    }
    Ok(())
}

async fn dashboard(ctx: &Context) -> CliResult {
    let dashboard = Dashboard::load(&ctx.api, ctx.config.catalog.dashboard_recent)
        .await
        .or_show("Failed to load dashboard")?;

    if let Some(user) = ctx.session().current_user() {
        println!("Welcome back, {}!", user.name);
    }
    if let Some(banner) = dashboard.pending_banner() {
        println!("{} Run `lend-a-read requests list` to review.", banner);
    }
    println!();
    print!("{}", render::stats(&dashboard.stats));

    println!("\nRecently added");
    print_books(&dashboard.recent_books, "No books available yet.");

    println!("\nYour books");
    let mine: Vec<_> = dashboard.my_books.iter().take(4).cloned().collect();
    print_books(&mine, "You haven't listed any books yet.");
    Ok(())
}

async fn lookup(ctx: &Context, query: &str) -> CliResult {
    let lookup = book_lookup(ctx);
    let results = lookup
        .search_now(query)
        .await
        .or_show("Book lookup failed")?;

    if results.is_empty() {
        println!("No matches for \"{}\".", query.trim());
    }
    for (i, book) in results.iter().enumerate() {
        println!(
            "{:>2}. {} by {}{}{}",
            i + 1,
            book.title,
            book.author,
            if book.published_date.is_empty() {
                String::new()
            } else {
                format!(" ({})", book.published_date)
            },
            if book.isbn.is_empty() {
                String::new()
            } else {
                format!(" ISBN {}", book.isbn)
            }
        );
    }
    Ok(())
}

fn book_lookup(ctx: &Context) -> BookLookup {
    BookLookup::new(
        Arc::new(ctx.api.clone()),
        ctx.config.session.debounce(),
        ctx.config.session.search_min_chars,
    )
}

async fn books(ctx: &Context, command: BooksCommand) -> CliResult {
    match command {
        BooksCommand::List {
            search,
            genre,
            status,
            page,
        } => {
            let mut view = CatalogView::new(ctx.api.clone(), ctx.config.catalog.page_size);
            let query = view.query_mut();
            query.set_search(search.unwrap_or_default());
            query.set_genre(genre.unwrap_or_default());
            query.set_status(status);
            query.set_page(page);
            view.refresh().await.or_show("Failed to fetch books")?;

            print_books(view.books(), empty_catalog_message(status));
            if let Some(p) = view.pagination() {
                println!("{}", render::pagination(p, "books"));
            }
        }
        BooksCommand::Show { id } => {
            let mut view = BookDetailView::new(ctx.api.clone(), id);
            view.refresh().await.or_show(detail::LOAD_FAILED)?;
            if let Some(book) = view.book() {
                print!("{}", render::book_details(book, &view.actions()));
            }
        }
        BooksCommand::Add {
            title,
            author,
            cover,
            genre,
            lookup,
            pick,
        } => {
            let mut form = AddBookForm::new();
            match lookup {
                Some(query) => {
                    let results = book_lookup(ctx)
                        .search_now(&query)
                        .await
                        .or_show("Book lookup failed")?;
                    let chosen = pick.checked_sub(1).and_then(|i| results.get(i)).ok_or_else(|| {
                        CliError::Failed(format!("No result #{} for \"{}\"", pick, query.trim()))
                    })?;
                    form.apply_suggestion(chosen);
                }
                None => form.enter_manual_mode(),
            }
            if let Some(title) = title {
                form.title = title;
            }
            if let Some(author) = author {
                form.author = author;
            }
            if let Some(cover) = cover {
                form.cover_image = cover;
            }
            if let Some(genre) = genre {
                form.genre = genre;
            }

            let book = form.submit(&ctx.api).await.or_show(add::ADD_FAILED)?;
            println!("{}", add::ADDED);
            println!("{}", render::book_line(&book));
        }
        BooksCommand::Edit {
            id,
            title,
            author,
            genre,
        } => {
            let mut view = BookDetailView::new(ctx.api.clone(), id);
            view.refresh().await.or_show(detail::LOAD_FAILED)?;
            let (title, author, genre) = match view.book() {
                Some(book) => (
                    title.unwrap_or_else(|| book.title.clone()),
                    author.unwrap_or_else(|| book.author.clone()),
                    genre.unwrap_or_else(|| book.genre.clone()),
                ),
                None => return Err(CliError::Failed(detail::LOAD_FAILED.to_string())),
            };

            let book = view
                .edit(&title, &author, &genre)
                .await
                .or_show(detail::UPDATE_FAILED)?;
            println!("{}", detail::UPDATED);
            print!("{}", render::book_details(&book, &view.actions()));
        }
        BooksCommand::Delete { id } => {
            let mut view = BookDetailView::new(ctx.api.clone(), id);
            view.refresh().await.or_show(detail::LOAD_FAILED)?;
            view.delete().await.or_show(detail::DELETE_FAILED)?;
            println!("{}", detail::DELETED);
        }
        BooksCommand::Mine { status } => {
            let mut view = MyBooksView::new(ctx.api.clone());
            view.set_status_filter(status)
                .await
                .or_show(shelves::MY_BOOKS_FAILED)?;

            print_books(view.books(), "You haven't listed any books yet.");
            println!(
                "{} listed, {} available, {} lent out",
                view.books().len(),
                view.count(BookStatus::Available),
                view.count(BookStatus::Borrowed)
            );
        }
        BooksCommand::Borrowed => {
            let mut view = MyBorrowedView::new(ctx.api.clone());
            view.refresh().await.or_show(shelves::BORROWED_FAILED)?;

            if view.books().is_empty() {
                println!("You're not borrowing any books.");
            }
            for book in view.books() {
                println!("{}", render::book_line(book));
                if let Some(since) = view
                    .active_request(book.id)
                    .and_then(|r| r.responded_at.as_deref())
                {
                    println!("       Borrowed since {}", crate::api::models::format_timestamp(since));
                }
            }
        }
        BooksCommand::GiveBack { id } => {
            let mut view = MyBorrowedView::new(ctx.api.clone());
            view.refresh().await.or_show(shelves::BORROWED_FAILED)?;
            view.return_book(id).await.or_show(shelves::RETURN_FAILED)?;
            println!("{}", shelves::RETURNED);
        }
        BooksCommand::Return { id } => {
            let mut view = MyBooksView::new(ctx.api.clone());
            view.mark_returned(id)
                .await
                .or_show(detail::MARK_RETURNED_FAILED)?;
            println!("{}", detail::MARKED_RETURNED);
        }
        BooksCommand::Genres => {
            let mut view = CatalogView::new(ctx.api.clone(), ctx.config.catalog.page_size);
            view.load_genres().await;
            for genre in view.genres() {
                println!("{}", genre);
            }
        }
    }
    Ok(())
}

async fn requests(ctx: &Context, command: RequestsCommand) -> CliResult {
    match command {
        RequestsCommand::Create { book_id, message } => {
            let mut view = BookDetailView::new(ctx.api.clone(), book_id);
            view.refresh().await.or_show(detail::LOAD_FAILED)?;
            let request = view
                .request_borrow(message.as_deref().unwrap_or(""))
                .await
                .or_show(detail::BORROW_FAILED)?;
            println!("{}", detail::BORROW_SENT);
            print!(
                "{}",
                render::request_card(
                    &request,
                    ViewerRole::Borrower,
                    available_actions(ViewerRole::Borrower, request.status)
                )
            );
        }
        RequestsCommand::List { tab, status } => {
            let mut view = RequestsView::new(ctx.api.clone());
            view.set_tab(tab).await.or_show(crate::lending::board::FETCH_FAILED)?;
            if status.is_some() {
                view.set_status_filter(status)
                    .await
                    .or_show(crate::lending::board::FETCH_FAILED)?;
            }

            if view.requests().is_empty() {
                println!("{}", empty_requests_message(tab, status));
            }
            for request in view.requests() {
                print!(
                    "{}",
                    render::request_card(request, tab, view.actions_for(request))
                );
            }
            println!("{} pending", view.pending_count(tab));
        }
        RequestsCommand::Show { id } => {
            let request = ctx.api.get_request(id).await.or_show("Failed to load request")?;
            let role = viewer_role(ctx, &request)?;
            print!(
                "{}",
                render::request_card(&request, role, available_actions(role, request.status))
            );
        }
        RequestsCommand::Approve { id } => act(ctx, id, |_| RequestAction::Approve).await?,
        RequestsCommand::Reject { id } => act(ctx, id, |_| RequestAction::Reject).await?,
        RequestsCommand::Cancel { id } => act(ctx, id, |_| RequestAction::Cancel).await?,
        RequestsCommand::Return { id } => {
            act(ctx, id, |role| match role {
                ViewerRole::Lender => RequestAction::MarkReturned,
                ViewerRole::Borrower => RequestAction::Return,
            })
            .await?
        }
        RequestsCommand::History => {
            let history = ctx
                .api
                .request_history()
                .await
                .or_show("Failed to fetch request history")?;
            if history.is_empty() {
                println!("No requests yet.");
            }
            for request in &history {
                let role = viewer_role(ctx, request)?;
                print!(
                    "{}",
                    render::request_card(request, role, available_actions(role, request.status))
                );
            }
        }
    }
    Ok(())
}

/// Resolve the viewer's side of request `id`, load that tab and act on it
async fn act(
    ctx: &Context,
    id: i64,
    choose: impl FnOnce(ViewerRole) -> RequestAction,
) -> CliResult {
    let request = ctx.api.get_request(id).await.or_show("Failed to load request")?;
    let role = viewer_role(ctx, &request)?;
    let action = choose(role);

    let mut view = RequestsView::new(ctx.api.clone());
    view.set_tab(role)
        .await
        .or_show(crate::lending::board::FETCH_FAILED)?;
    view.act(id, action).await.or_show(action.failure_fallback())?;

    info!(request_id = id, action = action.label(), "Request updated");
    println!("{}", view.flash().success().unwrap_or(action.success_message()));
    Ok(())
}

fn viewer_role(
    ctx: &Context,
    request: &crate::api::models::BorrowRequest,
) -> std::result::Result<ViewerRole, CliError> {
    let user = ctx.session().current_user().ok_or(CliError::NotSignedIn)?;
    ViewerRole::of(user.id, request).ok_or_else(|| {
        CliError::Failed(format!("You are not part of request {}", request.id))
    })
}

async fn notifications(ctx: &Context, command: NotificationsCommand) -> CliResult {
    let mut inbox = NotificationFeed::new(ctx.api.clone(), ctx.config.notifications.page_size);

    match command {
        NotificationsCommand::List { unread, page } => {
            if unread {
                inbox.set_unread_only(true).await.or_show(feed::FETCH_FAILED)?;
            }
            if page != inbox.page() || !unread {
                inbox.go_to_page(page).await.or_show(feed::FETCH_FAILED)?;
            }

            let now = Utc::now();
            if inbox.notifications().is_empty() {
                println!(
                    "{}",
                    if unread {
                        "No unread notifications."
                    } else {
                        "No notifications yet."
                    }
                );
            }
            for notification in inbox.notifications() {
                println!("{}", render::notification_line(notification, now));
            }
            println!("{} unread", inbox.unread_count());
            if let Some(p) = inbox.pagination() {
                println!("{}", render::pagination(p, "notifications"));
            }
            return Ok(());
        }
        NotificationsCommand::Count => {
            let count = ctx
                .api
                .unread_count()
                .await
                .or_show("Failed to fetch notification count")?;
            println!("{}", count);
            return Ok(());
        }
        NotificationsCommand::Watch => return watch(ctx).await,
        _ => {}
    }

    inbox.refresh().await.or_show(feed::FETCH_FAILED)?;
    match command {
        NotificationsCommand::Read { id } => {
            inbox.mark_read(id).await.or_show(feed::MARK_READ_FAILED)?;
            println!("Marked as read. {} unread.", inbox.unread_count());
        }
        NotificationsCommand::ReadAll => {
            inbox.mark_all_read().await.or_show(feed::MARK_ALL_FAILED)?;
        }
        NotificationsCommand::Delete { id } => {
            inbox.delete(id).await.or_show(feed::DELETE_FAILED)?;
            println!("Notification deleted. {} unread.", inbox.unread_count());
        }
        NotificationsCommand::ClearRead => {
            inbox.clear_read().await.or_show(feed::CLEAR_FAILED)?;
        }
        NotificationsCommand::ClearAll => {
            inbox.clear_all().await.or_show(feed::CLEAR_FAILED)?;
        }
        NotificationsCommand::List { .. }
        | NotificationsCommand::Count
        | NotificationsCommand::Watch => {}
    }

    if let Some(message) = inbox.flash().success() {
        println!("{}", message);
    }
    Ok(())
}

/// Print the unread count on every change until interrupted
async fn watch(ctx: &Context) -> CliResult {
    let poller = UnreadCountPoller::spawn(ctx.api.clone(), ctx.config.session.poll_interval());
    let mut counts = poller.subscribe();
    let mut session = ctx.session().subscribe();

    println!("Watching for notifications (Ctrl-C to stop)");
    let mut shown = poller.count();
    println!("Unread notifications: {}", shown);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = counts.changed() => {
                if changed.is_err() {
                    break;
                }
                let unread = *counts.borrow_and_update();
                if unread != shown {
                    shown = unread;
                    println!("Unread notifications: {}", unread);
                }
            }
            changed = session.changed() => {
                if changed.is_err() || !session.borrow_and_update().is_authenticated() {
                    poller.stop();
                    return Err(CliError::SessionEnded);
                }
            }
        }
    }

    poller.stop();
    Ok(())
}

fn print_books(books: &[crate::api::models::Book], empty: &str) {
    if books.is_empty() {
        println!("{}", empty);
    }
    for book in books {
        println!("{}", render::book_line(book));
    }
}

fn empty_catalog_message(status: StatusFilter) -> &'static str {
    match status {
        StatusFilter::Available => "No available books match your search.",
        StatusFilter::Borrowed => "No borrowed books match your search.",
        StatusFilter::All => "No books match your search.",
    }
}

fn empty_requests_message(tab: ViewerRole, status: Option<RequestStatus>) -> String {
    match status {
        Some(status) => format!("No {} requests", status),
        None => format!("No {} requests", tab.tab_name()),
    }
}

fn password_or_prompt(
    given: Option<String>,
    label: &str,
) -> std::result::Result<String, CliError> {
    if let Some(password) = given {
        return Ok(password);
    }

    eprint!("{}: ", label);
    std::io::stderr()
        .flush()
        .map_err(|e| CliError::Failed(e.to_string()))?;

    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| CliError::Failed(e.to_string()))?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

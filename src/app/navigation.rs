//! Routes and route guards

use std::fmt;
use std::sync::{Mutex, MutexGuard};
use tokio::sync::watch;

use crate::auth::session::SessionState;

/// Every screen the client can show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    Dashboard,
    Books,
    BookDetails { id: i64 },
    AddBook,
    MyBooks,
    MyBorrowed,
    Requests,
    Notifications,
    Profile,
}

impl Route {
    /// Entry points reachable without a session
    pub fn is_public(&self) -> bool {
        matches!(self, Route::Login | Route::Register)
    }

    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::Books => "/books".to_string(),
            Route::BookDetails { id } => format!("/books/{}", id),
            Route::AddBook => "/add-book".to_string(),
            Route::MyBooks => "/my-books".to_string(),
            Route::MyBorrowed => "/my-borrowed".to_string(),
            Route::Requests => "/requests".to_string(),
            Route::Notifications => "/notifications".to_string(),
            Route::Profile => "/profile".to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Outcome of checking a route against the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guard {
    /// Session still loading; show a spinner
    Pending,
    Allow,
    Redirect(Route),
}

/// Decide whether `route` may be shown in `state`
pub fn guard(route: &Route, state: &SessionState) -> Guard {
    match state {
        SessionState::Loading => Guard::Pending,
        SessionState::Unauthenticated if !route.is_public() => Guard::Redirect(Route::Login),
        SessionState::Authenticated { .. } if route.is_public() => {
            Guard::Redirect(Route::Dashboard)
        }
        _ => Guard::Allow,
    }
}

/// Route history with the current entry published on a watch channel.
///
/// `push` adds an entry, `replace` overwrites the current one, so a forced
/// redirect leaves no way back to the page that triggered it.
#[derive(Debug)]
pub struct Navigator {
    history: Mutex<Vec<Route>>,
    current: watch::Sender<Route>,
}

impl Navigator {
    pub fn new(initial: Route) -> Self {
        let (current, _) = watch::channel(initial.clone());
        Self {
            history: Mutex::new(vec![initial]),
            current,
        }
    }

    pub fn current(&self) -> Route {
        self.current.borrow().clone()
    }

    /// Number of entries `back` can walk through, the current one included
    pub fn depth(&self) -> usize {
        self.entries().len()
    }

    pub fn push(&self, route: Route) {
        tracing::debug!(route = %route, "Navigating");
        self.entries().push(route.clone());
        self.current.send_replace(route);
    }

    /// Replace the current entry; used for forced redirects
    pub fn replace(&self, route: Route) {
        tracing::debug!(route = %route, "Redirecting");
        {
            let mut history = self.entries();
            history.pop();
            history.push(route.clone());
        }
        self.current.send_replace(route);
    }

    /// Return to the previous entry; false when already at the first one
    pub fn back(&self) -> bool {
        let previous = {
            let mut history = self.entries();
            if history.len() < 2 {
                return false;
            }
            history.pop();
            history.last().cloned()
        };

        match previous {
            Some(route) => {
                tracing::debug!(route = %route, "Going back");
                self.current.send_replace(route);
                true
            }
            None => false,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Route> {
        self.current.subscribe()
    }

    fn entries(&self) -> MutexGuard<'_, Vec<Route>> {
        // A poisoned lock still holds a valid Vec
        self.history.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Route::Dashboard)
    }
}

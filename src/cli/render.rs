//! Plain-text rendering of wire models

use crate::api::models::{
    format_timestamp, Book, BorrowRequest, Notification, Pagination, Stats, User,
};
use crate::books::BookAction;
use crate::lending::{RequestAction, ViewerRole};
use crate::notifications::feed::relative_time;
use chrono::{DateTime, Utc};
use std::fmt::Write;

/// Up to two initials, as on the avatar bubbles
pub fn initials(name: &str) -> String {
    let letters: String = name
        .split_whitespace()
        .filter_map(|part| part.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect();

    if letters.is_empty() {
        "?".to_string()
    } else {
        letters
    }
}

pub fn user(user: &User) -> String {
    let mut out = format!(
        "{} [{}] apt {} (#{})",
        user.name,
        initials(&user.name),
        user.apartment_number,
        user.id
    );
    if let Some(created) = &user.created_at {
        let _ = write!(out, ", member since {}", format_timestamp(created));
    }
    out
}

/// One catalog row
pub fn book_line(book: &Book) -> String {
    let mut out = format!(
        "#{:<5} {} by {} [{}] ({})",
        book.id, book.title, book.author, book.genre, book.status
    );
    if let Some(owner) = &book.owner {
        let _ = write!(out, " - {}, apt {}", owner.name, owner.apartment_number);
    }
    out
}

pub fn book_details(book: &Book, actions: &[BookAction]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", book.title);
    let _ = writeln!(out, "  by {}", book.author);
    let _ = writeln!(out, "  genre:  {}", book.genre);
    let _ = writeln!(out, "  status: {}", book.status);
    if let Some(owner) = &book.owner {
        let _ = writeln!(out, "  owner:  {} (apt {})", owner.name, owner.apartment_number);
    }
    if let Some(borrower) = &book.borrower {
        let _ = writeln!(
            out,
            "  borrowed by: {} (apt {})",
            borrower.name, borrower.apartment_number
        );
    }
    if let Some(cover) = book.cover_url() {
        let _ = writeln!(out, "  cover:  {}", cover);
    }
    if let Some(created) = &book.created_at {
        let _ = writeln!(out, "  added:  {}", format_timestamp(created));
    }
    out.push_str(&action_line(actions.iter().map(|a| a.label())));
    out
}

/// A request card as seen from `role`'s tab
pub fn request_card(request: &BorrowRequest, role: ViewerRole, actions: &[RequestAction]) -> String {
    let counterpart = match role {
        ViewerRole::Lender => request.borrower.as_ref(),
        ViewerRole::Borrower => request.lender.as_ref(),
    };
    let (name, apartment) = counterpart
        .map(|u| (u.name.as_str(), u.apartment_number.as_str()))
        .unwrap_or(("Unknown", ""));

    let mut out = format!(
        "#{:<5} {} - {}, apt {} [{}]\n",
        request.id,
        request.book_title(),
        name,
        apartment,
        request.status
    );
    if let Some(message) = request.message.as_deref().filter(|m| !m.is_empty()) {
        let _ = writeln!(out, "       \"{}\"", message);
    }

    let _ = write!(out, "       Requested: {}", format_timestamp(&request.requested_at));
    if let Some(at) = &request.responded_at {
        let _ = write!(out, "  Responded: {}", format_timestamp(at));
    }
    if let Some(at) = &request.returned_at {
        let _ = write!(out, "  Returned: {}", format_timestamp(at));
    }
    out.push('\n');

    out.push_str(&action_line(actions.iter().map(|a| a.label())));
    out
}

pub fn notification_line(notification: &Notification, now: DateTime<Utc>) -> String {
    format!(
        "{} #{:<5} [{}] {} ({})",
        if notification.is_read { " " } else { "*" },
        notification.id,
        notification.notification_type.label(),
        notification.message,
        relative_time(&notification.created_at, now)
    )
}

pub fn pagination(p: &Pagination, noun: &str) -> String {
    format!(
        "{} {} - page {} of {}{}{}",
        p.total,
        noun,
        p.page,
        p.pages.max(1),
        if p.has_prev { " [prev]" } else { "" },
        if p.has_next { " [next]" } else { "" }
    )
}

pub fn stats(stats: &Stats) -> String {
    let rows = [
        ("Total books", stats.total_books),
        ("Available", stats.available_books),
        ("Borrowed", stats.borrowed_books),
        ("Residents", stats.total_users),
        ("Requests", stats.total_requests),
        ("Pending", stats.pending_requests),
    ];

    rows.iter()
        .map(|(label, value)| format!("{:<12} {}\n", label, value))
        .collect()
}

fn action_line<'a>(labels: impl Iterator<Item = &'a str>) -> String {
    let labels: Vec<&str> = labels.collect();
    if labels.is_empty() {
        String::new()
    } else {
        format!("       Actions: {}\n", labels.join(" | "))
    }
}

use chrono::{DateTime, Utc};

use super::state::{Speaker, ThemeMode, Turn, ViewState};
use crate::models::{Booking, StatusSummary, Tone};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

pub fn render_booking_row(booking: &Booking, now: DateTime<Utc>) -> String {
    format!(
        "{} | {} | {} | {} | {} | {} | {}",
        booking.id,
        booking.customer_name,
        booking.technician_name,
        booking.profession,
        booking.start_time.format(TIME_FORMAT),
        booking.end_time.format(TIME_FORMAT),
        booking.status_at(now).label(),
    )
}

pub fn render_turn(turn: &Turn, now: DateTime<Utc>) -> Vec<String> {
    let header = match turn.speaker {
        Speaker::User => "[you]".to_string(),
        Speaker::Assistant => format!("[assistant:{}]", turn.tone.as_str()),
    };

    let mut lines = vec![header];
    lines.extend(turn.text.lines().map(|l| format!("  {l}")));
    lines.extend(
        turn.bookings
            .iter()
            .map(|b| format!("  - {}", render_booking_row(b, now))),
    );
    lines
}

pub fn render_table(view: &ViewState, now: DateTime<Utc>) -> Vec<String> {
    let total = view.bookings.len();
    let mut lines = vec!["id | customer | technician | profession | start | end | status".to_string()];
    lines.extend(
        view.current_page()
            .iter()
            .map(|b| render_booking_row(b, now)),
    );
    lines.push(format!(
        "page {}/{} ({} bookings)",
        view.pagination.page + 1,
        view.pagination.page_count(total),
        total
    ));
    lines
}

/// Drawer content: status counts over the loaded bookings.
pub fn render_drawer(view: &ViewState, now: DateTime<Utc>) -> Vec<String> {
    let summary = StatusSummary::from_bookings(&view.bookings, now);
    vec![
        format!("Bookings loaded: {}", summary.total()),
        format!("  Upcoming:    {}", summary.upcoming),
        format!("  In Progress: {}", summary.in_progress),
        format!("  Completed:   {}", summary.completed),
    ]
}

/// Wraps a line in the ANSI color for its tone under the active theme.
pub fn paint(theme: ThemeMode, tone: Tone, line: &str) -> String {
    let code = match (theme, tone) {
        (ThemeMode::Light, Tone::Info) => "34",
        (ThemeMode::Light, Tone::Success) => "32",
        (ThemeMode::Light, Tone::Warning) => "33",
        (ThemeMode::Light, Tone::Error) => "31",
        (ThemeMode::Dark, Tone::Info) => "96",
        (ThemeMode::Dark, Tone::Success) => "92",
        (ThemeMode::Dark, Tone::Warning) => "93",
        (ThemeMode::Dark, Tone::Error) => "91",
    };
    format!("\x1b[{code}m{line}\x1b[0m")
}

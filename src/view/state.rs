use std::ops::Range;

use crate::errors::ApiError;
use crate::models::{Booking, CommandResult, Tone};

pub const DEFAULT_PAGE_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub speaker: Speaker,
    pub text: String,
    pub tone: Tone,
    pub bookings: Vec<Booking>,
}

impl Turn {
    fn user(text: String) -> Self {
        Self {
            speaker: Speaker::User,
            text,
            tone: Tone::Info,
            bookings: vec![],
        }
    }

    fn assistant(tone: Tone, text: String, bookings: Vec<Booking>) -> Self {
        Self {
            speaker: Speaker::Assistant,
            text,
            tone,
            bookings,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }
}

/// Zero-based page cursor over the bookings table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 0,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    /// Never zero, so an empty table still shows as page 1 of 1.
    pub fn page_count(&self, total: usize) -> usize {
        let per_page = self.per_page.max(1);
        total.div_ceil(per_page).max(1)
    }

    pub fn range(&self, total: usize) -> Range<usize> {
        let per_page = self.per_page.max(1);
        let start = (self.page * per_page).min(total);
        let end = (start + per_page).min(total);
        start..end
    }

    pub fn next(&mut self, total: usize) {
        self.page = (self.page + 1).min(self.page_count(total) - 1);
    }

    pub fn prev(&mut self) {
        self.page = self.page.saturating_sub(1);
    }

    pub fn clamp(&mut self, total: usize) {
        self.page = self.page.min(self.page_count(total) - 1);
    }
}

/// Everything that can change the view.
#[derive(Debug, Clone)]
pub enum Action {
    UserSaid(String),
    CommandAnswered(CommandResult),
    BookingsLoaded(Vec<Booking>),
    BookingCreated(Booking),
    BookingShown(Booking),
    BookingDeleted(String),
    Notice(Tone, String),
    Failed(ApiError),
    ToggleTheme,
    ToggleDrawer,
    NextPage,
    PrevPage,
}

/// View state owned by the console loop. Renderers only ever see `&ViewState`.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub transcript: Vec<Turn>,
    pub bookings: Vec<Booking>,
    pub theme: ThemeMode,
    pub drawer_open: bool,
    pub pagination: Pagination,
    pub last_error: Option<ApiError>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::UserSaid(text) => {
                self.transcript.push(Turn::user(text));
            }
            Action::CommandAnswered(result) => {
                self.last_error = None;
                let tone = result.intent.tone();
                let text = result
                    .message
                    .clone()
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| format!("({})", result.intent.as_str()));
                let attached = result.bookings();
                if let Some(list) = result.bookings {
                    self.replace_bookings(list);
                }
                self.transcript.push(Turn::assistant(tone, text, attached));
            }
            Action::BookingsLoaded(list) => {
                self.last_error = None;
                let text = match list.len() {
                    0 => "No bookings yet.".to_string(),
                    1 => "Loaded 1 booking.".to_string(),
                    n => format!("Loaded {n} bookings."),
                };
                self.replace_bookings(list);
                self.transcript.push(Turn::assistant(Tone::Info, text, vec![]));
            }
            Action::BookingCreated(booking) => {
                self.last_error = None;
                let text = format!(
                    "Booked {} with {} ({}).",
                    booking.customer_name, booking.technician_name, booking.profession
                );
                self.bookings.push(booking.clone());
                self.transcript
                    .push(Turn::assistant(Tone::Success, text, vec![booking]));
            }
            Action::BookingShown(booking) => {
                self.last_error = None;
                let text = format!("Booking {}:", booking.id);
                self.transcript
                    .push(Turn::assistant(Tone::Info, text, vec![booking]));
            }
            Action::BookingDeleted(id) => {
                self.last_error = None;
                self.bookings.retain(|b| b.id != id);
                self.pagination.clamp(self.bookings.len());
                self.transcript.push(Turn::assistant(
                    Tone::Success,
                    format!("Deleted booking {id}."),
                    vec![],
                ));
            }
            Action::Notice(tone, text) => {
                self.transcript.push(Turn::assistant(tone, text, vec![]));
            }
            Action::Failed(err) => {
                let text = format!("{err}. Type /bookings to refresh, or try again.");
                self.last_error = Some(err);
                self.transcript.push(Turn::assistant(Tone::Error, text, vec![]));
            }
            Action::ToggleTheme => self.theme = self.theme.toggled(),
            Action::ToggleDrawer => self.drawer_open = !self.drawer_open,
            Action::NextPage => self.pagination.next(self.bookings.len()),
            Action::PrevPage => self.pagination.prev(),
        }
    }

    pub fn current_page(&self) -> &[Booking] {
        &self.bookings[self.pagination.range(self.bookings.len())]
    }

    pub fn last_turn(&self) -> Option<&Turn> {
        self.transcript.last()
    }

    fn replace_bookings(&mut self, list: Vec<Booking>) {
        self.bookings = list;
        self.pagination.clamp(self.bookings.len());
    }
}

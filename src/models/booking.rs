use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::timestamp;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub customer_name: String,
    pub technician_name: String,
    pub profession: String,
    #[serde(with = "timestamp")]
    pub start_time: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub end_time: DateTime<Utc>,
}

impl Booking {
    pub fn status_at(&self, now: DateTime<Utc>) -> BookingStatus {
        BookingStatus::derive(now, self.start_time, self.end_time)
    }
}

/// Request body for `POST /bookings`. The service assigns the id and end time.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewBooking {
    pub customer_name: String,
    pub technician_name: String,
    pub profession: String,
    #[serde(with = "timestamp")]
    pub start_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookingStatus {
    Upcoming,
    InProgress,
    Completed,
}

impl BookingStatus {
    /// Classifies a booking window against `now`. Both ends are inclusive for
    /// `InProgress`, so a zero-length window at `now` is in progress.
    pub fn derive(now: DateTime<Utc>, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        if now < start {
            BookingStatus::Upcoming
        } else if now > end {
            BookingStatus::Completed
        } else {
            BookingStatus::InProgress
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BookingStatus::Upcoming => "Upcoming",
            BookingStatus::InProgress => "In Progress",
            BookingStatus::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Counts of derived statuses across a set of bookings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusSummary {
    pub upcoming: usize,
    pub in_progress: usize,
    pub completed: usize,
}

impl StatusSummary {
    pub fn from_bookings(bookings: &[Booking], now: DateTime<Utc>) -> Self {
        bookings
            .iter()
            .fold(StatusSummary::default(), |mut acc, b| {
                match b.status_at(now) {
                    BookingStatus::Upcoming => acc.upcoming += 1,
                    BookingStatus::InProgress => acc.in_progress += 1,
                    BookingStatus::Completed => acc.completed += 1,
                }
                acc
            })
    }

    pub fn total(&self) -> usize {
        self.upcoming + self.in_progress + self.completed
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Int(i64),
        Uint(u64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Int(n) => n.to_string(),
        Id::Uint(n) => n.to_string(),
    })
}

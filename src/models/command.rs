use serde::{Deserialize, Serialize};

use super::Booking;

/// Body of `POST /bookings/commands`.
#[derive(Debug, Clone, Serialize)]
pub struct CommandRequest<'a> {
    pub message: &'a str,
}

/// The service's reply to a free-text command.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommandResult {
    pub intent: Intent,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub booking: Option<Booking>,
    #[serde(default)]
    pub bookings: Option<Vec<Booking>>,
}

impl CommandResult {
    /// Single booking first, then the list.
    pub fn bookings(&self) -> Vec<Booking> {
        self.booking
            .iter()
            .cloned()
            .chain(self.bookings.iter().flatten().cloned())
            .collect()
    }
}

/// Server-assigned label. Not validated locally; only used to pick a tone.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Intent(pub String);

impl Intent {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn tone(&self) -> Tone {
        let label = self.0.trim().to_lowercase();

        if label.contains("error") || label.contains("fail") {
            return Tone::Error;
        }
        if matches!(
            label.as_str(),
            "unknown" | "unclear" | "clarify" | "clarification" | "not_found" | "conflict" | "invalid"
        ) {
            return Tone::Warning;
        }
        const SUCCESS_PREFIXES: &[&str] =
            &["create", "book", "delete", "cancel", "update", "reschedule"];
        if SUCCESS_PREFIXES.iter().any(|p| label.starts_with(p)) {
            return Tone::Success;
        }
        Tone::Info
    }
}

impl From<&str> for Intent {
    fn from(s: &str) -> Self {
        Intent(s.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Success,
    Warning,
    Error,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Info => "info",
            Tone::Success => "success",
            Tone::Warning => "warning",
            Tone::Error => "error",
        }
    }
}

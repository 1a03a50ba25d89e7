use crate::models::timestamp::parse_timestamp;
use crate::models::{NewBooking, Tone};
use crate::state::AppState;
use crate::view::{Action, ViewState};

pub const HELP: &str = "Commands:
  /bookings                                       list bookings
  /show <id>                                      show one booking
  /delete <id>                                    delete a booking
  /new <customer> | <technician> | <profession> | <start>
  /next, /prev                                    page through the table
  /theme                                          toggle light/dark
  /drawer                                         toggle the summary drawer
  /login <token>, /logout                         manage the stored token
  /help, /quit
Anything else is sent to the booking assistant.";

const NEW_USAGE: &str =
    "Usage: /new <customer> | <technician> | <profession> | <start, e.g. 2025-06-16 10:00>";

#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Blank,
    ListBookings,
    ShowBooking(String),
    DeleteBooking(String),
    CreateBooking(NewBooking),
    NextPage,
    PrevPage,
    ToggleTheme,
    ToggleDrawer,
    Login(String),
    Logout,
    Help,
    Quit,
    /// A slash command that could not be parsed, with the reply to show.
    Invalid(String),
    Chat(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub fn parse_input(line: &str) -> Input {
    let line = line.trim();
    if line.is_empty() {
        return Input::Blank;
    }
    if !line.starts_with('/') {
        return Input::Chat(line.to_string());
    }

    let parts: Vec<&str> = line.splitn(2, char::is_whitespace).collect();
    let command = parts[0].to_lowercase();
    let arg = parts.get(1).map(|s| s.trim()).filter(|s| !s.is_empty());

    match (command.as_str(), arg) {
        ("/bookings" | "/list", _) => Input::ListBookings,
        ("/show", Some(id)) => Input::ShowBooking(id.to_string()),
        ("/show", None) => Input::Invalid("Usage: /show <id>".to_string()),
        ("/delete", Some(id)) => Input::DeleteBooking(id.to_string()),
        ("/delete", None) => Input::Invalid("Usage: /delete <id>".to_string()),
        ("/new", Some(arg)) => parse_new_booking(arg),
        ("/new", None) => Input::Invalid(NEW_USAGE.to_string()),
        ("/next", _) => Input::NextPage,
        ("/prev", _) => Input::PrevPage,
        ("/theme", _) => Input::ToggleTheme,
        ("/drawer", _) => Input::ToggleDrawer,
        ("/login", Some(token)) => Input::Login(token.to_string()),
        ("/login", None) => Input::Invalid("Usage: /login <token>".to_string()),
        ("/logout", _) => Input::Logout,
        ("/help", _) => Input::Help,
        ("/quit" | "/exit", _) => Input::Quit,
        _ => Input::Invalid(format!("Unknown command {command}. Type /help for the list.")),
    }
}

fn parse_new_booking(arg: &str) -> Input {
    let fields: Vec<&str> = arg.split('|').map(str::trim).collect();
    let [customer, technician, profession, start] = fields.as_slice() else {
        return Input::Invalid(NEW_USAGE.to_string());
    };
    if [customer, technician, profession].iter().any(|f| f.is_empty()) {
        return Input::Invalid(NEW_USAGE.to_string());
    }
    let Some(start_time) = parse_timestamp(start) else {
        return Input::Invalid(format!("Could not read start time {start:?}. {NEW_USAGE}"));
    };

    Input::CreateBooking(NewBooking {
        customer_name: customer.to_string(),
        technician_name: technician.to_string(),
        profession: profession.to_string(),
        start_time,
    })
}

/// Runs one parsed input against the service and folds the outcome into `view`.
/// Service failures become error turns; they never end the session.
pub async fn handle_input(state: &AppState, view: &mut ViewState, input: Input) -> Flow {
    match input {
        Input::Blank => {}
        Input::ListBookings => match state.api.list_bookings().await {
            Ok(list) => view.apply(Action::BookingsLoaded(list)),
            Err(e) => view.apply(Action::Failed(e)),
        },
        Input::ShowBooking(id) => match state.api.get_booking(&id).await {
            Ok(booking) => view.apply(Action::BookingShown(booking)),
            Err(e) => view.apply(Action::Failed(e)),
        },
        Input::DeleteBooking(id) => match state.api.delete_booking(&id).await {
            Ok(()) => view.apply(Action::BookingDeleted(id)),
            Err(e) => view.apply(Action::Failed(e)),
        },
        Input::CreateBooking(new) => match state.api.create_booking(&new).await {
            Ok(booking) => view.apply(Action::BookingCreated(booking)),
            Err(e) => view.apply(Action::Failed(e)),
        },
        Input::NextPage => view.apply(Action::NextPage),
        Input::PrevPage => view.apply(Action::PrevPage),
        Input::ToggleTheme => {
            view.apply(Action::ToggleTheme);
            let notice = format!("Theme: {}", view.theme.as_str());
            view.apply(Action::Notice(Tone::Info, notice));
        }
        Input::ToggleDrawer => view.apply(Action::ToggleDrawer),
        Input::Login(token) => match state.tokens.set_token(&token) {
            Ok(()) => view.apply(Action::Notice(Tone::Success, "Token saved.".to_string())),
            Err(e) => {
                tracing::error!(error = %e, "failed to store token");
                view.apply(Action::Notice(Tone::Error, format!("Could not save token: {e}")));
            }
        },
        Input::Logout => match state.tokens.clear_token() {
            Ok(true) => view.apply(Action::Notice(Tone::Success, "Token removed.".to_string())),
            Ok(false) => view.apply(Action::Notice(Tone::Info, "No token was stored.".to_string())),
            Err(e) => {
                tracing::error!(error = %e, "failed to clear token");
                view.apply(Action::Notice(Tone::Error, format!("Could not remove token: {e}")));
            }
        },
        Input::Help => view.apply(Action::Notice(Tone::Info, HELP.to_string())),
        Input::Quit => return Flow::Quit,
        Input::Invalid(reply) => view.apply(Action::Notice(Tone::Warning, reply)),
        Input::Chat(message) => {
            view.apply(Action::UserSaid(message.clone()));
            match state.api.submit_command(&message).await {
                Ok(result) => {
                    tracing::info!(intent = result.intent.as_str(), "command answered");
                    view.apply(Action::CommandAnswered(result));
                }
                Err(e) => view.apply(Action::Failed(e)),
            }
        }
    }

    Flow::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_blank_and_chat() {
        assert_eq!(parse_input("   \t "), Input::Blank);
        assert_eq!(
            parse_input("  book a plumber tomorrow  "),
            Input::Chat("book a plumber tomorrow".to_string())
        );
    }

    #[test]
    fn test_slash_commands() {
        assert_eq!(parse_input("/bookings"), Input::ListBookings);
        assert_eq!(parse_input("/SHOW  b-7 "), Input::ShowBooking("b-7".to_string()));
        assert_eq!(parse_input("/delete 12"), Input::DeleteBooking("12".to_string()));
        assert_eq!(parse_input("/quit"), Input::Quit);
        assert!(matches!(parse_input("/show"), Input::Invalid(_)));
        assert!(matches!(parse_input("/frobnicate"), Input::Invalid(_)));
    }

    #[test]
    fn test_new_booking_parses_fields() {
        let input = parse_input("/new Alice | Bob | Electrician | 2025-06-16 10:00");
        assert_eq!(
            input,
            Input::CreateBooking(NewBooking {
                customer_name: "Alice".to_string(),
                technician_name: "Bob".to_string(),
                profession: "Electrician".to_string(),
                start_time: Utc.with_ymd_and_hms(2025, 6, 16, 10, 0, 0).unwrap(),
            })
        );
    }

    #[test]
    fn test_new_booking_rejects_bad_input() {
        assert!(matches!(parse_input("/new Alice | Bob"), Input::Invalid(_)));
        assert!(matches!(
            parse_input("/new Alice | | Plumber | 2025-06-16 10:00"),
            Input::Invalid(_)
        ));
        match parse_input("/new Alice | Bob | Plumber | someday") {
            Input::Invalid(reply) => assert!(reply.contains("someday")),
            other => panic!("expected invalid, got {other:?}"),
        }
    }
}

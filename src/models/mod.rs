pub mod booking;
pub mod command;
pub mod timestamp;

pub use booking::{Booking, BookingStatus, NewBooking, StatusSummary};
pub use command::{CommandRequest, CommandResult, Intent, Tone};

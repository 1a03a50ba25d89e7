pub mod client;

use async_trait::async_trait;

use crate::errors::ApiError;
use crate::models::{Booking, CommandResult, NewBooking};

pub use client::{ApiClient, DEFAULT_TIMEOUT};

/// The five operations of the remote booking service.
#[async_trait]
pub trait BookingApi: Send + Sync {
    async fn list_bookings(&self) -> Result<Vec<Booking>, ApiError>;

    async fn create_booking(&self, booking: &NewBooking) -> Result<Booking, ApiError>;

    async fn get_booking(&self, id: &str) -> Result<Booking, ApiError>;

    async fn delete_booking(&self, id: &str) -> Result<(), ApiError>;

    /// Blank messages are rejected without a request.
    async fn submit_command(&self, message: &str) -> Result<CommandResult, ApiError>;
}

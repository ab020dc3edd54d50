//! Application services: every operation the console offers, each one a
//! whole-document load, a call into the allocation engine and a save.

pub mod admin;
pub mod analytics;
pub mod auth;
pub mod booking;
pub mod payment;
pub mod vendor;

use thiserror::Error;

use crate::allocation::AllocationError;
use crate::storage::{Events, StorageError};
use crate::models::Event;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Allocation(#[from] AllocationError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("invalid input: {0}")]
    Validation(#[from] validator::ValidationErrors),
    #[error("event {0} not found")]
    EventNotFound(String),
    #[error("event {0} already exists")]
    EventExists(String),
    #[error("username {0} is already taken")]
    UsernameTaken(String),
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("invalid admin registration code")]
    AdminCodeRejected,
    #[error("payment declined: {reason}")]
    PaymentDeclined { reason: String },
    #[error("payment cancelled")]
    PaymentAborted,
    #[error("ticket {0} not found")]
    TicketNotFound(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

pub(crate) fn event_mut<'a>(events: &'a mut Events, event_id: &str) -> ServiceResult<&'a mut Event> {
    events
        .get_mut(event_id)
        .ok_or_else(|| ServiceError::EventNotFound(event_id.to_string()))
}

use thiserror::Error;

use super::vendor::ApplicationStatus;

/// Errors returned by the allocation engine.
///
/// Every variant is recoverable: the caller reports it and re-prompts. No
/// operation mutates state before returning one of these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AllocationError {
    #[error("invalid position: row {row}, column {column} is outside the grid")]
    InvalidPosition { row: usize, column: usize },

    #[error("{label} is already occupied")]
    AlreadyOccupied { label: String },

    #[error("{label} is not booked")]
    NotBooked { label: String },

    #[error("malformed label {input:?} (expected something like 5B)")]
    MalformedLabel { input: String },

    #[error("grid of {rows}x{columns} is not supported (at most 26 columns)")]
    InvalidDimensions { rows: usize, columns: usize },

    #[error("{vendor} has already applied for this event (status: {status})")]
    AlreadyApplied {
        vendor: String,
        status: ApplicationStatus,
    },

    #[error("no vendor slots available (all {total} taken)")]
    CapacityExhausted { total: usize },

    #[error("no application from {vendor}")]
    ApplicationNotFound { vendor: String },

    #[error("application from {vendor} was already {status}")]
    AlreadyDecided {
        vendor: String,
        status: ApplicationStatus,
    },

    #[error("application from {vendor} is not approved")]
    ApplicationNotApproved { vendor: String },

    #[error("this event has no stall map")]
    StallsNotConfigured,

    #[error("inconsistent allocation state: {0}")]
    InconsistentState(String),
}

pub type AllocationResult<T> = Result<T, AllocationError>;

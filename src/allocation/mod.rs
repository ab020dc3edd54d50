//! Seat and stall allocation engine.
//!
//! - `label`: `(row, column)` <-> `"5B"` conversion and input parsing.
//! - `grid`: fixed-size occupancy matrix, generic over the unit kind.
//! - `ledger`: booking records keyed by label.
//! - `vendor`: pending/approved/rejected stall applications.
//! - `entity`: grid + ledger pairs and their per-event composition.
//!
//! Nothing here does I/O; callers load and save the serialized forms.

pub mod entity;
pub mod error;
pub mod grid;
pub mod label;
pub mod ledger;
pub mod vendor;

pub use entity::{Allocation, EntityAllocation, Statistics};
pub use error::{AllocationError, AllocationResult};
pub use grid::{GridAllocator, Seat, Stall, UnitKind};
pub use label::{Label, MAX_COLUMNS, MAX_ROWS};
pub use ledger::{AllocationLedger, BookingRecord, TIMESTAMP_FORMAT};
pub use vendor::{ApplicationForm, ApplicationStatus, VendorApplication, VendorApplications};

//! Who holds which unit, and since when.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::label::Label;

/// Format of ledger timestamps, local time.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRecord {
    #[serde(alias = "user")]
    pub holder: String,
    #[serde(alias = "time")]
    pub timestamp: String,
}

/// Booking records keyed by label.
///
/// The ledger is only ever written right after the matching grid mutation,
/// so a label is present exactly when its unit is occupied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllocationLedger {
    records: BTreeMap<Label, BookingRecord>,
}

impl AllocationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, label: Label, holder: impl Into<String>, timestamp: impl Into<String>) {
        self.records.insert(
            label,
            BookingRecord {
                holder: holder.into(),
                timestamp: timestamp.into(),
            },
        );
    }

    /// Drops the entry for `label`. Absent labels are ignored.
    pub fn remove(&mut self, label: &Label) -> Option<BookingRecord> {
        self.records.remove(label)
    }

    pub fn lookup(&self, label: &Label) -> Option<&BookingRecord> {
        self.records.get(label)
    }

    /// All records in label order.
    pub fn all(&self) -> impl Iterator<Item = (&Label, &BookingRecord)> {
        self.records.iter()
    }

    /// First label (in label order) held by `holder`.
    pub fn first_held_by(&self, holder: &str) -> Option<&Label> {
        self.records
            .iter()
            .find(|(_, record)| record.holder == holder)
            .map(|(label, _)| label)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Percentage of `total` units held; `0.0` for an empty grid.
    pub fn occupancy_rate(&self, total: usize) -> f64 {
        if total == 0 {
            return 0.0;
        }
        self.records.len() as f64 / total as f64 * 100.0
    }
}

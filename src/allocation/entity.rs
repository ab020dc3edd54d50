//! Grid + ledger pairs and the per-event composition of them.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use super::error::{AllocationError, AllocationResult};
use super::grid::{GridAllocator, Seat, Stall, UnitKind};
use super::label::{self, Label};
use super::ledger::{AllocationLedger, BookingRecord};
use super::vendor::{ApplicationForm, ApplicationStatus, VendorApplication, VendorApplications};
use crate::clock::Clock;

/// Derived occupancy figures. `occupied + available == total` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Statistics {
    pub total: usize,
    pub occupied: usize,
    pub available: usize,
    pub occupancy_rate: f64,
}

/// One kind of bookable unit: the occupancy grid and the ledger of who holds
/// what. Both halves are only ever changed together.
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation<K> {
    grid: GridAllocator<K>,
    ledger: AllocationLedger,
}

impl<K: UnitKind> Allocation<K> {
    pub fn new(rows: usize, columns: usize) -> AllocationResult<Self> {
        Ok(Self {
            grid: GridAllocator::new(rows, columns)?,
            ledger: AllocationLedger::new(),
        })
    }

    /// Pairs a stored grid and ledger, refusing any disagreement between them.
    pub fn from_parts(grid: GridAllocator<K>, ledger: AllocationLedger) -> AllocationResult<Self> {
        if ledger.len() != grid.occupied_count() {
            return Err(AllocationError::InconsistentState(format!(
                "{} {}s occupied but {} booking records",
                grid.occupied_count(),
                K::NAME,
                ledger.len()
            )));
        }
        for (stored, _) in ledger.all() {
            let canonical = stored
                .position()
                .ok()
                .filter(|&(row, column)| grid.is_available(row, column) == Ok(false))
                .map(|(row, column)| label::encode(row, column));
            if canonical.as_ref() != Some(stored) {
                return Err(AllocationError::InconsistentState(format!(
                    "booking record {} does not match an occupied {}",
                    stored,
                    K::NAME
                )));
            }
        }
        Ok(Self { grid, ledger })
    }

    pub fn grid(&self) -> &GridAllocator<K> {
        &self.grid
    }

    pub fn ledger(&self) -> &AllocationLedger {
        &self.ledger
    }

    /// Books the unit named by `raw_label` for `holder`.
    pub fn book(&mut self, raw_label: &str, holder: &str, clock: &dyn Clock) -> AllocationResult<Label> {
        let (row, column) = label::parse(raw_label)?;
        self.book_at(row, column, holder, clock)
    }

    pub fn book_at(
        &mut self,
        row: usize,
        column: usize,
        holder: &str,
        clock: &dyn Clock,
    ) -> AllocationResult<Label> {
        let label = self.grid.book(row, column)?;
        self.ledger.record(label.clone(), holder, clock.timestamp());
        debug!("{} {} booked by {}", K::NAME, label, holder);
        Ok(label)
    }

    /// Frees the unit named by `raw_label`, returning the record it had.
    pub fn cancel(&mut self, raw_label: &str) -> AllocationResult<(Label, BookingRecord)> {
        let (row, column) = label::parse(raw_label)?;
        self.cancel_at(row, column)
    }

    pub fn cancel_at(&mut self, row: usize, column: usize) -> AllocationResult<(Label, BookingRecord)> {
        if self.grid.is_available(row, column)? {
            return Err(AllocationError::NotBooked {
                label: label::encode(row, column).into_string(),
            });
        }
        let label = label::encode(row, column);
        let record = self.ledger.remove(&label).ok_or_else(|| {
            AllocationError::InconsistentState(format!("{} had no booking record", label))
        })?;
        self.grid.cancel(row, column)?;
        debug!("{} {} released by {}", K::NAME, label, record.holder);
        Ok((label, record))
    }

    /// Record for the unit named by `raw_label`, if it is booked.
    pub fn lookup(&self, raw_label: &str) -> AllocationResult<Option<&BookingRecord>> {
        let (row, column) = label::parse(raw_label)?;
        self.grid.is_available(row, column)?;
        Ok(self.ledger.lookup(&label::encode(row, column)))
    }

    pub fn statistics(&self) -> Statistics {
        let total = self.grid.total_count();
        let occupied = self.ledger.len();
        Statistics {
            total,
            occupied,
            available: total - occupied,
            occupancy_rate: self.ledger.occupancy_rate(total),
        }
    }
}

#[derive(Serialize)]
struct AllocationDocumentRef<'a> {
    rows: usize,
    columns: usize,
    occupancy: &'a [Vec<bool>],
    bookings: &'a AllocationLedger,
}

#[derive(Deserialize)]
struct AllocationDocument {
    rows: usize,
    columns: usize,
    occupancy: Vec<Vec<bool>>,
    #[serde(default)]
    bookings: AllocationLedger,
}

impl<K: UnitKind> Serialize for Allocation<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        AllocationDocumentRef {
            rows: self.grid.rows(),
            columns: self.grid.columns(),
            occupancy: self.grid.occupancy(),
            bookings: &self.ledger,
        }
        .serialize(serializer)
    }
}

impl<'de, K: UnitKind> Deserialize<'de> for Allocation<K> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let doc = AllocationDocument::deserialize(deserializer)?;
        let grid = GridAllocator::from_occupancy(doc.rows, doc.columns, doc.occupancy)
            .map_err(de::Error::custom)?;
        Self::from_parts(grid, doc.bookings).map_err(de::Error::custom)
    }
}

/// Everything bookable about one event: audience seats, an optional stall
/// map, and vendor applications, together with their prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityAllocation {
    pub price: f64,
    #[serde(default)]
    pub stall_price: f64,
    seats: Allocation<Seat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    stalls: Option<Allocation<Stall>>,
    vendors: VendorApplications,
}

impl EntityAllocation {
    pub fn new(price: f64, rows: usize, seats_per_row: usize, vendor_slots: usize) -> AllocationResult<Self> {
        Ok(Self {
            price,
            stall_price: 0.0,
            seats: Allocation::new(rows, seats_per_row)?,
            stalls: None,
            vendors: VendorApplications::new(vendor_slots),
        })
    }

    /// Adds a grid-backed stall map priced at `stall_price`.
    pub fn with_stalls(mut self, rows: usize, columns: usize, stall_price: f64) -> AllocationResult<Self> {
        self.stalls = Some(Allocation::new(rows, columns)?);
        self.stall_price = stall_price;
        Ok(self)
    }

    pub fn seats(&self) -> &Allocation<Seat> {
        &self.seats
    }

    pub fn stalls(&self) -> Option<&Allocation<Stall>> {
        self.stalls.as_ref()
    }

    pub fn vendors(&self) -> &VendorApplications {
        &self.vendors
    }

    pub fn capacity_total(&self) -> usize {
        self.seats.grid().total_count()
    }

    pub fn book(&mut self, raw_label: &str, holder: &str, clock: &dyn Clock) -> AllocationResult<Label> {
        self.seats.book(raw_label, holder, clock)
    }

    pub fn cancel(&mut self, raw_label: &str) -> AllocationResult<(Label, BookingRecord)> {
        self.seats.cancel(raw_label)
    }

    pub fn statistics(&self) -> Statistics {
        self.seats.statistics()
    }

    /// Ticket revenue from currently booked seats.
    pub fn seat_revenue(&self) -> f64 {
        self.seats.ledger().len() as f64 * self.price
    }

    pub fn available_vendor_slots(&self) -> usize {
        self.vendors.available_slots()
    }

    pub fn set_vendor_slots(&mut self, total_slots: usize) {
        self.vendors.set_total_slots(total_slots);
    }

    pub fn apply(
        &mut self,
        vendor: &str,
        form: ApplicationForm,
        clock: &dyn Clock,
    ) -> AllocationResult<&VendorApplication> {
        self.vendors.apply(vendor, form, clock.timestamp())
    }

    pub fn approve(&mut self, vendor: &str, message: Option<String>) -> AllocationResult<()> {
        self.vendors.approve(vendor, message)
    }

    pub fn reject(&mut self, vendor: &str, message: Option<String>) -> AllocationResult<()> {
        self.vendors.reject(vendor, message)
    }

    /// Places an approved vendor on the stall map. A vendor holds at most one
    /// stall per event.
    pub fn assign_stall(&mut self, vendor: &str, raw_label: &str, clock: &dyn Clock) -> AllocationResult<Label> {
        if self.vendors.status(vendor) != Some(ApplicationStatus::Approved) {
            return Err(AllocationError::ApplicationNotApproved {
                vendor: vendor.to_string(),
            });
        }
        let stalls = self.stalls.as_mut().ok_or(AllocationError::StallsNotConfigured)?;
        let (row, column) = label::parse(raw_label)?;
        if let Some(held) = stalls.ledger().first_held_by(vendor) {
            return Err(AllocationError::AlreadyOccupied {
                label: held.to_string(),
            });
        }
        stalls.book_at(row, column, vendor, clock)
    }

    /// Frees whichever stall `vendor` holds.
    pub fn release_stall(&mut self, vendor: &str) -> AllocationResult<Label> {
        let stalls = self.stalls.as_mut().ok_or(AllocationError::StallsNotConfigured)?;
        let (row, column) = match stalls.ledger().first_held_by(vendor) {
            Some(held) => held.position()?,
            None => {
                return Err(AllocationError::NotBooked {
                    label: format!("stall of {}", vendor),
                })
            }
        };
        let (label, _) = stalls.cancel_at(row, column)?;
        Ok(label)
    }

    /// Stall currently held by `vendor`.
    pub fn stall_of(&self, vendor: &str) -> Option<&Label> {
        self.stalls
            .as_ref()
            .and_then(|stalls| stalls.ledger().first_held_by(vendor))
    }
}

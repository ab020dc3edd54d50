use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;

use super::{event_mut, ServiceError, ServiceResult};
use crate::allocation::{BookingRecord, EntityAllocation, Label};
use crate::models::Event;
use crate::AppState;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewEvent {
    #[validate(length(min = 1, message = "event id must not be empty"))]
    pub event_id: String,
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    pub date: String,
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[validate(range(min = 0.0, message = "price must not be negative"))]
    pub price: f64,
    #[validate(range(min = 1, max = 10_000, message = "between 1 and 10000 rows"))]
    pub rows: usize,
    #[validate(range(min = 1, max = 26, message = "between 1 and 26 seats per row"))]
    pub seats_per_row: usize,
    pub vendor_slots: usize,
    #[validate(nested)]
    pub stalls: Option<StallGrid>,
}

impl NewEvent {
    fn trimmed(mut self) -> Self {
        for field in [
            &mut self.event_id,
            &mut self.name,
            &mut self.date,
            &mut self.location,
            &mut self.description,
        ] {
            *field = field.trim().to_string();
        }
        self
    }
}

/// Stall map laid out like the seat grid.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StallGrid {
    #[validate(range(min = 1, max = 10_000))]
    pub rows: usize,
    #[validate(range(min = 1, max = 26))]
    pub columns: usize,
    #[validate(range(min = 0.0))]
    pub price: f64,
}

/// Fields an admin may change on an existing event. `None` keeps the value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct EventEdit {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    pub date: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    pub vendor_slots: Option<usize>,
}

/// One seat booking as seen across the whole platform.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerEntry {
    pub event_id: String,
    pub event_name: String,
    pub seat: Label,
    pub record: BookingRecord,
}

pub fn create_event(state: &AppState, new_event: NewEvent) -> ServiceResult<Event> {
    let new_event = new_event.trimmed();
    new_event.validate()?;

    let mut events = state.storage.load_events()?;
    if events.contains_key(&new_event.event_id) {
        return Err(ServiceError::EventExists(new_event.event_id));
    }

    let mut allocation = EntityAllocation::new(
        new_event.price,
        new_event.rows,
        new_event.seats_per_row,
        new_event.vendor_slots,
    )?;
    if let Some(stalls) = &new_event.stalls {
        allocation = allocation.with_stalls(stalls.rows, stalls.columns, stalls.price)?;
    }

    let event = Event {
        event_id: new_event.event_id,
        name: new_event.name,
        date: new_event.date,
        location: new_event.location,
        description: new_event.description,
        allocation,
    };
    events.insert(event.event_id.clone(), event.clone());
    state.storage.save_events(&events)?;

    info!(
        "Created event {} with {} seats",
        event.event_id,
        event.allocation.capacity_total()
    );
    Ok(event)
}

pub fn edit_event(state: &AppState, event_id: &str, edit: EventEdit) -> ServiceResult<Event> {
    edit.validate()?;

    let mut events = state.storage.load_events()?;
    let event = event_mut(&mut events, event_id.trim())?;

    if let Some(name) = edit.name {
        event.name = name;
    }
    if let Some(date) = edit.date {
        event.date = date;
    }
    if let Some(location) = edit.location {
        event.location = location;
    }
    if let Some(description) = edit.description {
        event.description = description;
    }
    if let Some(price) = edit.price {
        event.allocation.price = price;
    }
    if let Some(slots) = edit.vendor_slots {
        if slots < event.allocation.vendors().approved_count() {
            warn!(
                "{} now has fewer vendor slots ({}) than approved vendors",
                event.event_id, slots
            );
        }
        event.allocation.set_vendor_slots(slots);
    }

    let updated = event.clone();
    state.storage.save_events(&events)?;

    info!("Updated event {}", updated.event_id);
    Ok(updated)
}

/// Removes the event and everything allocated in it. Ticket history that
/// points at it is kept.
pub fn delete_event(state: &AppState, event_id: &str) -> ServiceResult<Event> {
    let mut events = state.storage.load_events()?;
    let removed = events
        .remove(event_id.trim())
        .ok_or_else(|| ServiceError::EventNotFound(event_id.trim().to_string()))?;
    state.storage.save_events(&events)?;

    info!(
        "Deleted event {} ({} bookings dropped)",
        removed.event_id,
        removed.allocation.seats().ledger().len()
    );
    Ok(removed)
}

pub fn all_bookings(state: &AppState) -> ServiceResult<Vec<LedgerEntry>> {
    let events = state.storage.load_events()?;
    Ok(events
        .values()
        .flat_map(|event| {
            event.allocation.seats().ledger().all().map(move |(seat, record)| LedgerEntry {
                event_id: event.event_id.clone(),
                event_name: event.name.clone(),
                seat: seat.clone(),
                record: record.clone(),
            })
        })
        .collect())
}

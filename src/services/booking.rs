//! Ticket purchase flow: hold a seat, confirm, charge, then persist.
//!
//! Both documents are read before the seat is held and written only once the
//! payment is approved, so an aborted or declined purchase (or an unreadable
//! history) leaves `events.json` and `user_bookings.json` untouched.

use serde::Serialize;
use tracing::{error, info, warn};

use super::payment::PaymentOutcome;
use super::{event_mut, ServiceError, ServiceResult};
use crate::allocation::Label;
use crate::models::{Event, UserBooking};
use crate::AppState;

/// What the buyer is asked to pay for before the charge goes through.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub event_id: String,
    pub event_name: String,
    pub seat: Label,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Receipt {
    pub ticket_id: String,
    pub event_name: String,
    pub seat: Label,
    pub amount: f64,
}

/// A history entry with the event it refers to, if that still exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingSummary {
    pub booking: UserBooking,
    pub event_name: Option<String>,
    pub event_date: Option<String>,
}

pub fn list_events(state: &AppState) -> ServiceResult<Vec<Event>> {
    Ok(state.storage.load_events()?.into_values().collect())
}

pub fn event_details(state: &AppState, event_id: &str) -> ServiceResult<Event> {
    state
        .storage
        .load_events()?
        .remove(event_id.trim())
        .ok_or_else(|| ServiceError::EventNotFound(event_id.trim().to_string()))
}

pub fn available_labels(state: &AppState, event_id: &str) -> ServiceResult<Vec<Label>> {
    let event = event_details(state, event_id)?;
    Ok(event.allocation.seats().grid().available_labels())
}

/// Books `raw_label` for `username`, asks `confirm` whether to pay, and
/// charges through the configured gateway.
pub fn book_ticket<F>(
    state: &AppState,
    username: &str,
    event_id: &str,
    raw_label: &str,
    confirm: F,
) -> ServiceResult<Receipt>
where
    F: FnOnce(&Quote) -> bool,
{
    let mut events = state.storage.load_events()?;
    let mut history = state.storage.load_bookings()?;
    let event = event_mut(&mut events, event_id.trim())?;

    let seat = event.allocation.book(raw_label, username, state.clock.as_ref())?;
    let quote = Quote {
        event_id: event.event_id.clone(),
        event_name: event.name.clone(),
        seat: seat.clone(),
        price: event.allocation.price,
    };

    if !confirm(&quote) {
        event.allocation.cancel(seat.as_str())?;
        info!("{} abandoned seat {} at {}", username, seat, quote.event_id);
        return Err(ServiceError::PaymentAborted);
    }

    let description = format!("{} seat {}", quote.event_name, seat);
    let ticket_id = match state.payments.charge(quote.price, &description) {
        PaymentOutcome::Approved { ticket_id } => ticket_id,
        PaymentOutcome::Declined { reason } => {
            event.allocation.cancel(seat.as_str())?;
            warn!("Payment for {} by {} declined: {}", description, username, reason);
            return Err(ServiceError::PaymentDeclined { reason });
        }
    };

    history.entry(username.to_string()).or_default().push(UserBooking {
        ticket_id: ticket_id.clone(),
        event_id: quote.event_id.clone(),
        seat: seat.to_string(),
        time: state.clock.timestamp(),
        amount: quote.price,
    });

    state.storage.save_events(&events)?;
    if let Err(e) = state.storage.save_bookings(&history) {
        error!("Ticket {} charged but history not saved: {}", ticket_id, e);
        // Grid and history must agree on disk
        if let Some(event) = events.get_mut(&quote.event_id) {
            event.allocation.cancel(seat.as_str())?;
            if let Err(rollback) = state.storage.save_events(&events) {
                error!("Seat {} at {} could not be released: {}", seat, quote.event_id, rollback);
            }
        }
        return Err(e.into());
    }

    info!("{} booked {} at {} (ticket {})", username, seat, quote.event_id, ticket_id);
    Ok(Receipt {
        ticket_id,
        event_name: quote.event_name,
        seat,
        amount: quote.price,
    })
}

/// Returns a ticket: the seat is released and the entry leaves the history.
///
/// Only the newest ticket a user holds for an event and seat owns the ledger
/// record. Older ones (left over after the event was deleted and recreated)
/// and tickets for events that no longer exist are dropped from the history
/// without touching any grid.
pub fn cancel_ticket(state: &AppState, username: &str, ticket_id: &str) -> ServiceResult<UserBooking> {
    let ticket_id = ticket_id.trim();
    let mut history = state.storage.load_bookings()?;
    let bookings = history
        .get_mut(username)
        .ok_or_else(|| ServiceError::TicketNotFound(ticket_id.to_string()))?;
    let index = bookings
        .iter()
        .position(|b| b.ticket_id == ticket_id)
        .ok_or_else(|| ServiceError::TicketNotFound(ticket_id.to_string()))?;

    let target = &bookings[index];
    let superseded = bookings[index + 1..]
        .iter()
        .any(|b| b.event_id == target.event_id && b.seat == target.seat);

    let mut events = state.storage.load_events()?;
    match events.get_mut(&target.event_id) {
        Some(event) if !superseded => {
            let held_by_user = event
                .allocation
                .seats()
                .lookup(&target.seat)?
                .is_some_and(|record| record.holder == username);
            if held_by_user {
                event.allocation.cancel(&target.seat)?;
                state.storage.save_events(&events)?;
            } else {
                warn!("Ticket {} no longer holds {}, dropping it", ticket_id, target.seat);
            }
        }
        Some(_) => warn!("Ticket {} was superseded, dropping it", ticket_id),
        None => {}
    }

    let booking = bookings.remove(index);
    if bookings.is_empty() {
        history.remove(username);
    }
    state.storage.save_bookings(&history)?;

    info!("{} cancelled ticket {} ({})", username, booking.ticket_id, booking.seat);
    Ok(booking)
}

pub fn bookings_for(state: &AppState, username: &str) -> ServiceResult<Vec<BookingSummary>> {
    let events = state.storage.load_events()?;
    let history = state.storage.load_bookings()?;

    Ok(history
        .get(username)
        .map(|bookings| {
            bookings
                .iter()
                .map(|booking| {
                    let event = events.get(&booking.event_id);
                    BookingSummary {
                        booking: booking.clone(),
                        event_name: event.map(|e| e.name.clone()),
                        event_date: event.map(|e| e.date.clone()),
                    }
                })
                .collect()
        })
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::AllocationError;
    use crate::services::payment::ScriptedGateway;
    use crate::services::admin;
    use crate::services::test_support::{seed_event, state_with};
    use crate::storage::StorageError;

    #[test]
    fn successful_purchase_is_persisted() {
        let (_dir, state) = state_with(ScriptedGateway::approving(&["TKT10001"]));
        seed_event(&state, "E1", 3, 4, 1);

        let receipt = book_ticket(&state, "alice", "E1", "2c", |quote| {
            assert_eq!(quote.seat.as_str(), "2C");
            assert_eq!(quote.price, 20.0);
            true
        })
        .unwrap();
        assert_eq!(receipt.ticket_id, "TKT10001");

        let event = event_details(&state, "E1").unwrap();
        let record = event.allocation.seats().lookup("2C").unwrap().unwrap();
        assert_eq!(record.holder, "alice");
        assert_eq!(record.timestamp, "2025-01-15 18:30:00");

        let history = bookings_for(&state, "alice").unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].booking.seat, "2C");
        assert_eq!(history[0].booking.amount, 20.0);
        assert_eq!(history[0].event_name.as_deref(), Some("Event E1"));
    }

    #[test]
    fn declining_confirmation_releases_the_seat() {
        let (_dir, state) = state_with(ScriptedGateway::approving(&["TKT10001"]));
        seed_event(&state, "E1", 2, 2, 0);

        let result = book_ticket(&state, "alice", "E1", "1A", |_| false);
        assert!(matches!(result, Err(ServiceError::PaymentAborted)));
        assert_eq!(available_labels(&state, "E1").unwrap().len(), 4);
        assert!(bookings_for(&state, "alice").unwrap().is_empty());
    }

    #[test]
    fn declined_payment_releases_the_seat() {
        let (_dir, state) = state_with(ScriptedGateway::default());
        seed_event(&state, "E1", 2, 2, 0);

        let result = book_ticket(&state, "alice", "E1", "1A", |_| true);
        assert!(matches!(result, Err(ServiceError::PaymentDeclined { .. })));
        assert_eq!(available_labels(&state, "E1").unwrap().len(), 4);
        assert!(bookings_for(&state, "alice").unwrap().is_empty());
    }

    #[test]
    fn occupied_seat_is_refused_before_payment() {
        let (_dir, state) = state_with(ScriptedGateway::approving(&["TKT1", "TKT2"]));
        seed_event(&state, "E1", 2, 2, 0);
        book_ticket(&state, "alice", "E1", "1A", |_| true).unwrap();

        let result = book_ticket(&state, "bob", "E1", "1a", |_| panic!("must not ask"));
        assert!(matches!(
            result,
            Err(ServiceError::Allocation(AllocationError::AlreadyOccupied { .. }))
        ));
        assert!(matches!(
            book_ticket(&state, "bob", "E9", "1A", |_| true),
            Err(ServiceError::EventNotFound(_))
        ));
    }

    #[test]
    fn cancel_ticket_frees_seat_for_holder_only() {
        let (_dir, state) = state_with(ScriptedGateway::approving(&["TKT1"]));
        seed_event(&state, "E1", 2, 2, 0);
        book_ticket(&state, "alice", "E1", "2B", |_| true).unwrap();

        assert!(matches!(
            cancel_ticket(&state, "bob", "TKT1"),
            Err(ServiceError::TicketNotFound(_))
        ));

        let cancelled = cancel_ticket(&state, "alice", "TKT1").unwrap();
        assert_eq!(cancelled.seat, "2B");
        assert_eq!(available_labels(&state, "E1").unwrap().len(), 4);
        assert!(bookings_for(&state, "alice").unwrap().is_empty());
        assert!(matches!(
            cancel_ticket(&state, "alice", "TKT1"),
            Err(ServiceError::TicketNotFound(_))
        ));
    }

    #[test]
    fn unreadable_history_aborts_before_charging() {
        let (dir, state) = state_with(ScriptedGateway::approving(&["TKT1"]));
        seed_event(&state, "E1", 2, 2, 0);
        let events_path = dir.path().join("events.json");
        let before = std::fs::read_to_string(&events_path).unwrap();
        std::fs::write(dir.path().join("user_bookings.json"), "{ broken").unwrap();

        let result = book_ticket(&state, "alice", "E1", "1A", |_| panic!("must not ask"));
        assert!(matches!(
            result,
            Err(ServiceError::Storage(StorageError::Json { .. }))
        ));

        let event = event_details(&state, "E1").unwrap();
        assert!(event.allocation.seats().lookup("1A").unwrap().is_none());
        assert_eq!(std::fs::read_to_string(&events_path).unwrap(), before);
    }

    #[test]
    fn ticket_from_a_deleted_event_cannot_free_the_new_booking() {
        let (_dir, state) = state_with(ScriptedGateway::approving(&["TKT1", "TKT2"]));
        seed_event(&state, "E1", 2, 2, 0);
        book_ticket(&state, "alice", "E1", "1A", |_| true).unwrap();

        admin::delete_event(&state, "E1").unwrap();
        seed_event(&state, "E1", 2, 2, 0);
        book_ticket(&state, "alice", "E1", "1A", |_| true).unwrap();

        let dropped = cancel_ticket(&state, "alice", "TKT1").unwrap();
        assert_eq!(dropped.ticket_id, "TKT1");

        let event = event_details(&state, "E1").unwrap();
        let record = event.allocation.seats().lookup("1A").unwrap().unwrap();
        assert_eq!(record.holder, "alice");
        assert_eq!(available_labels(&state, "E1").unwrap().len(), 3);

        let remaining: Vec<_> = bookings_for(&state, "alice")
            .unwrap()
            .into_iter()
            .map(|summary| summary.booking.ticket_id)
            .collect();
        assert_eq!(remaining, ["TKT2"]);

        cancel_ticket(&state, "alice", "TKT2").unwrap();
        assert_eq!(available_labels(&state, "E1").unwrap().len(), 4);
    }
}

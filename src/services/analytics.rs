//! analytics.rs
//!
//! Статистика по платформе для администратора.
//!
//! Включает в себя следующую функциональность:
//! - Подсчет пользователей, вендоров, событий и бронирований.
//! - Расчет выручки по билетам и стендам.
//! - Разбивка по каждому событию: заполненность зала и одобренные вендоры.

use serde::Serialize;
use tracing::debug;

use super::ServiceResult;
use crate::allocation::Statistics;
use crate::models::Role;
use crate::AppState;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformStatistics {
    pub total_events: usize,
    pub total_users: usize,
    pub total_vendors: usize,
    pub total_bookings: usize,
    pub total_revenue: f64,
    pub events: Vec<EventStatistics>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventStatistics {
    pub event_id: String,
    pub name: String,
    pub seats: Statistics,
    /// Проданные билеты плюс занятые стенды.
    pub revenue: f64,
    pub approved_vendors: usize,
    pub vendor_slots: usize,
}

pub fn platform_statistics(state: &AppState) -> ServiceResult<PlatformStatistics> {
    let users = state.storage.load_users()?;
    let events = state.storage.load_events()?;

    let breakdown: Vec<EventStatistics> = events
        .values()
        .map(|event| {
            let allocation = &event.allocation;
            let stalls_taken = allocation.stalls().map_or(0, |s| s.ledger().len());
            EventStatistics {
                event_id: event.event_id.clone(),
                name: event.name.clone(),
                seats: allocation.statistics(),
                revenue: allocation.seat_revenue() + stalls_taken as f64 * allocation.stall_price,
                approved_vendors: allocation.vendors().approved_count(),
                vendor_slots: allocation.vendors().total_slots(),
            }
        })
        .collect();

    let stats = PlatformStatistics {
        total_events: events.len(),
        total_users: users.values().filter(|u| u.role == Role::User).count(),
        total_vendors: users.values().filter(|u| u.role == Role::Vendor).count(),
        total_bookings: breakdown.iter().map(|e| e.seats.occupied).sum(),
        total_revenue: breakdown.iter().map(|e| e.revenue).sum(),
        events: breakdown,
    };
    debug!("Platform statistics: {:?}", stats);
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::ApplicationForm;
    use crate::services::admin::{self, StallGrid};
    use crate::services::auth::{self, Registration};
    use crate::services::payment::ScriptedGateway;
    use crate::services::test_support::{new_event, state, state_with};
    use crate::services::{booking, vendor};

    #[test]
    fn empty_platform() {
        let (_dir, state) = state();
        let stats = platform_statistics(&state).unwrap();
        assert_eq!(stats.total_events, 0);
        assert_eq!(stats.total_revenue, 0.0);
        assert!(stats.events.is_empty());
    }

    #[test]
    fn totals_and_breakdown() {
        let (_dir, state) = state_with(ScriptedGateway::approving(&["TKT1", "TKT2", "TKT3"]));
        for (username, role) in [("alice", Role::User), ("bob", Role::User), ("v1", Role::Vendor)] {
            auth::register(
                &state,
                Registration {
                    username: username.into(),
                    name: username.into(),
                    password: "pw".into(),
                    role,
                    admin_code: None,
                },
            )
            .unwrap();
        }

        let mut fair = new_event("E1", 2, 5);
        fair.stalls = Some(StallGrid { rows: 1, columns: 3, price: 100.0 });
        admin::create_event(&state, fair).unwrap();
        admin::create_event(&state, new_event("E2", 1, 4)).unwrap();

        booking::book_ticket(&state, "alice", "E1", "1A", |_| true).unwrap();
        booking::book_ticket(&state, "bob", "E1", "1B", |_| true).unwrap();
        booking::book_ticket(&state, "alice", "E2", "1D", |_| true).unwrap();
        vendor::apply(&state, "v1", "E1", ApplicationForm::default()).unwrap();
        vendor::approve(&state, "E1", "v1", None).unwrap();
        vendor::assign_stall(&state, "v1", "E1", "1C").unwrap();

        let stats = platform_statistics(&state).unwrap();
        assert_eq!(stats.total_events, 2);
        assert_eq!(stats.total_users, 2);
        assert_eq!(stats.total_vendors, 1);
        assert_eq!(stats.total_bookings, 3);
        assert_eq!(stats.total_revenue, 3.0 * 20.0 + 100.0);

        let e1 = &stats.events[0];
        assert_eq!(e1.seats.occupied, 2);
        assert_eq!(e1.seats.occupancy_rate, 20.0);
        assert_eq!(e1.approved_vendors, 1);
        assert_eq!(e1.revenue, 140.0);
        assert_eq!(stats.events[1].seats.occupancy_rate, 25.0);
    }
}

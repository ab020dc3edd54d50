#![allow(dead_code)]

use carnival_booking::clock::FixedClock;
use carnival_booking::config::Config;
use carnival_booking::services::admin::{self, NewEvent};
use carnival_booking::services::payment::ScriptedGateway;
use carnival_booking::AppState;
use chrono::NaiveDate;
use tempfile::TempDir;

pub fn clock() -> FixedClock {
    FixedClock::new(
        NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap(),
    )
}

pub fn state_with(gateway: ScriptedGateway) -> (TempDir, AppState) {
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::with_collaborators(
        Config::with_data_dir(dir.path().join("data")),
        Box::new(clock()),
        Box::new(gateway),
    )
    .unwrap();
    (dir, state)
}

pub fn create_event(state: &AppState, event_id: &str, rows: usize, seats_per_row: usize) {
    admin::create_event(
        state,
        NewEvent {
            event_id: event_id.to_string(),
            name: format!("Carnival {event_id}"),
            date: "2025-06-21".to_string(),
            location: "Harbour Park".to_string(),
            description: "Rides and music".to_string(),
            price: 15.0,
            rows,
            seats_per_row,
            vendor_slots: 2,
            stalls: None,
        },
    )
    .unwrap();
}

use serde::Serialize;
use tracing::info;

use super::{event_mut, ServiceResult};
use crate::allocation::{ApplicationForm, Label, VendorApplication};
use crate::AppState;

/// A vendor application together with the event it was filed for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationEntry {
    pub event_id: String,
    pub event_name: String,
    pub vendor: String,
    pub application: VendorApplication,
    pub stall: Option<Label>,
}

pub fn apply(
    state: &AppState,
    vendor: &str,
    event_id: &str,
    form: ApplicationForm,
) -> ServiceResult<VendorApplication> {
    let mut events = state.storage.load_events()?;
    let event = event_mut(&mut events, event_id.trim())?;

    let application = event
        .allocation
        .apply(vendor, form, state.clock.as_ref())?
        .clone();
    state.storage.save_events(&events)?;

    info!("{} applied for a stall at {}", vendor, event_id.trim());
    Ok(application)
}

pub fn applications_for(state: &AppState, vendor: &str) -> ServiceResult<Vec<ApplicationEntry>> {
    let events = state.storage.load_events()?;
    Ok(events
        .values()
        .filter_map(|event| {
            event.allocation.vendors().get(vendor).map(|application| ApplicationEntry {
                event_id: event.event_id.clone(),
                event_name: event.name.clone(),
                vendor: vendor.to_string(),
                application: application.clone(),
                stall: event.allocation.stall_of(vendor).cloned(),
            })
        })
        .collect())
}

/// Every pending application across all events, in event then vendor order.
pub fn pending_applications(state: &AppState) -> ServiceResult<Vec<ApplicationEntry>> {
    let events = state.storage.load_events()?;
    Ok(events
        .values()
        .flat_map(|event| {
            event
                .allocation
                .vendors()
                .pending()
                .map(move |(vendor, application)| ApplicationEntry {
                    event_id: event.event_id.clone(),
                    event_name: event.name.clone(),
                    vendor: vendor.clone(),
                    application: application.clone(),
                    stall: None,
                })
        })
        .collect())
}

pub fn approve(state: &AppState, event_id: &str, vendor: &str, message: Option<String>) -> ServiceResult<()> {
    let mut events = state.storage.load_events()?;
    event_mut(&mut events, event_id)?.allocation.approve(vendor, message)?;
    state.storage.save_events(&events)?;

    info!("Approved {} for {}", vendor, event_id);
    Ok(())
}

pub fn reject(state: &AppState, event_id: &str, vendor: &str, message: Option<String>) -> ServiceResult<()> {
    let mut events = state.storage.load_events()?;
    event_mut(&mut events, event_id)?.allocation.reject(vendor, message)?;
    state.storage.save_events(&events)?;

    info!("Rejected {} for {}", vendor, event_id);
    Ok(())
}

/// Places an approved vendor on the event's stall map.
pub fn assign_stall(state: &AppState, vendor: &str, event_id: &str, raw_label: &str) -> ServiceResult<Label> {
    let mut events = state.storage.load_events()?;
    let label = event_mut(&mut events, event_id.trim())?
        .allocation
        .assign_stall(vendor, raw_label, state.clock.as_ref())?;
    state.storage.save_events(&events)?;

    info!("{} took stall {} at {}", vendor, label, event_id.trim());
    Ok(label)
}

pub fn release_stall(state: &AppState, vendor: &str, event_id: &str) -> ServiceResult<Label> {
    let mut events = state.storage.load_events()?;
    let label = event_mut(&mut events, event_id.trim())?
        .allocation
        .release_stall(vendor)?;
    state.storage.save_events(&events)?;

    info!("{} released stall {} at {}", vendor, label, event_id.trim());
    Ok(label)
}

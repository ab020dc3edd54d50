use std::io::{BufRead, Write};

use super::{Console, ConsoleResult};
use crate::models::Event;
use crate::services::booking;

impl<R: BufRead, W: Write> Console<'_, R, W> {
    pub(super) fn browse_events(&mut self, guest: bool) -> ConsoleResult<()> {
        self.header("AVAILABLE EVENTS")?;
        let events = match booking::list_events(self.state) {
            Ok(events) => events,
            Err(e) => return self.report(&e),
        };
        if events.is_empty() {
            return self.say("\n❌ No events available at the moment.");
        }

        for event in &events {
            let stats = event.allocation.statistics();
            let vendors = event.allocation.vendors();
            self.rule()?;
            self.say(&format!(
                "Event ID: {}\nName: {}\nDate: {}\nLocation: {}\nPrice: ${:.2}\nSeats Available: {}/{}\nVendor Slots Available: {}/{}",
                event.event_id,
                event.name,
                event.date,
                event.location,
                event.allocation.price,
                stats.available,
                stats.total,
                vendors.available_slots(),
                vendors.total_slots(),
            ))?;
        }
        self.rule()?;

        if guest {
            self.say("\n💡 Login to book tickets!")?;
        }
        Ok(())
    }

    /// Lists events, asks for one and prints its details. Returns the chosen
    /// event so callers can continue with it.
    pub(super) fn event_details(&mut self, guest: bool) -> ConsoleResult<Option<Event>> {
        self.header("EVENT DETAILS")?;
        let Some(event_id) = self.choose_event()? else {
            return Ok(None);
        };
        let event = match booking::event_details(self.state, &event_id) {
            Ok(event) => event,
            Err(e) => {
                self.report(&e)?;
                return Ok(None);
            }
        };

        let stats = event.allocation.statistics();
        let vendors = event.allocation.vendors();
        self.header(&format!("EVENT: {}", event.name))?;
        self.say(&format!(
            "Date: {}\nLocation: {}\nPrice: ${:.2}\nDescription: {}",
            event.date,
            event.location,
            event.allocation.price,
            if event.description.is_empty() {
                "No description"
            } else {
                event.description.as_str()
            },
        ))?;
        self.rule()?;
        self.say(&format!(
            "Total Seats: {}\nAvailable Seats: {} ({:.1}% booked)\nVendor Slots: {}/{} available",
            stats.total,
            stats.available,
            stats.occupancy_rate,
            vendors.available_slots(),
            vendors.total_slots(),
        ))?;
        if let Some(stalls) = event.allocation.stalls() {
            let stall_stats = stalls.statistics();
            self.say(&format!(
                "Stalls: {}/{} free at ${:.2}",
                stall_stats.available, stall_stats.total, event.allocation.stall_price
            ))?;
        }

        if guest {
            self.say("\n💡 Login to book tickets!")?;
            return Ok(None);
        }
        Ok(Some(event))
    }

    /// Prints `ID. Name` for every event and reads an id. `None` when there
    /// is nothing to choose from.
    pub(super) fn choose_event(&mut self) -> ConsoleResult<Option<String>> {
        let events = match booking::list_events(self.state) {
            Ok(events) => events,
            Err(e) => {
                self.report(&e)?;
                return Ok(None);
            }
        };
        if events.is_empty() {
            self.say("\n❌ No events available.")?;
            return Ok(None);
        }
        for event in &events {
            self.say(&format!("  {}. {}", event.event_id, event.headline()))?;
        }
        Ok(Some(self.prompt("\nEnter Event ID: ")?))
    }

    pub(super) fn seat_map(&mut self, event: &Event) -> ConsoleResult<()> {
        self.rule()?;
        self.say("SEAT MAP")?;
        self.rule()?;
        let map = event.allocation.seats().grid().to_string();
        self.say(&map)?;
        self.say("[ ] Available   [X] Booked")
    }
}

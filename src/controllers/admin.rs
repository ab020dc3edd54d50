use std::io::{BufRead, Write};

use super::{Console, ConsoleResult};
use crate::models::User;
use crate::services::admin::{self, EventEdit, NewEvent, StallGrid};
use crate::services::{booking, vendor};

impl<R: BufRead, W: Write> Console<'_, R, W> {
    pub(super) fn admin_dashboard(&mut self, user: &User) -> ConsoleResult<()> {
        loop {
            self.header(&format!("ADMIN DASHBOARD - {}", user.name))?;
            self.say(
                "1. Create Event\n2. View All Events\n3. Edit Event\n4. Delete Event\n5. View Bookings\n6. Review Vendor Applications\n7. Statistics\n8. Logout",
            )?;

            match self.prompt("\nChoice: ")?.as_str() {
                "1" => self.create_event()?,
                "2" => self.all_events()?,
                "3" => self.edit_event()?,
                "4" => self.delete_event()?,
                "5" => self.all_bookings()?,
                "6" => self.review_applications()?,
                "7" => self.statistics()?,
                "8" => return self.say("\n👋 Logged out successfully!"),
                _ => self.say("\n❌ Invalid choice!")?,
            }
        }
    }

    fn create_event(&mut self) -> ConsoleResult<()> {
        self.header("CREATE EVENT")?;
        let mut new_event = NewEvent {
            event_id: self.prompt("Event ID: ")?,
            name: self.prompt("Event Name: ")?,
            date: self.prompt("Date (e.g., 2025-01-15): ")?,
            location: self.prompt("Location: ")?,
            price: self.prompt_parsed("Ticket Price: $")?,
            rows: self.prompt_parsed("Number of seat rows: ")?,
            seats_per_row: self.prompt_parsed("Seats per row (max 26): ")?,
            vendor_slots: self.prompt_parsed("Number of vendor slots: ")?,
            description: self.prompt("Event Description: ")?,
            stalls: None,
        };
        if self.confirm("Lay out a stall map?")? {
            new_event.stalls = Some(StallGrid {
                rows: self.prompt_parsed("Stall rows: ")?,
                columns: self.prompt_parsed("Stalls per row (max 26): ")?,
                price: self.prompt_parsed("Stall price: $")?,
            });
        }

        match admin::create_event(self.state, new_event) {
            Ok(event) => self.say(&format!(
                "\n✅ Event {} created with {} seats.",
                event.event_id,
                event.allocation.capacity_total()
            )),
            Err(e) => self.report(&e),
        }
    }

    fn all_events(&mut self) -> ConsoleResult<()> {
        self.header("ALL EVENTS")?;
        let events = match booking::list_events(self.state) {
            Ok(events) => events,
            Err(e) => return self.report(&e),
        };
        if events.is_empty() {
            return self.say("\n❌ No events created yet.");
        }

        for event in &events {
            let stats = event.allocation.statistics();
            let vendors = event.allocation.vendors();
            self.rule()?;
            self.say(&format!(
                "ID: {}\nName: {}\nDate: {}\nLocation: {}\nPrice: ${:.2}\nSeats: {}/{} booked\nVendors: {}/{} approved",
                event.event_id,
                event.name,
                event.date,
                event.location,
                event.allocation.price,
                stats.occupied,
                stats.total,
                vendors.approved_count(),
                vendors.total_slots(),
            ))?;
        }
        self.rule()
    }

    fn edit_event(&mut self) -> ConsoleResult<()> {
        self.header("EDIT EVENT")?;
        let Some(event_id) = self.choose_event()? else {
            return Ok(());
        };
        self.say(
            "\n1. Change Name\n2. Change Date\n3. Change Location\n4. Change Price\n5. Change Vendor Slots\n6. Change Description\n7. Back",
        )?;

        let mut edit = EventEdit::default();
        match self.prompt("\nChoice: ")?.as_str() {
            "1" => edit.name = self.prompt_optional("New Name: ")?,
            "2" => edit.date = self.prompt_optional("New Date: ")?,
            "3" => edit.location = self.prompt_optional("New Location: ")?,
            "4" => edit.price = Some(self.prompt_parsed("New Price: $")?),
            "5" => edit.vendor_slots = Some(self.prompt_parsed("New Vendor Slots: ")?),
            "6" => edit.description = Some(self.prompt("New Description: ")?),
            "7" => return Ok(()),
            _ => return self.say("\n❌ Invalid choice!"),
        }

        match admin::edit_event(self.state, &event_id, edit) {
            Ok(_) => self.say("\n✅ Event updated successfully!"),
            Err(e) => self.report(&e),
        }
    }

    fn delete_event(&mut self) -> ConsoleResult<()> {
        self.header("DELETE EVENT")?;
        let Some(event_id) = self.choose_event()? else {
            return Ok(());
        };
        if !self.confirm(&format!("\nDelete '{}'?", event_id))? {
            return self.say("\n❌ Deletion cancelled.");
        }

        match admin::delete_event(self.state, &event_id) {
            Ok(event) => self.say(&format!("\n✅ Event '{}' deleted successfully!", event.name)),
            Err(e) => self.report(&e),
        }
    }

    fn all_bookings(&mut self) -> ConsoleResult<()> {
        self.header("ALL BOOKINGS")?;
        let entries = match admin::all_bookings(self.state) {
            Ok(entries) => entries,
            Err(e) => return self.report(&e),
        };
        if entries.is_empty() {
            return self.say("\n❌ No bookings yet.");
        }

        let mut current: Option<&str> = None;
        for entry in &entries {
            if current != Some(entry.event_id.as_str()) {
                self.rule()?;
                self.say(&format!("Event: {}", entry.event_name))?;
                self.rule()?;
                current = Some(entry.event_id.as_str());
            }
            self.say(&format!(
                "Seat {} - User: {} - Time: {}",
                entry.seat, entry.record.holder, entry.record.timestamp
            ))?;
        }
        self.rule()?;
        self.say(&format!("Total Bookings: {}", entries.len()))
    }

    fn review_applications(&mut self) -> ConsoleResult<()> {
        self.header("VENDOR APPLICATIONS")?;
        let pending = match vendor::pending_applications(self.state) {
            Ok(pending) => pending,
            Err(e) => return self.report(&e),
        };
        if pending.is_empty() {
            return self.say("\n❌ No pending applications.");
        }

        for (index, entry) in pending.iter().enumerate() {
            let app = &entry.application;
            self.rule()?;
            self.say(&format!(
                "Application #{}\nEvent: {}\nVendor: {}\nBusiness: {}\nType: {}\nDescription: {}\nApplied: {}",
                index + 1,
                entry.event_name,
                entry.vendor,
                app.form.business_name,
                app.form.business_type,
                app.form.description,
                app.time,
            ))?;
        }
        self.rule()?;

        let choice: usize = self.prompt_parsed("\nSelect application # to review (0 to cancel): ")?;
        if choice == 0 {
            return Ok(());
        }
        let Some(entry) = pending.get(choice - 1) else {
            return self.say("\n❌ Invalid application number!");
        };

        self.say("\n1. Approve\n2. Reject")?;
        let result = match self.prompt("\nChoice: ")?.as_str() {
            "1" => {
                let message = self.prompt_optional("Message to vendor (optional): ")?;
                vendor::approve(self.state, &entry.event_id, &entry.vendor, message)
                    .map(|()| "approved")
            }
            "2" => {
                let message = self.prompt_optional("Rejection reason: ")?;
                vendor::reject(self.state, &entry.event_id, &entry.vendor, message)
                    .map(|()| "rejected")
            }
            _ => return self.say("\n❌ Invalid choice!"),
        };

        match result {
            Ok(outcome) => self.say(&format!("\n✅ Application {}!", outcome)),
            Err(e) => self.report(&e),
        }
    }
}

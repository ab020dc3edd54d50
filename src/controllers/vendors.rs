use std::io::{BufRead, Write};

use super::{Console, ConsoleResult};
use crate::allocation::ApplicationForm;
use crate::models::User;
use crate::services::{booking, vendor};

impl<R: BufRead, W: Write> Console<'_, R, W> {
    pub(super) fn vendor_dashboard(&mut self, user: &User) -> ConsoleResult<()> {
        loop {
            self.header(&format!("VENDOR DASHBOARD - {}", user.name))?;
            self.say(
                "1. View Events with Stall Availability\n2. Apply for Stall\n3. My Applications\n4. Choose Stall Location\n5. Release Stall\n6. Logout",
            )?;

            match self.prompt("\nChoice: ")?.as_str() {
                "1" => self.stall_availability()?,
                "2" => self.apply_for_stall(user)?,
                "3" => self.my_applications(user)?,
                "4" => self.choose_stall(user)?,
                "5" => self.release_stall(user)?,
                "6" => return self.say("\n👋 Logged out successfully!"),
                _ => self.say("\n❌ Invalid choice!")?,
            }
        }
    }

    fn stall_availability(&mut self) -> ConsoleResult<()> {
        self.header("EVENTS - STALL AVAILABILITY")?;
        let events = match booking::list_events(self.state) {
            Ok(events) => events,
            Err(e) => return self.report(&e),
        };
        if events.is_empty() {
            return self.say("\n❌ No events available.");
        }

        for event in &events {
            let vendors = event.allocation.vendors();
            self.rule()?;
            self.say(&format!(
                "Event ID: {}\nName: {}\nDate: {}\nLocation: {}\nVendor Stalls: {}/{} available",
                event.event_id,
                event.name,
                event.date,
                event.location,
                vendors.available_slots(),
                vendors.total_slots(),
            ))?;
            if let Some(stalls) = event.allocation.stalls() {
                self.say(&format!(
                    "Stall Map: {} free at ${:.2}",
                    stalls.grid().available_count(),
                    event.allocation.stall_price
                ))?;
            }
        }
        self.rule()
    }

    fn apply_for_stall(&mut self, user: &User) -> ConsoleResult<()> {
        self.header("APPLY FOR STALL")?;
        let Some(event_id) = self.choose_event()? else {
            return Ok(());
        };

        let event = match booking::event_details(self.state, &event_id) {
            Ok(event) => event,
            Err(e) => return self.report(&e),
        };
        let vendors = event.allocation.vendors();
        if let Some(status) = vendors.status(&user.username) {
            return self.say(&format!(
                "\n❌ You have already applied for this event (Status: {})",
                status.as_str().to_uppercase()
            ));
        }
        if vendors.available_slots() == 0 {
            return self.say("\n❌ No stalls available!");
        }

        let form = ApplicationForm {
            business_name: self.prompt("\nBusiness Name: ")?,
            business_type: self.prompt("Business Type: ")?,
            description: self.prompt("Description: ")?,
        };
        if !self.confirm("\nSubmit application?")? {
            return self.say("\n❌ Application cancelled.");
        }

        match vendor::apply(self.state, &user.username, &event_id, form) {
            Ok(_) => self.say("\n✅ Application submitted! Wait for admin approval."),
            Err(e) => self.report(&e),
        }
    }

    fn my_applications(&mut self, user: &User) -> ConsoleResult<()> {
        self.header("MY APPLICATIONS")?;
        let entries = match vendor::applications_for(self.state, &user.username) {
            Ok(entries) => entries,
            Err(e) => return self.report(&e),
        };
        if entries.is_empty() {
            return self.say("\n❌ No applications found.");
        }

        for entry in &entries {
            let app = &entry.application;
            self.rule()?;
            self.say(&format!(
                "Event: {} ({})\nBusiness: {}\nStatus: {}\nApplied: {}",
                entry.event_name,
                entry.event_id,
                app.form.business_name,
                app.status.as_str().to_uppercase(),
                app.time,
            ))?;
            if let Some(message) = &app.message {
                self.say(&format!("Admin Message: {}", message))?;
            }
            if let Some(stall) = &entry.stall {
                self.say(&format!("Stall: {}", stall))?;
            }
        }
        self.rule()
    }

    fn choose_stall(&mut self, user: &User) -> ConsoleResult<()> {
        self.header("CHOOSE STALL")?;
        let Some(event_id) = self.choose_event()? else {
            return Ok(());
        };
        let event = match booking::event_details(self.state, &event_id) {
            Ok(event) => event,
            Err(e) => return self.report(&e),
        };
        match event.allocation.stalls() {
            Some(stalls) => {
                let map = stalls.grid().to_string();
                self.say(&map)?;
            }
            None => return self.say("\n❌ This event has no stall map."),
        }

        let stall = self.prompt("Enter stall (e.g., 1C): ")?;
        match vendor::assign_stall(self.state, &user.username, &event_id, &stall) {
            Ok(label) => self.say(&format!("\n✅ Stall {} is yours.", label)),
            Err(e) => self.report(&e),
        }
    }

    fn release_stall(&mut self, user: &User) -> ConsoleResult<()> {
        self.header("RELEASE STALL")?;
        let Some(event_id) = self.choose_event()? else {
            return Ok(());
        };
        if !self.confirm("Give up your stall at this event?")? {
            return self.say("\n❌ Cancelled.");
        }
        match vendor::release_stall(self.state, &user.username, &event_id) {
            Ok(label) => self.say(&format!("\n✅ Stall {} released.", label)),
            Err(e) => self.report(&e),
        }
    }
}

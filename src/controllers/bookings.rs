use std::io::{BufRead, Write};

use super::{Console, ConsoleError, ConsoleResult};
use crate::models::User;
use crate::services::booking::{self, Quote};

impl<R: BufRead, W: Write> Console<'_, R, W> {
    pub(super) fn user_dashboard(&mut self, user: &User) -> ConsoleResult<()> {
        loop {
            self.header(&format!("USER DASHBOARD - {}", user.name))?;
            self.say("1. Browse Events\n2. Book Ticket\n3. My Bookings\n4. Cancel Booking\n5. Logout")?;

            match self.prompt("\nChoice: ")?.as_str() {
                "1" => self.browse_events(false)?,
                "2" => self.book_ticket(user)?,
                "3" => self.my_bookings(user)?,
                "4" => self.cancel_booking(user)?,
                "5" => return self.say("\n👋 Logged out successfully!"),
                _ => self.say("\n❌ Invalid choice!")?,
            }
        }
    }

    fn book_ticket(&mut self, user: &User) -> ConsoleResult<()> {
        let Some(event) = self.event_details(false)? else {
            return Ok(());
        };
        if event.allocation.statistics().available == 0 {
            return self.say("\n❌ Sorry, event is fully booked!");
        }

        self.seat_map(&event)?;
        let seat = self.prompt("Enter seat (e.g., 5B): ")?;

        // Ошибка ввода внутри колбэка подтверждения
        let mut interrupted: Option<ConsoleError> = None;
        let state = self.state;
        let result = booking::book_ticket(state, &user.username, &event.event_id, &seat, |quote| {
            match self.confirm_payment(quote) {
                Ok(answer) => answer,
                Err(e) => {
                    interrupted = Some(e);
                    false
                }
            }
        });
        if let Some(e) = interrupted {
            return Err(e);
        }

        match result {
            Ok(receipt) => self.say(&format!(
                "\n✅ Payment successful!\nTicket ID: {}\nSeat: {}\nAmount: ${:.2}\n\n🎉 Booking confirmed!",
                receipt.ticket_id, receipt.seat, receipt.amount
            )),
            Err(e) => self.report(&e),
        }
    }

    fn confirm_payment(&mut self, quote: &Quote) -> ConsoleResult<bool> {
        self.rule()?;
        self.say("PAYMENT")?;
        self.rule()?;
        self.say(&format!(
            "Event: {}\nSeat: {}\nPrice: ${:.2}",
            quote.event_name, quote.seat, quote.price
        ))?;
        let proceed = self.confirm("\nProceed to payment?")?;
        if proceed {
            self.say("\nProcessing payment...")?;
        }
        Ok(proceed)
    }

    fn my_bookings(&mut self, user: &User) -> ConsoleResult<()> {
        self.header("MY BOOKINGS")?;
        let bookings = match booking::bookings_for(self.state, &user.username) {
            Ok(bookings) => bookings,
            Err(e) => return self.report(&e),
        };
        if bookings.is_empty() {
            return self.say("\n❌ No bookings found.");
        }

        for summary in &bookings {
            self.rule()?;
            self.say(&format!(
                "Ticket ID: {}\nEvent: {}\nDate: {}\nSeat: {}\nPaid: ${:.2}\nBooked: {}",
                summary.booking.ticket_id,
                summary.event_name.as_deref().unwrap_or("(event removed)"),
                summary.event_date.as_deref().unwrap_or("-"),
                summary.booking.seat,
                summary.booking.amount,
                summary.booking.time,
            ))?;
        }
        self.rule()
    }

    fn cancel_booking(&mut self, user: &User) -> ConsoleResult<()> {
        self.my_bookings(user)?;
        let ticket_id = self.prompt("\nTicket ID to cancel (empty to go back): ")?;
        if ticket_id.is_empty() || !self.confirm(&format!("Cancel ticket {}?", ticket_id))? {
            return self.say("\n❌ Cancellation aborted.");
        }

        match booking::cancel_ticket(self.state, &user.username, &ticket_id) {
            Ok(booking) => self.say(&format!(
                "\n✅ Ticket {} cancelled, seat {} released.",
                booking.ticket_id, booking.seat
            )),
            Err(e) => self.report(&e),
        }
    }
}

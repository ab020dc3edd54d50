//! analytics.rs
//!
//! Экран статистики платформы для администратора.

use std::io::{BufRead, Write};

use super::{Console, ConsoleResult};
use crate::services::analytics;

impl<R: BufRead, W: Write> Console<'_, R, W> {
    pub(super) fn statistics(&mut self) -> ConsoleResult<()> {
        self.header("PLATFORM STATISTICS")?;
        let stats = match analytics::platform_statistics(self.state) {
            Ok(stats) => stats,
            Err(e) => return self.report(&e),
        };

        self.say(&format!(
            "\nTotal Events: {}\nTotal Users: {}\nTotal Vendors: {}\nTotal Bookings: {}\nTotal Revenue: ${:.2}",
            stats.total_events,
            stats.total_users,
            stats.total_vendors,
            stats.total_bookings,
            stats.total_revenue,
        ))?;

        self.header("EVENT-WISE BREAKDOWN")?;
        for event in &stats.events {
            self.say(&format!(
                "\n{}\n  Bookings: {}/{} ({:.1}%)\n  Revenue: ${:.2}\n  Vendors: {}/{} approved",
                event.name,
                event.seats.occupied,
                event.seats.total,
                event.seats.occupancy_rate,
                event.revenue,
                event.approved_vendors,
                event.vendor_slots,
            ))?;
        }
        Ok(())
    }
}

use serde::{Deserialize, Serialize};

use crate::allocation::EntityAllocation;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub event_id: String,
    pub name: String,
    pub date: String,
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub allocation: EntityAllocation,
}

impl Event {
    /// One-line summary used in event listings.
    pub fn headline(&self) -> String {
        let stats = self.allocation.statistics();
        format!(
            "{} - {} ({}) | ${:.2} | {}/{} seats available",
            self.name, self.date, self.location, self.allocation.price, stats.available, stats.total
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_keeps_metadata_next_to_allocation() {
        let event = Event {
            event_id: "E1".into(),
            name: "Spring Carnival".into(),
            date: "2025-04-01".into(),
            location: "Main Square".into(),
            description: String::new(),
            allocation: EntityAllocation::new(20.0, 2, 3, 1).unwrap(),
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event_id"], "E1");
        assert_eq!(json["price"], 20.0);
        assert_eq!(json["seats"]["columns"], 3);
        assert!(json.get("stalls").is_none());
        assert_eq!(serde_json::from_value::<Event>(json).unwrap(), event);

        assert_eq!(
            event.headline(),
            "Spring Carnival - 2025-04-01 (Main Square) | $20.00 | 6/6 seats available"
        );
    }
}

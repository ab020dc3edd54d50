use serde::{Deserialize, Serialize};

/// Entry in a user's booking history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserBooking {
    pub ticket_id: String,
    pub event_id: String,
    pub seat: String,
    pub time: String,
    #[serde(default)]
    pub amount: f64,
}

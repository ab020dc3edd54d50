//! payment.rs
//!
//! Simulated payment processing for ticket purchases.
//!
//! Key components:
//! 1.  **PaymentGateway**: the seam the booking flow charges through. Nothing
//!     else in the crate knows how a payment is decided.
//! 2.  **SimulatedGateway**: approves a configurable share of charges at random
//!     and issues ticket ids such as `TKT48213`.
//! 3.  **ScriptedGateway**: replays a fixed sequence of outcomes, for tests and
//!     demos that need deterministic payments.

use rand::Rng;
use std::cell::RefCell;
use std::collections::VecDeque;
use tracing::{info, warn};

use crate::config::PaymentConfig;

/// Result of a single charge attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentOutcome {
    /// Payment captured; the ticket id identifies the purchase.
    Approved { ticket_id: String },
    /// Payment refused by the gateway.
    Declined { reason: String },
}

pub trait PaymentGateway {
    /// Charges `amount` for the purchase described by `description`.
    fn charge(&self, amount: f64, description: &str) -> PaymentOutcome;
}

/// Gateway that approves charges with probability `success_rate`.
#[derive(Debug, Clone)]
pub struct SimulatedGateway {
    success_rate: f64,
    currency: String,
    ticket_prefix: String,
}

impl SimulatedGateway {
    pub fn from_config(config: &PaymentConfig) -> Self {
        Self {
            success_rate: config.success_rate.clamp(0.0, 1.0),
            currency: config.currency.clone(),
            ticket_prefix: config.ticket_prefix.clone(),
        }
    }
}

impl PaymentGateway for SimulatedGateway {
    fn charge(&self, amount: f64, description: &str) -> PaymentOutcome {
        let mut rng = rand::thread_rng();
        info!("Charging {:.2} {} for {}", amount, self.currency, description);

        if rng.gen_bool(self.success_rate) {
            let ticket_id = format!("{}{}", self.ticket_prefix, rng.gen_range(10000..=99999));
            info!("Payment approved, ticket {}", ticket_id);
            PaymentOutcome::Approved { ticket_id }
        } else {
            warn!("Payment declined for {}", description);
            PaymentOutcome::Declined {
                reason: "payment was declined by the gateway".to_string(),
            }
        }
    }
}

/// Gateway returning pre-arranged outcomes in order. Once the script runs out
/// every further charge is declined.
#[derive(Debug, Default)]
pub struct ScriptedGateway {
    outcomes: RefCell<VecDeque<PaymentOutcome>>,
}

impl ScriptedGateway {
    pub fn new(outcomes: impl IntoIterator<Item = PaymentOutcome>) -> Self {
        Self {
            outcomes: RefCell::new(outcomes.into_iter().collect()),
        }
    }

    pub fn approving(ticket_ids: &[&str]) -> Self {
        Self::new(ticket_ids.iter().map(|id| PaymentOutcome::Approved {
            ticket_id: id.to_string(),
        }))
    }

    pub fn remaining(&self) -> usize {
        self.outcomes.borrow().len()
    }
}

impl PaymentGateway for ScriptedGateway {
    fn charge(&self, amount: f64, description: &str) -> PaymentOutcome {
        let outcome = self.outcomes.borrow_mut().pop_front();
        info!("Scripted charge of {:.2} for {}: {:?}", amount, description, outcome);
        outcome.unwrap_or_else(|| PaymentOutcome::Declined {
            reason: "no scripted outcome left".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway(success_rate: f64) -> SimulatedGateway {
        SimulatedGateway::from_config(&PaymentConfig {
            success_rate,
            currency: "USD".to_string(),
            ticket_prefix: "TKT".to_string(),
        })
    }

    #[test]
    fn always_approving_gateway_issues_ticket_ids() {
        let gateway = gateway(1.0);
        for _ in 0..50 {
            match gateway.charge(10.0, "test") {
                PaymentOutcome::Approved { ticket_id } => {
                    assert!(ticket_id.starts_with("TKT"));
                    let number: u32 = ticket_id[3..].parse().unwrap();
                    assert!((10000..=99999).contains(&number));
                }
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn never_approving_gateway_declines() {
        let gateway = gateway(0.0);
        assert!(matches!(gateway.charge(10.0, "test"), PaymentOutcome::Declined { .. }));
    }

    #[test]
    fn scripted_gateway_replays_in_order() {
        let gateway = ScriptedGateway::new([
            PaymentOutcome::Declined { reason: "card expired".into() },
            PaymentOutcome::Approved { ticket_id: "TKT10001".into() },
        ]);

        assert!(matches!(gateway.charge(1.0, "a"), PaymentOutcome::Declined { .. }));
        assert_eq!(
            gateway.charge(1.0, "b"),
            PaymentOutcome::Approved { ticket_id: "TKT10001".into() }
        );
        assert_eq!(gateway.remaining(), 0);
        assert!(matches!(gateway.charge(1.0, "c"), PaymentOutcome::Declined { .. }));
    }
}

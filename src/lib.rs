pub mod allocation;
pub mod clock;
pub mod config;
pub mod controllers;
pub mod models;
pub mod services;
pub mod storage;

use clock::{Clock, SystemClock};
use services::payment::{PaymentGateway, SimulatedGateway};
use storage::{Storage, StorageError};

// Shared state для всего приложения
pub struct AppState {
    pub config: config::Config,
    pub storage: Storage,
    pub clock: Box<dyn Clock>,
    pub payments: Box<dyn PaymentGateway>,
}

impl AppState {
    pub fn new(config: config::Config) -> Result<Self, StorageError> {
        let payments = Box::new(SimulatedGateway::from_config(&config.payment));
        Self::with_collaborators(config, Box::new(SystemClock), payments)
    }

    /// Same as `new`, with the clock and payment gateway supplied by the caller.
    pub fn with_collaborators(
        config: config::Config,
        clock: Box<dyn Clock>,
        payments: Box<dyn PaymentGateway>,
    ) -> Result<Self, StorageError> {
        let storage = Storage::new(&config.storage);
        storage.init()?;

        Ok(Self {
            config,
            storage,
            clock,
            payments,
        })
    }
}

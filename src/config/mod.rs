use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use thiserror::Error;
use validator::Validate;

// Top-level configuration, one section per concern
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Config {
    #[validate(nested)]
    pub app: AppConfig,
    pub storage: StorageConfig,
    #[validate(nested)]
    pub payment: PaymentConfig,
    #[validate(nested)]
    pub admin: AdminConfig,
}

// Runtime and logging settings
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AppConfig {
    pub environment: String,
    #[validate(length(min = 1))]
    pub rust_log: String,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

// Where the JSON documents live
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub users_file: String,
    pub events_file: String,
    pub bookings_file: String,
}

// Simulated payment gateway
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PaymentConfig {
    #[validate(range(min = 0.0, max = 1.0))]
    pub success_rate: f64,
    #[validate(length(min = 1))]
    pub currency: String,
    #[validate(length(min = 1))]
    pub ticket_prefix: String,
}

// Admin account seeded into an empty user store
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AdminConfig {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
    pub name: String,
    /// Code required to register another admin account.
    #[validate(length(min = 1))]
    pub registration_code: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Source(#[from] config::ConfigError),
    #[error("invalid configuration: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}

impl Config {
    /// Builds the configuration from defaults overridden by `CARNIVAL_*`
    /// environment variables, e.g. `CARNIVAL_STORAGE__DATA_DIR=/var/lib/carnival`.
    /// A plain `RUST_LOG` wins over `CARNIVAL_APP__RUST_LOG`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .set_default("app.environment", "development")?
            .set_default("app.rust_log", "carnival_booking=info")?
            .set_default("app.log_format", "pretty")?
            .set_default("storage.data_dir", "data")?
            .set_default("storage.users_file", "users.json")?
            .set_default("storage.events_file", "events.json")?
            .set_default("storage.bookings_file", "user_bookings.json")?
            .set_default("payment.success_rate", 0.9)?
            .set_default("payment.currency", "USD")?
            .set_default("payment.ticket_prefix", "TKT")?
            .set_default("admin.username", "admin")?
            .set_default("admin.password", "admin123")?
            .set_default("admin.name", "Administrator")?
            .set_default("admin.registration_code", "ADMIN2025")?
            .add_source(
                config::Environment::with_prefix("CARNIVAL")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("app.rust_log", env::var("RUST_LOG").ok())?
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults rooted at `data_dir`, without consulting the environment.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Config {
            app: AppConfig {
                environment: "test".to_string(),
                rust_log: "carnival_booking=debug".to_string(),
                log_format: LogFormat::Pretty,
            },
            storage: StorageConfig {
                data_dir: data_dir.into(),
                users_file: "users.json".to_string(),
                events_file: "events.json".to_string(),
                bookings_file: "user_bookings.json".to_string(),
            },
            payment: PaymentConfig {
                success_rate: 0.9,
                currency: "USD".to_string(),
                ticket_prefix: "TKT".to_string(),
            },
            admin: AdminConfig {
                username: "admin".to_string(),
                password: "admin123".to_string(),
                name: "Administrator".to_string(),
                registration_code: "ADMIN2025".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::with_data_dir("/tmp/carnival");
        assert!(config.validate().is_ok());
        assert_eq!(config.storage.data_dir, PathBuf::from("/tmp/carnival"));
    }

    #[test]
    fn success_rate_outside_unit_interval_is_rejected() {
        let mut config = Config::with_data_dir("data");
        config.payment.success_rate = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn log_format_parses_lowercase() {
        let format: LogFormat = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(format, LogFormat::Json);
    }
}

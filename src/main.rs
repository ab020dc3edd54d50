use anyhow::Context;
use std::io;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use carnival_booking::{
    config::{Config, LogFormat},
    controllers::Console,
    services::auth,
    AppState,
};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env().context("Failed to load configuration")?;

    // Логи в stderr, чтобы не мешать меню в stdout
    let filter = EnvFilter::try_new(&config.app.rust_log).context("Invalid log filter")?;
    let registry = tracing_subscriber::registry().with(filter);
    match config.app.log_format {
        LogFormat::Json => registry.with(fmt::layer().json().with_writer(io::stderr)).init(),
        LogFormat::Pretty => registry.with(fmt::layer().with_writer(io::stderr)).init(),
    }

    info!("Starting Carnival Corner ({})", config.app.environment);

    let state = AppState::new(config).context("Failed to prepare data directory")?;
    if auth::ensure_default_admin(&state).context("Failed to seed admin account")? {
        info!("Seeded default admin {}", state.config.admin.username);
    }

    let stdin = io::stdin();
    let mut console = Console::new(&state, stdin.lock(), io::stdout());
    console.run().context("Console session failed")?;

    info!("Session ended");
    Ok(())
}

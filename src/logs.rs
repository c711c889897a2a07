//! Console logging for the demo binary. The library itself only emits
//! through the `bevy::log` macros and never installs a subscriber.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub fn setup_logging() -> Result<(), Box<dyn std::error::Error>> {
    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(fmt::Layer::new().with_writer(std::io::stdout));

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

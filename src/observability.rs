use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Install the global fmt subscriber.
///
/// `RUST_LOG` has already been folded into the config, so the configured
/// filter is used as-is. Calling this twice is a no-op.
pub fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_new(&config.filter).unwrap_or_else(|e| {
        eprintln!("invalid log filter {:?} ({}), falling back to info", config.filter, e);
        EnvFilter::new("info")
    });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

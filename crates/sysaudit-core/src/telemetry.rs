//! Tracing setup shared by the sysaudit binaries.
//!
//! Analysis passes log structured events (`debug!`/`info!`/`warn!`) and
//! leave subscriber wiring to the entry point; [`init_tracing`] is that
//! single wiring call. Repeated calls are no-ops, since a process can only
//! install one global subscriber.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global tracing subscriber.
///
/// `level` is the fallback verbosity; a set `RUST_LOG` variable takes
/// precedence. With `json`, log lines are emitted as newline-delimited
/// JSON instead of human-readable text.
pub fn init_tracing(json: bool, level: Level) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(fmt::layer().with_target(false).json())
            .try_init()
            .ok();
    } else {
        registry
            .with(fmt::layer().with_target(false))
            .try_init()
            .ok();
    }
}

//! Observability subsystem for tabledef
//!
//! Structured, typed events emitted through `tracing`. The library only
//! emits; installing a subscriber is left to the binary (see [`init`]).
//!
//! ```ignore
//! use tabledef::observability::{Event, Logger};
//!
//! Logger::info(Event::TableCreated.as_str(), &[("table", "movies")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{render_fields, Logger, Severity, TARGET};

use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::EnvFilter;

/// Installs a JSON subscriber writing to stderr.
///
/// `RUST_LOG` takes precedence over `default_level`. Returns an error if a
/// global subscriber is already installed.
pub fn init(default_level: &str) -> Result<(), TryInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish()
        .try_init()
}

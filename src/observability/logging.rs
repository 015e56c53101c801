//! Structured logging.
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Only the binary installs a subscriber; library code logs against
//!   spans it is handed, so tests need no global setup
//! - Log level configurable via `RUST_LOG`

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "handler_echo=debug";

/// Install the global subscriber. Call once, from `main`.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

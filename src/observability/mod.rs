//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Server and connection tasks produce:
//!     → tracing events, inside a per-connection span (id, peer)
//!
//! Consumers:
//!     → logging.rs (fmt subscriber on stdout, installed by main)
//! ```

pub mod logging;

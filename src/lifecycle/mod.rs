//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Validate config → Build renderer and server → Bind listener
//!
//! Shutdown (shutdown.rs, signals.rs):
//!     Ctrl+C → Stop accepting → Exit (in-flight connections are not awaited)
//! ```

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;

//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (accept loop input)
//!     → connection.rs (one request, one response, close)
//! ```
//!
//! # Design Decisions
//! - Each connection runs in its own detached task
//! - Connections share nothing but the renderer, which is read-only

pub mod connection;
pub mod listener;

pub use connection::{handle_connection, ConnectionContext, ConnectionId, Outcome};
pub use listener::{Listener, ListenerError};

//! handler-echo
//!
//! Accepts TCP connections on port 8080, reads one HTTP/1.1 request per
//! connection by hand, and answers with an HTML page describing it.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client ──▶ net::listener ──▶ tokio::spawn ──▶ net::connection
//!                                                      │
//!                     http::reader ◀── http::parser ◀──┘
//!                                          │
//!                                          ▼
//!     Client ◀── http::response ◀── render (handlebars)
//! ```
//!
//! One request per connection, then close. No keep-alive, no chunked bodies.

use handler_echo::config::ServerConfig;
use handler_echo::lifecycle::{signals, startup, Shutdown};
use handler_echo::observability::logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    tracing::info!("handler-echo v{} starting", env!("CARGO_PKG_VERSION"));

    let (server, listener) = startup::prepare(ServerConfig::default()).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let mut server_task = tokio::spawn(server.run(listener, server_shutdown));

    tokio::select! {
        result = &mut server_task => {
            result??;
            return Ok(());
        }
        _ = signals::shutdown_on_ctrl_c(&shutdown) => {}
    }
    server_task.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}

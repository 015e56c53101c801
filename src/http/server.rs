//! HTTP server setup and the accept loop.
//!
//! # Responsibilities
//! - Build the renderer and connection context from configuration
//! - Accept connections until shutdown is signalled
//! - Hand each connection to its own detached task
//!
//! A failed or panicking connection task is contained by the runtime and
//! never stops the accept loop. Accept errors are logged and skipped.

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::config::ServerConfig;
use crate::net::{handle_connection, ConnectionContext, Listener};
use crate::render::{RenderError, Renderer, TemplateRenderer};

/// Single-route HTTP server.
pub struct HttpServer {
    config: ServerConfig,
    ctx: ConnectionContext,
}

impl HttpServer {
    /// Create a server rendering with the template named in `config`.
    pub fn new(config: ServerConfig) -> Result<Self, RenderError> {
        let renderer = TemplateRenderer::from_config(&config.template)?;
        Ok(Self::with_renderer(config, Arc::new(renderer)))
    }

    /// Create a server with a custom renderer.
    pub fn with_renderer(config: ServerConfig, renderer: Arc<dyn Renderer>) -> Self {
        let ctx = ConnectionContext::new(renderer, config.parser.header_policy);
        Self { config, ctx }
    }

    /// Run the accept loop until `shutdown` fires.
    ///
    /// Connections still in flight at shutdown are left to finish on their own.
    pub async fn run(
        self,
        listener: Listener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            header_policy = ?self.config.parser.header_policy,
            "HTTP server starting"
        );

        loop {
            tokio::select! {
                _ = shutdown.recv() => {
                    tracing::info!("Shutdown signal received, no longer accepting");
                    break;
                }
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        let ctx = self.ctx.clone();
                        drop(tokio::spawn(handle_connection(stream, peer, ctx)));
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Accept failed, continuing");
                    }
                },
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HeaderParsePolicy;

    #[test]
    fn new_uses_builtin_template_by_default() {
        let server = HttpServer::new(ServerConfig::default()).unwrap();
        assert_eq!(server.config().parser.header_policy, HeaderParsePolicy::Lenient);
    }
}

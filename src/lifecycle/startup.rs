//! Startup orchestration.
//!
//! # Responsibilities
//! - Validate configuration
//! - Build the renderer and server
//! - Bind the listener last, so traffic only arrives once everything is ready
//!
//! Any startup error is fatal to the caller.

use thiserror::Error;

use crate::config::validation::{validate_config, ValidationError};
use crate::config::ServerConfig;
use crate::http::HttpServer;
use crate::net::{Listener, ListenerError};
use crate::render::RenderError;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0:?}")]
    Config(Vec<ValidationError>),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Listener(#[from] ListenerError),
}

/// Prepare a server and its bound listener from `config`.
pub async fn prepare(config: ServerConfig) -> Result<(HttpServer, Listener), StartupError> {
    validate_config(&config).map_err(StartupError::Config)?;

    tracing::info!(
        bind_address = %config.listener.bind_address,
        template = ?config.template.path,
        header_policy = ?config.parser.header_policy,
        "Configuration loaded"
    );

    let listener_config = config.listener.clone();
    let server = HttpServer::new(config)?;
    let listener = Listener::bind(&listener_config).await?;
    Ok((server, listener))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn prepare_binds_configured_address() {
        let mut config = ServerConfig::default();
        config.listener.bind_address = "127.0.0.1:0".into();
        let (_server, listener) = prepare(config).await.unwrap();
        assert!(listener.local_addr().unwrap().ip().is_loopback());
    }

    #[tokio::test]
    async fn prepare_rejects_invalid_config() {
        let mut config = ServerConfig::default();
        config.listener.bind_address = "bogus".into();
        let err = prepare(config).await.err().unwrap();
        assert!(matches!(err, StartupError::Config(_)));
    }
}

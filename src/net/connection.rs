//! Per-connection request handling.
//!
//! # Responsibilities
//! - Label each connection with a unique ID for tracing
//! - Parse exactly one request, render it, write exactly one response
//! - Close the connection once, whatever the outcome
//!
//! Connection States:
//!     Reading → Rendering → Writing → Closed
//!     (any failure jumps straight to Closed, after at most one 500)

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tracing::Instrument;

use crate::http::{response, HeaderParsePolicy, ParseError, RequestParser, StreamReader};
use crate::render::{RenderContext, RenderError, Renderer};

/// Global atomic counter for connection IDs.
/// Using relaxed ordering is sufficient since we only need uniqueness, not synchronization.
static CONNECTION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Message sent when the renderer fails.
pub const TEMPLATE_ERROR_MESSAGE: &str = "template error";

/// Unique identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Generate a new unique connection ID.
    pub fn new() -> Self {
        Self(CONNECTION_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// What a connection task needs; cloned into every task.
#[derive(Clone)]
pub struct ConnectionContext {
    pub renderer: Arc<dyn Renderer>,
    pub header_policy: HeaderParsePolicy,
}

impl ConnectionContext {
    pub fn new(renderer: Arc<dyn Renderer>, header_policy: HeaderParsePolicy) -> Self {
        Self {
            renderer,
            header_policy,
        }
    }
}

/// How a connection ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// 200 with the rendered page.
    Rendered,
    /// 500 with a plain-text message.
    Failed,
    /// Closed without writing anything.
    Dropped,
}

/// Serve one request on `stream`, then close it.
///
/// The stream is owned here and dropped on return.
pub async fn handle_connection<S>(stream: S, peer: SocketAddr, ctx: ConnectionContext) -> Outcome
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    let id = ConnectionId::new();
    let span = tracing::info_span!("connection", id = %id, peer = %peer);
    serve(stream, ctx, span.clone()).instrument(span).await
}

async fn serve<S>(stream: S, ctx: ConnectionContext, span: tracing::Span) -> Outcome
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    let mut reader = StreamReader::new(stream);
    let parser = RequestParser::new(ctx.header_policy).with_span(span);
    let parsed = parser.parse(&mut reader).await;
    let mut stream = reader.into_inner();

    let outcome = match parsed {
        Ok(request) => {
            let render_ctx = RenderContext::from_request(&request);
            match render(ctx.renderer, render_ctx).await {
                Ok(html) => respond(Outcome::Rendered, response::write_html(&mut stream, &html)).await,
                Err(e) => {
                    tracing::error!(error = %e, "Template error");
                    respond(Outcome::Failed, response::write_error(&mut stream, TEMPLATE_ERROR_MESSAGE)).await
                }
            }
        }
        Err(e) => respond_to_parse_error(&mut stream, e).await,
    };

    if let Err(e) = stream.shutdown().await {
        tracing::trace!(error = %e, "Shutdown after response failed");
    }
    tracing::trace!(?outcome, "Connection closed");
    outcome
}

async fn render(renderer: Arc<dyn Renderer>, ctx: RenderContext) -> Result<String, RenderError> {
    tokio::task::spawn_blocking(move || renderer.render(&ctx)).await?
}

async fn respond_to_parse_error<S>(stream: &mut S, error: ParseError) -> Outcome
where
    S: AsyncWrite + Unpin,
{
    match error.client_message() {
        Some(message) => {
            tracing::warn!(error = %error, "Request failed");
            respond(Outcome::Failed, response::write_error(stream, &message)).await
        }
        None => {
            tracing::debug!(error = %error, "Dropping connection without response");
            Outcome::Dropped
        }
    }
}

async fn respond<F>(outcome: Outcome, write: F) -> Outcome
where
    F: std::future::Future<Output = std::io::Result<()>>,
{
    match write.await {
        Ok(()) => {
            tracing::info!(?outcome, "Response sent");
            outcome
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to write response");
            Outcome::Dropped
        }
    }
}

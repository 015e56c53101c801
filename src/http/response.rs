//! Response writing.
//!
//! # Responsibilities
//! - Write the single response a connection gets
//! - 200 with an HTML document, or 500 with a plain-text message
//!
//! # Design Decisions
//! - No `Content-Length`; the body is framed by closing the connection

use tokio::io::{AsyncWrite, AsyncWriteExt};

pub const HTML_STATUS_LINE: &str = "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\n\r\n";
pub const ERROR_STATUS_LINE: &str = "HTTP/1.1 500 Internal Server Error\r\n\r\n";

/// Write a 200 response carrying `html`.
pub async fn write_html<W>(stream: &mut W, html: &str) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    write_response(stream, HTML_STATUS_LINE, html).await
}

/// Write a 500 response carrying `message` as plain text.
pub async fn write_error<W>(stream: &mut W, message: &str) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    write_response(stream, ERROR_STATUS_LINE, message).await
}

async fn write_response<W>(stream: &mut W, head: &str, body: &str) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::with_capacity(head.len() + body.len());
    buf.extend_from_slice(head.as_bytes());
    buf.extend_from_slice(body.as_bytes());
    stream.write_all(&buf).await?;
    stream.flush().await
}

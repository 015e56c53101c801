//! Errors raised while reading a request off the wire.

use thiserror::Error;

/// Failure while parsing a single request.
///
/// Every variant is local to the connection that produced it; the accept
/// loop never sees these.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The request line had fewer than three whitespace-separated tokens.
    #[error("malformed request line: {0:?}")]
    MalformedRequestLine(String),

    /// The peer closed the stream before the header block was terminated.
    #[error("stream closed before end of headers")]
    StreamClosed,

    /// The peer closed the stream before `Content-Length` bytes arrived.
    #[error("incomplete body: expected {expected} bytes, received {received}")]
    IncompleteBody { expected: usize, received: usize },

    /// A header line without a colon (strict policy only).
    #[error("malformed header line: {0:?}")]
    MalformedHeaderLine(String),

    /// A `Content-Length` value that is not a non-negative integer (strict policy only).
    #[error("invalid Content-Length: {0:?}")]
    InvalidContentLength(String),

    /// A read failure while receiving the body.
    #[error("failed to read body: {0}")]
    BodyRead(#[source] std::io::Error),

    /// Any other read failure on the underlying stream.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl ParseError {
    /// Message written back in a 500 response, or `None` when the
    /// connection should be dropped without a reply.
    pub fn client_message(&self) -> Option<String> {
        match self {
            ParseError::MalformedRequestLine(_) | ParseError::StreamClosed | ParseError::Io(_) => {
                None
            }
            ParseError::IncompleteBody { .. } | ParseError::BodyRead(_) => {
                Some("failed to read request body".to_string())
            }
            ParseError::MalformedHeaderLine(_) | ParseError::InvalidContentLength(_) => {
                Some(self.to_string())
            }
        }
    }
}

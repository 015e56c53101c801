//! Buffered line and exact-count reads over a raw byte stream.
//!
//! # Responsibilities
//! - Line-delimited reads for the request line and header block
//! - Exact-count reads for a `Content-Length` body
//! - Hand the stream back so the response goes out on the same connection

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};

use crate::http::error::ParseError;

/// One line read off the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Line content without the trailing `\n`.
    pub text: String,
    /// `false` when the stream ended before a `\n` arrived.
    pub terminated: bool,
}

/// Buffered reader over one connection.
pub struct StreamReader<R> {
    inner: BufReader<R>,
}

impl<R: AsyncRead + Unpin> StreamReader<R> {
    pub fn new(stream: R) -> Self {
        Self {
            inner: BufReader::new(stream),
        }
    }

    /// Read one line, stripping the trailing `\n`.
    ///
    /// A `\r` before the line feed is left in place. Returns `Ok(None)` when
    /// the stream ended before any byte of the line arrived; a partial line
    /// cut off by end of stream is returned with `terminated == false`.
    pub async fn read_line(&mut self) -> Result<Option<Line>, ParseError> {
        let mut buf = Vec::new();
        let read = self.inner.read_until(b'\n', &mut buf).await?;
        if read == 0 {
            return Ok(None);
        }
        let terminated = buf.last() == Some(&b'\n');
        if terminated {
            buf.pop();
        }
        Ok(Some(Line {
            text: String::from_utf8_lossy(&buf).into_owned(),
            terminated,
        }))
    }

    /// Read exactly `n` bytes, waiting until they arrive or the stream ends.
    pub async fn read_exact(&mut self, n: usize) -> Result<Vec<u8>, ParseError> {
        let mut body = Vec::with_capacity(n.min(64 * 1024));
        let received = (&mut self.inner)
            .take(n as u64)
            .read_to_end(&mut body)
            .await?;
        if received < n {
            return Err(ParseError::IncompleteBody {
                expected: n,
                received,
            });
        }
        Ok(body)
    }

    /// Recover the underlying stream. Bytes still buffered are discarded.
    pub fn into_inner(self) -> R {
        self.inner.into_inner()
    }
}

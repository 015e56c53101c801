//! Request parser: request line, header block, length-delimited body.
//!
//! # Data Flow
//! ```text
//! Start
//!     → request line (method, target, version)
//!     → header scan, one line at a time, until a blank line
//!     → body of exactly Content-Length bytes, or none
//!     → ParsedRequest
//! ```
//!
//! Any error short-circuits; nothing is retried.

use serde::{Deserialize, Serialize};
use tokio::io::AsyncRead;
use tracing::Span;

use crate::http::error::ParseError;
use crate::http::reader::StreamReader;
use crate::http::request::{split_target, Headers, ParsedRequest, QueryParams};

/// How tolerant the parser is of bad header lines and `Content-Length` values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderParsePolicy {
    /// Skip header lines without a colon; an unparsable `Content-Length`
    /// yields an empty body.
    #[default]
    Lenient,
    /// Reject both cases with an error.
    Strict,
}

/// Single-pass parser for one request.
#[derive(Debug, Clone)]
pub struct RequestParser {
    policy: HeaderParsePolicy,
    span: Span,
}

impl Default for RequestParser {
    fn default() -> Self {
        Self::new(HeaderParsePolicy::default())
    }
}

impl RequestParser {
    pub fn new(policy: HeaderParsePolicy) -> Self {
        Self {
            policy,
            span: Span::none(),
        }
    }

    /// Attach the span that parse events are recorded under.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn policy(&self) -> HeaderParsePolicy {
        self.policy
    }

    /// Read one complete request from `reader`.
    pub async fn parse<R>(&self, reader: &mut StreamReader<R>) -> Result<ParsedRequest, ParseError>
    where
        R: AsyncRead + Unpin,
    {
        let request_line = reader.read_line().await?.ok_or(ParseError::StreamClosed)?;
        let request_line = request_line.text.trim();
        tracing::debug!(parent: &self.span, request_line, "Request line read");

        let mut tokens = request_line.split_whitespace();
        let (method, target) = match (tokens.next(), tokens.next(), tokens.next()) {
            (Some(method), Some(target), Some(_version)) => (method, target),
            _ => {
                tracing::warn!(parent: &self.span, request_line, "Malformed request line");
                return Err(ParseError::MalformedRequestLine(request_line.to_string()));
            }
        };

        let (path, raw_query) = split_target(target);
        let query = raw_query.map(QueryParams::parse).unwrap_or_default();

        let headers = self.read_headers(reader).await?;
        let body = self.read_body(reader, &headers).await?;

        let request = ParsedRequest::new(method.to_string(), path.to_string(), query, headers, body);
        tracing::debug!(
            parent: &self.span,
            method = request.method(),
            path = request.path(),
            query = %request.query().encode(),
            handler = request.path_parameter(),
            headers = ?request.headers(),
            body_len = request.body().len(),
            "Request parsed"
        );
        Ok(request)
    }

    async fn read_headers<R>(&self, reader: &mut StreamReader<R>) -> Result<Headers, ParseError>
    where
        R: AsyncRead + Unpin,
    {
        let mut headers = Headers::default();
        loop {
            // End of stream is never a valid end-of-headers marker, even when
            // the cut-off line trims to nothing.
            let line = reader.read_line().await?.ok_or(ParseError::StreamClosed)?;
            if !line.terminated {
                tracing::debug!(parent: &self.span, partial = %line.text.escape_debug(), "Stream closed inside header block");
                return Err(ParseError::StreamClosed);
            }
            let line = line.text.trim_end();
            if line.is_empty() {
                return Ok(headers);
            }

            match line.split_once(':') {
                Some((name, value)) => headers.insert(name, value.trim()),
                None => match self.policy {
                    HeaderParsePolicy::Lenient => {
                        tracing::debug!(parent: &self.span, line, "Skipping header line without colon");
                    }
                    HeaderParsePolicy::Strict => {
                        return Err(ParseError::MalformedHeaderLine(line.to_string()));
                    }
                },
            }
        }
    }

    async fn read_body<R>(
        &self,
        reader: &mut StreamReader<R>,
        headers: &Headers,
    ) -> Result<Vec<u8>, ParseError>
    where
        R: AsyncRead + Unpin,
    {
        let Some(raw) = headers.content_length() else {
            tracing::debug!(parent: &self.span, "Content-Length not present");
            return Ok(Vec::new());
        };

        let length = match raw.parse::<usize>() {
            Ok(length) => length,
            Err(_) => match self.policy {
                HeaderParsePolicy::Lenient => {
                    tracing::debug!(parent: &self.span, content_length = raw, "Unparsable Content-Length, treating body as empty");
                    return Ok(Vec::new());
                }
                HeaderParsePolicy::Strict => {
                    return Err(ParseError::InvalidContentLength(raw.to_string()));
                }
            },
        };

        let body = reader
            .read_exact(length)
            .await
            .map_err(|e| match e {
                ParseError::Io(source) => ParseError::BodyRead(source),
                other => other,
            })
            .inspect_err(|e| {
                tracing::warn!(parent: &self.span, error = %e, "Failed to read request body");
            })?;
        tracing::debug!(parent: &self.span, body = %String::from_utf8_lossy(&body), "Request body read");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use tokio::io::ReadBuf;

    /// Yields `data` once, then fails every read like a reset connection.
    struct FailAfter {
        data: &'static [u8],
        sent: bool,
    }

    impl AsyncRead for FailAfter {
        fn poll_read(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<std::io::Result<()>> {
            if self.sent {
                return Poll::Ready(Err(std::io::ErrorKind::ConnectionReset.into()));
            }
            self.sent = true;
            buf.put_slice(self.data);
            Poll::Ready(Ok(()))
        }
    }

    async fn parse_with(policy: HeaderParsePolicy, raw: &[u8]) -> Result<ParsedRequest, ParseError> {
        let mut reader = StreamReader::new(raw);
        RequestParser::new(policy).parse(&mut reader).await
    }

    async fn parse(raw: &[u8]) -> Result<ParsedRequest, ParseError> {
        parse_with(HeaderParsePolicy::Lenient, raw).await
    }

    #[tokio::test]
    async fn parses_get_with_query() {
        let request = parse(b"GET /handler/alice?x=1&y=2 HTTP/1.1\r\nHost: test\r\n\r\n")
            .await
            .unwrap();
        assert_eq!(request.method(), "GET");
        assert_eq!(request.path(), "/handler/alice");
        assert_eq!(request.path_parameter(), "alice");
        assert_eq!(request.query().get_all("x"), ["1".to_string()]);
        assert_eq!(request.query().get_all("y"), ["2".to_string()]);
        assert_eq!(request.query().len(), 2);
        assert_eq!(request.headers().len(), 1);
        assert_eq!(request.headers().get("Host"), Some("test"));
        assert!(request.body().is_empty());
    }

    #[tokio::test]
    async fn reads_content_length_body() {
        let request = parse(b"POST /handler/ HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello")
            .await
            .unwrap();
        assert_eq!(request.body(), b"hello");
        assert_eq!(request.path_parameter(), "");
    }

    #[tokio::test]
    async fn body_ignores_trailing_bytes() {
        let request = parse(b"POST / HTTP/1.1\r\nContent-Length: 3\r\n\r\nabcdef")
            .await
            .unwrap();
        assert_eq!(request.body(), b"abc");
        assert_eq!(request.path_parameter(), "unknown");
    }

    #[tokio::test]
    async fn short_body_is_incomplete() {
        let err = parse(b"POST / HTTP/1.1\r\nContent-Length: 5\r\n\r\nhel")
            .await
            .unwrap_err();
        assert!(matches!(err, ParseError::IncompleteBody { expected: 5, received: 3 }));
    }

    #[tokio::test]
    async fn two_tokens_is_malformed() {
        let err = parse(b"GET /\r\n\r\n").await.unwrap_err();
        assert!(matches!(err, ParseError::MalformedRequestLine(_)));

        let err = parse(b"BAD\r\n").await.unwrap_err();
        assert!(matches!(err, ParseError::MalformedRequestLine(line) if line == "BAD"));
    }

    #[tokio::test]
    async fn third_token_is_not_validated() {
        let request = parse(b"FETCH /x whatever extra\r\n\r\n").await.unwrap();
        assert_eq!(request.method(), "FETCH");
        assert_eq!(request.path(), "/x");
    }

    #[tokio::test]
    async fn empty_stream_is_closed() {
        assert!(matches!(parse(b"").await.unwrap_err(), ParseError::StreamClosed));
    }

    #[tokio::test]
    async fn truncated_headers_are_not_end_of_headers() {
        let err = parse(b"GET / HTTP/1.1\r\nHost: test\r\n").await.unwrap_err();
        assert!(matches!(err, ParseError::StreamClosed));
    }

    #[tokio::test]
    async fn carriage_return_at_eof_is_not_end_of_headers() {
        let err = parse(b"GET /handler/a HTTP/1.1\r\nHost: a\r\n\r").await.unwrap_err();
        assert!(matches!(err, ParseError::StreamClosed));
    }

    #[tokio::test]
    async fn trailing_spaces_at_eof_are_not_end_of_headers() {
        let err = parse(b"GET /handler/a HTTP/1.1\r\nHost: a\r\n  ").await.unwrap_err();
        assert!(matches!(err, ParseError::StreamClosed));
    }

    #[tokio::test]
    async fn unterminated_header_at_eof_is_closed() {
        let err = parse(b"GET / HTTP/1.1\r\nHost: a").await.unwrap_err();
        assert!(matches!(err, ParseError::StreamClosed));
    }

    #[tokio::test]
    async fn io_error_during_body_is_body_read() {
        let mut reader = StreamReader::new(FailAfter {
            data: b"POST / HTTP/1.1\r\nContent-Length: 10\r\n\r\nabc",
            sent: false,
        });
        let err = RequestParser::default().parse(&mut reader).await.unwrap_err();
        assert!(matches!(err, ParseError::BodyRead(_)));
        assert_eq!(err.client_message().as_deref(), Some("failed to read request body"));
    }

    #[tokio::test]
    async fn io_error_during_headers_is_io() {
        let mut reader = StreamReader::new(FailAfter {
            data: b"GET / HTTP/1.1\r\nHost: a\r\n",
            sent: false,
        });
        let err = RequestParser::default().parse(&mut reader).await.unwrap_err();
        assert!(matches!(err, ParseError::Io(_)));
        assert!(err.client_message().is_none());
    }

    #[tokio::test]
    async fn header_key_kept_raw_value_trimmed() {
        let request = parse(b"GET / HTTP/1.1\r\nX-Spaced :   padded value  \r\nX-Url: http://a:1\r\n\r\n")
            .await
            .unwrap();
        assert_eq!(request.headers().get("X-Spaced "), Some("padded value"));
        assert_eq!(request.headers().get("X-Url"), Some("http://a:1"));
    }

    #[tokio::test]
    async fn duplicate_headers_overwrite() {
        let request = parse(b"GET / HTTP/1.1\r\nX-A: 1\r\nX-A: 2\r\nx-a: 3\r\n\r\n")
            .await
            .unwrap();
        assert_eq!(request.headers().len(), 2);
        assert_eq!(request.headers().get("X-A"), Some("2"));
        assert_eq!(request.headers().get("x-a"), Some("3"));
    }

    #[tokio::test]
    async fn lenient_skips_colonless_lines() {
        let request = parse(b"GET / HTTP/1.1\r\nnot a header\r\nHost: h\r\n\r\n")
            .await
            .unwrap();
        assert_eq!(request.headers().len(), 1);
        assert_eq!(request.headers().get("Host"), Some("h"));
    }

    #[tokio::test]
    async fn lenient_bad_content_length_means_empty_body() {
        let request = parse(b"POST / HTTP/1.1\r\nContent-Length: abc\r\n\r\nhello")
            .await
            .unwrap();
        assert!(request.body().is_empty());

        let request = parse(b"POST / HTTP/1.1\r\nContent-Length: -4\r\n\r\nhello")
            .await
            .unwrap();
        assert!(request.body().is_empty());
    }

    #[tokio::test]
    async fn lowercase_content_length_is_ignored() {
        let request = parse(b"POST / HTTP/1.1\r\ncontent-length: 5\r\n\r\nhello")
            .await
            .unwrap();
        assert!(request.body().is_empty());
    }

    #[tokio::test]
    async fn strict_rejects_colonless_lines() {
        let err = parse_with(HeaderParsePolicy::Strict, b"GET / HTTP/1.1\r\nbogus\r\n\r\n")
            .await
            .unwrap_err();
        assert!(matches!(err, ParseError::MalformedHeaderLine(line) if line == "bogus"));
    }

    #[tokio::test]
    async fn strict_rejects_bad_content_length() {
        let err = parse_with(
            HeaderParsePolicy::Strict,
            b"POST / HTTP/1.1\r\nContent-Length: 5x\r\n\r\nhello",
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ParseError::InvalidContentLength(value) if value == "5x"));
    }

    #[tokio::test]
    async fn bare_line_feeds_are_accepted() {
        let request = parse(b"GET /handler/x HTTP/1.1\nHost: a\n\n").await.unwrap();
        assert_eq!(request.path_parameter(), "x");
        assert_eq!(request.headers().get("Host"), Some("a"));
    }

    #[tokio::test]
    async fn duplex_stream_without_content_length_does_not_block() {
        let (mut client, server) = tokio::io::duplex(256);
        tokio::io::AsyncWriteExt::write_all(&mut client, b"GET /handler/q HTTP/1.1\r\n\r\n")
            .await
            .unwrap();

        // The client half stays open; parsing must finish without more input.
        let mut reader = StreamReader::new(server);
        let request = RequestParser::default().parse(&mut reader).await.unwrap();
        assert_eq!(request.path_parameter(), "q");
        assert!(request.body().is_empty());
        drop(client);
    }
}

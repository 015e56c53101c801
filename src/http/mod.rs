//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → reader.rs (buffered line / exact-count reads)
//!     → parser.rs (request line, headers, body)
//!     → request.rs (ParsedRequest)
//!     → [render subsystem builds the page]
//!     → response.rs (200 or 500 on the same stream)
//! ```
//!
//! server.rs owns the accept loop that feeds connections into this pipeline.

pub mod error;
pub mod parser;
pub mod reader;
pub mod request;
pub mod response;
pub mod server;

pub use error::ParseError;
pub use parser::{HeaderParsePolicy, RequestParser};
pub use reader::{Line, StreamReader};
pub use request::{Headers, ParsedRequest, QueryParams, HANDLER_PREFIX, UNKNOWN_HANDLER};
pub use server::HttpServer;

//! Minimal HTTP/1.1 request reader over raw TCP sockets.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod render;

pub use config::ServerConfig;
pub use http::{HttpServer, ParsedRequest};
pub use lifecycle::Shutdown;

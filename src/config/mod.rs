//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML), or ServerConfig::default()
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ServerConfig (validated, immutable)
//!     → read by the listener, parser and renderer at startup
//! ```
//!
//! # Design Decisions
//! - All fields have defaults; the binary runs on defaults alone
//! - The TOML loader is library API for embedders and tests; the shipped
//!   binary takes no config file, so `HeaderParsePolicy::Strict` and a
//!   custom template path are only reachable through it
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{ListenerConfig, ParserConfig, ServerConfig, TemplateConfig, DEFAULT_PORT};

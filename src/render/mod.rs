//! HTML rendering of a parsed request.
//!
//! # Data Flow
//! ```text
//! ParsedRequest
//!     → RenderContext (query and headers flattened to display strings)
//!     → Renderer (handlebars template, HTML-escaped)
//!     → HTML document for the 200 response
//! ```
//!
//! # Design Decisions
//! - `Renderer` is the seam; the connection handler only sees the trait
//! - Rendering is synchronous and may touch the filesystem, so callers run
//!   it on the blocking pool

use std::path::{Path, PathBuf};

use handlebars::Handlebars;
use serde::Serialize;
use thiserror::Error;

use crate::config::TemplateConfig;
use crate::http::ParsedRequest;

/// Template shipped with the binary.
pub const DEFAULT_TEMPLATE: &str = include_str!("../../static/layout_handler.html");

const TEMPLATE_NAME: &str = "layout_handler";

/// Error type for rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to read template {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid template: {0}")]
    Template(#[from] Box<handlebars::TemplateError>),
    #[error("render failed: {0}")]
    Render(#[from] handlebars::RenderError),
    #[error("render task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Values exposed to the template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderContext {
    pub handler: String,
    pub query: String,
    pub headers: String,
    pub body: String,
}

impl RenderContext {
    pub fn from_request(request: &ParsedRequest) -> Self {
        Self {
            handler: request.path_parameter().to_string(),
            query: request.query().encode(),
            headers: request.headers().dump(),
            body: request.body_text(),
        }
    }
}

/// Turns a [`RenderContext`] into an HTML document.
pub trait Renderer: Send + Sync + 'static {
    fn render(&self, ctx: &RenderContext) -> Result<String, RenderError>;
}

enum TemplateSource {
    Builtin,
    File(PathBuf),
}

/// Handlebars-backed renderer.
///
/// A file-backed template is re-read on every render, so edits take effect
/// without a restart.
pub struct TemplateRenderer {
    registry: Handlebars<'static>,
    source: TemplateSource,
}

impl TemplateRenderer {
    /// Renderer using [`DEFAULT_TEMPLATE`].
    pub fn builtin() -> Result<Self, RenderError> {
        let mut registry = Self::registry();
        registry
            .register_template_string(TEMPLATE_NAME, DEFAULT_TEMPLATE)
            .map_err(Box::new)?;
        Ok(Self {
            registry,
            source: TemplateSource::Builtin,
        })
    }

    /// Renderer reading its template from `path` at render time.
    pub fn from_file(path: impl AsRef<Path>) -> Self {
        Self {
            registry: Self::registry(),
            source: TemplateSource::File(path.as_ref().to_path_buf()),
        }
    }

    /// Pick the template named by configuration, falling back to the builtin one.
    pub fn from_config(config: &TemplateConfig) -> Result<Self, RenderError> {
        match &config.path {
            Some(path) => Ok(Self::from_file(path)),
            None => Self::builtin(),
        }
    }

    fn registry() -> Handlebars<'static> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry
    }
}

impl Renderer for TemplateRenderer {
    fn render(&self, ctx: &RenderContext) -> Result<String, RenderError> {
        match &self.source {
            TemplateSource::Builtin => Ok(self.registry.render(TEMPLATE_NAME, ctx)?),
            TemplateSource::File(path) => {
                let template = std::fs::read_to_string(path).map_err(|source| RenderError::Io {
                    path: path.clone(),
                    source,
                })?;
                Ok(self.registry.render_template(&template, ctx)?)
            }
        }
    }
}

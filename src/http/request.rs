//! The parsed form of a single request.
//!
//! # Responsibilities
//! - Split the request target into path and query
//! - Derive the handler name from the fixed `/handler/` prefix
//! - Hold decoded query parameters and the header map
//!
//! # Design Decisions
//! - Built once by the parser, read-only afterwards
//! - Header keys are exact-case; a repeated key overwrites the earlier value
//! - The path is kept raw, percent-escapes are not decoded

use std::collections::HashMap;

use url::form_urlencoded;

/// Literal prefix that selects the handler name.
pub const HANDLER_PREFIX: &str = "/handler/";

/// Handler name used when the path does not start with [`HANDLER_PREFIX`].
pub const UNKNOWN_HANDLER: &str = "unknown";

/// Split a request target into its path and optional query string.
///
/// A `#fragment` suffix is dropped.
pub fn split_target(target: &str) -> (&str, Option<&str>) {
    let target = match target.find('#') {
        Some(idx) => &target[..idx],
        None => target,
    };
    match target.find('?') {
        Some(idx) => (&target[..idx], Some(&target[idx + 1..])),
        None => (target, None),
    }
}

/// Everything after `/handler/`, or `"unknown"` for any other path.
pub fn path_parameter(path: &str) -> &str {
    path.strip_prefix(HANDLER_PREFIX).unwrap_or(UNKNOWN_HANDLER)
}

/// Decoded query parameters. Keys keep the order they first appeared in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    entries: Vec<(String, Vec<String>)>,
}

impl QueryParams {
    /// Decode a raw query string using form-encoding rules.
    pub fn parse(query: &str) -> Self {
        let mut params = Self::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            params.append(key.into_owned(), value.into_owned());
        }
        params
    }

    pub fn append(&mut self, key: String, value: String) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((key, vec![value])),
        }
    }

    /// First value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.get_all(key).first().map(String::as_str)
    }

    pub fn get_all(&self, key: &str) -> &[String] {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, values)| values.as_slice())
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(k, values)| (k.as_str(), values.as_slice()))
    }

    /// Re-encode as a query string (no leading `?`).
    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, values) in &self.entries {
            for value in values {
                serializer.append_pair(key, value);
            }
        }
        serializer.finish()
    }
}

/// Request headers, one value per exact-cased name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    map: HashMap<String, String>,
}

impl Headers {
    pub const CONTENT_LENGTH: &'static str = "Content-Length";

    /// Insert a header, replacing any earlier value under the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.map.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.map.get(name).map(String::as_str)
    }

    /// Raw `Content-Length` value, matched case-sensitively.
    pub fn content_length(&self) -> Option<&str> {
        self.get(Self::CONTENT_LENGTH)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// One `Name: value` line per header, in no particular order.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for (name, value) in self.iter() {
            out.push_str(name);
            out.push_str(": ");
            out.push_str(value);
            out.push('\n');
        }
        out
    }
}

/// A fully read request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRequest {
    method: String,
    path: String,
    path_parameter: String,
    query: QueryParams,
    headers: Headers,
    body: Vec<u8>,
}

impl ParsedRequest {
    pub fn new(
        method: String,
        path: String,
        query: QueryParams,
        headers: Headers,
        body: Vec<u8>,
    ) -> Self {
        let path_parameter = path_parameter(&path).to_string();
        Self {
            method,
            path,
            path_parameter,
            query,
            headers,
            body,
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Handler name taken from the path.
    pub fn path_parameter(&self) -> &str {
        &self.path_parameter
    }

    pub fn query(&self) -> &QueryParams {
        &self.query
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body as text, invalid UTF-8 replaced.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

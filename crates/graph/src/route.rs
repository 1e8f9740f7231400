//! Versioned Graph route builder.
//!
//! A route is the path-and-query part of a request URL, e.g.
//! `/v20.0/act_42/advideos?fields=id,title&limit=1000`. The client
//! prepends its base URL.

use std::fmt;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Unreserved characters stay literal in path segments and query values.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'-')
    .remove(b'.')
    .remove(b'~');

/// Field lists are comma separated.
const FIELD_LIST: &AsciiSet = &COMPONENT.remove(b',');

/// Percent-encodes a single path segment (an object or account id).
pub fn segment(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

/// A versioned API route with optional field selection and page size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    version: String,
    path: String,
    fields: Vec<String>,
    limit: Option<u32>,
}

impl Route {
    /// Creates a route for `path` under API `version`.
    ///
    /// `path` must start with `/` and have its dynamic segments already
    /// encoded with [`segment`].
    pub fn new(version: &str, path: impl Into<String>) -> Self {
        Self {
            version: version.trim_matches('/').to_string(),
            path: path.into(),
            fields: Vec::new(),
            limit: None,
        }
    }

    /// Restricts the response to the given fields.
    pub fn fields<S: AsRef<str>>(mut self, fields: &[S]) -> Self {
        self.fields
            .extend(fields.iter().map(|f| f.as_ref().to_string()));
        self
    }

    /// Sets the page size for list endpoints.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}{}", self.version, self.path)?;

        let mut sep = '?';
        if !self.fields.is_empty() {
            let joined = self.fields.join(",");
            write!(f, "{sep}fields={}", utf8_percent_encode(&joined, FIELD_LIST))?;
            sep = '&';
        }
        if let Some(limit) = self.limit {
            write!(f, "{sep}limit={limit}")?;
        }
        Ok(())
    }
}

//! Client configuration: API host, key, blog URL and the extra headers
//! forwarded from the source request.
//!
//! # Design
//! `Config` is an explicit value owned by `Client` rather than process-wide
//! state. It is written through setters before the client is shared and read
//! by every dispatch. No validation happens at set time; an empty key is
//! accepted here and rejected by `resolve_host` for authenticated commands.
//!
//! The struct derives `Deserialize` with per-field defaults so an outer
//! configuration layer can load it from any serde format.

use std::time::Duration;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::error::AkismetError;

pub const DEFAULT_HOST: &str = "rest.akismet.com";

/// Headers forwarded by default, named the way CGI/Rack environments do.
pub const DEFAULT_EXTRA_HEADERS: [&str; 4] = [
    "HTTP_REMOTE_ADDR",
    "HTTP_CLIENT_IP",
    "HTTP_X_FORWARDED_FOR",
    "HTTP_CONNECTION",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    host: String,
    key: Option<String>,
    blog: Option<String>,
    extra_headers: ExtraHeaders,
    log_requests: bool,
    timeout_ms: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            key: None,
            blog: None,
            extra_headers: ExtraHeaders::default(),
            log_requests: false,
            timeout_ms: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for the common "key + blog, everything else default" setup.
    pub fn with_key(key: &str, blog: &str) -> Self {
        let mut config = Self::default();
        config.set_key(key).set_blog(blog);
        config
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn set_host(&mut self, host: &str) -> &mut Self {
        self.host = host.to_string();
        self
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn set_key(&mut self, key: &str) -> &mut Self {
        self.key = Some(key.to_string());
        self
    }

    pub fn clear_key(&mut self) -> &mut Self {
        self.key = None;
        self
    }

    pub fn blog(&self) -> Option<&str> {
        self.blog.as_deref()
    }

    pub fn set_blog(&mut self, blog: &str) -> &mut Self {
        self.blog = Some(blog.to_string());
        self
    }

    pub fn clear_blog(&mut self) -> &mut Self {
        self.blog = None;
        self
    }

    pub fn extra_headers(&self) -> &ExtraHeaders {
        &self.extra_headers
    }

    /// Mutable access for callers that grow the list across statements.
    pub fn extra_headers_mut(&mut self) -> &mut ExtraHeaders {
        &mut self.extra_headers
    }

    /// Replace the whole extra header list.
    pub fn set_extra_headers<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_headers.set(names);
        self
    }

    /// Whether each dispatch emits a debug event with the encoded body.
    ///
    /// The body carries commenter IPs and emails, so this is off unless
    /// asked for.
    pub fn log_requests(&self) -> bool {
        self.log_requests
    }

    pub fn set_log_requests(&mut self, enabled: bool) -> &mut Self {
        self.log_requests = enabled;
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Overall request timeout handed to the transport. `None` waits forever.
    ///
    /// Stored in whole milliseconds, rounded up so a non-zero timeout never
    /// becomes zero.
    pub fn set_timeout(&mut self, timeout: Option<Duration>) -> &mut Self {
        self.timeout_ms = timeout
            .map(|t| u64::try_from(t.as_nanos().div_ceil(1_000_000)).unwrap_or(u64::MAX));
        self
    }

    /// Host the request for `command` goes to.
    ///
    /// `verify-key` talks to the bare host; every other command embeds the
    /// API key as the leading DNS label.
    pub fn resolve_host(&self, command: Command) -> Result<String, AkismetError> {
        if !command.is_authenticated() {
            return Ok(self.host.clone());
        }
        match self.key() {
            Some(key) if !key.is_empty() => Ok(format!("{key}.{}", self.host)),
            _ => Err(AkismetError::MissingKey),
        }
    }
}

/// Ordered, de-duplicating list of header names.
///
/// Adding a name that is already present leaves the list unchanged, so the
/// first-seen order is kept however the list was assembled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtraHeaders(IndexSet<String>);

impl Default for ExtraHeaders {
    fn default() -> Self {
        DEFAULT_EXTRA_HEADERS.into_iter().collect()
    }
}

impl ExtraHeaders {
    /// An empty list. `default()` holds the four standard names.
    pub fn new() -> Self {
        Self(IndexSet::new())
    }

    pub fn set<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0.clear();
        self.extend(names);
    }

    /// Append a name. Returns `false` if it was already present.
    pub fn add(&mut self, name: impl Into<String>) -> bool {
        self.0.insert(name.into())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }
}

impl<S: Into<String>> Extend<S> for ExtraHeaders {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for name in iter {
            self.add(name);
        }
    }
}

impl<S: Into<String>> FromIterator<S> for ExtraHeaders {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut headers = ExtraHeaders::new();
        headers.extend(iter);
        headers
    }
}

impl<'a> IntoIterator for &'a ExtraHeaders {
    type Item = &'a String;
    type IntoIter = indexmap::set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

//! The attribute bag sent as the request body, and the merge that fills it
//! from configuration and the source request.
//!
//! # Design
//! Attributes are an insertion-ordered string map so the encoded body is
//! deterministic. Re-inserting an existing field keeps its original
//! position and replaces the value.
//!
//! Merge precedence, applied in this order:
//! 1. `blog` from configuration, only if the caller left it out.
//! 2. For authenticated commands, `comment_type` defaults to `comment`.
//! 3. With a source request, `user_ip`, `user_agent` and `referrer` are
//!    overwritten from it, as is every configured extra header. Headers
//!    missing on the request are stored as empty strings.

use indexmap::map::Iter;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::config::Config;
use crate::source::{header_name_for, SourceRequest};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(IndexMap<String, String>);

impl Attributes {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Set `field`, returning the previous value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl ToString) -> Option<String> {
        self.0.insert(field.into(), value.to_string())
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn remove(&mut self, field: &str) -> Option<String> {
        self.0.shift_remove(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, String, String> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    fn insert_if_absent(&mut self, field: &str, value: &str) {
        if !self.0.contains_key(field) {
            self.0.insert(field.to_string(), value.to_string());
        }
    }

    pub fn blog(mut self, url: &str) -> Self {
        self.insert("blog", url);
        self
    }

    pub fn permalink(mut self, url: &str) -> Self {
        self.insert("permalink", url);
        self
    }

    pub fn comment_type(mut self, kind: &str) -> Self {
        self.insert("comment_type", kind);
        self
    }

    pub fn comment_author(mut self, name: &str) -> Self {
        self.insert("comment_author", name);
        self
    }

    pub fn comment_author_email(mut self, email: &str) -> Self {
        self.insert("comment_author_email", email);
        self
    }

    pub fn comment_author_url(mut self, url: &str) -> Self {
        self.insert("comment_author_url", url);
        self
    }

    pub fn comment_content(mut self, content: &str) -> Self {
        self.insert("comment_content", content);
        self
    }

    pub fn user_ip(mut self, ip: &str) -> Self {
        self.insert("user_ip", ip);
        self
    }

    pub fn user_agent(mut self, agent: &str) -> Self {
        self.insert("user_agent", agent);
        self
    }

    pub fn referrer(mut self, url: &str) -> Self {
        self.insert("referrer", url);
        self
    }

    /// Form-encode as `k1=v1&k2=v2` in insertion order.
    pub fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.0.iter())
            .finish()
    }

    /// Inverse of [`Attributes::encode`].
    pub fn decode(body: &str) -> Self {
        form_urlencoded::parse(body.as_bytes()).into_owned().collect()
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Attributes::new();
        for (k, v) in iter {
            attrs.insert(k, v);
        }
        attrs
    }
}

impl<K: Into<String>, V: ToString, const N: usize> From<[(K, V); N]> for Attributes {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type Item = (&'a String, &'a String);
    type IntoIter = Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Fill `attributes` for `command` from `config` and the optional source
/// request. Never fails; a missing blog simply stays missing.
pub fn merge(
    command: Command,
    attributes: &mut Attributes,
    config: &Config,
    request: Option<&dyn SourceRequest>,
) {
    if let Some(blog) = config.blog() {
        attributes.insert_if_absent("blog", blog);
    }

    if !command.is_authenticated() {
        return;
    }

    attributes.insert_if_absent("comment_type", "comment");

    let Some(request) = request else {
        return;
    };

    let referrer = request
        .header("Referer")
        .or_else(|| request.header("Referrer"));
    attributes.insert("user_ip", request.remote_ip().unwrap_or_default());
    attributes.insert("user_agent", request.header("User-Agent").unwrap_or_default());
    attributes.insert("referrer", referrer.unwrap_or_default());

    for name in config.extra_headers().iter() {
        let value = request.header(&header_name_for(name)).unwrap_or_default();
        attributes.insert(name, value);
    }
}

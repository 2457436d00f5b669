//! The inbound web request a comment arrived on.
//!
//! Any framework's request type can be adapted by implementing
//! [`SourceRequest`]; [`RequestInfo`] is an owned implementation for callers
//! that would rather copy the few fields out up front.

/// Read-only view of the request that carried the comment.
pub trait SourceRequest {
    /// Client IP as the application sees it (after any proxy handling).
    fn remote_ip(&self) -> Option<String>;

    /// Header value by name. Lookup must be case-insensitive.
    fn header(&self, name: &str) -> Option<String>;
}

/// Owned remote IP plus header list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestInfo {
    pub remote_ip: Option<String>,
    pub headers: Vec<(String, String)>,
}

impl RequestInfo {
    pub fn new(remote_ip: &str) -> Self {
        Self {
            remote_ip: Some(remote_ip.to_string()),
            headers: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

impl SourceRequest for RequestInfo {
    fn remote_ip(&self) -> Option<String> {
        self.remote_ip.clone()
    }

    fn header(&self, name: &str) -> Option<String> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.clone())
    }
}

/// Map a CGI-style environment name (`HTTP_X_FORWARDED_FOR`) to the HTTP
/// header it came from (`X-Forwarded-For`). Other names pass through.
pub(crate) fn header_name_for(name: &str) -> String {
    match name.strip_prefix("HTTP_") {
        Some(rest) if !rest.is_empty() => rest
            .split('_')
            .map(|part| {
                let mut chars = part.chars();
                match chars.next() {
                    Some(first) => {
                        first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase()
                    }
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join("-"),
        _ => name.to_string(),
    }
}

//! HTTP request/response types exchanged with a [`Transport`].
//!
//! # Design
//! The client builds an `HttpRequest` as plain data and hands it to a
//! transport; the transport hands back an `HttpResponse`. Hosts that want to
//! run the I/O themselves can use `Client::build_request` and the
//! `parse_*` helpers and never touch a transport at all.
//!
//! Every request is a cleartext form-encoded POST, so there is no method
//! field.
//!
//! [`Transport`]: crate::transport::Transport

/// Port every request is sent to.
pub const HTTP_PORT: u16 = 80;

pub const CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Client identification sent as `User-Agent`.
pub const USER_AGENT: &str = concat!("akismet-core/", env!("CARGO_PKG_VERSION"), " | Akismet/1.1");

/// A POST request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub host: String,
    pub port: u16,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpRequest {
    pub fn url(&self) -> String {
        if self.port == HTTP_PORT {
            format!("http://{}{}", self.host, self.path)
        } else {
            format!("http://{}:{}{}", self.host, self.port, self.path)
        }
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// An HTTP response described as plain data.
///
/// The client only ever looks at `body`; status and headers are kept for
/// callers that want to inspect them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// A 200 response with `body` and no headers.
    pub fn ok(body: &str) -> Self {
        Self {
            status: 200,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(port: u16) -> HttpRequest {
        HttpRequest {
            host: "rest.akismet.com".to_string(),
            port,
            path: "/1.1/verify-key".to_string(),
            headers: vec![("Content-Type".to_string(), CONTENT_TYPE.to_string())],
            body: String::new(),
        }
    }

    #[test]
    fn default_port_is_omitted_from_url() {
        assert_eq!(request(80).url(), "http://rest.akismet.com/1.1/verify-key");
    }

    #[test]
    fn other_ports_are_kept_in_url() {
        assert_eq!(
            request(3000).url(),
            "http://rest.akismet.com:3000/1.1/verify-key"
        );
    }

    #[test]
    fn header_lookup_ignores_case() {
        assert_eq!(request(80).header("content-type"), Some(CONTENT_TYPE));
        assert!(request(80).header("User-Agent").is_none());
    }

    #[test]
    fn user_agent_names_library_and_api_version() {
        assert!(USER_AGENT.starts_with("akismet-core/"));
        assert!(USER_AGENT.ends_with(&format!("Akismet/{}", crate::command::API_VERSION)));
    }
}

//! Request construction, dispatch and the public spam-check operations.
//!
//! # Design
//! `Client` owns a `Config` and a `Transport` and keeps no per-call state.
//! Every operation runs the same pipeline: merge attributes, encode them,
//! resolve host and path, send, return the raw body. The pipeline is split
//! into `build_request` (pure) and `dispatch` (I/O) so hosts that execute
//! HTTP themselves can pair `build_request` with the `parse_*` helpers.
//!
//! Operations borrow the caller's attributes and merge into a copy; the
//! caller's bag is never modified.
//!
//! Response bodies are compared verbatim. Anything other than the expected
//! token makes the boolean operations return `false`; status codes are not
//! interpreted.

use crate::attributes::{merge, Attributes};
use crate::command::Command;
use crate::config::Config;
use crate::error::AkismetError;
use crate::http::{HttpRequest, HttpResponse, CONTENT_TYPE, HTTP_PORT, USER_AGENT};
use crate::source::SourceRequest;
use crate::transport::{Transport, UreqTransport};

#[derive(Debug, Clone)]
pub struct Client<T = UreqTransport> {
    config: Config,
    transport: T,
}

impl Client<UreqTransport> {
    /// Client on the default `ureq` transport, honouring `config.timeout()`.
    pub fn new(config: Config) -> Self {
        let transport = UreqTransport::from_config(&config);
        Self { config, transport }
    }
}

impl<T> Client<T> {
    pub fn with_transport(config: Config, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Mutable configuration. Only reachable before the client is shared.
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Build the wire request for `command` without sending it.
    ///
    /// Fails only with [`AkismetError::MissingKey`], before anything is
    /// merged or encoded.
    pub fn build_request(
        &self,
        command: Command,
        attributes: &Attributes,
        request: Option<&dyn SourceRequest>,
    ) -> Result<HttpRequest, AkismetError> {
        let host = self.config.resolve_host(command)?;

        let mut attributes = attributes.clone();
        merge(command, &mut attributes, &self.config, request);

        Ok(HttpRequest {
            host,
            port: HTTP_PORT,
            path: command.path(),
            headers: vec![
                ("User-Agent".to_string(), USER_AGENT.to_string()),
                ("Content-Type".to_string(), CONTENT_TYPE.to_string()),
            ],
            body: attributes.encode(),
        })
    }
}

impl<T: Transport> Client<T> {
    /// Send `command` and return the raw response body.
    pub fn dispatch(
        &self,
        command: Command,
        attributes: &Attributes,
        request: Option<&dyn SourceRequest>,
    ) -> Result<String, AkismetError> {
        let http_request = self.build_request(command, attributes, request)?;

        if self.config.log_requests() {
            tracing::debug!(%command, body = %http_request.body, "akismet request");
        }

        let response = self
            .transport
            .send(&http_request)
            .map_err(AkismetError::transport)?;
        Ok(response.body)
    }

    /// Whether the service accepts `key`. Needs no configured key.
    pub fn validate_key(&self, key: &str) -> Result<bool, AkismetError> {
        let attributes = Attributes::from([("key", key)]);
        let body = self.dispatch(Command::VerifyKey, &attributes, None)?;
        Ok(body == "valid")
    }

    /// Whether the service classifies the comment as spam.
    pub fn is_spam(
        &self,
        attributes: &Attributes,
        request: Option<&dyn SourceRequest>,
    ) -> Result<bool, AkismetError> {
        let body = self.dispatch(Command::CommentCheck, attributes, request)?;
        Ok(body == "true")
    }

    /// Whether the service classifies the comment as legitimate.
    ///
    /// Not simply `!is_spam`: an unexpected body makes both return `false`.
    pub fn is_ham(
        &self,
        attributes: &Attributes,
        request: Option<&dyn SourceRequest>,
    ) -> Result<bool, AkismetError> {
        let body = self.dispatch(Command::CommentCheck, attributes, request)?;
        Ok(body == "false")
    }

    /// Report a comment the service missed as spam. Returns the raw
    /// acknowledgement body.
    pub fn submit_spam(&self, attributes: &Attributes) -> Result<String, AkismetError> {
        self.dispatch(Command::SubmitSpam, attributes, None)
    }

    /// Report a false positive. Returns the raw acknowledgement body.
    pub fn submit_ham(&self, attributes: &Attributes) -> Result<String, AkismetError> {
        self.dispatch(Command::SubmitHam, attributes, None)
    }
}

pub fn parse_verify_key(response: &HttpResponse) -> bool {
    response.body == "valid"
}

pub fn parse_is_spam(response: &HttpResponse) -> bool {
    response.body == "true"
}

pub fn parse_is_ham(response: &HttpResponse) -> bool {
    response.body == "false"
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::source::RequestInfo;

    /// Records every request and answers with a fixed body.
    #[derive(Default)]
    struct FakeTransport {
        body: String,
        fail: bool,
        sent: Mutex<Vec<HttpRequest>>,
    }

    impl FakeTransport {
        fn replying(body: &str) -> Self {
            Self {
                body: body.to_string(),
                ..Default::default()
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        fn sent(&self) -> Vec<HttpRequest> {
            self.sent.lock().unwrap().clone()
        }
    }

    impl Transport for FakeTransport {
        type Error = io::Error;

        fn send(&self, request: &HttpRequest) -> Result<HttpResponse, io::Error> {
            self.sent.lock().unwrap().push(request.clone());
            if self.fail {
                return Err(io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused"));
            }
            Ok(HttpResponse::ok(&self.body))
        }
    }

    fn config() -> Config {
        Config::with_key("123456789", "http://www.example.com/")
    }

    fn client(body: &str) -> Client<FakeTransport> {
        Client::with_transport(config(), FakeTransport::replying(body))
    }

    fn spam() -> Attributes {
        Attributes::new()
            .permalink("http://www.example.com/posts/1")
            .comment_author("viagra-test-123")
            .comment_author_url("http://ysbaddaden.wordpress.com/")
            .comment_author_email("julien@example.com")
            .comment_content("this is a normal comment")
    }

    #[test]
    fn is_spam_targets_key_host_and_comment_check() {
        let client = client("true");
        assert!(client.is_spam(&spam(), None).unwrap());

        let sent = client.transport().sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].host, "123456789.rest.akismet.com");
        assert_eq!(sent[0].port, 80);
        assert_eq!(sent[0].path, "/1.1/comment-check");
        assert_eq!(sent[0].header("Content-Type"), Some(CONTENT_TYPE));
        assert_eq!(sent[0].header("User-Agent"), Some(USER_AGENT));
    }

    #[test]
    fn is_spam_and_is_ham_follow_body_only() {
        assert!(!client("false").is_spam(&spam(), None).unwrap());
        assert!(client("false").is_ham(&spam(), None).unwrap());
        assert!(!client("true").is_ham(&spam(), None).unwrap());

        // unexpected bodies are neither
        assert!(!client("invalid").is_spam(&spam(), None).unwrap());
        assert!(!client("invalid").is_ham(&spam(), None).unwrap());
    }

    #[test]
    fn missing_key_fails_before_any_io() {
        let mut client = client("true");
        client.config_mut().clear_key();

        let err = client.is_spam(&spam(), None).unwrap_err();
        assert!(matches!(err, AkismetError::MissingKey));
        let err = client.submit_spam(&spam()).unwrap_err();
        assert!(matches!(err, AkismetError::MissingKey));
        let err = client.submit_ham(&spam()).unwrap_err();
        assert!(matches!(err, AkismetError::MissingKey));
        assert!(client.transport().sent().is_empty());

        client.config_mut().set_key("123456789");
        assert!(client.is_spam(&spam(), None).unwrap());
        assert_eq!(client.transport().sent().len(), 1);
    }

    #[test]
    fn validate_key_needs_no_configured_key() {
        let mut client = client("valid");
        client.config_mut().clear_key();

        assert!(client.validate_key("123456789").unwrap());
        let sent = client.transport().sent();
        assert_eq!(sent[0].host, "rest.akismet.com");
        assert_eq!(sent[0].path, "/1.1/verify-key");
        assert_eq!(
            sent[0].body,
            "key=123456789&blog=http%3A%2F%2Fwww.example.com%2F"
        );

        assert!(!Client::with_transport(config(), FakeTransport::replying("invalid"))
            .validate_key("abc123")
            .unwrap());
    }

    #[test]
    fn submit_returns_raw_body() {
        let client = client("Thanks for making the web a better place.");
        assert_eq!(
            client.submit_spam(&spam()).unwrap(),
            "Thanks for making the web a better place."
        );
        assert_eq!(
            client.submit_ham(&spam()).unwrap(),
            "Thanks for making the web a better place."
        );
        let paths: Vec<_> = client.transport().sent().into_iter().map(|r| r.path).collect();
        assert_eq!(paths, vec!["/1.1/submit-spam", "/1.1/submit-ham"]);
    }

    #[test]
    fn transport_error_propagates() {
        let client = Client::with_transport(config(), FakeTransport::failing());
        let err = client.is_spam(&spam(), None).unwrap_err();
        assert!(matches!(err, AkismetError::Transport(_)));
        assert_eq!(err.to_string(), "connection refused");
    }

    #[test]
    fn callers_attributes_are_left_untouched() {
        let client = client("true");
        let attrs = spam();
        let req = RequestInfo::new("127.0.0.1").with_header("User-Agent", "X");
        client.is_spam(&attrs, Some(&req)).unwrap();
        assert_eq!(attrs, spam());
    }

    #[test]
    fn source_request_fields_reach_the_body() {
        let client = client("false");
        let req = RequestInfo::new("127.0.0.1")
            .with_header("User-Agent", "X")
            .with_header("Referer", "http://example.com/posts");
        let attrs = spam().user_ip("10.1.1.1");
        client.is_spam(&attrs, Some(&req)).unwrap();

        let body = Attributes::decode(&client.transport().sent()[0].body);
        assert_eq!(body.get("user_ip"), Some("127.0.0.1"));
        assert_eq!(body.get("user_agent"), Some("X"));
        assert_eq!(body.get("referrer"), Some("http://example.com/posts"));
        assert_eq!(body.get("comment_type"), Some("comment"));
        assert_eq!(body.get("HTTP_CONNECTION"), Some(""));
    }

    #[test]
    fn build_request_without_transport() {
        let client = Client::with_transport(config(), ());
        let req = client
            .build_request(Command::SubmitHam, &Attributes::from([("comment_content", "hi")]), None)
            .unwrap();
        assert_eq!(req.url(), "http://123456789.rest.akismet.com/1.1/submit-ham");
        assert_eq!(
            req.body,
            "comment_content=hi&blog=http%3A%2F%2Fwww.example.com%2F&comment_type=comment"
        );
    }

    #[test]
    fn parse_helpers_compare_body_verbatim() {
        assert!(parse_verify_key(&HttpResponse::ok("valid")));
        assert!(!parse_verify_key(&HttpResponse::ok("valid\n")));
        assert!(parse_is_spam(&HttpResponse::ok("true")));
        assert!(parse_is_ham(&HttpResponse::ok("false")));
        assert!(!parse_is_ham(&HttpResponse::ok("true")));
    }

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn captured_logs(client: &Client<FakeTransport>) -> String {
        let capture = Capture::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            client.is_spam(&spam(), None).unwrap();
        });
        let bytes = capture.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn logs_command_and_body_when_enabled() {
        let mut client = client("true");
        client.config_mut().set_log_requests(true);
        let logs = captured_logs(&client);
        assert!(logs.contains("akismet request"));
        assert!(logs.contains("command=comment-check"));
        assert!(logs.contains("comment_author=viagra-test-123"));
    }

    #[test]
    fn logs_nothing_by_default() {
        let client = client("true");
        assert!(!captured_logs(&client).contains("akismet request"));
    }
}

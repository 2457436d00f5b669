use std::sync::Arc;

use axum::{
    extract::State,
    http::HeaderMap,
    routing::post,
    Form, Router,
};
use serde::Deserialize;
use tokio::net::TcpListener;

pub const ACK: &str = "Thanks for making the web a better place.";

/// Author name the real service always flags as spam.
pub const SPAM_AUTHOR: &str = "viagra-test-123";

#[derive(Deserialize)]
pub struct VerifyKey {
    #[serde(default)]
    pub key: String,
}

#[derive(Deserialize)]
pub struct Comment {
    pub comment_author: Option<String>,
}

/// The key the mock accepts and the API host it answers for.
#[derive(Clone, Debug)]
pub struct Service {
    pub key: String,
    pub host: String,
}

pub type Shared = Arc<Service>;

pub fn app(key: &str, host: &str) -> Router {
    let service: Shared = Arc::new(Service {
        key: key.to_string(),
        host: host.to_string(),
    });
    Router::new()
        .route("/1.1/verify-key", post(verify_key))
        .route("/1.1/comment-check", post(comment_check))
        .route("/1.1/submit-spam", post(submit))
        .route("/1.1/submit-ham", post(submit))
        .with_state(service)
}

pub async fn run(listener: TcpListener, key: &str, host: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app(key, host)).await
}

/// API key carried as the DNS label in front of `api_host`.
///
/// `X-Forwarded-Host` wins over `Host` so tests can connect to a loopback
/// address while still presenting `{key}.{host}`.
pub fn key_from_headers(headers: &HeaderMap, api_host: &str) -> Option<String> {
    let host = headers
        .get("x-forwarded-host")
        .or_else(|| headers.get("host"))?
        .to_str()
        .ok()?;
    let host = host.split(':').next()?;
    let key = host.strip_suffix(api_host)?.strip_suffix('.')?;
    if key.is_empty() || key.contains('.') {
        return None;
    }
    Some(key.to_string())
}

impl Service {
    fn authorized(&self, headers: &HeaderMap) -> bool {
        key_from_headers(headers, &self.host).as_deref() == Some(self.key.as_str())
    }
}

async fn verify_key(State(service): State<Shared>, Form(input): Form<VerifyKey>) -> &'static str {
    if input.key == service.key {
        "valid"
    } else {
        "invalid"
    }
}

async fn comment_check(
    State(service): State<Shared>,
    headers: HeaderMap,
    Form(input): Form<Comment>,
) -> &'static str {
    if !service.authorized(&headers) {
        return "invalid";
    }
    if input.comment_author.as_deref() == Some(SPAM_AUTHOR) {
        "true"
    } else {
        "false"
    }
}

async fn submit(State(service): State<Shared>, headers: HeaderMap) -> &'static str {
    if !service.authorized(&headers) {
        return "invalid";
    }
    ACK
}

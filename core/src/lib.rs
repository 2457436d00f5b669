//! Blocking client for Akismet-compatible spam-detection APIs.
//!
//! # Overview
//! Configure an API key and blog URL once, then classify comments
//! (`is_spam` / `is_ham`), report mistakes (`submit_spam` / `submit_ham`)
//! or check a key (`validate_key`). Requests can be enriched with the
//! client IP, user agent, referrer and selected headers of the inbound web
//! request that carried the comment.
//!
//! ```no_run
//! use akismet_core::{Attributes, Client, Config, RequestInfo};
//!
//! let client = Client::new(Config::with_key("123456789", "http://www.example.com/"));
//! let comment = Attributes::new()
//!     .permalink("http://www.example.com/posts/1")
//!     .comment_author("viagra-test-123")
//!     .comment_content("buy now");
//! let request = RequestInfo::new("127.0.0.1").with_header("User-Agent", "Mozilla/5.0");
//! let spam = client.is_spam(&comment, Some(&request))?;
//! # Ok::<(), akismet_core::AkismetError>(())
//! ```
//!
//! # Design
//! - `Client` holds an explicit `Config`; there is no global state.
//! - Request building is pure (`Client::build_request`); I/O goes through
//!   the `Transport` trait, with `UreqTransport` as the default.
//! - Attributes are an ordered string map, so the encoded body is
//!   deterministic.

pub mod attributes;
pub mod client;
pub mod command;
pub mod config;
pub mod error;
pub mod http;
pub mod source;
pub mod transport;

pub use attributes::{merge, Attributes};
pub use client::{parse_is_ham, parse_is_spam, parse_verify_key, Client};
pub use command::{Command, API_VERSION};
pub use config::{Config, ExtraHeaders, DEFAULT_EXTRA_HEADERS, DEFAULT_HOST};
pub use error::AkismetError;
pub use http::{HttpRequest, HttpResponse};
pub use source::{RequestInfo, SourceRequest};
pub use transport::{Transport, UreqTransport};

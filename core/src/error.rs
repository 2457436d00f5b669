//! Error types for the Akismet client.
//!
//! # Design
//! `MissingKey` is the one precondition the client validates itself: it is
//! raised before any network I/O when an authenticated command runs without
//! a configured API key. Transport failures are carried through untouched
//! (`#[error(transparent)]`) so callers see the transport's own message and
//! source chain. Unexpected response bodies are not errors at all; the
//! boolean operations simply evaluate to `false`.

/// Errors returned by `Client` operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AkismetError {
    /// An authenticated command was dispatched with no API key configured.
    #[error("missing API key: configure a key before calling authenticated commands")]
    MissingKey,

    /// The HTTP exchange itself failed (DNS, connect, I/O, timeout).
    #[error(transparent)]
    Transport(Box<dyn std::error::Error + Send + Sync>),

    /// A command token that is not part of the wire protocol.
    #[error("unknown command: '{0}'")]
    UnknownCommand(String),
}

impl AkismetError {
    pub(crate) fn transport<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        AkismetError::Transport(Box::new(err))
    }
}

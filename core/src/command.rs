//! The fixed set of commands understood by the service.

use std::fmt;
use std::str::FromStr;

use crate::error::AkismetError;

/// Wire API version embedded in every request path and in the user agent.
pub const API_VERSION: &str = "1.1";

/// One of the four operation tokens sent to the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    VerifyKey,
    CommentCheck,
    SubmitSpam,
    SubmitHam,
}

impl Command {
    pub fn as_str(self) -> &'static str {
        match self {
            Command::VerifyKey => "verify-key",
            Command::CommentCheck => "comment-check",
            Command::SubmitSpam => "submit-spam",
            Command::SubmitHam => "submit-ham",
        }
    }

    /// Whether the request goes to the key-prefixed host. Only these
    /// commands get `comment_type` defaulted and source-request enrichment.
    pub fn is_authenticated(self) -> bool {
        !matches!(self, Command::VerifyKey)
    }

    pub fn path(self) -> String {
        format!("/{API_VERSION}/{}", self.as_str())
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Command {
    type Err = AkismetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "verify-key" => Ok(Command::VerifyKey),
            "comment-check" => Ok(Command::CommentCheck),
            "submit-spam" => Ok(Command::SubmitSpam),
            "submit-ham" => Ok(Command::SubmitHam),
            other => Err(AkismetError::UnknownCommand(other.to_string())),
        }
    }
}

//! XBL3.0 authorization

use std::fmt;

use reqwest::header::AUTHORIZATION;

use crate::dispatch::Credential;
use crate::error::XblError;

/// Caller-supplied Xbox Live credential.
///
/// Tokens are never acquired nor refreshed here; the value is read once per
/// call and left untouched.
#[derive(Clone, PartialEq, Eq)]
pub enum Authorization {
    /// User hash and XSTS token from the caller's sign-in flow.
    Token { user_hash: String, xsts_token: String },
    /// A complete `Authorization` header value.
    Header(String),
}

impl Authorization {
    pub fn from_token(user_hash: impl Into<String>, xsts_token: impl Into<String>) -> Self {
        Self::Token {
            user_hash: user_hash.into(),
            xsts_token: xsts_token.into(),
        }
    }

    /// Concat user hash and XSTS token into `XBL3.0 x=<hash>;<token>`.
    #[must_use]
    pub fn concat(user_hash: &str, xsts_token: &str) -> String {
        format!("XBL3.0 x={user_hash};{xsts_token}")
    }

    #[must_use]
    pub fn header_value(&self) -> String {
        match self {
            Self::Token {
                user_hash,
                xsts_token,
            } => Self::concat(user_hash, xsts_token),
            Self::Header(value) => value.clone(),
        }
    }

    pub(crate) fn credential(&self) -> Result<Credential, XblError> {
        Credential::new(AUTHORIZATION, &self.header_value())
    }
}

impl From<String> for Authorization {
    fn from(value: String) -> Self {
        Self::Header(value)
    }
}

impl From<&str> for Authorization {
    fn from(value: &str) -> Self {
        Self::Header(value.to_string())
    }
}

impl fmt::Debug for Authorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token { user_hash, .. } => f
                .debug_struct("Token")
                .field("user_hash", user_hash)
                .field("xsts_token", &"<redacted>")
                .finish(),
            Self::Header(_) => f.debug_tuple("Header").field(&"<redacted>").finish(),
        }
    }
}

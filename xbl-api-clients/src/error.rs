//! Shared client error types
//!
//! Classified error enum used by both facades (Xbox Live, XboxReplay), plus the
//! response helpers that produce it.

use reqwest::StatusCode;
use thiserror::Error;
use tracing::warn;

/// Maximum response body size for upstream HTTP calls (16 MB).
pub const MAX_RESPONSE_SIZE: usize = 16 * 1024 * 1024;

/// Coarse error category, one per reason code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidInput,
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    TooManyRequests,
    Internal,
}

impl ErrorKind {
    /// Stable reason code exposed to callers.
    #[must_use]
    pub const fn reason(self) -> &'static str {
        match self {
            Self::InvalidInput => "INVALID_INPUT",
            Self::BadRequest => "BAD_REQUEST",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::TooManyRequests => "TOO_MANY_REQUESTS",
            Self::Internal => "INTERNAL_ERROR",
        }
    }

    #[must_use]
    pub const fn status_code(self) -> u16 {
        match self {
            Self::InvalidInput | Self::BadRequest => 400,
            Self::Unauthorized => 401,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::TooManyRequests => 429,
            Self::Internal => 500,
        }
    }
}

/// Error type for all client operations.
///
/// Every variant maps onto one [`ErrorKind`]; match on the variant rather than
/// inspecting the message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum XblError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Bad request for {url}")]
    BadRequest { url: String },

    #[error("Unauthorized for {url}")]
    Unauthorized { url: String },

    #[error("Forbidden for {url}")]
    Forbidden { url: String },

    #[error("Not found: {url}")]
    NotFound { url: String },

    #[error("Too many requests for {url}")]
    TooManyRequests { url: String },

    #[error("Invalid response status code for \"{url}\", got \"{status}\"")]
    UnexpectedStatus { status: u16, url: String },

    /// Transport failure; the message is the underlying one, untouched.
    #[error("{0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    /// The upstream answered 2xx but the expected structure was missing.
    #[error("Missing data: {0}")]
    MissingData(String),

    #[error("Response too large ({size} bytes, max {MAX_RESPONSE_SIZE})")]
    ResponseTooLarge { size: u64 },
}

impl XblError {
    /// Classify a non-success upstream status.
    #[must_use]
    pub fn from_status(status: StatusCode, url: impl Into<String>) -> Self {
        let url = url.into();
        match status {
            StatusCode::BAD_REQUEST => Self::BadRequest { url },
            StatusCode::UNAUTHORIZED => Self::Unauthorized { url },
            StatusCode::FORBIDDEN => Self::Forbidden { url },
            StatusCode::NOT_FOUND => Self::NotFound { url },
            StatusCode::TOO_MANY_REQUESTS => Self::TooManyRequests { url },
            other => Self::UnexpectedStatus {
                status: other.as_u16(),
                url,
            },
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::BadRequest { .. } => ErrorKind::BadRequest,
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::Forbidden { .. } => ErrorKind::Forbidden,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::TooManyRequests { .. } => ErrorKind::TooManyRequests,
            Self::UnexpectedStatus { .. }
            | Self::Network(_)
            | Self::Parse(_)
            | Self::MissingData(_)
            | Self::ResponseTooLarge { .. } => ErrorKind::Internal,
        }
    }

    #[must_use]
    pub const fn status_code(&self) -> u16 {
        self.kind().status_code()
    }

    #[must_use]
    pub const fn reason(&self) -> &'static str {
        self.kind().reason()
    }

    /// Status the upstream actually answered with, when the error came from one.
    #[must_use]
    pub const fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::BadRequest { .. } => Some(400),
            Self::Unauthorized { .. } => Some(401),
            Self::Forbidden { .. } => Some(403),
            Self::NotFound { .. } => Some(404),
            Self::TooManyRequests { .. } => Some(429),
            Self::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Check HTTP response status before processing body.
pub fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, XblError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let err = XblError::from_status(status, resp.url().as_str());
    warn!(
        status = status.as_u16(),
        reason = err.reason(),
        url = %resp.url(),
        "upstream request failed"
    );
    Err(err)
}

/// Read a response body with size limit and deserialize as JSON.
///
/// Checks `Content-Length` hint first (if available), then enforces the
/// limit on the actual body bytes. An empty body deserializes as JSON `null`.
pub async fn json_with_limit<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, XblError> {
    if let Some(cl) = response.content_length() {
        if cl > MAX_RESPONSE_SIZE as u64 {
            return Err(XblError::ResponseTooLarge { size: cl });
        }
    }
    let bytes = response.bytes().await?;
    if bytes.len() > MAX_RESPONSE_SIZE {
        return Err(XblError::ResponseTooLarge {
            size: bytes.len() as u64,
        });
    }
    let body: &[u8] = if bytes.is_empty() { b"null" } else { &bytes };
    serde_json::from_slice(body).map_err(Into::into)
}

impl From<reqwest::Error> for XblError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Parse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for XblError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<reqwest::header::InvalidHeaderValue> for XblError {
    fn from(err: reqwest::header::InvalidHeaderValue) -> Self {
        Self::InvalidInput(format!("invalid header value: {err}"))
    }
}

impl From<reqwest::header::InvalidHeaderName> for XblError {
    fn from(err: reqwest::header::InvalidHeaderName) -> Self {
        Self::InvalidInput(format!("invalid header name: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification_table() {
        let cases = [
            (StatusCode::BAD_REQUEST, ErrorKind::BadRequest, 400),
            (StatusCode::UNAUTHORIZED, ErrorKind::Unauthorized, 401),
            (StatusCode::FORBIDDEN, ErrorKind::Forbidden, 403),
            (StatusCode::NOT_FOUND, ErrorKind::NotFound, 404),
            (StatusCode::TOO_MANY_REQUESTS, ErrorKind::TooManyRequests, 429),
            (StatusCode::IM_A_TEAPOT, ErrorKind::Internal, 500),
            (StatusCode::BAD_GATEWAY, ErrorKind::Internal, 500),
            (StatusCode::MOVED_PERMANENTLY, ErrorKind::Internal, 500),
        ];

        for (status, kind, code) in cases {
            let err = XblError::from_status(status, "https://profile.xboxlive.com/users");
            assert_eq!(err.kind(), kind, "status {status}");
            assert_eq!(err.status_code(), code, "status {status}");
            assert_eq!(err.upstream_status(), Some(status.as_u16()));
        }
    }

    #[test]
    fn test_unexpected_status_keeps_upstream_code() {
        let err = XblError::from_status(StatusCode::IM_A_TEAPOT, "https://avty.xboxlive.com/x");
        assert_eq!(
            err,
            XblError::UnexpectedStatus {
                status: 418,
                url: "https://avty.xboxlive.com/x".to_string()
            }
        );
        assert_eq!(err.reason(), "INTERNAL_ERROR");
        assert_eq!(
            err.to_string(),
            "Invalid response status code for \"https://avty.xboxlive.com/x\", got \"418\""
        );
    }

    #[test]
    fn test_reason_codes() {
        assert_eq!(XblError::InvalidInput("x".into()).reason(), "INVALID_INPUT");
        assert_eq!(XblError::MissingData("x".into()).reason(), "INTERNAL_ERROR");
        assert_eq!(XblError::Network("x".into()).reason(), "INTERNAL_ERROR");
        assert_eq!(
            XblError::TooManyRequests { url: String::new() }.reason(),
            "TOO_MANY_REQUESTS"
        );
    }

    #[test]
    fn test_network_message_is_untouched() {
        let err = XblError::Network("dns error: failed to lookup address".to_string());
        assert_eq!(err.to_string(), "dns error: failed to lookup address");
        assert_eq!(err.upstream_status(), None);
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: XblError = json_err.into();
        assert!(matches!(err, XblError::Parse(_)));
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_error_display_response_too_large() {
        let err = XblError::ResponseTooLarge { size: 20_000_000 };
        let msg = err.to_string();
        assert!(msg.contains("20000000"));
        assert!(msg.contains(&MAX_RESPONSE_SIZE.to_string()));
    }
}

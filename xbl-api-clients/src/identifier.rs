//! Player identifier classification
//!
//! Decides whether a caller-supplied player reference is a XUID or a gamertag.
//! Callers may pre-tag the reference as `gt(<name>)` or `xuid(<id>)`; a tag
//! always wins over the configured [`XuidPolicy`].

use std::fmt;
use std::sync::LazyLock;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::XblError;

static RE_WRAPPED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(gt|xuid)\(([^()[:cntrl:]]*)\)$")
        .expect("invalid wrapped identifier regex")
});

// A reference that opens a tag but does not fit the wrapped form is malformed.
static RE_TAG_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(gt|xuid)\(").expect("invalid tag prefix regex"));

/// Everything except RFC 3986 unreserved characters and `!~*'()`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

const UNMATCHED: &str = "Could not match player identifier";

/// Percent-encode a value for use inside a single URL path segment.
#[must_use]
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

fn is_all_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

/// Rule deciding whether an untagged reference is a XUID.
///
/// Numeric gamertags exist, so the rule is a compatibility decision left to
/// the caller. `MinDigits(16)` reproduces the "longer than 15 digits" rule and
/// `ExactDigits(16)` the "exactly 16 digits" one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "digits")]
pub enum XuidPolicy {
    /// Any non-empty all-digit string.
    #[default]
    AllDigits,
    /// All digits and at least this many of them.
    MinDigits(usize),
    /// All digits and exactly this many of them.
    ExactDigits(usize),
}

impl XuidPolicy {
    #[must_use]
    pub fn matches(self, candidate: &str) -> bool {
        if !is_all_digits(candidate) {
            return false;
        }
        match self {
            Self::AllDigits => true,
            Self::MinDigits(min) => candidate.len() >= min,
            Self::ExactDigits(len) => candidate.len() == len,
        }
    }
}

/// A classified player reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PlayerIdentifier {
    Xuid(String),
    Gamertag(String),
}

impl PlayerIdentifier {
    /// Classify a raw player reference.
    ///
    /// Fails with [`XblError::InvalidInput`] when the reference is blank, when
    /// a wrapped form has an empty payload, or when `xuid(...)` wraps anything
    /// but digits.
    pub fn classify(input: &str, policy: XuidPolicy) -> Result<Self, XblError> {
        let trimmed = input.trim();

        if let Some(caps) = RE_WRAPPED.captures(trimmed) {
            let tag = caps.get(1).map_or("", |m| m.as_str());
            let payload = caps.get(2).map_or("", |m| m.as_str()).trim();

            if payload.is_empty() {
                return Err(XblError::InvalidInput(UNMATCHED.to_string()));
            }

            return if tag.eq_ignore_ascii_case("xuid") {
                if is_all_digits(payload) {
                    Ok(Self::Xuid(payload.to_string()))
                } else {
                    Err(XblError::InvalidInput(UNMATCHED.to_string()))
                }
            } else {
                Ok(Self::Gamertag(payload.to_string()))
            };
        }

        if trimmed.is_empty() || RE_TAG_PREFIX.is_match(trimmed) {
            return Err(XblError::InvalidInput(UNMATCHED.to_string()));
        }

        if policy.matches(trimmed) {
            Ok(Self::Xuid(trimmed.to_string()))
        } else {
            Ok(Self::Gamertag(trimmed.to_string()))
        }
    }

    /// Bare value without the tag.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Xuid(v) | Self::Gamertag(v) => v,
        }
    }

    #[must_use]
    pub fn as_xuid(&self) -> Option<&str> {
        match self {
            Self::Xuid(v) => Some(v),
            Self::Gamertag(_) => None,
        }
    }

    /// Path segment addressing this player on Xbox Live services,
    /// e.g. `xuid(2584878536129841)` or `gt(Major%20Nelson)`.
    #[must_use]
    pub fn path_segment(&self) -> String {
        match self {
            Self::Xuid(xuid) => format!("xuid({xuid})"),
            Self::Gamertag(gamertag) => format!("gt({})", encode_component(gamertag)),
        }
    }
}

impl fmt::Display for PlayerIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Xuid(v) => write!(f, "xuid({v})"),
            Self::Gamertag(v) => write!(f, "gt({v})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(input: &str) -> Result<PlayerIdentifier, XblError> {
        PlayerIdentifier::classify(input, XuidPolicy::AllDigits)
    }

    #[test]
    fn test_numeric_is_xuid() {
        assert_eq!(
            classify("2584878536129841").unwrap(),
            PlayerIdentifier::Xuid("2584878536129841".to_string())
        );
        assert_eq!(
            classify("  2535465515082324 ").unwrap(),
            PlayerIdentifier::Xuid("2535465515082324".to_string())
        );
    }

    #[test]
    fn test_non_numeric_is_gamertag() {
        for input in ["Major Nelson", "Zeny IC", "x1", "123abc", "12 34", "-123"] {
            assert!(
                matches!(classify(input).unwrap(), PlayerIdentifier::Gamertag(_)),
                "{input}"
            );
        }
    }

    #[test]
    fn test_blank_input_rejected() {
        for input in ["", "   ", "\t\n"] {
            let err = classify(input).unwrap_err();
            assert!(matches!(err, XblError::InvalidInput(_)), "{input:?}");
        }
    }

    #[test]
    fn test_wrapped_forms() {
        assert_eq!(
            classify("gt(Major Nelson)").unwrap(),
            PlayerIdentifier::Gamertag("Major Nelson".to_string())
        );
        assert_eq!(
            classify("XUID(2584878536129841)").unwrap(),
            PlayerIdentifier::Xuid("2584878536129841".to_string())
        );
        // The tag overrides the digit heuristic.
        assert_eq!(
            classify("gt(1234567890)").unwrap(),
            PlayerIdentifier::Gamertag("1234567890".to_string())
        );
        assert_eq!(
            classify("gt(  padded  )").unwrap(),
            PlayerIdentifier::Gamertag("padded".to_string())
        );
    }

    #[test]
    fn test_wrapped_inconsistent_or_empty_rejected() {
        for input in [
            "xuid(Major Nelson)",
            "xuid(12a4)",
            "xuid()",
            "gt(   )",
            "xuid( )",
            "gt(a)b(c)",
            "gt(Major\nNelson)",
            "xuid(123",
        ] {
            let err = classify(input).unwrap_err();
            assert_eq!(
                err,
                XblError::InvalidInput("Could not match player identifier".to_string()),
                "{input}"
            );
        }
    }

    #[test]
    fn test_policy_variants() {
        let short = "12345";
        let xuid = "2584878536129841";

        assert!(XuidPolicy::AllDigits.matches(short));
        assert!(!XuidPolicy::MinDigits(16).matches(short));
        assert!(XuidPolicy::MinDigits(16).matches(xuid));
        assert!(XuidPolicy::MinDigits(16).matches("25848785361298410"));
        assert!(XuidPolicy::ExactDigits(16).matches(xuid));
        assert!(!XuidPolicy::ExactDigits(16).matches("25848785361298410"));
        assert!(!XuidPolicy::AllDigits.matches(""));
        assert!(!XuidPolicy::AllDigits.matches("12.5"));

        assert_eq!(
            PlayerIdentifier::classify(short, XuidPolicy::MinDigits(16)).unwrap(),
            PlayerIdentifier::Gamertag(short.to_string())
        );
    }

    #[test]
    fn test_path_segment_encoding() {
        assert_eq!(
            PlayerIdentifier::Gamertag("Major Nelson".to_string()).path_segment(),
            "gt(Major%20Nelson)"
        );
        assert_eq!(
            PlayerIdentifier::Gamertag("a/b?c#d".to_string()).path_segment(),
            "gt(a%2Fb%3Fc%23d)"
        );
        assert_eq!(
            PlayerIdentifier::Xuid("2584878536129841".to_string()).path_segment(),
            "xuid(2584878536129841)"
        );
    }

    #[test]
    fn test_policy_deserialize() {
        let policy: XuidPolicy =
            serde_json::from_str(r#"{"kind":"min_digits","digits":16}"#).unwrap();
        assert_eq!(policy, XuidPolicy::MinDigits(16));
        let policy: XuidPolicy = serde_json::from_str(r#"{"kind":"all_digits"}"#).unwrap();
        assert_eq!(policy, XuidPolicy::AllDigits);
    }
}

//! Shared types used across the LeakCheck client.
//!
//! This module defines the newtypes and enums that give the request path
//! type safety: the secret [`ApiKey`], the per-variant [`KeyPolicy`] and the
//! server-side search [`LookupType`].

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use zeroize::Zeroizing;

/// Length of a LeakCheck API key.
pub const API_KEY_LEN: usize = 40;

/// Newtype for the LeakCheck API key.
///
/// The key is wiped from memory when dropped and is never printed by
/// `Debug`, so it can travel through `tracing` fields without leaking.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(Zeroizing<String>);

impl ApiKey {
    /// Create a new `ApiKey` from a string, exactly as given.
    ///
    /// # Errors
    /// Returns error if the key is empty or has surrounding whitespace.
    pub fn new(key: impl Into<String>) -> ConfigResult<Self> {
        let key = Zeroizing::new(key.into());
        if key.is_empty() {
            return Err(ConfigError::InvalidKey {
                reason: "key must not be empty".to_string(),
            });
        }
        if key.trim() != key.as_str() {
            return Err(ConfigError::InvalidKey {
                reason: "key must not start or end with whitespace".to_string(),
            });
        }
        Ok(Self(key))
    }

    /// Get the inner string value.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Number of characters in the key.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    /// Always false; an `ApiKey` cannot be constructed empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// A display-safe form of the key (`abcd…wxyz`).
    #[must_use]
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 8 {
            return "*".repeat(chars.len());
        }
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}…{tail}")
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

/// How an API variant constrains the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPolicy {
    /// Key must be exactly this many characters (legacy API)
    Exact(usize),
    /// Key must be at least this many characters (v2 API)
    AtLeast(usize),
    /// No key is used (public API)
    NotRequired,
}

impl KeyPolicy {
    /// Whether calls under this policy need a key at all.
    #[must_use]
    pub fn requires_key(self) -> bool {
        !matches!(self, Self::NotRequired)
    }

    /// Validate a key against this policy.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidKey`] if the length constraint is violated.
    pub fn check(self, key: &ApiKey) -> ConfigResult<()> {
        match self {
            Self::Exact(len) if key.len() != len => Err(ConfigError::InvalidKey {
                reason: format!(
                    "it must be {len} characters long, got {} characters",
                    key.len()
                ),
            }),
            Self::AtLeast(min) if key.len() < min => Err(ConfigError::InvalidKey {
                reason: format!(
                    "it must be at least {min} characters long, got {} characters",
                    key.len()
                ),
            }),
            _ => Ok(()),
        }
    }
}

/// Search type understood by the lookup endpoints.
///
/// `Auto` lets the server detect the type from the query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupType {
    /// Server-side detection
    #[default]
    Auto,
    /// Email address
    Email,
    /// Domain name
    Domain,
    /// Free-text keyword
    Keyword,
    /// Username
    Username,
    /// Phone number
    Phone,
    /// Email hash (first 24 chars of SHA256)
    Hash,
    /// Password hash
    Phash,
    /// Origin (site) of the leak
    Origin,
    /// Password
    Password,
    /// Login (email local part)
    Login,
    /// Mass lookup
    Mass,
    /// Email:password pairs
    PassEmail,
    /// Username:password pairs
    PassUsername,
    /// Phone:password pairs
    PassPhone,
}

impl LookupType {
    /// All known lookup types.
    pub const ALL: [Self; 15] = [
        Self::Auto,
        Self::Email,
        Self::Domain,
        Self::Keyword,
        Self::Username,
        Self::Phone,
        Self::Hash,
        Self::Phash,
        Self::Origin,
        Self::Password,
        Self::Login,
        Self::Mass,
        Self::PassEmail,
        Self::PassUsername,
        Self::PassPhone,
    ];

    /// Wire representation sent as the `type` parameter.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Email => "email",
            Self::Domain => "domain",
            Self::Keyword => "keyword",
            Self::Username => "username",
            Self::Phone => "phone",
            Self::Hash => "hash",
            Self::Phash => "phash",
            Self::Origin => "origin",
            Self::Password => "password",
            Self::Login => "login",
            Self::Mass => "mass",
            Self::PassEmail => "pass_email",
            Self::PassUsername => "pass_username",
            Self::PassPhone => "pass_phone",
        }
    }
}

impl fmt::Display for LookupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a lookup type string is not recognised.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown lookup type '{0}'")]
pub struct ParseLookupTypeError(String);

impl FromStr for LookupType {
    type Err = ParseLookupTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| ParseLookupTypeError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_of_len(len: usize) -> ApiKey {
        ApiKey::new("a".repeat(len)).expect("non-empty key")
    }

    #[test]
    fn test_api_key_rejects_empty_and_padded() {
        assert_eq!(ApiKey::new("abc").expect("valid key").expose(), "abc");

        for bad in ["", "   ", "  abc", "abc\n"] {
            assert!(
                matches!(ApiKey::new(bad), Err(ConfigError::InvalidKey { .. })),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn test_api_key_debug_is_redacted() {
        let key = ApiKey::new("0123456789abcdef0123456789abcdef01234567").expect("valid key");
        let debug = format!("{key:?}");
        assert!(!debug.contains("0123"));
        assert_eq!(debug, "ApiKey(<redacted>)");
    }

    #[test]
    fn test_api_key_masked() {
        let key = ApiKey::new("0123456789abcdef0123456789abcdef01234567").expect("valid key");
        assert_eq!(key.masked(), "0123…4567");
        assert_eq!(ApiKey::new("short").expect("valid key").masked(), "*****");
    }

    #[test]
    fn test_exact_policy() {
        let policy = KeyPolicy::Exact(API_KEY_LEN);
        assert!(policy.check(&key_of_len(40)).is_ok());

        for len in [1, 39, 41, 64] {
            let err = policy.check(&key_of_len(len)).expect_err("wrong length");
            assert!(err.to_string().contains("must be 40 characters long"));
        }
    }

    #[test]
    fn test_at_least_policy() {
        let policy = KeyPolicy::AtLeast(API_KEY_LEN);
        assert!(policy.check(&key_of_len(40)).is_ok());
        assert!(policy.check(&key_of_len(64)).is_ok());
        assert!(policy.check(&key_of_len(39)).is_err());
    }

    #[test]
    fn test_not_required_policy() {
        assert!(!KeyPolicy::NotRequired.requires_key());
        assert!(KeyPolicy::NotRequired.check(&key_of_len(3)).is_ok());
        assert!(KeyPolicy::Exact(40).requires_key());
    }

    #[test]
    fn test_lookup_type_round_trip_strings() {
        for kind in LookupType::ALL {
            assert_eq!(kind.as_str().parse::<LookupType>(), Ok(kind));
        }
        assert_eq!("EMAIL".parse::<LookupType>(), Ok(LookupType::Email));
        assert_eq!(LookupType::default(), LookupType::Auto);
    }

    #[test]
    fn test_lookup_type_unknown() {
        let err = "ssn".parse::<LookupType>().expect_err("unknown type");
        assert_eq!(err.to_string(), "unknown lookup type 'ssn'");
    }

    #[test]
    fn test_lookup_type_serde_matches_wire() {
        let json = serde_json::to_string(&LookupType::PassEmail).expect("serialize");
        assert_eq!(json, "\"pass_email\"");
    }
}

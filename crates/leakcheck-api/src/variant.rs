//! API generations and the endpoints they expose.
//!
//! The service has been reachable through several API generations over the
//! years. Rather than one client type per generation, an [`ApiVariant`]
//! answers every question the request and response layers need: how the key
//! is checked and sent, which endpoints exist, whether the HTTP status is
//! checked strictly, and under which envelope field the results live.

use leakcheck_core::{KeyPolicy, API_KEY_LEN};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Header carrying the key for the v2 API.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Query parameter carrying the key for the legacy API.
pub const API_KEY_PARAM: &str = "key";

/// Supported API generations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ApiVariant {
    /// Current API: `/api/v2/query/{query}` with header authentication
    #[default]
    V2,
    /// Legacy API: `/api` and its sub-endpoints with the key in the query string
    Legacy,
    /// Unauthenticated public API: `/api/public?check=`
    Public,
}

/// How the key travels with a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPlacement {
    /// `?key=` query parameter
    QueryParam(&'static str),
    /// Request header
    Header(&'static str),
    /// Key is never sent
    Omitted,
}

impl ApiVariant {
    /// All variants, in CLI listing order.
    pub const ALL: [Self; 3] = [Self::V2, Self::Legacy, Self::Public];

    /// Short name used on the command line and in messages.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::V2 => "v2",
            Self::Legacy => "legacy",
            Self::Public => "public",
        }
    }

    /// Key length constraint for this variant.
    #[must_use]
    pub fn key_policy(self) -> KeyPolicy {
        match self {
            Self::V2 => KeyPolicy::AtLeast(API_KEY_LEN),
            Self::Legacy => KeyPolicy::Exact(API_KEY_LEN),
            Self::Public => KeyPolicy::NotRequired,
        }
    }

    /// Where the key is placed on outgoing requests.
    #[must_use]
    pub fn key_placement(self) -> KeyPlacement {
        match self {
            Self::V2 => KeyPlacement::Header(API_KEY_HEADER),
            Self::Legacy => KeyPlacement::QueryParam(API_KEY_PARAM),
            Self::Public => KeyPlacement::Omitted,
        }
    }

    /// The v2 client cannot be built without a key.
    #[must_use]
    pub fn requires_key_at_construction(self) -> bool {
        matches!(self, Self::V2)
    }

    /// Whether `set_key` is allowed after construction.
    #[must_use]
    pub fn key_is_mutable(self) -> bool {
        !matches!(self, Self::V2)
    }

    /// Legacy responses must be HTTP 200 before the body is looked at.
    #[must_use]
    pub fn strict_status(self) -> bool {
        matches!(self, Self::Legacy)
    }

    /// Whether `limit`/`offset` are sent and bounds-checked.
    #[must_use]
    pub fn supports_paging(self) -> bool {
        matches!(self, Self::V2)
    }

    /// Whether the account limits endpoint exists.
    #[must_use]
    pub fn supports_limits(self) -> bool {
        matches!(self, Self::Legacy)
    }

    /// Lookup endpoints reachable through this variant, default first.
    #[must_use]
    pub fn lookup_endpoints(self) -> &'static [Endpoint] {
        match self {
            Self::V2 => &[Endpoint::Query],
            Self::Legacy => &[Endpoint::Extended, Endpoint::Public, Endpoint::BreachCheck],
            Self::Public => &[Endpoint::Public],
        }
    }

    /// Endpoint used by a plain `lookup`.
    #[must_use]
    pub fn default_endpoint(self) -> Endpoint {
        self.lookup_endpoints()[0]
    }

    /// Whether `endpoint` can be used for lookups on this variant.
    #[must_use]
    pub fn supports_endpoint(self, endpoint: Endpoint) -> bool {
        self.lookup_endpoints().contains(&endpoint)
    }
}

impl fmt::Display for ApiVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when an API variant name is not recognised.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown API variant '{0}', expected one of: v2, legacy, public")]
pub struct ParseVariantError(String);

impl FromStr for ApiVariant {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v2" | "modern" => Ok(Self::V2),
            "legacy" | "v1" => Ok(Self::Legacy),
            "public" => Ok(Self::Public),
            _ => Err(ParseVariantError(s.to_string())),
        }
    }
}

/// Endpoint kinds, each with its own result field in the envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Legacy full lookup (`/api`)
    Extended,
    /// Public lookup (`/api/public`)
    Public,
    /// Legacy breach check (`/api/hasbreached`)
    BreachCheck,
    /// v2 query (`/api/v2/query/{query}`)
    Query,
    /// Legacy account limits (`/api?type=limits`)
    Limits,
}

impl Endpoint {
    /// Envelope field holding the payload for this endpoint.
    #[must_use]
    pub fn result_key(self) -> &'static str {
        match self {
            Self::Extended | Self::Query => "result",
            Self::Public => "sources",
            Self::BreachCheck => "breached",
            Self::Limits => "limits",
        }
    }

    /// Short name used on the command line and in messages.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Extended => "extended",
            Self::Public => "public",
            Self::BreachCheck => "breach-check",
            Self::Query => "query",
            Self::Limits => "limits",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_keys() {
        assert_eq!(Endpoint::Extended.result_key(), "result");
        assert_eq!(Endpoint::Query.result_key(), "result");
        assert_eq!(Endpoint::Public.result_key(), "sources");
        assert_eq!(Endpoint::BreachCheck.result_key(), "breached");
        assert_eq!(Endpoint::Limits.result_key(), "limits");
    }

    #[test]
    fn test_default_endpoints() {
        assert_eq!(ApiVariant::V2.default_endpoint(), Endpoint::Query);
        assert_eq!(ApiVariant::Legacy.default_endpoint(), Endpoint::Extended);
        assert_eq!(ApiVariant::Public.default_endpoint(), Endpoint::Public);
    }

    #[test]
    fn test_endpoint_support() {
        assert!(ApiVariant::Legacy.supports_endpoint(Endpoint::BreachCheck));
        assert!(!ApiVariant::V2.supports_endpoint(Endpoint::Extended));
        assert!(!ApiVariant::Public.supports_endpoint(Endpoint::Query));
        for variant in ApiVariant::ALL {
            assert!(!variant.supports_endpoint(Endpoint::Limits));
        }
    }

    #[test]
    fn test_key_handling_per_variant() {
        assert_eq!(ApiVariant::V2.key_policy(), KeyPolicy::AtLeast(40));
        assert_eq!(ApiVariant::Legacy.key_policy(), KeyPolicy::Exact(40));
        assert_eq!(ApiVariant::Public.key_policy(), KeyPolicy::NotRequired);

        assert_eq!(
            ApiVariant::V2.key_placement(),
            KeyPlacement::Header("X-API-Key")
        );
        assert_eq!(
            ApiVariant::Legacy.key_placement(),
            KeyPlacement::QueryParam("key")
        );

        assert!(!ApiVariant::V2.key_is_mutable());
        assert!(ApiVariant::Legacy.key_is_mutable());
        assert!(ApiVariant::V2.requires_key_at_construction());
        assert!(!ApiVariant::Legacy.requires_key_at_construction());
    }

    #[test]
    fn test_variant_parsing() {
        for variant in ApiVariant::ALL {
            assert_eq!(variant.as_str().parse::<ApiVariant>(), Ok(variant));
        }
        assert_eq!("V1".parse::<ApiVariant>(), Ok(ApiVariant::Legacy));
        assert!("v3".parse::<ApiVariant>().is_err());
    }
}

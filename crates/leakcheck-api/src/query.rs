//! Request construction for each API variant.
//!
//! Builders here never touch the network: they validate the caller's input
//! and turn it into a [`PreparedRequest`] that the transport can send as is.

use crate::error::{LeakCheckError, Result};
use crate::variant::{ApiVariant, Endpoint, KeyPlacement};
use leakcheck_core::{ApiKey, LookupType};
use std::fmt;

/// Largest `limit` accepted by the v2 API.
pub const MAX_LIMIT: u32 = 1000;

/// Largest `offset` accepted by the v2 API.
pub const MAX_OFFSET: u32 = 2500;

/// A lookup as requested by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    /// Value to search for (email, username, domain, ...)
    pub query: String,
    /// Search type; `None` lets the server decide
    pub kind: Option<LookupType>,
    /// Maximum number of results (v2 only)
    pub limit: Option<u32>,
    /// Number of results to skip (v2 only)
    pub offset: Option<u32>,
}

impl LookupRequest {
    /// Create a lookup with server-side type detection.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            kind: None,
            limit: None,
            offset: None,
        }
    }

    /// Set the search type.
    #[must_use]
    pub fn with_type(mut self, kind: LookupType) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Set the maximum number of results.
    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the number of results to skip.
    #[must_use]
    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }
}

/// HTTP method of a prepared request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
}

/// A fully validated request, ready for the transport.
#[derive(Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    /// HTTP method
    pub method: Method,
    /// Route template for logging, e.g. `/api/v2/query/{query}`
    pub route: &'static str,
    /// Path segments appended to the base URL, encoded individually
    pub segments: Vec<String>,
    /// Query string parameters, in order
    pub params: Vec<(String, String)>,
    /// Extra request headers
    pub headers: Vec<(String, String)>,
}

impl PreparedRequest {
    fn new(method: Method, route: &'static str, segments: &[&str]) -> Self {
        Self {
            method,
            route,
            segments: segments.iter().map(|s| (*s).to_string()).collect(),
            params: Vec::new(),
            headers: Vec::new(),
        }
    }

    fn param(mut self, name: &str, value: impl Into<String>) -> Self {
        self.params.push((name.to_string(), value.into()));
        self
    }

    fn authenticate(mut self, placement: KeyPlacement, key: &ApiKey) -> Self {
        match placement {
            KeyPlacement::QueryParam(name) => {
                self.params.push((name.to_string(), key.expose().to_string()));
            }
            KeyPlacement::Header(name) => {
                self.headers.push((name.to_string(), key.expose().to_string()));
            }
            KeyPlacement::Omitted => {}
        }
        self
    }

    /// Value of a query parameter, if present.
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Value of a header, if present (case-insensitive name).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Debug for PreparedRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |pairs: &[(String, String)]| -> Vec<(String, String)> {
            pairs
                .iter()
                .map(|(k, v)| {
                    let secret = k.eq_ignore_ascii_case(crate::variant::API_KEY_PARAM)
                        || k.eq_ignore_ascii_case(crate::variant::API_KEY_HEADER);
                    let v = if secret { "<redacted>".to_string() } else { v.clone() };
                    (k.clone(), v)
                })
                .collect()
        };
        f.debug_struct("PreparedRequest")
            .field("method", &self.method)
            .field("route", &self.route)
            .field("segments", &self.segments)
            .field("params", &redact(&self.params))
            .field("headers", &redact(&self.headers))
            .finish()
    }
}

/// Build a lookup request for `endpoint` on `variant`.
///
/// # Errors
/// - [`LeakCheckError::Unsupported`] if the variant has no such endpoint
/// - [`LeakCheckError::MissingKey`] if the variant needs a key and none is set
/// - [`LeakCheckError::Validation`] for an empty query or out-of-range paging
pub fn build_lookup(
    variant: ApiVariant,
    endpoint: Endpoint,
    request: &LookupRequest,
    key: Option<&ApiKey>,
) -> Result<PreparedRequest> {
    if !variant.supports_endpoint(endpoint) {
        return Err(LeakCheckError::Unsupported {
            operation: format!("lookup on the {endpoint} endpoint"),
            variant,
        });
    }

    let key = authenticated_key(variant, key)?;

    let query = request.query.trim();
    if query.is_empty() {
        return Err(LeakCheckError::Validation(
            "query must not be empty".to_string(),
        ));
    }

    // The v2 query travels as a path segment, where dot segments are dropped.
    if variant == ApiVariant::V2 && matches!(query, "." | "..") {
        return Err(LeakCheckError::Validation(format!(
            "query '{query}' cannot be sent as a path segment"
        )));
    }

    if variant.supports_paging() {
        validate_paging(request)?;
    } else if request.limit.is_some() || request.offset.is_some() {
        tracing::warn!("limit/offset are not supported by the {variant} API and will be ignored");
    }

    let prepared = match variant {
        ApiVariant::V2 => {
            let mut prepared = PreparedRequest::new(
                Method::Get,
                "/api/v2/query/{query}",
                &["api", "v2", "query", query],
            );
            if let Some(kind) = request.kind {
                prepared = prepared.param("type", kind.as_str());
            }
            if let Some(limit) = request.limit {
                prepared = prepared.param("limit", limit.to_string());
            }
            if let Some(offset) = request.offset {
                prepared = prepared.param("offset", offset.to_string());
            }
            prepared
        }
        ApiVariant::Legacy => {
            let (route, segments): (&'static str, &[&str]) = match endpoint {
                Endpoint::Public => ("/api/public", &["api", "public"][..]),
                Endpoint::BreachCheck => ("/api/hasbreached", &["api", "hasbreached"][..]),
                Endpoint::Extended | Endpoint::Query | Endpoint::Limits => ("/api", &["api"][..]),
            };
            PreparedRequest::new(Method::Get, route, segments)
                .param("type", request.kind.unwrap_or_default().as_str())
                .param("check", query)
        }
        ApiVariant::Public => {
            if request.kind.is_some() {
                tracing::warn!("lookup type is not supported by the public API and will be ignored");
            }
            PreparedRequest::new(Method::Get, "/api/public", &["api", "public"])
                .param("check", query)
        }
    };

    Ok(match key {
        Some(key) => prepared.authenticate(variant.key_placement(), key),
        None => prepared,
    })
}

/// Build the account limits request.
///
/// # Errors
/// Returns [`LeakCheckError::Unsupported`] unless the variant is legacy, and
/// [`LeakCheckError::MissingKey`] if no key is set.
pub fn build_limits(variant: ApiVariant, key: Option<&ApiKey>) -> Result<PreparedRequest> {
    if !variant.supports_limits() {
        return Err(LeakCheckError::Unsupported {
            operation: "limits".to_string(),
            variant,
        });
    }
    let key = authenticated_key(variant, key)?.ok_or(LeakCheckError::MissingKey)?;

    Ok(PreparedRequest::new(Method::Get, "/api", &["api"])
        .param("type", "limits")
        .authenticate(variant.key_placement(), key))
}

/// Build the request that echoes the caller's IP address.
#[must_use]
pub fn build_ip() -> PreparedRequest {
    PreparedRequest::new(Method::Post, "/ip", &["ip"])
}

fn authenticated_key(variant: ApiVariant, key: Option<&ApiKey>) -> Result<Option<&ApiKey>> {
    if !variant.key_policy().requires_key() {
        return Ok(None);
    }
    key.map(Some).ok_or(LeakCheckError::MissingKey)
}

fn validate_paging(request: &LookupRequest) -> Result<()> {
    if let Some(limit) = request.limit {
        if limit > MAX_LIMIT {
            return Err(LeakCheckError::Validation(format!(
                "limit must be at most {MAX_LIMIT}, got {limit}"
            )));
        }
    }
    if let Some(offset) = request.offset {
        if offset > MAX_OFFSET {
            return Err(LeakCheckError::Validation(format!(
                "offset must be at most {MAX_OFFSET}, got {offset}"
            )));
        }
    }
    Ok(())
}

//! Interpretation of the `{ "success": ..., ... }` response envelope.
//!
//! Every JSON endpoint answers with the same envelope: `success: true` plus a
//! payload under an endpoint-specific key, or `success: false` plus an
//! `error` message. `"Not found"` is not treated as an error: it is turned
//! into an empty result.

use crate::error::{LeakCheckError, Result};
use crate::transport::RawResponse;
use crate::variant::{ApiVariant, Endpoint};
use serde_json::{Map, Value};

/// One breach record, passed through exactly as the server sent it.
pub type Record = Value;

/// Account limits, passed through exactly as the server sent them.
pub type LimitsInfo = Value;

/// Error text the server uses when a query has no matches.
pub const NOT_FOUND: &str = "Not found";

/// Outcome of a lookup after envelope interpretation.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupResponse {
    /// Records found (possibly none)
    Success {
        /// Records in server order
        result: Vec<Record>,
    },
    /// Server-reported failure other than "not found"
    Failure {
        /// Error message from the envelope
        error: String,
    },
}

impl LookupResponse {
    /// Convert into the records, turning a failure into an API error.
    ///
    /// # Errors
    /// Returns [`LeakCheckError::Api`] for [`LookupResponse::Failure`].
    pub fn into_records(self) -> Result<Vec<Record>> {
        match self {
            Self::Success { result } => Ok(result),
            Self::Failure { error } => Err(LeakCheckError::Api { message: error }),
        }
    }
}

/// Interpret a lookup response for `endpoint`.
///
/// # Errors
/// Returns [`LeakCheckError::Protocol`] when the status or the envelope shape
/// is not what the variant promises.
pub fn normalize(
    raw: &RawResponse,
    variant: ApiVariant,
    endpoint: Endpoint,
) -> Result<LookupResponse> {
    let mut envelope = parse_envelope(raw, variant)?;

    if !success_flag(raw, &envelope)? {
        let error = error_text(&envelope);
        if error == NOT_FOUND {
            tracing::debug!("Server reported no matches");
            return Ok(LookupResponse::Success { result: Vec::new() });
        }
        return Ok(LookupResponse::Failure { error });
    }

    let key = endpoint.result_key();
    match envelope.remove(key) {
        Some(Value::Array(result)) => {
            tracing::debug!(records = result.len(), "Lookup succeeded");
            Ok(LookupResponse::Success { result })
        }
        Some(other) => Err(protocol(
            raw,
            format!("expected an array under \"{key}\", got {}", kind_of(&other)),
        )),
        None => Err(protocol(raw, format!("envelope has no \"{key}\" field"))),
    }
}

/// Interpret an account limits response.
///
/// # Errors
/// Returns [`LeakCheckError::Api`] when the server reports a failure and
/// [`LeakCheckError::Protocol`] for a malformed envelope.
pub fn normalize_limits(raw: &RawResponse, variant: ApiVariant) -> Result<LimitsInfo> {
    let mut envelope = parse_envelope(raw, variant)?;

    if !success_flag(raw, &envelope)? {
        return Err(LeakCheckError::Api {
            message: error_text(&envelope),
        });
    }

    let key = Endpoint::Limits.result_key();
    envelope
        .remove(key)
        .ok_or_else(|| protocol(raw, format!("envelope has no \"{key}\" field")))
}

fn parse_envelope(raw: &RawResponse, variant: ApiVariant) -> Result<Map<String, Value>> {
    if variant.strict_status() && raw.status != 200 {
        return Err(protocol(raw, "expected status 200".to_string()));
    }

    match serde_json::from_str::<Value>(&raw.body) {
        Ok(Value::Object(envelope)) => Ok(envelope),
        Ok(other) => Err(protocol(
            raw,
            format!("expected a JSON object, got {}", kind_of(&other)),
        )),
        Err(e) => Err(protocol(raw, format!("response is not valid JSON: {e}"))),
    }
}

/// The `success` flag must be present and boolean; an envelope without it is
/// rejected rather than assumed successful.
fn success_flag(raw: &RawResponse, envelope: &Map<String, Value>) -> Result<bool> {
    match envelope.get("success") {
        Some(Value::Bool(success)) => Ok(*success),
        Some(other) => Err(protocol(
            raw,
            format!("malformed envelope: \"success\" is {}", kind_of(other)),
        )),
        None => Err(protocol(
            raw,
            "malformed envelope: missing \"success\" field".to_string(),
        )),
    }
}

fn error_text(envelope: &Map<String, Value>) -> String {
    match envelope.get("error") {
        Some(Value::String(message)) => message.clone(),
        Some(other) => other.to_string(),
        None => "unknown error".to_string(),
    }
}

fn protocol(raw: &RawResponse, message: String) -> LeakCheckError {
    LeakCheckError::Protocol {
        status: raw.status,
        message,
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

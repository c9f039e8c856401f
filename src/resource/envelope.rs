//! Response envelope normalization
//!
//! The backend wraps payloads inconsistently. Known shapes are tried in order:
//! - a top-level array
//! - `{"results": [...]}`
//! - `{"data": ...}`
//! - `{"<domain>": ...}` for the resource's domain key
//!
//! Anything else is passed through unchanged. `{"success": false}` bodies are
//! failures even when the status code is 2xx.

use super::Payload;
use crate::error::{FetchError, FetchResult};
use serde_json::Value;

/// Which envelope a body was unwrapped from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeShape {
    Array,
    Results,
    Data,
    Domain,
    Raw,
}

/// Unwrap `body` to its inner payload
pub fn normalize(body: Value, domain_key: Option<&str>) -> FetchResult<(Payload, EnvelopeShape)> {
    let mut map = match body {
        Value::Array(_) => return Ok((body, EnvelopeShape::Array)),
        Value::Object(map) => map,
        other => return Ok((other, EnvelopeShape::Raw)),
    };

    if let Some(Value::Bool(false)) = map.get("success") {
        return Err(FetchError::Rejected(rejection_reason(&map)));
    }

    if matches!(map.get("results"), Some(Value::Array(_))) {
        if let Some(results) = map.remove("results") {
            return Ok((results, EnvelopeShape::Results));
        }
    }

    if let Some(data) = map.remove("data") {
        return Ok((data, EnvelopeShape::Data));
    }

    if let Some(inner) = domain_key.and_then(|key| map.remove(key)) {
        return Ok((inner, EnvelopeShape::Domain));
    }

    Ok((Value::Object(map), EnvelopeShape::Raw))
}

fn rejection_reason(map: &serde_json::Map<String, Value>) -> String {
    ["message", "error", "detail"]
        .iter()
        .find_map(|key| match map.get(*key) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        })
        .unwrap_or_default()
}

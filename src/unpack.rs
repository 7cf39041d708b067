use crate::core::envelope::{CacheEntry, QueryResult};
use serde_json::Value;

/// Whether a JSON value counts as present.
///
/// Mirrors the usual script notion of truthiness: `null`, `false`, zero and
/// the empty string are not; empty arrays and objects are.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Builds the caller facing envelope from a fetch result.
///
/// The payload is looked up under `data.<field>` of the GraphQL body. When it
/// is missing or falsy, the whole fetch result is attached as the error.
pub fn unpack(entry: CacheEntry, field: &str) -> QueryResult {
    let payload = entry
        .data
        .as_ref()
        .and_then(|body| body.get("data"))
        .and_then(|data| data.get(field))
        .filter(|value| is_truthy(value))
        .cloned();

    let error = if payload.is_some() {
        None
    } else {
        Some(entry.clone())
    };

    QueryResult {
        data: payload,
        digest: entry.digest,
        timestamp: entry.timestamp,
        error,
        from_cache: entry.from_cache,
    }
}

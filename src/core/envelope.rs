//! Fetch results and the envelope handed back to callers

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// A fetched response body plus its provenance.
///
/// This is also the exact shape written to the cache store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub digest: String,
    pub data: Option<Value>,
    /// Epoch milliseconds at which the body was fetched.
    pub timestamp: i64,
    pub from_cache: bool,
}

/// The uniform result of every query operation.
///
/// `error` is set to the whole fetch result when the response did not carry
/// the expected field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub data: Option<Value>,
    pub digest: String,
    pub timestamp: i64,
    pub error: Option<CacheEntry>,
    pub from_cache: bool,
}

impl QueryResult {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Converts an error envelope into [`Error::Remote`].
    pub fn into_result(self, field: &str) -> Result<Self> {
        match self.error {
            Some(response) => Err(Error::Remote {
                field: field.to_string(),
                response: Box::new(response),
            }),
            None => Ok(self),
        }
    }

    /// Deserializes the payload into typed records.
    ///
    /// An envelope without data decodes as `None`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        match &self.data {
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry() -> CacheEntry {
        CacheEntry {
            digest: "abc".to_string(),
            data: Some(json!({"data": {"latest": null}})),
            timestamp: 1_600_000_000_000,
            from_cache: false,
        }
    }

    #[test]
    fn test_cache_entry_wire_format() {
        let text = serde_json::to_string(&entry()).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["digest"], "abc");
        assert_eq!(value["fromCache"], false);
        assert_eq!(value["timestamp"], 1_600_000_000_000_i64);
        assert!(value["data"]["data"]["latest"].is_null());
    }

    #[test]
    fn test_into_result_surfaces_remote_error() {
        let result = QueryResult {
            data: None,
            digest: "abc".to_string(),
            timestamp: 1,
            error: Some(entry()),
            from_cache: false,
        };
        assert!(!result.is_ok());

        match result.into_result("latest") {
            Err(Error::Remote { field, response }) => {
                assert_eq!(field, "latest");
                assert_eq!(*response, entry());
            }
            other => panic!("Expected a remote error, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_typed_payload() {
        let result = QueryResult {
            data: Some(json!([1.5, 2.5])),
            digest: "abc".to_string(),
            timestamp: 1,
            error: None,
            from_cache: true,
        };
        let values: Option<Vec<f64>> = result.decode().unwrap();
        assert_eq!(values, Some(vec![1.5, 2.5]));
    }
}

//! Outbound request abstractions

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeMap;

/// Everything besides the url that goes into an outbound request.
///
/// Headers are kept in an ordered map so that two equal option sets always
/// serialize to the same text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestOptions {
    pub method: String,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl RequestOptions {
    /// A GraphQL `POST` carrying `{"query": <query>}` and the api key header.
    pub fn graphql(query: &str, api_key: &str) -> Self {
        let body = serde_json::json!({ "query": query }).to_string();
        let headers = BTreeMap::from([
            ("Authorization".to_string(), format!("ApiKey {api_key}")),
            ("Content-Type".to_string(), "application/json".to_string()),
        ]);
        Self {
            method: "POST".to_string(),
            headers,
            body,
        }
    }
}

/// The identity of a single outbound call, used for fingerprinting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub url: String,
    pub options: RequestOptions,
}

#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn text(&self) -> &str {
        &self.body
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, url: &str, options: &RequestOptions) -> Result<TransportResponse>;
}

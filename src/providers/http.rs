use crate::core::transport::{RequestOptions, Transport, TransportResponse};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Method;
use std::time::Duration;
use tracing::{debug, instrument};

/// [`Transport`] backed by a reqwest client.
///
/// Non-success statuses are not errors here; the body is handed back as-is
/// so the GraphQL error payload reaches the caller.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent("swopcx/1.0");
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(name = "HttpSend", skip(self, options), fields(method = %options.method))]
    async fn send(&self, url: &str, options: &RequestOptions) -> Result<TransportResponse> {
        let method = Method::from_bytes(options.method.as_bytes())
            .map_err(|e| anyhow!("Invalid HTTP method {}: {}", options.method, e))?;

        let mut request = self.client.request(method, url);
        for (name, value) in &options.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request
            .body(options.body.clone())
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} URL: {}", e, url))?;

        let status = response.status();
        debug!(status = %status, "Received HTTP response");

        let body = response
            .text()
            .await
            .context("Failed to get response text")?;
        Ok(TransportResponse {
            status: status.as_u16(),
            body,
        })
    }
}

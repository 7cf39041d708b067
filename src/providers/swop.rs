use crate::client::{Client, QueryParams};
use crate::convert::{ConvertRequest, convert_quotes};
use crate::core::currency::CurrencyRateProvider;
use crate::core::quote::Quote;
use crate::query::LATEST_FIELD;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use tracing::debug;

/// Rates from the latest quotes of the service, crossed through their common base.
pub struct SwopRateProvider {
    client: Client,
}

impl SwopRateProvider {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CurrencyRateProvider for SwopRateProvider {
    async fn get_rate(&self, from: &str, to: &str) -> Result<f64> {
        if from == to {
            return Ok(1.0);
        }

        let result = self
            .client
            .latest(&QueryParams::new(format!("{from},{to}")))
            .await?
            .into_result(LATEST_FIELD)?;
        debug!(from_cache = result.from_cache, "Fetched quotes for {}{}", from, to);

        let quotes: Vec<Quote> = result
            .decode()?
            .ok_or_else(|| anyhow!("No rate data found for currency pair: {from}{to}"))?;
        let conversion = convert_quotes(
            &quotes,
            &ConvertRequest {
                from: from.to_string(),
                to: to.to_string(),
                amount: 1.0,
            },
        )?;
        Ok(conversion.rate)
    }
}

use crate::cache::ResponseCache;
use crate::convert::{self, Conversion, ConvertRequest};
use crate::core::cache::CacheStore;
use crate::core::envelope::QueryResult;
use crate::core::transport::{RequestDescriptor, RequestOptions, Transport};
use crate::error::{ConversionError, Error, Result};
use crate::fetch::{CallOptions, Fetcher};
use crate::query;
use crate::unpack::unpack;
use chrono::{NaiveDate, Utc};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

pub const DEFAULT_ENDPOINT: &str = "https://swop.cx/graphql";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Settings fixed for the lifetime of a [`Client`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_key: String,
    pub endpoint: String,
    pub base_currency: Option<String>,
    /// The free plan rejects an explicit base currency, so none is ever sent.
    pub free_tier: bool,
}

#[derive(Default)]
pub struct ClientBuilder {
    transport: Option<Arc<dyn Transport>>,
    api_key: Option<String>,
    endpoint: Option<String>,
    base_currency: Option<String>,
    free_tier: bool,
    store: Option<Arc<dyn CacheStore>>,
    ttl: Duration,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn base_currency(mut self, base_currency: impl Into<String>) -> Self {
        self.base_currency = Some(base_currency.into());
        self
    }

    pub fn free_tier(mut self, free_tier: bool) -> Self {
        self.free_tier = free_tier;
        self
    }

    /// Enables response caching. A zero `ttl` leaves caching off.
    pub fn cache(mut self, store: Arc<dyn CacheStore>, ttl: Duration) -> Self {
        self.store = Some(store);
        self.ttl = ttl;
        self
    }

    pub fn build(self) -> Result<Client> {
        let api_key = self
            .api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::Configuration("An API key is required".to_string()))?;
        let transport = self
            .transport
            .ok_or_else(|| Error::Configuration("A transport is required".to_string()))?;

        let config = ClientConfig {
            api_key,
            endpoint: self
                .endpoint
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            base_currency: self.base_currency,
            free_tier: self.free_tier,
        };
        let cache = ResponseCache::new(self.store, self.ttl);
        debug!(
            endpoint = %config.endpoint,
            free_tier = config.free_tier,
            cache = cache.is_configured(),
            "Built rates client"
        );

        Ok(Client {
            config,
            fetcher: Fetcher::new(transport, cache),
        })
    }
}

/// Parameters of a single query.
///
/// `symbols` is a comma separated list of currency codes. `date` is the day of
/// a historical query or the first day of a time series.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pub symbols: String,
    pub base_currency: Option<String>,
    pub no_cache: bool,
    pub meta: bool,
    pub date: Option<String>,
    pub end_date: Option<String>,
}

impl QueryParams {
    pub fn new(symbols: impl Into<String>) -> Self {
        Self {
            symbols: symbols.into(),
            ..Self::default()
        }
    }

    pub fn base_currency(mut self, base_currency: impl Into<String>) -> Self {
        self.base_currency = Some(base_currency.into());
        self
    }

    pub fn no_cache(mut self, no_cache: bool) -> Self {
        self.no_cache = no_cache;
        self
    }

    pub fn meta(mut self, meta: bool) -> Self {
        self.meta = meta;
        self
    }

    pub fn date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn end_date(mut self, end_date: impl Into<String>) -> Self {
        self.end_date = Some(end_date.into());
        self
    }
}

fn validate_date(name: &str, value: Option<&str>) -> Result<String> {
    let value = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::Validation(format!("Missing required parameter: {name}")))?;
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| {
        Error::Validation(format!("Invalid {name}: {value}, expected YYYY-MM-DD"))
    })?;
    Ok(value.to_string())
}

/// Client for the exchange rate service.
#[derive(Clone)]
pub struct Client {
    config: ClientConfig,
    fetcher: Fetcher,
}

impl Client {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn base_currency<'a>(&'a self, params: &'a QueryParams) -> Option<&'a str> {
        if self.config.free_tier {
            return None;
        }
        params
            .base_currency
            .as_deref()
            .or(self.config.base_currency.as_deref())
    }

    async fn run(&self, query: String, field: &str, no_cache: bool) -> Result<QueryResult> {
        let descriptor = RequestDescriptor {
            url: self.config.endpoint.clone(),
            options: RequestOptions::graphql(&query, &self.config.api_key),
        };
        debug!("Sending query: {}", query);

        let entry = self
            .fetcher
            .execute(&descriptor, CallOptions { no_cache })
            .await?;
        Ok(unpack(entry, field))
    }

    #[instrument(name = "LatestRates", skip(self, params), fields(symbols = %params.symbols))]
    pub async fn latest(&self, params: &QueryParams) -> Result<QueryResult> {
        let query = query::latest(&params.symbols, self.base_currency(params), params.meta);
        self.run(query, query::LATEST_FIELD, params.no_cache).await
    }

    #[instrument(name = "HistoricalRates", skip(self, params), fields(symbols = %params.symbols))]
    pub async fn historical(&self, params: &QueryParams) -> Result<QueryResult> {
        let date = validate_date("date", params.date.as_deref())?;
        let query = query::historical(
            &date,
            &params.symbols,
            self.base_currency(params),
            params.meta,
        );
        self.run(query, query::HISTORICAL_FIELD, params.no_cache)
            .await
    }

    /// Rates for every day from `date` to `end_date`, which defaults to today.
    #[instrument(name = "TimeSeriesRates", skip(self, params), fields(symbols = %params.symbols))]
    pub async fn timeseries(&self, params: &QueryParams) -> Result<QueryResult> {
        let start_date = validate_date("date", params.date.as_deref())?;
        let end_date = match params.end_date.as_deref() {
            Some(end) => validate_date("end_date", Some(end))?,
            None => Utc::now().date_naive().format(DATE_FORMAT).to_string(),
        };
        let query = query::time_series(
            &start_date,
            &end_date,
            &params.symbols,
            self.base_currency(params),
            params.meta,
        );
        self.run(query, query::TIME_SERIES_FIELD, params.no_cache)
            .await
    }

    #[instrument(name = "Currencies", skip(self, params), fields(symbols = %params.symbols))]
    pub async fn currencies(&self, params: &QueryParams) -> Result<QueryResult> {
        let query = query::currencies(&params.symbols);
        self.run(query, query::CURRENCIES_FIELD, params.no_cache)
            .await
    }

    /// Cross-rate conversion over quotes fetched earlier. Never touches the network.
    pub fn convert(
        quotes: &Value,
        request: &ConvertRequest,
    ) -> std::result::Result<Conversion, ConversionError> {
        convert::convert(quotes, request)
    }
}

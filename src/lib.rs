pub mod cache;
pub mod cli;
pub mod client;
pub mod convert;
pub mod core;
pub mod error;
pub mod fetch;
pub mod providers;
pub mod query;
pub mod store;
pub mod unpack;

pub use client::{Client, ClientBuilder, ClientConfig, QueryParams};
pub use error::{ConversionError, Error, Result};

use crate::cli::ui;
use crate::convert::{Conversion, ConvertRequest};
use crate::core::config::AppConfig;
use crate::core::envelope::QueryResult;
use crate::providers::HttpTransport;
use crate::store::Store;
use anyhow::Context;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Options shared by the rate commands.
#[derive(Debug, Clone, Default)]
pub struct RatesArgs {
    pub symbols: String,
    pub base: Option<String>,
    pub no_cache: bool,
    pub meta: bool,
}

impl RatesArgs {
    fn params(&self) -> QueryParams {
        let params = QueryParams::new(self.symbols.clone())
            .no_cache(self.no_cache)
            .meta(self.meta);
        match &self.base {
            Some(base) => params.base_currency(base.clone()),
            None => params,
        }
    }
}

#[derive(Debug, Clone)]
pub enum AppCommand {
    Latest(RatesArgs),
    Historical {
        date: Option<String>,
        rates: RatesArgs,
    },
    TimeSeries {
        start_date: Option<String>,
        end_date: Option<String>,
        rates: RatesArgs,
    },
    Currencies {
        symbols: String,
        no_cache: bool,
    },
    Convert {
        from: String,
        to: String,
        amount: f64,
        date: Option<String>,
        base: Option<String>,
        no_cache: bool,
    },
}

/// Builds a client over HTTP from the loaded configuration.
pub fn build_client(config: &AppConfig, store: Option<&Store>) -> anyhow::Result<Client> {
    let api_key = config.resolve_api_key().with_context(|| {
        format!(
            "No API key configured, set api_key in the config file or {}",
            crate::core::config::API_KEY_ENV
        )
    })?;
    let transport = HttpTransport::new(config.timeout_secs.map(Duration::from_secs))?;

    let mut builder = Client::builder()
        .transport(Arc::new(transport))
        .api_key(api_key)
        .endpoint(config.endpoint.clone())
        .free_tier(config.free_tier);
    if let Some(base) = &config.base_currency {
        builder = builder.base_currency(base.clone());
    }
    if let Some(store) = store {
        builder = builder.cache(
            store.as_cache_store(),
            Duration::from_secs(config.cache.ttl_secs),
        );
    }
    Ok(builder.build()?)
}

async fn with_spinner<F: Future>(message: &str, future: F) -> F::Output {
    let spinner = ui::new_spinner(message);
    let output = future.await;
    spinner.finish_and_clear();
    output
}

/// Fails when the service answered without the expected field.
fn require_data(result: QueryResult, field: &str) -> anyhow::Result<()> {
    result.into_result(field)?;
    Ok(())
}

/// Converts over a fetched rate list. Quotes from a historical query are
/// flagged as historical.
fn convert_fetched(
    result: &QueryResult,
    field: &str,
    request: &ConvertRequest,
) -> Result<Conversion> {
    let result = result.clone().into_result(field)?;
    let quotes = result.data.unwrap_or_default();
    let mut conversion = Client::convert(&quotes, request)?;
    conversion.historical |= field == query::HISTORICAL_FIELD;
    Ok(conversion)
}

async fn execute(client: &Client, command: AppCommand) -> anyhow::Result<()> {
    match command {
        AppCommand::Latest(rates) => {
            let result =
                with_spinner("Fetching latest rates...", client.latest(&rates.params())).await?;
            cli::rates::display_rates("Latest rates", &result, rates.meta)?;
            require_data(result, query::LATEST_FIELD)
        }
        AppCommand::Historical { date, rates } => {
            let mut params = rates.params();
            params.date = date;
            let title = format!("Rates on {}", params.date.as_deref().unwrap_or_default());
            let result =
                with_spinner("Fetching historical rates...", client.historical(&params)).await?;
            cli::rates::display_rates(&title, &result, rates.meta)?;
            require_data(result, query::HISTORICAL_FIELD)
        }
        AppCommand::TimeSeries {
            start_date,
            end_date,
            rates,
        } => {
            let mut params = rates.params();
            params.date = start_date;
            params.end_date = end_date;
            let result =
                with_spinner("Fetching rate series...", client.timeseries(&params)).await?;
            cli::rates::display_rates("Rate series", &result, rates.meta)?;
            require_data(result, query::TIME_SERIES_FIELD)
        }
        AppCommand::Currencies { symbols, no_cache } => {
            let params = QueryParams::new(symbols).no_cache(no_cache);
            let result =
                with_spinner("Fetching currencies...", client.currencies(&params)).await?;
            cli::currencies::display_currencies(&result)?;
            require_data(result, query::CURRENCIES_FIELD)
        }
        AppCommand::Convert {
            from,
            to,
            amount,
            date,
            base,
            no_cache,
        } => {
            let mut params = QueryParams::new(format!("{from},{to}")).no_cache(no_cache);
            if let Some(base) = base {
                params = params.base_currency(base);
            }
            let (result, field) = match date {
                Some(date) => {
                    params = params.date(date);
                    let result =
                        with_spinner("Fetching rates...", client.historical(&params)).await?;
                    (result, query::HISTORICAL_FIELD)
                }
                None => {
                    let result =
                        with_spinner("Fetching rates...", client.latest(&params)).await?;
                    (result, query::LATEST_FIELD)
                }
            };
            let conversion = convert_fetched(&result, field, &ConvertRequest { from, to, amount })?;
            cli::convert::display_conversion(&conversion, result.from_cache, result.timestamp);
            Ok(())
        }
    }
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> anyhow::Result<()> {
    info!("swopcx starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!(
        endpoint = %config.endpoint,
        free_tier = config.free_tier,
        cache_ttl_secs = config.cache.ttl_secs,
        "Loaded config"
    );

    let store = (config.cache.ttl_secs > 0).then(|| Store::open(&config));
    let client = build_client(&config, store.as_ref())?;

    let result = execute(&client, command).await;
    if let Some(store) = &store {
        store.flush()?;
    }
    result
}

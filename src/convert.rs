//! Offline cross-rate conversion between previously fetched quotes.

use crate::core::quote::Quote;
use crate::error::ConversionError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertRequest {
    pub from: String,
    pub to: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversion {
    pub rate: f64,
    pub result: f64,
    pub date: Option<String>,
    pub historical: bool,
    pub from: String,
    pub to: String,
    pub amount: f64,
}

/// Converts using the quote list exactly as returned by a rates query.
///
/// Only the two records named by the request are read; other entries may be
/// incomplete.
pub fn convert(quotes: &Value, request: &ConvertRequest) -> Result<Conversion, ConversionError> {
    let records = quotes
        .as_array()
        .filter(|records| records.iter().all(Value::is_object))
        .ok_or(ConversionError::InvalidQuotes)?;

    let from = matching_quote(records, &request.from)
        .ok_or_else(|| ConversionError::MissingFrom(request.from.clone()))??;
    let to = matching_quote(records, &request.to)
        .ok_or_else(|| ConversionError::MissingTo(request.to.clone()))??;
    cross_rate(&from, &to, request)
}

fn matching_quote(records: &[Value], currency: &str) -> Option<Result<Quote, ConversionError>> {
    records
        .iter()
        .find(|record| record.get("quoteCurrency").and_then(Value::as_str) == Some(currency))
        .map(|record| Quote::deserialize(record).map_err(|_| ConversionError::InvalidQuotes))
}

pub fn convert_quotes(
    quotes: &[Quote],
    request: &ConvertRequest,
) -> Result<Conversion, ConversionError> {
    let from = quotes
        .iter()
        .find(|q| q.quote_currency == request.from)
        .ok_or_else(|| ConversionError::MissingFrom(request.from.clone()))?;
    let to = quotes
        .iter()
        .find(|q| q.quote_currency == request.to)
        .ok_or_else(|| ConversionError::MissingTo(request.to.clone()))?;
    cross_rate(from, to, request)
}

/// Both quotes must share a base currency; the cross rate is `to / from`.
fn cross_rate(
    from: &Quote,
    to: &Quote,
    request: &ConvertRequest,
) -> Result<Conversion, ConversionError> {
    if from.base_currency != to.base_currency {
        return Err(ConversionError::BaseMismatch {
            from: request.from.clone(),
            from_base: from.base_currency.clone(),
            to: request.to.clone(),
            to_base: to.base_currency.clone(),
        });
    }
    if from.quote == 0.0 {
        return Err(ConversionError::ZeroQuote(request.from.clone()));
    }

    let rate = to.quote / from.quote;
    Ok(Conversion {
        rate,
        result: rate * request.amount,
        date: to.date.clone(),
        historical: to.historical.unwrap_or(false),
        from: request.from.clone(),
        to: request.to.clone(),
        amount: request.amount,
    })
}

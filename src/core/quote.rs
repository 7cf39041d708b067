//! Records returned by the exchange rate service

use serde::{Deserialize, Serialize};

/// Price of one unit of `base_currency` expressed in `quote_currency`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub base_currency: String,
    pub quote_currency: String,
    pub quote: f64,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub historical: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<QuoteMeta>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteMeta {
    #[serde(default)]
    pub source_short_names: Option<String>,
    #[serde(default)]
    pub source_names: Option<String>,
    #[serde(default)]
    pub source_ids: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyInfo {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub numeric_code: Option<String>,
    #[serde(default)]
    pub decimal_digits: Option<u32>,
    #[serde(default)]
    pub active: Option<bool>,
}

//! GraphQL query text for each endpoint of the rates service.
//!
//! Arguments are interpolated verbatim; the remote schema decides what is
//! valid.

pub const LATEST_FIELD: &str = "latest";
pub const HISTORICAL_FIELD: &str = "historical";
pub const TIME_SERIES_FIELD: &str = "timeSeries";
pub const CURRENCIES_FIELD: &str = "currencies";

const QUOTE_FIELDS: &str = "date baseCurrency quoteCurrency quote";
const META_FIELDS: &str = "meta { sourceShortNames sourceNames sourceIds }";
const CURRENCY_FIELDS: &str = "code name numericCode decimalDigits active";

/// Turns `"USD, CHF"` into `["USD","CHF"]`.
fn symbol_list(symbols: &str) -> String {
    let quoted = symbols
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("\"{s}\""))
        .collect::<Vec<_>>();
    format!("[{}]", quoted.join(","))
}

fn quote_selection(meta: bool) -> String {
    if meta {
        format!("{QUOTE_FIELDS} {META_FIELDS}")
    } else {
        QUOTE_FIELDS.to_string()
    }
}

fn rates_query(
    field: &str,
    mut args: Vec<String>,
    symbols: &str,
    base: Option<&str>,
    meta: bool,
) -> String {
    if let Some(base) = base {
        args.push(format!("baseCurrency: \"{base}\""));
    }
    args.push(format!("quoteCurrencies: {}", symbol_list(symbols)));
    format!(
        "query {{ {field}({}) {{ {} }} }}",
        args.join(", "),
        quote_selection(meta)
    )
}

pub fn latest(symbols: &str, base: Option<&str>, meta: bool) -> String {
    rates_query(LATEST_FIELD, Vec::new(), symbols, base, meta)
}

pub fn historical(date: &str, symbols: &str, base: Option<&str>, meta: bool) -> String {
    rates_query(
        HISTORICAL_FIELD,
        vec![format!("date: \"{date}\"")],
        symbols,
        base,
        meta,
    )
}

pub fn time_series(
    start_date: &str,
    end_date: &str,
    symbols: &str,
    base: Option<&str>,
    meta: bool,
) -> String {
    rates_query(
        TIME_SERIES_FIELD,
        vec![
            format!("dateFrom: \"{start_date}\""),
            format!("dateTo: \"{end_date}\""),
        ],
        symbols,
        base,
        meta,
    )
}

/// An empty symbol list asks for every known currency.
pub fn currencies(symbols: &str) -> String {
    let list = symbol_list(symbols);
    if list == "[]" {
        format!("query {{ {CURRENCIES_FIELD} {{ {CURRENCY_FIELDS} }} }}")
    } else {
        format!("query {{ {CURRENCIES_FIELD}(currencyCodes: {list}) {{ {CURRENCY_FIELDS} }} }}")
    }
}

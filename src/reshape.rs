//! Field reshaping from the provider's listing objects into [`TokenRow`].
//!
//! The two listings use different shapes: new pairs nest token metadata
//! under `base_token_info` and report raw strings, trending reports flat
//! numerics that need formatting. Both end up in the same row schema.

use serde_json::Value;

use crate::types::TokenRow;

/// One entry of the `data.pairs` array.
pub fn new_pair_row(raw: &Value) -> TokenRow {
    let base = raw.get("base_token_info");

    let percent_change = non_empty_text(field(base, "price_change_percent1h"))
        .or_else(|| non_empty_text(field(base, "price_change_percent5m")))
        .unwrap_or_else(|| "0.00".to_string());

    TokenRow {
        symbol: text(field(base, "symbol"), ""),
        name: text(field(base, "name"), ""),
        address: text(raw.get("base_address").filter(|v| !v.is_null()), ""),
        network: text(raw.get("chain").filter(|v| !v.is_null()), ""),
        logo: text(field(base, "logo"), ""),
        price: text(raw.get("quote_reserve_usd").filter(|v| !v.is_null()), "0"),
        volume: text(field(base, "volume"), "0"),
        market_cap: text(field(base, "market_cap"), "0"),
        percent_change,
        transactions: count(field(base, "swaps")),
        created_at: timestamp(raw.get("creation_timestamp")),
    }
}

/// One entry of the `data.rank` array.
pub fn trending_row(raw: &Value) -> TokenRow {
    let symbol = text(raw.get("symbol"), "");
    // Trending rows carry no display name; the twitter handle is the best
    // stand-in, the symbol the last resort.
    let name = non_empty_text(raw.get("twitter_username")).unwrap_or_else(|| symbol.clone());

    TokenRow {
        symbol,
        name,
        address: text(raw.get("address"), ""),
        network: text(raw.get("chain").filter(|v| !v.is_null()), ""),
        logo: text(raw.get("logo").filter(|v| !v.is_null()), ""),
        price: strip_zeros(format!("{:.7}", number(raw.get("price")))),
        volume: format!("{:.2}", number(raw.get("volume"))),
        market_cap: text(raw.get("market_cap").filter(|v| !v.is_null()), "0"),
        percent_change: strip_zeros(format!("{:.6}", number(raw.get("price_change_percent")))),
        transactions: count(raw.get("swaps")),
        created_at: timestamp(raw.get("open_timestamp")),
    }
}

/// Non-null lookup inside an optional object.
fn field<'a>(obj: Option<&'a Value>, key: &str) -> Option<&'a Value> {
    obj.and_then(|v| v.get(key)).filter(|v| !v.is_null())
}

/// String coercion: strings pass through, numbers stringify, anything else
/// takes the default.
fn text(value: Option<&Value>, default: &str) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => default.to_string(),
    }
}

/// Like [`text`] but treats the empty string as absent, for fallback chains.
fn non_empty_text(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

fn number(value: Option<&Value>) -> f64 {
    value.and_then(Value::as_f64).unwrap_or(0.0)
}

fn count(value: Option<&Value>) -> u64 {
    value.and_then(Value::as_u64).unwrap_or(0)
}

fn timestamp(value: Option<&Value>) -> String {
    match value {
        Some(v) if !v.is_null() => text(Some(v), ""),
        _ => String::new(),
    }
}

/// Drop trailing zeros from a fixed-point rendering, then a dangling dot.
fn strip_zeros(formatted: String) -> String {
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

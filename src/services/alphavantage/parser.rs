//! Parsing of Alpha Vantage query responses.
//!
//! Every endpoint answers HTTP 200 and encodes numbers as strings inside
//! nested `date -> field -> value` maps. Failures show up as top-level
//! `Information` / `Note` (rate limit) or `Error Message` keys in the body.

use crate::error::DataError;
use crate::models::observation::VixClose;
use chrono::NaiveDate;
use serde_json::Value;

pub const DAILY_SERIES_KEY: &str = "Time Series (Daily)";
pub const DAILY_CLOSE_FIELD: &str = "4. close";
pub const GLOBAL_QUOTE_KEY: &str = "Global Quote";
pub const GLOBAL_QUOTE_PRICE_FIELD: &str = "05. price";
pub const RSI_SECTION_KEY: &str = "Technical Analysis: RSI";
pub const SMA_SECTION_KEY: &str = "Technical Analysis: SMA";

/// Reject bodies that carry an error signal instead of data.
pub fn check_payload(body: &Value) -> Result<(), DataError> {
    let Some(obj) = body.as_object() else {
        return Err(DataError::MalformedResponse(
            "expected a JSON object at the top level".to_string(),
        ));
    };

    for key in ["Information", "Note"] {
        if let Some(message) = obj.get(key) {
            return Err(DataError::RateLimited(text_of(message)));
        }
    }

    if let Some(message) = obj.get("Error Message") {
        return Err(DataError::MalformedResponse(text_of(message)));
    }

    Ok(())
}

/// Daily closes from a `TIME_SERIES_DAILY` body.
///
/// Returns `Ok(None)` when the series key is absent altogether so the
/// estimator can classify the observation as insufficient.
pub fn parse_daily_closes(body: &Value) -> Result<Option<Vec<VixClose>>, DataError> {
    let Some(series) = body.get(DAILY_SERIES_KEY) else {
        return Ok(None);
    };
    let series = series.as_object().ok_or_else(|| {
        DataError::MalformedResponse(format!("'{DAILY_SERIES_KEY}' is not an object"))
    })?;

    let mut closes = Vec::with_capacity(series.len());
    for (date, fields) in series {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
            DataError::MalformedResponse(format!("unparsable series date '{date}'"))
        })?;
        let close = fields.get(DAILY_CLOSE_FIELD).ok_or_else(|| {
            DataError::MalformedResponse(format!("'{DAILY_CLOSE_FIELD}' missing on {date}"))
        })?;
        closes.push(VixClose::new(date, parse_number(DAILY_CLOSE_FIELD, close)?));
    }

    Ok(Some(closes))
}

/// Latest price from a `GLOBAL_QUOTE` body.
pub fn parse_global_quote_price(body: &Value) -> Result<f64, DataError> {
    let quote = body
        .get(GLOBAL_QUOTE_KEY)
        .and_then(Value::as_object)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| {
            DataError::InsufficientData(format!("'{GLOBAL_QUOTE_KEY}' missing or empty"))
        })?;

    let price = quote.get(GLOBAL_QUOTE_PRICE_FIELD).ok_or_else(|| {
        DataError::InsufficientData(format!("'{GLOBAL_QUOTE_PRICE_FIELD}' missing from quote"))
    })?;

    parse_number(GLOBAL_QUOTE_PRICE_FIELD, price)
}

/// Most recent value of `field` inside a technical-analysis section.
///
/// Keys are ISO dates (optionally with a time), so the lexicographically
/// greatest key is the newest.
pub fn parse_latest_indicator(body: &Value, section: &str, field: &str) -> Result<f64, DataError> {
    let entries = body
        .get(section)
        .and_then(Value::as_object)
        .ok_or_else(|| DataError::InsufficientData(format!("'{section}' missing from payload")))?;

    let (date, latest) = entries
        .iter()
        .max_by(|a, b| a.0.cmp(b.0))
        .ok_or_else(|| DataError::InsufficientData(format!("'{section}' has no entries")))?;

    let value = latest.get(field).ok_or_else(|| {
        DataError::MalformedResponse(format!("'{field}' missing on {date} in '{section}'"))
    })?;

    parse_number(field, value)
}

fn parse_number(field: &str, value: &Value) -> Result<f64, DataError> {
    let parsed = match value {
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    };

    parsed
        .filter(|v| v.is_finite())
        .ok_or_else(|| DataError::MalformedResponse(format!("'{field}' is not a number: {value}")))
}

fn text_of(value: &Value) -> String {
    value
        .as_str()
        .map(str::to_string)
        .unwrap_or_else(|| value.to_string())
}

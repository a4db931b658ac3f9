//! Scalar encoding.
//!
//! Encoding is strict: every scalar is written with its native JSON type,
//! dates and URIs as strings. Decoding is lenient: numbers and booleans
//! are also accepted in their textual form, dates as epoch milliseconds.

use std::fmt::Write;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};
use serde_json::{Number, Value};
use url::Url;

use crate::error::{MapperError, Result};
use crate::signature::ScalarKind;
use crate::value::{FieldRef, FieldValue};

/// Encode a scalar value.
///
/// Dates use `date_format` when given, RFC 3339 otherwise.
pub fn encode_scalar(value: &FieldRef<'_>, date_format: Option<&str>) -> Result<Value> {
    match value {
        FieldRef::Null => Ok(Value::Null),
        FieldRef::Boolean(b) => Ok(Value::Bool(*b)),
        FieldRef::Short(n) => Ok(Value::from(*n)),
        FieldRef::Integer(n) => Ok(Value::from(*n)),
        FieldRef::Long(n) => Ok(Value::from(*n)),
        FieldRef::Float(n) => encode_float(f64::from(*n)),
        FieldRef::Double(n) => encode_float(*n),
        FieldRef::String(s) => Ok(Value::String((*s).to_string())),
        FieldRef::Date(date) => encode_date(date, date_format).map(Value::String),
        FieldRef::Uri(url) => Ok(Value::String(url.as_str().to_string())),
        FieldRef::Sequence(_) | FieldRef::Object(_) => Err(MapperError::value(format!(
            "a {} is not a scalar",
            value.kind_name()
        ))),
    }
}

fn encode_float(n: f64) -> Result<Value> {
    Number::from_f64(n)
        .map(Value::Number)
        .ok_or_else(|| MapperError::value(format!("{n} cannot be represented in a document")))
}

/// Format a date.
pub fn encode_date(date: &DateTime<Utc>, date_format: Option<&str>) -> Result<String> {
    match date_format {
        Some(format) => {
            let mut encoded = String::new();
            write!(encoded, "{}", date.format(format))
                .map_err(|_| MapperError::value(format!("invalid date format '{format}'")))?;
            Ok(encoded)
        }
        None => Ok(date.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
    }
}

/// Decode a scalar value of the given kind.
pub fn decode_scalar(
    kind: ScalarKind,
    value: &Value,
    date_format: Option<&str>,
) -> Result<FieldValue> {
    if value.is_null() {
        return Ok(FieldValue::Null);
    }

    let decoded = match kind {
        ScalarKind::Boolean => match value {
            Value::Bool(b) => Some(FieldValue::Boolean(*b)),
            Value::String(s) => s.trim().parse().ok().map(FieldValue::Boolean),
            _ => None,
        },
        ScalarKind::Short => integer(value)
            .and_then(|n| i16::try_from(n).ok())
            .map(FieldValue::Short),
        ScalarKind::Integer => integer(value)
            .and_then(|n| i32::try_from(n).ok())
            .map(FieldValue::Integer),
        ScalarKind::Long => integer(value).map(FieldValue::Long),
        ScalarKind::Float => float(value).map(|n| FieldValue::Float(n as f32)),
        ScalarKind::Double => float(value).map(FieldValue::Double),
        ScalarKind::String => match value {
            Value::String(s) => Some(FieldValue::String(s.clone())),
            Value::Number(n) => Some(FieldValue::String(n.to_string())),
            Value::Bool(b) => Some(FieldValue::String(b.to_string())),
            _ => None,
        },
        ScalarKind::Date => match value {
            Value::String(s) => Some(FieldValue::Date(decode_date(s, date_format)?)),
            Value::Number(n) => n
                .as_i64()
                .and_then(DateTime::<Utc>::from_timestamp_millis)
                .map(FieldValue::Date),
            _ => None,
        },
        ScalarKind::Uri => match value {
            Value::String(s) => Some(FieldValue::Uri(Url::parse(s).map_err(|e| {
                MapperError::value(format!("invalid URI '{s}': {e}"))
            })?)),
            _ => None,
        },
    };

    decoded.ok_or_else(|| MapperError::value(format!("cannot decode {value} as {kind}")))
}

fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Parse a date written with `date_format`, or as RFC 3339.
pub fn decode_date(text: &str, date_format: Option<&str>) -> Result<DateTime<Utc>> {
    if let Some(format) = date_format {
        if let Ok(date) = DateTime::parse_from_str(text, format) {
            return Ok(date.with_timezone(&Utc));
        }
        if let Ok(date) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(date.and_utc());
        }
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Ok(date.and_time(NaiveTime::MIN).and_utc());
        }
    }

    DateTime::parse_from_rfc3339(text)
        .map(|date| date.with_timezone(&Utc))
        .map_err(|e| MapperError::value(format!("invalid date '{text}': {e}")))
}

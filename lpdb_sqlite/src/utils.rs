use rust_decimal::Decimal;
use std::str::FromStr;

// Rates are stored as their decimal text representation as sqlite has
// no native fixed point type.

pub(crate) fn decimal_to_text(value: Option<Decimal>) -> Option<String> {
    value.map(|value| lpcore::rate::normalize_rate(value).to_string())
}

pub(crate) fn text_to_decimal(value: Option<String>) -> Result<Option<Decimal>, sqlx::Error> {
    value.as_deref()
        .map(Decimal::from_str)
        .transpose()
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

pub(crate) fn json_to_text(value: Option<&serde_json::Value>) -> Option<String> {
    value.map(serde_json::Value::to_string)
}

pub(crate) fn text_to_json(value: Option<String>) -> Result<Option<serde_json::Value>, sqlx::Error> {
    value.as_deref()
        .map(serde_json::from_str)
        .transpose()
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

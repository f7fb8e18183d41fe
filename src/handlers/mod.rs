pub mod auth;
pub mod contracts;
pub mod dashboard;
pub mod documents;
pub mod properties;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;

/// Deserialize a store row into its typed model; a row the model can't
/// represent is an upstream fault, not a client error.
pub(crate) fn decode_row<T: DeserializeOwned>(row: Value) -> Result<T, ApiError> {
    serde_json::from_value(row).map_err(|e| ApiError::upstream(e, "Malformed record from data store"))
}

/// String field from a validated payload; validation has already rejected
/// missing/empty values where they matter.
pub(crate) fn str_field(payload: &Value, field: &str) -> String {
    payload
        .get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim()
        .to_string()
}

//! `{ success, ...payload }` response envelope handling

use serde::de::DeserializeOwned;

use crate::domain::DomainError;

/// Check the `success` flag and return the envelope for payload extraction
pub fn ensure_success(
    envelope: serde_json::Value,
    fallback: &str,
) -> Result<serde_json::Value, DomainError> {
    let success = envelope
        .get("success")
        .and_then(|s| s.as_bool())
        .unwrap_or(false);

    if success {
        return Ok(envelope);
    }

    let message = envelope
        .get("error")
        .or_else(|| envelope.get("message"))
        .and_then(|e| e.as_str())
        .filter(|e| !e.is_empty())
        .unwrap_or(fallback);

    Err(DomainError::api(message))
}

/// Deserialize a required payload field
pub fn field<T: DeserializeOwned>(
    envelope: &mut serde_json::Value,
    key: &str,
) -> Result<T, DomainError> {
    let value = envelope
        .get_mut(key)
        .map(serde_json::Value::take)
        .filter(|v| !v.is_null())
        .ok_or_else(|| DomainError::api(format!("Response is missing '{}'", key)))?;

    serde_json::from_value(value)
        .map_err(|e| DomainError::api(format!("Failed to parse '{}': {}", key, e)))
}

/// Deserialize an optional payload field, using the default when absent
pub fn field_or_default<T: DeserializeOwned + Default>(
    envelope: &mut serde_json::Value,
    key: &str,
) -> Result<T, DomainError> {
    match envelope.get_mut(key).map(serde_json::Value::take) {
        None | Some(serde_json::Value::Null) => Ok(T::default()),
        Some(value) => serde_json::from_value(value)
            .map_err(|e| DomainError::api(format!("Failed to parse '{}': {}", key, e))),
    }
}

//! Machine-readable output.

use serde::Serialize;

use crate::error::Result;

/// Pretty-printed JSON for a result or summary.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

//! Typed accessors for tool input maps.
//!
//! Tools validate their inputs through these helpers so that a missing or
//! mistyped key always surfaces as `ToolInputInvalid` with a descriptive
//! message. Only flags such as `verbose` fall back to a default.

use serde::de::DeserializeOwned;

use crate::types::{InputMap, Value};
use crate::{CraftError, Result};

/// Get a required string input.
pub fn require_str<'a>(inputs: &'a InputMap, key: &str, tool: &str) -> Result<&'a str> {
    inputs
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| type_error(tool, key, "a string"))
}

/// Get a required non-negative integer input.
pub fn require_usize(inputs: &InputMap, key: &str, tool: &str) -> Result<usize> {
    inputs
        .get(key)
        .and_then(Value::as_u64)
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| type_error(tool, key, "a non-negative integer"))
}

/// Get a required numeric vector input.
pub fn require_f64_vec(inputs: &InputMap, key: &str, tool: &str) -> Result<Vec<f64>> {
    require_typed(inputs, key, tool, "a list of numbers")
}

/// Get a required list of numeric vectors.
pub fn require_f64_matrix(inputs: &InputMap, key: &str, tool: &str) -> Result<Vec<Vec<f64>>> {
    require_typed(inputs, key, tool, "a list of number lists")
}

/// Get a required input of any deserializable type.
pub fn require<T: DeserializeOwned>(inputs: &InputMap, key: &str, tool: &str) -> Result<T> {
    require_typed(inputs, key, tool, std::any::type_name::<T>())
}

/// Get an optional, non-empty string input.
pub fn optional_str<'a>(inputs: &'a InputMap, key: &str) -> Option<&'a str> {
    inputs
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Get an optional flag, defaulting to `false`.
pub fn optional_bool(inputs: &InputMap, key: &str) -> bool {
    inputs.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn require_typed<T: DeserializeOwned>(
    inputs: &InputMap,
    key: &str,
    tool: &str,
    expected: &str,
) -> Result<T> {
    let value = inputs
        .get(key)
        .ok_or_else(|| type_error(tool, key, expected))?;
    serde_json::from_value(value.clone()).map_err(|_| type_error(tool, key, expected))
}

fn type_error(tool: &str, key: &str, expected: &str) -> CraftError {
    CraftError::tool_input(
        tool,
        format!("input '{key}' is required and must be {expected}"),
    )
}

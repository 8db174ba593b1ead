//! Defensive parsing of synthesis service replies
//!
//! Accepted shapes, after unwrapping an optional top-level `output` field:
//! - a non-empty string
//! - an array: the last non-empty string element wins (for the usual
//!   `[control_map, generated]` pair that is index 1)
//! - an object keyed by indices: the highest numeric key holding a non-empty
//!   string wins
//!
//! Anything else is a [`Error::MalformedResponse`].

use serde_json::Value;

use crate::{Error, Result};

/// Longest slice of a failing body quoted in an error message
const MAX_ERROR_SNIPPET: usize = 200;

/// The image reference a successful generation produced
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedImage {
    /// URL (or data URI) of the generated image
    pub url: String,
    /// The full decoded reply, for callers that want more than the image
    pub raw: Value,
}

/// Interpret a raw HTTP reply from the service
pub fn parse_reply(status: u16, body: &str) -> Result<GeneratedImage> {
    if !(200..300).contains(&status) {
        return Err(Error::ServiceError {
            status,
            message: error_message(body).unwrap_or_else(|| format!("HTTP {}", status)),
        });
    }

    let value: Value = serde_json::from_str(body)?;
    parse_value(status, value)
}

/// Interpret an already-decoded JSON reply
pub fn parse_value(status: u16, value: Value) -> Result<GeneratedImage> {
    let output = match &value {
        Value::Object(map) if map.contains_key("output") => &map["output"],
        Value::Object(map) if map.contains_key("error") => {
            return Err(Error::ServiceError {
                status,
                message: describe(&map["error"]),
            });
        }
        other => other,
    };

    let url = extract_image(output)?;
    Ok(GeneratedImage { url, raw: value })
}

fn extract_image(output: &Value) -> Result<String> {
    match output {
        Value::String(s) if !s.trim().is_empty() => Ok(s.clone()),
        Value::Array(items) => items
            .iter()
            .rev()
            .find_map(non_empty_str)
            .map(str::to_string)
            .ok_or_else(|| {
                Error::MalformedResponse(format!(
                    "output array of {} element(s) holds no image reference",
                    items.len()
                ))
            }),
        Value::Object(map) => map
            .iter()
            .filter_map(|(k, v)| Some((k.parse::<usize>().ok()?, non_empty_str(v)?)))
            .max_by_key(|(idx, _)| *idx)
            .map(|(_, s)| s.to_string())
            .ok_or_else(|| {
                Error::MalformedResponse("output object has no indexed image reference".into())
            }),
        Value::Null => Err(Error::MalformedResponse("reply carries no output".into())),
        other => Err(Error::MalformedResponse(format!(
            "unexpected output type: {}",
            type_name(other)
        ))),
    }
}

fn non_empty_str(v: &Value) -> Option<&str> {
    v.as_str().filter(|s| !s.trim().is_empty())
}

fn error_message(body: &str) -> Option<String> {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        if let Some(e) = map.get("error") {
            return Some(describe(e));
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.chars().take(MAX_ERROR_SNIPPET).collect())
    }
}

fn describe(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

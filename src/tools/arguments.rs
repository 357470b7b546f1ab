//! Typed access to tool call arguments.

use crate::error::TripError;

/// Wrapper around tool call arguments providing typed extraction.
#[derive(Debug, Clone)]
pub struct ToolArguments {
    value: serde_json::Value,
}

impl ToolArguments {
    /// Wrap raw arguments. Models sometimes send the arguments object as a
    /// JSON-encoded string; that form is decoded here.
    pub fn new(value: serde_json::Value) -> Self {
        let value = match value {
            serde_json::Value::String(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    serde_json::json!({})
                } else {
                    serde_json::from_str(trimmed).unwrap_or(serde_json::Value::String(raw))
                }
            }
            other => other,
        };
        Self { value }
    }

    /// Get the raw JSON value.
    pub fn raw(&self) -> &serde_json::Value {
        &self.value
    }

    /// Get a string argument by key.
    pub fn get_str(&self, key: &str) -> Result<&str, TripError> {
        self.value
            .get(key)
            .and_then(|v| v.as_str())
            .ok_or_else(|| TripError::InvalidArgument(format!("Missing string argument: {key}")))
    }

    /// Get an optional string argument.
    pub fn get_str_opt(&self, key: &str) -> Option<&str> {
        self.value.get(key).and_then(|v| v.as_str())
    }

    /// Get an integer argument.
    pub fn get_i64(&self, key: &str) -> Result<i64, TripError> {
        self.value
            .get(key)
            .and_then(|v| v.as_i64())
            .ok_or_else(|| TripError::InvalidArgument(format!("Missing integer argument: {key}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_encoded_arguments_are_decoded() {
        let args = ToolArguments::new(serde_json::json!("{\"city\": \"Tokyo\"}"));
        assert_eq!(args.get_str("city").unwrap(), "Tokyo");
    }

    #[test]
    fn blank_string_becomes_empty_object() {
        let args = ToolArguments::new(serde_json::json!("   "));
        assert!(args.raw().as_object().unwrap().is_empty());
    }

    #[test]
    fn undecodable_string_is_kept() {
        let args = ToolArguments::new(serde_json::json!("not json"));
        assert_eq!(args.raw(), &serde_json::json!("not json"));
        assert!(args.get_str("city").is_err());
    }
}

//! Check tool call arguments against the tool's JSON Schema before dispatch.

use serde_json::Value;

/// Validate tool arguments against a JSON Schema.
///
/// Covers a small subset of JSON Schema: object type,
/// required fields, primitive property types, string enums and integer
/// `minimum`. Returns a message describing the first violation found.
pub fn validate_arguments(args: &Value, schema: &Value) -> Result<(), String> {
    if schema.get("type").and_then(Value::as_str) == Some("object") && !args.is_object() {
        return Err(format!(
            "expected object arguments, got {}",
            json_type_name(args)
        ));
    }

    let Some(obj) = args.as_object() else {
        return Ok(());
    };

    if let Some(required) = schema.get("required").and_then(Value::as_array) {
        for name in required.iter().filter_map(Value::as_str) {
            match obj.get(name) {
                None | Some(Value::Null) => {
                    return Err(format!("missing required field '{name}'"));
                }
                _ => {}
            }
        }
    }

    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        return Ok(());
    };

    for (key, value) in obj {
        let Some(prop) = properties.get(key) else {
            continue;
        };
        // Optional fields may be sent as explicit nulls.
        if value.is_null() && !required_contains(schema, key) {
            continue;
        }
        if let Some(expected) = prop.get("type").and_then(Value::as_str) {
            if !value_matches_type(value, expected) {
                return Err(format!(
                    "field '{key}' expected type '{expected}', got {}",
                    json_type_name(value)
                ));
            }
        }
        if let (Some(allowed), Some(s)) = (prop.get("enum").and_then(Value::as_array), value.as_str()) {
            if !allowed.iter().any(|a| a.as_str() == Some(s)) {
                return Err(format!("field '{key}' must be one of {}", Value::Array(allowed.clone())));
            }
        }
        if let (Some(min), Some(n)) = (prop.get("minimum").and_then(Value::as_f64), value.as_f64()) {
            if n < min {
                return Err(format!("field '{key}' must be at least {min}"));
            }
        }
    }

    Ok(())
}

fn required_contains(schema: &Value, key: &str) -> bool {
    schema
        .get("required")
        .and_then(Value::as_array)
        .is_some_and(|r| r.iter().any(|v| v.as_str() == Some(key)))
}

fn value_matches_type(value: &Value, expected: &str) -> bool {
    match expected {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        "null" => value.is_null(),
        _ => true,
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hotel_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "city": { "type": "string" },
                "check_in": { "type": "string" },
                "check_out": { "type": "string" },
                "guests": { "type": "integer", "minimum": 1 },
            },
            "required": ["city", "check_in", "check_out"],
        })
    }

    #[test]
    fn accepts_complete_hotel_search() {
        let args = json!({ "city": "Rome", "check_in": "2025-03-15", "check_out": "2025-03-20", "guests": 2 });
        assert!(validate_arguments(&args, &hotel_schema()).is_ok());
    }

    #[test]
    fn rejects_missing_check_out() {
        let args = json!({ "city": "Rome", "check_in": "2025-03-15" });
        let err = validate_arguments(&args, &hotel_schema()).unwrap_err();
        assert!(err.contains("missing required field 'check_out'"));
    }

    #[test]
    fn null_required_field_counts_as_missing() {
        let args = json!({ "city": null, "check_in": "2025-03-15", "check_out": "2025-03-20" });
        let err = validate_arguments(&args, &hotel_schema()).unwrap_err();
        assert!(err.contains("'city'"));
    }

    #[test]
    fn null_optional_field_is_accepted() {
        let args = json!({ "city": "Rome", "check_in": "2025-03-15", "check_out": "2025-03-20", "guests": null });
        assert!(validate_arguments(&args, &hotel_schema()).is_ok());
    }

    #[test]
    fn rejects_guests_given_as_text() {
        let args = json!({ "city": "Rome", "check_in": "a", "check_out": "b", "guests": "two" });
        let err = validate_arguments(&args, &hotel_schema()).unwrap_err();
        assert!(err.contains("expected type 'integer'"));
    }

    #[test]
    fn rejects_zero_guests() {
        let args = json!({ "city": "Rome", "check_in": "a", "check_out": "b", "guests": 0 });
        let err = validate_arguments(&args, &hotel_schema()).unwrap_err();
        assert!(err.contains("at least 1"));
    }

    #[test]
    fn rejects_value_outside_enum() {
        let schema = json!({
            "type": "object",
            "properties": { "interests": { "type": "string", "enum": ["food", "culture"] } },
        });
        let err = validate_arguments(&json!({ "interests": "nightlife" }), &schema).unwrap_err();
        assert!(err.contains("must be one of"));
    }

    #[test]
    fn rejects_non_object_arguments() {
        let err = validate_arguments(&json!("Paris"), &hotel_schema()).unwrap_err();
        assert!(err.contains("expected object arguments, got string"));
    }

    #[test]
    fn extra_fields_are_ignored() {
        let args = json!({ "city": "Rome", "check_in": "a", "check_out": "b", "budget": 3000 });
        assert!(validate_arguments(&args, &hotel_schema()).is_ok());
    }
}

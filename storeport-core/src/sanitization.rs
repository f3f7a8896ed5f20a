//! Utilities for cleaning uploaded documents before they are staged

use serde_json::{Map, Value as JsonValue};

use crate::types::ConfigDocument;

/// Cleans a single scalar leaf: trims surrounding whitespace and strips
/// control characters that have no business in settings values.
pub fn sanitize_scalar(input: &str) -> String {
    input
        .trim()
        .chars()
        .filter(|c| !c.is_control() || *c == '\n')
        .collect()
}

/// Walks a JSON value and sanitizes every string leaf; structure, numbers
/// and booleans pass through untouched.
pub fn sanitize_json_value(value: &JsonValue) -> JsonValue {
    match value {
        JsonValue::Object(map) => {
            let cleaned: Map<String, JsonValue> = map
                .iter()
                .map(|(key, val)| (key.clone(), sanitize_json_value(val)))
                .collect();
            JsonValue::Object(cleaned)
        }
        JsonValue::Array(arr) => {
            JsonValue::Array(arr.iter().map(sanitize_json_value).collect())
        }
        JsonValue::String(s) => JsonValue::String(sanitize_scalar(s)),
        other => other.clone(),
    }
}

/// Sanitizes every scalar leaf of an uploaded document.
pub fn sanitize_document(document: &ConfigDocument) -> ConfigDocument {
    let cleaned = document
        .as_map()
        .iter()
        .map(|(key, value)| (key.clone(), sanitize_json_value(value)))
        .collect();
    ConfigDocument::from_map(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sanitize_scalar() {
        assert_eq!(sanitize_scalar("  plain  "), "plain");
        assert_eq!(sanitize_scalar("with\u{0}null"), "withnull");
        assert_eq!(sanitize_scalar("keep\ninner newline"), "keep\ninner newline");
        assert_eq!(sanitize_scalar("\ttabbed\t"), "tabbed");
    }

    #[test]
    fn test_sanitize_json_value_recurses() {
        let input = json!({
            "general_tab": {
                "store_city": "  Portland \u{1}",
                "prices_decimal": 2,
                "notify": true,
                "codes": [" US ", " CA "]
            }
        });

        let cleaned = sanitize_json_value(&input);
        assert_eq!(cleaned["general_tab"]["store_city"], "Portland");
        assert_eq!(cleaned["general_tab"]["prices_decimal"], 2);
        assert_eq!(cleaned["general_tab"]["notify"], true);
        assert_eq!(cleaned["general_tab"]["codes"], json!(["US", "CA"]));
    }

    #[test]
    fn test_sanitize_document() {
        let doc = ConfigDocument::from_value(json!({
            "products_tab": {"weight_unit": " kg "}
        }))
        .unwrap();

        let cleaned = sanitize_document(&doc);
        assert_eq!(
            cleaned.get("products_tab"),
            Some(&json!({"weight_unit": "kg"}))
        );
    }
}

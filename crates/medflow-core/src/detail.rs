//! Extraction of human-readable failure reasons from backend error bodies.
//!
//! The backend reports failures in several shapes: `{"detail": "..."}`,
//! `{"non_field_errors": ["..."]}`, per-field validation errors such as
//! `{"username": ["already taken"]}`, or `{"error": "..."}`. Only the first
//! message is surfaced.

use serde_json::Value;

/// Returns the first human-readable reason found in a backend error body.
#[must_use]
pub fn extract_detail(body: &Value) -> Option<String> {
    let object = body.as_object()?;

    if let Some(detail) = object.get("detail").and_then(first_message) {
        return Some(detail);
    }

    if let Some(message) = object.get("non_field_errors").and_then(first_message) {
        return Some(message);
    }

    let field_message = object
        .iter()
        .filter(|(key, _)| !matches!(key.as_str(), "detail" | "non_field_errors" | "error"))
        .find_map(|(_, value)| first_message(value));
    if field_message.is_some() {
        return field_message;
    }

    object.get("error").and_then(first_message)
}

fn first_message(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(|item| match item {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            _ => None,
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_detail_wins() {
        let body = json!({ "detail": "No active account", "non_field_errors": ["other"] });
        assert_eq!(extract_detail(&body).as_deref(), Some("No active account"));
    }

    #[test]
    fn test_non_field_errors() {
        let body = json!({ "non_field_errors": ["The slot is already booked."] });
        assert_eq!(
            extract_detail(&body).as_deref(),
            Some("The slot is already booked.")
        );
    }

    #[test]
    fn test_first_field_error() {
        let body = json!({ "username": ["A user with that username already exists."] });
        assert_eq!(
            extract_detail(&body).as_deref(),
            Some("A user with that username already exists.")
        );
    }

    #[test]
    fn test_error_key_is_last_resort() {
        let body = json!({ "error": "doctor_id and date are required" });
        assert_eq!(
            extract_detail(&body).as_deref(),
            Some("doctor_id and date are required")
        );
    }

    #[test]
    fn test_no_message() {
        assert!(extract_detail(&json!({ "code": 12 })).is_none());
        assert!(extract_detail(&json!(["not", "an", "object"])).is_none());
        assert!(extract_detail(&json!({ "detail": "" })).is_none());
    }
}

use serde_json::Value;

/// Placeholder for any field the CMS left out.
pub const UNKNOWN: &str = "unknown";

const ENTITY_POINTER: &str = "/event/model/singularName";
const ACTION_POINTER: &str = "/event/action";
const UID_POINTER: &str = "/event/model/uid";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub entity_key: String,
    pub action: String,
    pub model_uid: String,
}

impl Notification {
    /// Parses a raw request body. An empty body is treated as `{}`.
    ///
    /// Only invalid JSON and a top-level `null` are errors. Fields that are
    /// missing or of an unexpected shape fall back to [`UNKNOWN`].
    pub fn from_body(body: &[u8]) -> Result<Self, serde_json::Error> {
        if body.is_empty() {
            return Ok(Self::from_value(&Value::Object(Default::default())));
        }

        let parsed: Value = serde_json::from_slice(body)?;
        if parsed.is_null() {
            return Err(serde::de::Error::custom("webhook body is null"));
        }

        Ok(Self::from_value(&parsed))
    }

    pub fn from_value(body: &Value) -> Self {
        Self {
            entity_key: field_or_unknown(body, ENTITY_POINTER),
            action: field_or_unknown(body, ACTION_POINTER),
            model_uid: field_or_unknown(body, UID_POINTER),
        }
    }
}

/// Strings are taken as-is and non-zero numbers and `true` are stringified.
/// Empty strings, `0`, `false`, `null`, objects and arrays count as missing.
fn field_or_unknown(body: &Value, pointer: &str) -> String {
    let value = match body.pointer(pointer) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Some(Value::Bool(true)) => Some("true".to_string()),
        _ => None,
    };

    value.unwrap_or_else(|| UNKNOWN.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_nested_fields() {
        let body = br#"{"event":{"action":"entry.publish","model":{"singularName":"article","uid":"api::article.article"}}}"#;
        let notification = Notification::from_body(body).unwrap();

        assert_eq!(notification.entity_key, "article");
        assert_eq!(notification.action, "entry.publish");
        assert_eq!(notification.model_uid, "api::article.article");
    }

    #[test]
    fn empty_body_defaults_everything() {
        let notification = Notification::from_body(b"").unwrap();

        assert_eq!(notification.entity_key, UNKNOWN);
        assert_eq!(notification.action, UNKNOWN);
        assert_eq!(notification.model_uid, UNKNOWN);
    }

    #[test]
    fn whitespace_only_body_is_an_error() {
        assert!(Notification::from_body(b"   ").is_err());
        assert!(Notification::from_body(b"\n").is_err());
    }

    #[test]
    fn missing_model_defaults_entity_key() {
        let notification = Notification::from_body(br#"{"event":{"action":"entry.update"}}"#).unwrap();

        assert_eq!(notification.entity_key, UNKNOWN);
        assert_eq!(notification.action, "entry.update");
    }

    #[test]
    fn empty_strings_count_as_missing() {
        let notification =
            Notification::from_body(br#"{"event":{"action":"","model":{"singularName":""}}}"#).unwrap();

        assert_eq!(notification.entity_key, UNKNOWN);
        assert_eq!(notification.action, UNKNOWN);
    }

    #[test]
    fn string_event_falls_back_to_unknown() {
        let body = br#"{"event":"entry.publish","model":"article","uid":"api::article.article"}"#;
        let notification = Notification::from_body(body).unwrap();

        assert_eq!(notification.entity_key, UNKNOWN);
        assert_eq!(notification.action, UNKNOWN);
        assert_eq!(notification.model_uid, UNKNOWN);
    }

    #[test]
    fn scalar_fields_are_stringified() {
        let notification =
            Notification::from_body(br#"{"event":{"action":true,"model":{"singularName":123,"uid":0}}}"#)
                .unwrap();

        assert_eq!(notification.entity_key, "123");
        assert_eq!(notification.action, "true");
        assert_eq!(notification.model_uid, UNKNOWN);
    }

    #[test]
    fn nested_objects_count_as_missing() {
        let notification =
            Notification::from_body(br#"{"event":{"model":{"singularName":{"en":"article"}}}}"#).unwrap();
        assert_eq!(notification.entity_key, UNKNOWN);
    }

    #[test]
    fn non_object_top_level_falls_back_to_unknown() {
        let notification = Notification::from_body(br#""entry.publish""#).unwrap();
        assert_eq!(notification.entity_key, UNKNOWN);

        let notification = Notification::from_body(b"[1,2]").unwrap();
        assert_eq!(notification.entity_key, UNKNOWN);
    }

    #[test]
    fn null_event_is_tolerated() {
        let notification = Notification::from_body(br#"{"event":null,"extra":1}"#).unwrap();
        assert_eq!(notification.entity_key, UNKNOWN);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(Notification::from_body(b"{ invalid json }").is_err());
        assert!(Notification::from_body(b"null").is_err());
    }
}

//! Stage-object sanitization.
//!
//! Stages carry a `flowSet` back-reference to their owning flow
//! definition. It is large, cyclic on the server side, and meaningless to
//! a viewer, so it must never reach the display. Sanitization is a pure
//! transform on a fresh copy; the input stage is left untouched.

use serde_json::Value;

use crate::types::Stage;

/// The back-reference field stripped from displayed stage objects.
const FLOW_BACKREF_KEY: &str = "flowSet";

/// Produce a displayable copy of a stage without its parent-flow
/// back-reference. An absent stage passes through unchanged.
pub fn sanitize_stage(stage: Option<&Stage>) -> Option<Value> {
    stage.map(|s| {
        let value = serde_json::to_value(s).unwrap_or(Value::Null);
        sanitize_stage_value(value)
    })
}

/// Strip the back-reference key from an already-serialized stage value.
/// Idempotent: reapplying to a sanitized value is a no-op.
pub fn sanitize_stage_value(mut value: Value) -> Value {
    if let Value::Object(map) = &mut value {
        map.remove(FLOW_BACKREF_KEY);
    }
    value
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn stage_with_backref() -> Stage {
        serde_json::from_value(json!({
            "name": "Login",
            "verboseName": "Login Stage",
            "kind": "identification",
            "flowSet": [{"slug": "default-authentication-flow"}],
            "userFields": ["username"]
        }))
        .unwrap()
    }

    #[test]
    fn test_sanitize_strips_backref() {
        let stage = stage_with_backref();
        let sanitized = sanitize_stage(Some(&stage)).unwrap();

        let map = sanitized.as_object().unwrap();
        assert!(!map.contains_key("flowSet"));
        assert_eq!(map["name"], "Login");
        assert_eq!(map["verboseName"], "Login Stage");
        // Stage-specific configuration survives
        assert_eq!(map["userFields"], json!(["username"]));
    }

    #[test]
    fn test_sanitize_does_not_mutate_input() {
        let stage = stage_with_backref();
        let _ = sanitize_stage(Some(&stage));
        assert!(stage.flow_set.is_some());
    }

    #[test]
    fn test_sanitize_absent_stage_passes_through() {
        assert_eq!(sanitize_stage(None), None);
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let stage = stage_with_backref();
        let once = sanitize_stage(Some(&stage)).unwrap();
        let twice = sanitize_stage_value(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_sanitize_non_object_value_unchanged() {
        assert_eq!(sanitize_stage_value(Value::Null), Value::Null);
        assert_eq!(sanitize_stage_value(json!("opaque")), json!("opaque"));
    }
}

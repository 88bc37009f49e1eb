//! Partial-update materialization.
//!
//! An update request arrives either as a JSON document or as form-encoded
//! key/value pairs. Both are reduced to a [`FieldUpdateSet`]: only the
//! fields the caller actually supplied, never a full record.
//!
//! The two encodings do not filter the same way. The form path keeps only
//! the fields in [`UPDATABLE_FIELDS`]; the JSON path carries every supplied
//! key verbatim. That asymmetry is inherited behavior that existing panel
//! clients depend on, so the filtering choice is an explicit [`FieldPolicy`]
//! parameter rather than something baked into one parser.

use serde_json::{Map, Value};
use thiserror::Error;

/// Fields a partial update may touch when allow-list filtering is in force.
pub const UPDATABLE_FIELDS: [&str; 4] = ["username", "password", "role", "remark"];

/// Whether a parse path filters supplied keys against [`UPDATABLE_FIELDS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldPolicy {
    /// Keep only allow-listed fields, silently dropping the rest.
    Enforced,
    /// Carry every supplied key verbatim.
    Trusted,
}

/// The (field name, new value) pairs of one partial update. May be empty;
/// an empty set is a no-op update, not an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldUpdateSet(Map<String, Value>);

impl FieldUpdateSet {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    fn insert(&mut self, field: String, value: Value) {
        self.0.insert(field, value);
    }
}

#[derive(Debug, Error)]
pub enum MaterializeError {
    #[error("invalid json body: {0}")]
    Json(#[from] serde_json::Error),
    #[error("json body must be an object")]
    NotAnObject,
    #[error("invalid form body: {0}")]
    Encoding(#[from] std::str::Utf8Error),
}

/// Turns one raw request body into a [`FieldUpdateSet`], choosing the parse
/// strategy (and its filtering policy) from the content type: JSON bodies
/// are trusted, everything else is treated as form encoding and filtered.
pub fn materialize(
    content_type: Option<&str>,
    body: &[u8],
) -> Result<FieldUpdateSet, MaterializeError> {
    if content_type.is_some_and(|ct| ct.contains("application/json")) {
        from_json(body, FieldPolicy::Trusted)
    } else {
        from_form(body, FieldPolicy::Enforced)
    }
}

/// Parses a flat JSON object into a Field Update Set.
pub fn from_json(body: &[u8], policy: FieldPolicy) -> Result<FieldUpdateSet, MaterializeError> {
    let document: Value = serde_json::from_slice(body)?;
    let Value::Object(fields) = document else {
        return Err(MaterializeError::NotAnObject);
    };

    let mut updates = FieldUpdateSet::default();
    for (field, value) in fields {
        if policy == FieldPolicy::Enforced && !UPDATABLE_FIELDS.contains(&field.as_str()) {
            continue;
        }
        updates.insert(field, value);
    }
    Ok(updates)
}

/// Parses form-encoded pairs into a Field Update Set. When the allow-list
/// is enforced, the first supplied value per allow-listed field wins.
pub fn from_form(body: &[u8], policy: FieldPolicy) -> Result<FieldUpdateSet, MaterializeError> {
    let text = std::str::from_utf8(body)?;
    let pairs: Vec<(String, String)> = url::form_urlencoded::parse(text.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let mut updates = FieldUpdateSet::default();
    match policy {
        FieldPolicy::Enforced => {
            for field in UPDATABLE_FIELDS {
                if let Some((_, value)) = pairs.iter().find(|(name, _)| name == field) {
                    updates.insert(field.to_string(), Value::String(value.clone()));
                }
            }
        }
        FieldPolicy::Trusted => {
            for (name, value) in pairs {
                if updates.get(&name).is_none() {
                    updates.insert(name, Value::String(value));
                }
            }
        }
    }
    Ok(updates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn form_path_keeps_only_allow_listed_fields() {
        let body = b"username=alice&extra=x";
        let updates = from_form(body, FieldPolicy::Enforced).unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates.get("username"), Some(&json!("alice")));
        assert!(updates.get("extra").is_none());
    }

    #[test]
    fn form_path_takes_first_value_per_field() {
        let body = b"remark=first&remark=second";
        let updates = from_form(body, FieldPolicy::Enforced).unwrap();
        assert_eq!(updates.get("remark"), Some(&json!("first")));
    }

    #[test]
    fn form_path_with_no_recognized_keys_is_empty_not_an_error() {
        let updates = from_form(b"foo=1&bar=2", FieldPolicy::Enforced).unwrap();
        assert!(updates.is_empty());
    }

    #[test]
    fn empty_body_yields_empty_set_on_form_path() {
        let updates = from_form(b"", FieldPolicy::Enforced).unwrap();
        assert!(updates.is_empty());
    }

    #[test]
    fn json_path_carries_unlisted_keys_verbatim() {
        let body = br#"{"remark": "vip", "unlisted_field": 42}"#;
        let updates = from_json(body, FieldPolicy::Trusted).unwrap();
        assert_eq!(updates.len(), 2);
        assert_eq!(updates.get("remark"), Some(&json!("vip")));
        assert_eq!(updates.get("unlisted_field"), Some(&json!(42)));
    }

    #[test]
    fn json_path_can_enforce_the_allow_list_when_asked() {
        let body = br#"{"remark": "vip", "unlisted_field": 42}"#;
        let updates = from_json(body, FieldPolicy::Enforced).unwrap();
        assert_eq!(updates.len(), 1);
        assert!(updates.get("unlisted_field").is_none());
    }

    #[test]
    fn malformed_json_fails_validation() {
        assert!(matches!(
            from_json(b"{not json", FieldPolicy::Trusted),
            Err(MaterializeError::Json(_))
        ));
    }

    #[test]
    fn non_object_json_fails_validation() {
        assert!(matches!(
            from_json(b"42", FieldPolicy::Trusted),
            Err(MaterializeError::NotAnObject)
        ));
    }

    #[test]
    fn non_utf8_form_body_fails_validation() {
        assert!(matches!(
            from_form(&[0xff, 0xfe, 0x3d], FieldPolicy::Enforced),
            Err(MaterializeError::Encoding(_))
        ));
    }

    #[test]
    fn content_type_selects_the_strategy() {
        let json_updates =
            materialize(Some("application/json"), br#"{"anything": true}"#).unwrap();
        assert_eq!(json_updates.get("anything"), Some(&json!(true)));

        let form_updates = materialize(
            Some("application/x-www-form-urlencoded"),
            b"role=tenant&anything=true",
        )
        .unwrap();
        assert_eq!(form_updates.get("role"), Some(&json!("tenant")));
        assert!(form_updates.get("anything").is_none());

        // No content type at all falls back to the form path.
        let fallback = materialize(None, b"password=s3cret").unwrap();
        assert_eq!(fallback.get("password"), Some(&json!("s3cret")));
    }
}

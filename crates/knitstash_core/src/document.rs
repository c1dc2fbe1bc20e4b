//! Access helpers for the loosely-structured stash document.
//!
//! The document is kept as a [`serde_json::Value`] rather than typed
//! structs: yarns and projects are opaque beyond their `id` field, and
//! the migrator must round-trip attributes it knows nothing about.

use serde_json::{Map, Value};
use tracing::info;

use crate::error::{MigrateError, MigrateResult};

/// Top-level key holding the yarn entities.
pub const YARNS: &str = "yarns";
/// Top-level key holding the project entities.
pub const PROJECTS: &str = "projects";
/// Top-level key holding the assignment records.
pub const ASSIGNMENTS: &str = "assignments";
/// Historical name for the assignments key.
pub const LEGACY_ASSIGNMENTS: &str = "usages";

/// Entity identifier field.
pub const ID: &str = "id";
/// Assignment field referencing a project.
pub const PROJECT_ID: &str = "projectId";
/// Assignment field referencing a yarn.
pub const YARN_ID: &str = "yarnId";

/// Views the document as a mutable JSON object.
pub fn as_object_mut(doc: &mut Value) -> MigrateResult<&mut Map<String, Value>> {
    doc.as_object_mut()
        .ok_or_else(|| MigrateError::malformed("top-level value is not an object"))
}

/// Reads a field the way Python's `dict.get` does: an explicit JSON
/// `null` and an absent key are the same thing.
pub fn field<'a>(entity: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    match entity.get(key) {
        Some(Value::Null) | None => None,
        some => some,
    }
}

/// Requires `key` to hold an array, returning it as a slice.
pub fn require_array<'a>(
    doc: &'a Map<String, Value>,
    key: &'static str,
) -> MigrateResult<&'a Vec<Value>> {
    match doc.get(key) {
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(MigrateError::malformed(format!(
            "field '{key}' is not an array"
        ))),
        None => Err(MigrateError::missing_field(key)),
    }
}

/// Mutable counterpart of [`require_array`].
pub fn require_array_mut<'a>(
    doc: &'a mut Map<String, Value>,
    key: &'static str,
) -> MigrateResult<&'a mut Vec<Value>> {
    match doc.get_mut(key) {
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(MigrateError::malformed(format!(
            "field '{key}' is not an array"
        ))),
        None => Err(MigrateError::missing_field(key)),
    }
}

/// Normalizes the legacy `usages` key to `assignments`.
///
/// If `assignments` is already present nothing happens. Otherwise the
/// `usages` value is moved under `assignments` unchanged (same array,
/// only the key renamed). Returns `true` when a rename took place;
/// fails with `MissingField` when neither key exists.
pub fn normalize_assignments_key(doc: &mut Map<String, Value>) -> MigrateResult<bool> {
    if doc.contains_key(ASSIGNMENTS) {
        return Ok(false);
    }
    match doc.remove(LEGACY_ASSIGNMENTS) {
        Some(value) => {
            info!(
                "legacy attribute '{}' found, renaming to '{}'",
                LEGACY_ASSIGNMENTS, ASSIGNMENTS
            );
            doc.insert(ASSIGNMENTS.to_string(), value);
            Ok(true)
        }
        None => Err(MigrateError::missing_field(ASSIGNMENTS)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn field_collapses_null_and_absent() {
        let entity = obj(json!({"id": 1, "projectId": null}));

        assert_eq!(field(&entity, ID), Some(&json!(1)));
        assert_eq!(field(&entity, PROJECT_ID), None);
        assert_eq!(field(&entity, YARN_ID), None);
    }

    #[test]
    fn normalize_renames_legacy_key_in_place() {
        let mut doc = obj(json!({"usages": [{"yarnId": 3}]}));

        let renamed = normalize_assignments_key(&mut doc).unwrap();

        assert!(renamed);
        assert!(!doc.contains_key(LEGACY_ASSIGNMENTS));
        assert_eq!(doc.get(ASSIGNMENTS), Some(&json!([{"yarnId": 3}])));
    }

    #[test]
    fn normalize_prefers_existing_assignments() {
        let mut doc = obj(json!({"assignments": [], "usages": [{"id": 1}]}));

        let renamed = normalize_assignments_key(&mut doc).unwrap();

        // The legacy key is left untouched when assignments already exists.
        assert!(!renamed);
        assert_eq!(doc.get(ASSIGNMENTS), Some(&json!([])));
        assert!(doc.contains_key(LEGACY_ASSIGNMENTS));
    }

    #[test]
    fn normalize_fails_when_both_keys_absent() {
        let mut doc = obj(json!({"yarns": []}));

        let err = normalize_assignments_key(&mut doc).unwrap_err();

        assert!(matches!(
            err,
            MigrateError::MissingField {
                field: ASSIGNMENTS
            }
        ));
    }

    #[test]
    fn require_array_rejects_non_array() {
        let doc = obj(json!({"yarns": 42}));

        assert!(matches!(
            require_array(&doc, YARNS),
            Err(MigrateError::MalformedDocument { .. })
        ));
    }
}

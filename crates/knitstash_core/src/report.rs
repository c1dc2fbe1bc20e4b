//! Report types produced by a migration run.

use std::fmt;

use serde_json::Value;

/// Which collection a reference warning points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefTarget {
    /// The `projects` collection, via `projectId`.
    Project,
    /// The `yarns` collection, via `yarnId`.
    Yarn,
}

impl fmt::Display for RefTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefTarget::Project => f.write_str("project"),
            RefTarget::Yarn => f.write_str("yarn"),
        }
    }
}

/// A referential-integrity finding for a single assignment link.
///
/// Exactly one matching entity is expected; zero matches is a dangling
/// reference, more than one means duplicate ids among the targets.
/// These are warnings only and never block the write-back.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceWarning {
    /// Collection the assignment points at.
    pub target: RefTarget,
    /// Id of the assignment holding the reference.
    pub assignment_id: i64,
    /// The referenced id value, `None` when the link field was absent.
    pub referenced: Option<Value>,
    /// How many entities matched the referenced id.
    pub matches: usize,
}

impl ReferenceWarning {
    /// The number of matches a healthy reference has.
    pub const EXPECTED_MATCHES: usize = 1;
}

impl fmt::Display for ReferenceWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let referenced = self
            .referenced
            .as_ref()
            .map_or_else(|| "none".to_string(), Value::to_string);
        write!(
            f,
            "assignment {} references {} {}(s) with ID {} (expected: {})",
            self.assignment_id,
            self.matches,
            self.target,
            referenced,
            Self::EXPECTED_MATCHES
        )
    }
}

/// Result of one migration run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MigrationReport {
    /// Whether the legacy `usages` key was renamed to `assignments`.
    pub renamed_legacy_key: bool,
    /// Number of assignments that received a freshly generated id.
    pub new_id_count: usize,
    /// Duplicate id values among pre-existing assignment ids, in
    /// detection order. An id occurring n times appears n - 1 times.
    pub duplicate_ids: Vec<i64>,
    /// Referential-integrity findings, in assignment order.
    pub warnings: Vec<ReferenceWarning>,
}

impl MigrationReport {
    /// True when the run found nothing to flag and changed no ids.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        !self.renamed_legacy_key
            && self.new_id_count == 0
            && self.duplicate_ids.is_empty()
            && self.warnings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn warning_display_names_id_and_counts() {
        let warning = ReferenceWarning {
            target: RefTarget::Project,
            assignment_id: 12,
            referenced: Some(json!(99)),
            matches: 0,
        };

        assert_eq!(
            warning.to_string(),
            "assignment 12 references 0 project(s) with ID 99 (expected: 1)"
        );
    }

    #[test]
    fn warning_display_handles_absent_reference() {
        let warning = ReferenceWarning {
            target: RefTarget::Yarn,
            assignment_id: 7,
            referenced: None,
            matches: 0,
        };

        assert_eq!(
            warning.to_string(),
            "assignment 7 references 0 yarn(s) with ID none (expected: 1)"
        );
    }

    #[test]
    fn empty_report_is_clean() {
        assert!(MigrationReport::default().is_clean());

        let renamed = MigrationReport {
            renamed_legacy_key: true,
            ..MigrationReport::default()
        };
        assert!(!renamed.is_clean());
    }
}

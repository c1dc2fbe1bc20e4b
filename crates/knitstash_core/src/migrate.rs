//! The migration engine.
//!
//! [`Migrator::migrate`] takes a parsed stash document, validates its
//! required fields, renames the legacy `usages` key, gives every
//! assignment an id, and checks assignment references against the yarn
//! and project collections. The document is mutated in place; findings
//! come back in a [`MigrationReport`]. The migrator itself performs no
//! I/O.

use std::collections::HashSet;

use rand::Rng;
use serde_json::{Map, Value};
use tracing::debug;

use crate::document::{
    self, field, ASSIGNMENTS, ID, PROJECTS, PROJECT_ID, YARNS, YARN_ID,
};
use crate::error::{MigrateError, MigrateResult};
use crate::report::{MigrationReport, RefTarget, ReferenceWarning};

/// Exclusive upper bound of the identifier space.
const ID_BOUND: u32 = 1 << 31;

/// Migrates stash documents.
///
/// The random source is injected so runs can be made deterministic;
/// production callers hand in an entropy-seeded [`rand::rngs::StdRng`],
/// tests seed one explicitly.
pub struct Migrator<R: Rng> {
    rng: R,
}

impl<R: Rng> Migrator<R> {
    /// Creates a migrator drawing ids from `rng`.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Runs the migration against `doc`, mutating it in place.
    ///
    /// On success the document is guaranteed to use the `assignments`
    /// key and every assignment carries an integer id. Pre-existing
    /// duplicate ids and broken references are reported, never fixed.
    ///
    /// Collision retry during id generation is unbounded; a seen set
    /// dense enough to make that spin would need on the order of 2^31
    /// assignments, far beyond anything a stash file holds.
    pub fn migrate(&mut self, doc: &mut Value) -> MigrateResult<MigrationReport> {
        let doc = document::as_object_mut(doc)?;

        if !doc.contains_key(YARNS) {
            return Err(MigrateError::missing_field(YARNS));
        }
        if !doc.contains_key(PROJECTS) {
            return Err(MigrateError::missing_field(PROJECTS));
        }

        let mut report = MigrationReport {
            renamed_legacy_key: document::normalize_assignments_key(doc)?,
            ..MigrationReport::default()
        };

        let assignment_ids = self.assign_ids(doc, &mut report)?;
        self.validate_references(doc, &assignment_ids, &mut report)?;

        Ok(report)
    }

    /// Gives every assignment an id, tracking duplicates among the
    /// pre-existing ones. Returns the final id of each assignment in
    /// sequence order.
    fn assign_ids(
        &mut self,
        doc: &mut Map<String, Value>,
        report: &mut MigrationReport,
    ) -> MigrateResult<Vec<i64>> {
        let assignments = document::require_array_mut(doc, ASSIGNMENTS)?;

        let mut seen: HashSet<i64> = HashSet::new();
        let mut ids = Vec::with_capacity(assignments.len());

        for assignment in assignments.iter_mut() {
            let entity = assignment
                .as_object_mut()
                .ok_or_else(|| MigrateError::malformed("assignment is not an object"))?;

            let id = match field(entity, ID) {
                None => {
                    let mut candidate = i64::from(self.rng.gen_range(0..ID_BOUND));
                    while seen.contains(&candidate) {
                        candidate = i64::from(self.rng.gen_range(0..ID_BOUND));
                    }
                    entity.insert(ID.to_string(), Value::from(candidate));
                    seen.insert(candidate);
                    report.new_id_count += 1;
                    debug!("assigned new id {} to assignment", candidate);
                    candidate
                }
                Some(value) => {
                    let id = value.as_i64().ok_or_else(|| {
                        MigrateError::malformed(format!("assignment id {value} is not an integer"))
                    })?;
                    if !seen.insert(id) {
                        report.duplicate_ids.push(id);
                    }
                    id
                }
            };
            ids.push(id);
        }

        Ok(ids)
    }

    /// Checks every assignment's project and yarn links. Zero or
    /// multiple matches become warnings; nothing is mutated.
    fn validate_references(
        &self,
        doc: &Map<String, Value>,
        assignment_ids: &[i64],
        report: &mut MigrationReport,
    ) -> MigrateResult<()> {
        let yarns = document::require_array(doc, YARNS)?;
        let projects = document::require_array(doc, PROJECTS)?;
        let assignments = document::require_array(doc, ASSIGNMENTS)?;

        for (assignment, &assignment_id) in assignments.iter().zip(assignment_ids) {
            // Object-ness was established during id assignment.
            let Some(entity) = assignment.as_object() else {
                continue;
            };
            check_reference(
                projects,
                RefTarget::Project,
                entity,
                PROJECT_ID,
                assignment_id,
                &mut report.warnings,
            );
            check_reference(
                yarns,
                RefTarget::Yarn,
                entity,
                YARN_ID,
                assignment_id,
                &mut report.warnings,
            );
        }

        Ok(())
    }
}

/// Counts entities whose `id` equals the assignment's link value and
/// records a warning unless exactly one matched.
fn check_reference(
    entities: &[Value],
    target: RefTarget,
    assignment: &Map<String, Value>,
    link_key: &str,
    assignment_id: i64,
    warnings: &mut Vec<ReferenceWarning>,
) {
    let referenced = field(assignment, link_key);
    let matches = entities
        .iter()
        .filter(|entity| entity.as_object().and_then(|e| field(e, ID)) == referenced)
        .count();

    if matches != ReferenceWarning::EXPECTED_MATCHES {
        warnings.push(ReferenceWarning {
            target,
            assignment_id,
            referenced: referenced.cloned(),
            matches,
        });
    }
}

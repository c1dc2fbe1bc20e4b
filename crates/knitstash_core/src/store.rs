//! Whole-file load and persist for the stash document.

use std::fs;
use std::path::Path;

use serde_json::ser::PrettyFormatter;
use serde_json::{Serializer, Value};
use tracing::debug;

use crate::error::{MigrateError, MigrateResult};

/// Reads and parses the document at `path`.
///
/// A file that is not valid JSON is a [`MigrateError::MalformedDocument`];
/// read failures surface as [`MigrateError::Io`].
pub fn load_document(path: &Path) -> MigrateResult<Value> {
    let data = fs::read_to_string(path)?;
    serde_json::from_str(&data).map_err(|e| {
        MigrateError::malformed(format!("'{}' is not valid JSON: {e}", path.display()))
    })
}

/// Writes the document to `path`, pretty-printed with four-space
/// indentation and a trailing newline, replacing any existing file.
pub fn persist_document(path: &Path, doc: &Value) -> MigrateResult<()> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = Serializer::with_formatter(&mut buf, formatter);
    serde::Serialize::serialize(doc, &mut serializer)
        .map_err(|e| MigrateError::malformed(format!("failed to serialize document: {e}")))?;
    buf.push(b'\n');

    fs::write(path, buf)?;
    debug!("document written to {}", path.display());
    Ok(())
}

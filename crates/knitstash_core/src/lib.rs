//! # knitstash core
//!
//! Migration and validation engine for knitstash stash files: a JSON
//! document holding three collections (`yarns`, `projects`,
//! `assignments`).
//!
//! This crate provides:
//! - the [`Migrator`]: legacy-key normalization, id assignment with
//!   duplicate tracking, and referential validation of assignment
//!   links
//! - the backup collaborator that renames the file aside before any
//!   mutation
//! - whole-file load/persist helpers
//!
//! The migrator itself performs no I/O; callers back the file up,
//! load it, migrate, and persist:
//!
//! ```no_run
//! use knitstash_core::{backup, store, Migrator};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let path = std::path::Path::new("stash.json");
//! let backup_path = backup::create_backup(path)?;
//! let mut doc = store::load_document(&backup_path)?;
//!
//! let report = Migrator::new(StdRng::from_entropy()).migrate(&mut doc)?;
//! store::persist_document(path, &doc)?;
//!
//! println!("{} assignments received a new id", report.new_id_count);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod backup;
pub mod document;
pub mod error;
pub mod migrate;
pub mod report;
pub mod store;

pub use error::{MigrateError, MigrateResult};
pub use migrate::Migrator;
pub use report::{MigrationReport, RefTarget, ReferenceWarning};

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

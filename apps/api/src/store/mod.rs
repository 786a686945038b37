//! File-backed record tables.
//!
//! A [`Table`] is an in-memory value: `append` and `update_field` return a new table and
//! never touch the disk. Only [`load`], [`load_with_schema`] and [`save`] do I/O, and
//! `save` always replaces the whole file atomically.

use std::path::PathBuf;

use thiserror::Error;

pub mod file;
pub mod handle;
pub mod schema;
pub mod table;

pub use file::{load, load_with_schema, save};
pub use handle::TableHandle;
pub use schema::{Field, Schema};
pub use table::{Record, Table};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Malformed store {path}: {reason}")]
    MalformedStore { path: PathBuf, reason: String },

    #[error("Record fields [{}] do not match schema [{}]", .found.join(", "), .expected.join(", "))]
    SchemaMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("Record index {index} is out of range (table has {len} records)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Unknown field '{0}'")]
    UnknownField(String),

    #[error("Invalid value '{value}' for field '{field}': {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Table has no schema yet; append a record before saving")]
    SchemaNotEstablished,

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        StoreError::MalformedStore {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

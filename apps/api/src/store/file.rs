//! CSV persistence: header line, one record per line, standard quoting.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use tracing::{debug, info};

use crate::store::{Record, Schema, StoreError, Table};

/// Loads a table from `path`. A missing file yields an empty, schema-less table.
pub fn load(path: &Path) -> Result<Table, StoreError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("No table at {}; starting empty", path.display());
            return Ok(Table::empty());
        }
        Err(e) => return Err(StoreError::io(path, e)),
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(file);

    let header = reader
        .headers()
        .map_err(|e| StoreError::malformed(path, format!("unreadable header: {e}")))?
        .clone();
    if header.is_empty() {
        return Err(StoreError::malformed(path, "missing header row"));
    }

    let schema = Schema::untyped(header.iter());
    if let Some(name) = schema.duplicate_name() {
        return Err(StoreError::malformed(
            path,
            format!("duplicate column '{name}' in header"),
        ));
    }

    let mut records = Vec::new();
    for (i, row) in reader.records().enumerate() {
        // Row 1 is the first record after the header.
        let row = row.map_err(|e| StoreError::malformed(path, format!("row {}: {e}", i + 1)))?;
        if row.len() != schema.len() {
            return Err(StoreError::malformed(
                path,
                format!(
                    "row {} has {} fields, header has {}",
                    i + 1,
                    row.len(),
                    schema.len()
                ),
            ));
        }
        records.push(schema.field_names().zip(row.iter()).collect::<Record>());
    }

    debug!("Loaded {} records from {}", records.len(), path.display());
    Ok(Table::from_parts(schema, records))
}

/// Loads a table that must match a declared schema.
///
/// A missing file yields an empty table carrying `schema`. An existing file must have
/// exactly the declared header, and every stored value must satisfy its field kind.
pub fn load_with_schema(path: &Path, schema: &Schema) -> Result<Table, StoreError> {
    let loaded = load(path)?;
    let Some(found) = loaded.schema() else {
        return Ok(Table::with_schema(schema.clone()));
    };

    if !found.field_names().eq(schema.field_names()) {
        return Err(StoreError::malformed(
            path,
            format!(
                "header [{}] does not match expected [{}]",
                found.field_names().collect::<Vec<_>>().join(", "),
                schema.field_names().collect::<Vec<_>>().join(", ")
            ),
        ));
    }

    for (i, record) in loaded.records().iter().enumerate() {
        for (field, value) in schema.fields().iter().zip(record.values()) {
            if let Some(reason) = field.kind.rejection(value) {
                return Err(StoreError::malformed(
                    path,
                    format!(
                        "row {} field '{}' has invalid value '{}': {}",
                        i + 1,
                        field.name,
                        value,
                        reason
                    ),
                ));
            }
        }
    }

    Ok(Table::from_parts(schema.clone(), loaded.records().to_vec()))
}

/// Writes the full table (header plus every record) and atomically replaces `path`.
pub fn save(table: &Table, path: &Path) -> Result<(), StoreError> {
    let schema = table.schema().ok_or(StoreError::SchemaNotEstablished)?;

    write_atomically(path, |file| {
        let mut writer = csv::Writer::from_writer(file);
        writer
            .write_record(schema.field_names())
            .map_err(|e| csv_write_error(path, e))?;
        for record in table.records() {
            writer
                .write_record(record.values())
                .map_err(|e| csv_write_error(path, e))?;
        }
        writer.flush().map_err(|e| StoreError::io(path, e))
    })?;

    info!("Saved {} records to {}", table.len(), path.display());
    Ok(())
}

/// Writes through a temporary file in the destination directory, syncs it, then renames
/// it over `path`. If `write` fails the temporary file is removed and `path` is untouched.
///
/// On Unix the replacement keeps the mode of the file it replaces (0644 for a new file),
/// and the directory is synced after the rename so the new entry survives a crash.
pub(crate) fn write_atomically<F>(path: &Path, write: F) -> Result<(), StoreError>
where
    F: FnOnce(&mut File) -> Result<(), StoreError>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))?;

    let mut tmp = tempfile::Builder::new()
        .prefix(".inboxiq-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| StoreError::io(dir, e))?;

    #[cfg(unix)]
    tmp.as_file()
        .set_permissions(target_permissions(path))
        .map_err(|e| StoreError::io(tmp.path(), e))?;

    write(tmp.as_file_mut())?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| StoreError::io(tmp.path(), e))?;

    tmp.persist(path)
        .map_err(|e| StoreError::io(path, e.error))?;

    #[cfg(unix)]
    File::open(dir)
        .and_then(|d| d.sync_all())
        .map_err(|e| StoreError::io(dir, e))?;
    Ok(())
}

#[cfg(unix)]
fn target_permissions(path: &Path) -> fs::Permissions {
    use std::os::unix::fs::PermissionsExt;

    match fs::metadata(path) {
        Ok(meta) => meta.permissions(),
        Err(_) => fs::Permissions::from_mode(0o644),
    }
}

fn csv_write_error(path: &Path, e: csv::Error) -> StoreError {
    match e.into_kind() {
        csv::ErrorKind::Io(source) => StoreError::io(path, source),
        other => StoreError::io(path, io::Error::other(format!("{other:?}"))),
    }
}

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use crate::store::{load_with_schema, save, Schema, StoreError, Table};

/// Shared access to one table file from async code.
///
/// Every `read` and `modify` on the same handle is serialized, so a load → mutate → save
/// cycle cannot interleave with another request in this process. The file work itself
/// runs on the blocking pool.
#[derive(Clone)]
pub struct TableHandle {
    path: Arc<PathBuf>,
    schema: Arc<Schema>,
    lock: Arc<Mutex<()>>,
}

impl TableHandle {
    pub fn new(path: impl Into<PathBuf>, schema: Schema) -> Self {
        Self {
            path: Arc::new(path.into()),
            schema: Arc::new(schema),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn read(&self) -> Result<Table, StoreError> {
        let _guard = self.lock.lock().await;
        let path = Arc::clone(&self.path);
        let schema = Arc::clone(&self.schema);
        run_blocking(&self.path, move || load_with_schema(&path, &schema)).await
    }

    /// Loads the table, hands it to `f`, and saves the table `f` returns.
    ///
    /// `f` returns the table to persist (or `None` to skip the write) plus a value passed
    /// back to the caller. If `f` fails nothing is written.
    pub async fn modify<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(Table) -> Result<(Option<Table>, T), StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let _guard = self.lock.lock().await;
        let path = Arc::clone(&self.path);
        let schema = Arc::clone(&self.schema);
        run_blocking(&self.path, move || {
            let table = load_with_schema(&path, &schema)?;
            let (next, out) = f(table)?;
            match next {
                Some(next) => save(&next, &path)?,
                None => debug!("No changes for {}; skipping save", path.display()),
            }
            Ok(out)
        })
        .await
    }
}

async fn run_blocking<F, T>(path: &Path, f: F) -> Result<T, StoreError>
where
    F: FnOnce() -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| StoreError::io(path, std::io::Error::other(e)))?
}

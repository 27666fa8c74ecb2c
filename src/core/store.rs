use crate::core::Storage;
use crate::utils::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;

/// Tables held in memory and persisted as one JSON snapshot file.
///
/// Writers work on a draft copy; the draft is persisted and swapped in only
/// when the whole operation succeeds, so a failed operation leaves neither
/// memory nor disk partially updated. The write lock is held for the whole
/// operation, which serializes writers.
pub struct SnapshotStore<T, S: Storage> {
    storage: S,
    file: String,
    tables: RwLock<T>,
}

impl<T, S> SnapshotStore<T, S>
where
    T: Clone + Default + Serialize + DeserializeOwned + Send + Sync,
    S: Storage,
{
    pub async fn open(storage: S, file: impl Into<String>) -> Result<Self> {
        let file = file.into();
        let tables = match storage.read_file(&file).await? {
            Some(bytes) => {
                tracing::debug!("Loaded snapshot '{}' ({} bytes)", file, bytes.len());
                serde_json::from_slice(&bytes)?
            }
            None => {
                tracing::debug!("No snapshot '{}' yet, starting empty", file);
                T::default()
            }
        };

        Ok(Self {
            storage,
            file,
            tables: RwLock::new(tables),
        })
    }

    pub async fn read<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R + Send,
    {
        let guard = self.tables.read().await;
        f(&guard)
    }

    pub async fn write<R, F>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut T) -> Result<R> + Send,
        R: Send,
    {
        let mut guard = self.tables.write().await;
        let mut draft = guard.clone();
        let outcome = f(&mut draft)?;

        let bytes = serde_json::to_vec_pretty(&draft)?;
        self.storage.write_file(&self.file, &bytes).await?;
        *guard = draft;

        Ok(outcome)
    }
}

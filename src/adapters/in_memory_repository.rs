//! In-memory policy repository for testing.
//!
//! This adapter keeps encoded policies in a shared map keyed by path, so
//! save/load paths can be exercised without touching the file system.

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::{
    Result,
    error::Error,
    ports::PolicyRepository,
    td_learning::{SavedPolicy, ValueTable},
};

/// In-memory repository for testing.
///
/// # Examples
///
/// ```
/// use std::path::Path;
///
/// use tictactoe_td::{
///     adapters::InMemoryPolicyRepository, ports::PolicyRepository, td_learning::ValueTable,
/// };
///
/// let repo = InMemoryPolicyRepository::new();
/// let table = ValueTable::new(3)?;
///
/// repo.save(&table, Path::new("policy_p1"))?;
/// let loaded = repo.load(Path::new("policy_p1"), 3)?;
/// assert_eq!(loaded, table);
/// # Ok::<(), tictactoe_td::Error>(())
/// ```
///
/// # Thread Safety
///
/// All clones share the same underlying storage.
#[derive(Clone, Default)]
pub struct InMemoryPolicyRepository {
    storage: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryPolicyRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn storage(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.storage.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of policies currently stored
    pub fn count(&self) -> usize {
        self.storage().len()
    }

    pub fn clear(&self) {
        self.storage().clear();
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.storage().contains_key(path.to_string_lossy().as_ref())
    }
}

impl PolicyRepository for InMemoryPolicyRepository {
    fn save(&self, table: &ValueTable, path: &Path) -> Result<()> {
        let key = path.to_string_lossy().to_string();
        let policy = SavedPolicy::from_table(key.clone(), table);

        let bytes = rmp_serde::to_vec(&policy).map_err(|e| Error::SerializationContext {
            operation: "serialize policy for in-memory storage".to_string(),
            message: e.to_string(),
        })?;

        self.storage().insert(key, bytes);
        Ok(())
    }

    fn load(&self, path: &Path, board_size: usize) -> Result<ValueTable> {
        let key = path.to_string_lossy().to_string();
        let storage = self.storage();

        let bytes = storage.get(&key).ok_or_else(|| Error::Io {
            operation: format!("load policy from in-memory storage at {path:?}"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "key not found in memory"),
        })?;

        let policy: SavedPolicy =
            rmp_serde::from_slice(bytes).map_err(|e| Error::SerializationContext {
                operation: "deserialize policy from in-memory storage".to_string(),
                message: e.to_string(),
            })?;
        policy.to_table(board_size)
    }
}

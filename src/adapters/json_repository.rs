//! JSON implementation of the policy repository.
//!
//! Writes the bare flat mapping (`{"O........": 0.18, ...}`) so the file can
//! be read by anything that understands a JSON object of numbers.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::{
    Result,
    error::Error,
    ports::PolicyRepository,
    td_learning::{FlatPolicy, ValueTable},
};

/// Conventional file name for an agent's policy: `policy_<name>.json`
pub fn default_policy_path(name: &str) -> PathBuf {
    PathBuf::from(format!("policy_{name}.json"))
}

/// JSON-based policy repository.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
///
/// use tictactoe_td::{
///     adapters::JsonPolicyRepository, ports::PolicyRepository, td_learning::ValueTable,
/// };
///
/// let repo = JsonPolicyRepository::new();
/// let table = ValueTable::new(3)?;
/// repo.save(&table, Path::new("policy_p1.json"))?;
/// let loaded = repo.load(Path::new("policy_p1.json"), 3)?;
/// # Ok::<(), tictactoe_td::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPolicyRepository;

impl JsonPolicyRepository {
    pub fn new() -> Self {
        Self
    }
}

impl PolicyRepository for JsonPolicyRepository {
    fn save(&self, table: &ValueTable, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create file {path:?}"),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, &table.to_flat())?;
        writer.flush().map_err(|source| Error::Io {
            operation: format!("flush file {path:?}"),
            source,
        })?;
        Ok(())
    }

    fn load(&self, path: &Path, board_size: usize) -> Result<ValueTable> {
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open file {path:?}"),
            source,
        })?;
        let flat: FlatPolicy = serde_json::from_reader(BufReader::new(file))?;
        ValueTable::from_flat(board_size, &flat)
    }
}

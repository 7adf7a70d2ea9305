//! MessagePack implementation of the policy repository.
//!
//! This adapter wraps the flat mapping in a versioned [`SavedPolicy`]
//! envelope and encodes it with rmp_serde for compact binary storage.

use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

use crate::{
    Result,
    error::Error,
    ports::PolicyRepository,
    td_learning::{SavedPolicy, ValueTable},
};

/// MessagePack-based policy repository.
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgPackPolicyRepository;

impl MsgPackPolicyRepository {
    /// Create a new MessagePack repository.
    pub fn new() -> Self {
        Self
    }

    /// Save a full envelope, metadata included.
    pub fn save_policy(&self, policy: &SavedPolicy, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create file {path:?}"),
            source,
        })?;
        let mut writer = BufWriter::new(file);

        rmp_serde::encode::write(&mut writer, policy).map_err(|e| Error::SerializationContext {
            operation: "serialize policy to MessagePack".to_string(),
            message: e.to_string(),
        })?;

        Ok(())
    }

    /// Load the raw envelope without converting it to a table.
    pub fn load_policy(&self, path: &Path) -> Result<SavedPolicy> {
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open file {path:?}"),
            source,
        })?;

        rmp_serde::decode::from_read(BufReader::new(file)).map_err(|e| {
            Error::SerializationContext {
                operation: "deserialize policy from MessagePack".to_string(),
                message: e.to_string(),
            }
        })
    }
}

impl PolicyRepository for MsgPackPolicyRepository {
    fn save(&self, table: &ValueTable, path: &Path) -> Result<()> {
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.save_policy(&SavedPolicy::from_table(name, table), path)
    }

    fn load(&self, path: &Path, board_size: usize) -> Result<ValueTable> {
        self.load_policy(path)?.to_table(board_size)
    }
}

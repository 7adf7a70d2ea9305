//! Policy files as the commands see them
//!
//! The file extension picks the format: `.msgpack` or `.mp` is the binary
//! envelope, anything else is the flat JSON map.

use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::ValueEnum;
use log::info;

use crate::{
    Error,
    adapters::{JsonPolicyRepository, MsgPackPolicyRepository, default_policy_path},
    ports::PolicyRepository,
    td_learning::{FlatPolicy, SavedPolicy, TrainingMetadata, ValueAgent, ValueTable},
    tictactoe::{DEFAULT_BOARD_SIZE, MAX_BOARD_SIZE},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyFormat {
    Json,
    #[value(name = "msgpack")]
    MsgPack,
}

impl PolicyFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("msgpack") || ext.eq_ignore_ascii_case("mp") => {
                PolicyFormat::MsgPack
            }
            _ => PolicyFormat::Json,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            PolicyFormat::Json => "json",
            PolicyFormat::MsgPack => "msgpack",
        }
    }
}

/// A policy file read back from disk
#[derive(Debug, Clone)]
pub struct LoadedPolicy {
    pub table: ValueTable,
    pub format: PolicyFormat,
    /// Only the binary envelope records these
    pub name: Option<String>,
    pub metadata: Option<TrainingMetadata>,
}

/// `<dir>/policy_<name>.<ext>`
pub fn policy_path(dir: &Path, name: &str, format: PolicyFormat) -> PathBuf {
    dir.join(default_policy_path(name))
        .with_extension(format.extension())
}

pub fn save_agent(agent: &ValueAgent, path: &Path, metadata: TrainingMetadata) -> Result<()> {
    let saved = match PolicyFormat::from_path(path) {
        PolicyFormat::MsgPack => MsgPackPolicyRepository::new()
            .save_policy(&SavedPolicy::from_agent(agent, metadata), path),
        PolicyFormat::Json => JsonPolicyRepository::new().save(agent.values(), path),
    };
    saved.with_context(|| {
        format!(
            "Failed to save policy for {} to {}",
            agent.name(),
            path.display()
        )
    })?;

    info!(
        "saved {} states for {} to {}",
        agent.values().len(),
        agent.name(),
        path.display()
    );
    Ok(())
}

/// Load a policy, taking the board size from the file when not given.
pub fn load_policy(path: &Path, board_size: Option<usize>) -> Result<LoadedPolicy> {
    let context = || format!("Failed to load policy from {}", path.display());

    let loaded = match PolicyFormat::from_path(path) {
        PolicyFormat::MsgPack => {
            let saved = MsgPackPolicyRepository::new()
                .load_policy(path)
                .with_context(context)?;
            let table = saved
                .to_table(board_size.unwrap_or(saved.board_size))
                .with_context(context)?;
            LoadedPolicy {
                table,
                format: PolicyFormat::MsgPack,
                name: Some(saved.name),
                metadata: Some(saved.metadata),
            }
        }
        PolicyFormat::Json => {
            let size = match board_size {
                Some(size) => size,
                None => infer_board_size(path).with_context(context)?,
            };
            let table = JsonPolicyRepository::new()
                .load(path, size)
                .with_context(context)?;
            LoadedPolicy {
                table,
                format: PolicyFormat::Json,
                name: None,
                metadata: None,
            }
        }
    };

    info!(
        "loaded {} states ({n}x{n}) from {}",
        loaded.table.len(),
        path.display(),
        n = loaded.table.board_size()
    );
    Ok(loaded)
}

/// Board size implied by the key length of a flat JSON policy. An empty
/// policy gets the default size.
fn infer_board_size(path: &Path) -> crate::Result<usize> {
    let file = File::open(path)?;
    let flat: FlatPolicy = serde_json::from_reader(BufReader::new(file))?;

    let Some(key) = flat.keys().next() else {
        return Ok(DEFAULT_BOARD_SIZE);
    };
    let cells = key.chars().count();
    (1..=MAX_BOARD_SIZE)
        .find(|n| n * n == cells)
        .ok_or_else(|| Error::MalformedSignature {
            key: key.clone(),
            reason: format!("{cells} cells do not make a square board"),
        })
}

//! Repository port for value table persistence.

use std::path::Path;

use crate::{Result, td_learning::ValueTable};

/// Port for persisting and loading value tables.
///
/// The contract is a flat signature-string to value mapping; adapters only
/// decide how that mapping is stored.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
///
/// use tictactoe_td::{ports::PolicyRepository, td_learning::ValueTable};
///
/// fn backup<R: PolicyRepository>(repo: &R, table: &ValueTable) -> tictactoe_td::Result<()> {
///     repo.save(table, Path::new("policy_backup.json"))
/// }
/// ```
pub trait PolicyRepository {
    /// Save a table to persistent storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the location cannot be written or serialization
    /// fails.
    fn save(&self, table: &ValueTable, path: &Path) -> Result<()>;

    /// Load a table for `board_size` boards.
    ///
    /// # Errors
    ///
    /// Returns an error if the location cannot be read, the format is invalid,
    /// or any key is not a valid signature. A failed load never yields a
    /// partially populated table.
    fn load(&self, path: &Path, board_size: usize) -> Result<ValueTable>;
}

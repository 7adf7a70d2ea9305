//! State-value table for temporal difference learning

use std::collections::{BTreeMap, HashMap};

use crate::{
    Error, Result,
    tictactoe::{Board, board::validate_size},
    types::Signature,
};

/// Flat persistence form: signature string -> value.
pub type FlatPolicy = BTreeMap<String, f64>;

/// Value estimates keyed by board signature.
///
/// Entries are only ever added, never removed. Reads never insert.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueTable {
    board_size: usize,
    values: HashMap<Signature, f64>,
}

impl ValueTable {
    /// Create an empty table for `board_size`×`board_size` boards
    pub fn new(board_size: usize) -> Result<Self> {
        validate_size(board_size)?;
        Ok(Self {
            board_size,
            values: HashMap::new(),
        })
    }

    pub fn board_size(&self) -> usize {
        self.board_size
    }

    /// Stored value, or 0 for an unseen signature
    pub fn get(&self, signature: &Signature) -> f64 {
        self.values.get(signature).copied().unwrap_or(0.0)
    }

    /// Value of the board's literal signature
    pub fn value_of(&self, board: &Board) -> f64 {
        self.get(&board.signature())
    }

    pub fn contains(&self, signature: &Signature) -> bool {
        self.values.contains_key(signature)
    }

    pub fn set(&mut self, signature: Signature, value: f64) {
        self.values.insert(signature, value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Signature, &f64)> {
        self.values.iter()
    }

    /// Backward TD update over one game's trajectory.
    ///
    /// Walks the trajectory most-recent first, carrying `reward`. Each step
    /// backs up every symmetric image of the board toward `discount * reward`
    /// (inserting unseen images at 0), then carries the updated value of the
    /// literal signature to the previous step:
    ///
    /// `V(s') ← V(s') + α[γ·r − V(s')]` for all images `s'` of `s`, then `r ← V(s)`
    pub fn update_after_game(
        &mut self,
        trajectory: &[Signature],
        terminal_reward: f64,
        learning_rate: f64,
        discount: f64,
    ) {
        trajectory
            .iter()
            .rev()
            .fold(terminal_reward, |reward, &signature| {
                let board = signature.to_board(self.board_size);
                for image in board.symmetric_signatures() {
                    let value = self.values.entry(image).or_insert(0.0);
                    *value += learning_rate * (discount * reward - *value);
                }
                self.get(&signature)
            });
    }

    /// Export as a flat signature-string map
    pub fn to_flat(&self) -> FlatPolicy {
        self.values
            .iter()
            .map(|(signature, &value)| (signature.encode(self.board_size), value))
            .collect()
    }

    /// Import a flat map. Either every key parses or nothing is built.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedSignature`] on the first key that is not a
    /// `board_size²` cell string or whose value is not finite.
    pub fn from_flat<'a, I>(board_size: usize, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a String, &'a f64)>,
    {
        let mut table = Self::new(board_size)?;
        for (key, &value) in entries {
            let signature = Signature::parse(key, board_size)?;
            if !value.is_finite() {
                return Err(Error::MalformedSignature {
                    key: key.clone(),
                    reason: format!("value {value} is not finite"),
                });
            }
            table.values.insert(signature, value);
        }
        Ok(table)
    }
}

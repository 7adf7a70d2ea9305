//! Line-oriented human move source.
//!
//! Positions are typed 1-based (`1..=N²`) and handed to the core 0-based.

use std::io::{self, BufRead, StdinLock, Stdout, Write};

use crate::{Result, error::Error, ports::MoveSource, tictactoe::Board};

/// Reads moves from a text stream, re-prompting until the answer is a free
/// cell.
///
/// Generic over the reader and writer so tests can drive it with byte
/// slices; [`StdinMoveSource::new`] wires it to the terminal.
pub struct StdinMoveSource<R = StdinLock<'static>, W = Stdout> {
    name: String,
    input: R,
    output: W,
}

impl StdinMoveSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_io(name, io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> StdinMoveSource<R, W> {
    pub fn with_io(name: impl Into<String>, input: R, output: W) -> Self {
        Self {
            name: name.into(),
            input,
            output,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.output, "{line}").map_err(|source| Error::Io {
            operation: "write prompt".to_string(),
            source,
        })
    }

    fn prompt(&mut self, cells: usize) -> Result<Option<String>> {
        write!(self.output, "{}, choose a position (1-{cells}): ", self.name)
            .and_then(|()| self.output.flush())
            .map_err(|source| Error::Io {
                operation: "write prompt".to_string(),
                source,
            })?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .map_err(|source| Error::Io {
                operation: "read move".to_string(),
                source,
            })?;
        Ok((read > 0).then(|| line.trim().to_string()))
    }
}

impl<R: BufRead, W: Write> MoveSource for StdinMoveSource<R, W> {
    fn next_move(&mut self, board: &Board, available: &[usize]) -> Result<usize> {
        let cells = board.size() * board.size();
        self.write_line(&format!("\n{board}\n"))?;

        loop {
            let Some(answer) = self.prompt(cells)? else {
                return Err(Error::InputClosed);
            };
            let Ok(number) = answer.parse::<usize>() else {
                self.write_line(&format!("'{answer}' is not a number"))?;
                continue;
            };
            if !(1..=cells).contains(&number) {
                self.write_line(&format!("Position {number} is out of range"))?;
                continue;
            }
            let position = number - 1;
            if !available.contains(&position) {
                self.write_line(&format!("Position {number} is taken"))?;
                continue;
            }
            return Ok(position);
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

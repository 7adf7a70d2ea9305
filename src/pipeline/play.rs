//! Games between a trained agent and a move source

use std::fmt;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    config::Rewards,
    ports::MoveSource,
    td_learning::ValueAgent,
    tictactoe::{Board, GameOutcome, GameState, Player},
};

/// Running tally from the agent's point of view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub agent_wins: usize,
    pub human_wins: usize,
    pub ties: usize,
}

impl Scoreboard {
    pub fn games(&self) -> usize {
        self.agent_wins + self.human_wins + self.ties
    }

    fn record(&mut self, outcome: GameOutcome, agent_player: Player) {
        match outcome {
            GameOutcome::Win(winner) if winner == agent_player => self.agent_wins += 1,
            GameOutcome::Win(_) => self.human_wins += 1,
            GameOutcome::Tie => self.ties += 1,
        }
    }
}

impl fmt::Display for Scoreboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "agent {} - {} human ({} ties)",
            self.agent_wins, self.human_wins, self.ties
        )
    }
}

/// A value agent playing against a [`MoveSource`], one game at a time.
///
/// P1 always opens. By default the agent is P1, so the computer moves first.
pub struct PlaySession<M: MoveSource> {
    agent: ValueAgent,
    source: M,
    agent_player: Player,
    learn: bool,
    rewards: Rewards,
    game: GameState,
    last_board: Option<Board>,
    scoreboard: Scoreboard,
}

impl<M: MoveSource> PlaySession<M> {
    pub fn new(agent: ValueAgent, source: M) -> Result<Self> {
        let game = GameState::new(agent.values().board_size())?;
        Ok(Self {
            agent,
            source,
            agent_player: Player::P1,
            learn: false,
            rewards: Rewards::default(),
            game,
            last_board: None,
            scoreboard: Scoreboard::default(),
        })
    }

    pub fn with_agent_player(mut self, player: Player) -> Self {
        self.agent_player = player;
        self
    }

    /// Keep updating the agent's table after each game
    pub fn with_learning(mut self, learn: bool) -> Self {
        self.learn = learn;
        self
    }

    pub fn with_rewards(mut self, rewards: Rewards) -> Self {
        self.rewards = rewards;
        self
    }

    pub fn agent(&self) -> &ValueAgent {
        &self.agent
    }

    pub fn into_agent(self) -> ValueAgent {
        self.agent
    }

    pub fn agent_player(&self) -> Player {
        self.agent_player
    }

    pub fn scoreboard(&self) -> Scoreboard {
        self.scoreboard
    }

    /// Board of the game in progress
    pub fn board(&self) -> &Board {
        self.game.board()
    }

    /// Final board of the last completed game
    pub fn last_board(&self) -> Option<&Board> {
        self.last_board.as_ref()
    }

    /// Play the current game to the end, resuming it if an earlier call
    /// stopped on an illegal answer.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidMove`] when the move source answers with an
    ///   out-of-range or occupied cell. The move is not applied and the game
    ///   stays as it was, so the next call asks the source again.
    /// - Any other error (including [`Error::InputClosed`]) abandons the game.
    pub fn play_game(&mut self) -> Result<GameOutcome> {
        let outcome = match self.play_until_over() {
            Ok(outcome) => outcome,
            Err(err @ Error::InvalidMove { .. }) => return Err(err),
            Err(err) => {
                self.abandon();
                return Err(err);
            }
        };

        self.last_board = Some(self.game.board().clone());
        self.scoreboard.record(outcome, self.agent_player);
        info!(
            "{:?} against {}; {}",
            outcome,
            self.source.name(),
            self.scoreboard
        );

        if self.learn {
            let reward = self.rewards.for_outcome(outcome, self.agent_player);
            self.agent.update_after_game(reward);
        }

        self.abandon();
        Ok(outcome)
    }

    /// Drop the game in progress and the agent's trajectory
    pub fn abandon(&mut self) {
        self.agent.reset();
        self.game.reset();
    }

    fn play_until_over(&mut self) -> Result<GameOutcome> {
        loop {
            let available = self.game.available_positions();
            let status = if self.game.current_player() == self.agent_player {
                let board = self.game.board();
                let position = self
                    .agent
                    .choose_action(&available, board, self.agent_player)?;
                let status = self.game.play(position)?;
                self.agent.add_state(self.game.board());
                status
            } else {
                let position = self.source.next_move(self.game.board(), &available)?;
                debug!("{} plays {position}", self.source.name());
                self.game.play(position)?
            };

            if let Some(outcome) = status.outcome() {
                return Ok(outcome);
            }
        }
    }
}

//! Play command - A human against a trained policy in the terminal

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use log::warn;

use crate::{
    Error,
    adapters::StdinMoveSource,
    cli::{
        output::{print_kv, print_section},
        storage::{load_policy, save_agent},
    },
    config::AgentConfig,
    pipeline::{PlaySession, Scoreboard},
    ports::MoveSource,
    td_learning::ValueAgent,
    tictactoe::{GameOutcome, Player},
};

pub(crate) fn parse_player_token(value: &str, flag: &str) -> Result<Player> {
    match value.trim().to_ascii_lowercase().as_str() {
        "p1" | "o" | "first" | "1" => Ok(Player::P1),
        "p2" | "x" | "second" | "2" => Ok(Player::P2),
        other => Err(anyhow!(
            "Invalid value '{other}' for {flag} (expected 'p1' or 'p2')"
        )),
    }
}

#[derive(Parser, Debug)]
#[command(about = "Play against a trained policy")]
pub struct PlayArgs {
    /// Policy file (.json, or .msgpack/.mp)
    pub policy: PathBuf,

    /// Board side length; read from the file when omitted
    #[arg(long, short = 's')]
    pub board_size: Option<usize>,

    /// Side the computer plays (`p1` moves first)
    #[arg(long, default_value = "p1")]
    pub agent_player: String,

    /// Stop after this many games (default: until input ends)
    #[arg(long, short = 'g')]
    pub games: Option<usize>,

    /// Keep learning from the games played
    #[arg(long, default_value_t = false)]
    pub learn: bool,

    /// Where to write the policy after learning (defaults to the input file)
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// Name shown in prompts
    #[arg(long, default_value = "human")]
    pub name: String,
}

pub fn execute(args: PlayArgs) -> Result<()> {
    let source = StdinMoveSource::new(args.name.clone());
    run(&args, source)?;
    Ok(())
}

/// Play games against `source` until the game limit or the end of its input.
pub fn run<M: MoveSource>(args: &PlayArgs, source: M) -> Result<Scoreboard> {
    let agent_player = parse_player_token(&args.agent_player, "--agent-player")?;
    let loaded = load_policy(&args.policy, args.board_size)?;
    let metadata = loaded.metadata.clone().unwrap_or_default();
    let name = loaded.name.clone().unwrap_or_else(|| "computer".to_string());
    let n = loaded.table.board_size();

    let agent = ValueAgent::with_values(AgentConfig::new(name).with_epsilon(0.0), loaded.table)?;
    let mut session = PlaySession::new(agent, source)?
        .with_agent_player(agent_player)
        .with_learning(args.learn);

    print_section(&format!("{n}x{n} tic-tac-toe"));
    print_kv("Computer", &format!("{agent_player} ({})", agent_player.to_cell().symbol()));
    let human = agent_player.opponent();
    print_kv(&args.name, &format!("{human} ({})", human.to_cell().symbol()));
    print_kv("Positions", &format!("1-{}, row by row", n * n));

    let mut played = 0;
    while args.games.is_none_or(|limit| played < limit) {
        match session.play_game() {
            Ok(outcome) => {
                played += 1;
                if let Some(board) = session.last_board() {
                    println!("\n{board}\n");
                }
                match outcome {
                    GameOutcome::Win(winner) if winner == agent_player => {
                        println!("Computer wins!")
                    }
                    GameOutcome::Win(_) => println!("{} wins!", args.name),
                    GameOutcome::Tie => println!("Tie!"),
                }
            }
            Err(Error::InputClosed) => break,
            Err(err @ Error::InvalidMove { .. }) => {
                warn!("{} answered an illegal move: {err}", args.name);
                println!("{err}; try again");
            }
            Err(err) => return Err(err).context("Game aborted"),
        }
    }

    let scoreboard = session.scoreboard();
    print_section("Scoreboard");
    println!("  {scoreboard}");

    if args.learn {
        let path = args.save.as_ref().unwrap_or(&args.policy);
        save_agent(&session.into_agent(), path, metadata)?;
        print_kv("Saved", &path.display().to_string());
    }

    Ok(scoreboard)
}

//! Train command - Self-play training of two value agents

use std::{
    fs::{self, File},
    path::PathBuf,
    sync::{Arc, Mutex},
};

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use serde::Serialize;
use serde_json::to_writer_pretty;

use crate::{
    cli::{
        output::{format_number, format_share, print_kv, print_section, print_stats_table},
        storage::{PolicyFormat, policy_path, save_agent},
    },
    config::{Rewards, RunConfig},
    pipeline::{
        JsonlObserver, MetricsObserver, MetricsSummary, ProgressObserver, SelfPlayTrainer,
        TrainingResult,
    },
    td_learning::{TrainingMetadata, ValueAgent},
};

#[derive(Debug, Serialize)]
struct TrainingSummaryFile<'a> {
    training: &'a TrainingResult,
    metrics: MetricsSummary,
    config: &'a RunConfig,
    policies: Vec<PathBuf>,
}

#[derive(Parser, Debug)]
#[command(about = "Train two agents by self-play", allow_negative_numbers = true)]
pub struct TrainArgs {
    /// JSON run configuration; the flags below override it
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Number of self-play rounds
    #[arg(long, short = 'n')]
    pub rounds: Option<usize>,

    /// Board side length (1-8)
    #[arg(long, short = 's')]
    pub board_size: Option<usize>,

    /// Random seed for reproducibility (agent 2 uses seed+1)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Learning rate for both agents
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Discount factor for both agents
    #[arg(long)]
    pub gamma: Option<f64>,

    /// Exploration rate for both agents
    #[arg(long)]
    pub epsilon: Option<f64>,

    /// Reward schedule (win=1,tie=0.5,loss=0)
    #[arg(long)]
    pub reward: Option<String>,

    /// Directory for the policy_<name> files
    #[arg(long, short = 'O', default_value = ".")]
    pub output_dir: PathBuf,

    /// Policy file format
    #[arg(long, value_enum, default_value_t = PolicyFormat::Json)]
    pub format: PolicyFormat,

    /// Optional file for JSONL observations
    #[arg(long)]
    pub observations: Option<PathBuf>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
}

/// Merge the config file (if any) with the command-line overrides.
pub fn resolve_config(args: &TrainArgs) -> Result<RunConfig> {
    let mut config = match &args.config {
        Some(path) => RunConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => RunConfig::default(),
    };

    if let Some(rounds) = args.rounds {
        config.rounds = rounds;
    }
    if let Some(board_size) = args.board_size {
        config.board_size = board_size;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if let Some(reward) = &args.reward {
        config.rewards = reward
            .parse::<Rewards>()
            .with_context(|| format!("Invalid --reward '{reward}'"))?;
    }
    for agent in [&mut config.agent1, &mut config.agent2] {
        if let Some(alpha) = args.alpha {
            agent.learning_rate = alpha;
        }
        if let Some(gamma) = args.gamma {
            agent.discount = gamma;
        }
        if let Some(epsilon) = args.epsilon {
            agent.epsilon = epsilon;
        }
    }

    config.validate()?;
    config.training_config().validate()?;
    if config.agent1.name == config.agent2.name {
        bail!(
            "Both agents are named '{}'; their policy files would collide",
            config.agent1.name
        );
    }
    Ok(config)
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let config = resolve_config(&args)?;
    let n = config.board_size;

    print_section("Self-Play Training");
    print_stats_table(&[
        ("Board", format!("{n}x{n}")),
        ("Rounds", format_number(config.rounds)),
        (
            "Rewards",
            format!(
                "win={} tie={} loss={}",
                config.rewards.win, config.rewards.tie, config.rewards.loss
            ),
        ),
        (
            "Seed",
            config
                .seed
                .map_or_else(|| "random".to_string(), |seed| seed.to_string()),
        ),
    ]);
    for agent in [&config.agent1, &config.agent2] {
        print_kv(
            &agent.name,
            &format!(
                "alpha={} gamma={} epsilon={}",
                agent.learning_rate, agent.discount, agent.epsilon
            ),
        );
    }
    println!();

    let mut agent1 = ValueAgent::new(config.agent1.clone(), n)?;
    let mut agent2 = ValueAgent::new(config.agent2.clone(), n)?;

    let metrics = Arc::new(Mutex::new(MetricsObserver::new()));
    let mut trainer = SelfPlayTrainer::new(config.training_config())
        .with_observer(Box::new(Arc::clone(&metrics)));
    if !args.no_progress {
        trainer = trainer.with_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(path) = &args.observations {
        let observer = JsonlObserver::new(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        trainer = trainer.with_observer(Box::new(observer));
    }

    let result = trainer.run(&mut agent1, &mut agent2)?;
    drop(trainer);
    let metrics = metrics
        .lock()
        .map_err(|_| anyhow!("Metrics observer lock poisoned"))?
        .summary();

    print_section("Results");
    print_stats_table(&[
        ("P1 wins", format_share(result.p1_wins, result.rounds)),
        ("P2 wins", format_share(result.p2_wins, result.rounds)),
        ("Ties", format_share(result.ties, result.rounds)),
        ("Avg moves/round", format!("{:.2}", metrics.avg_round_length)),
        (
            &format!("{} states", agent1.name()),
            format_number(result.p1_states),
        ),
        (
            &format!("{} states", agent2.name()),
            format_number(result.p2_states),
        ),
    ]);

    fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("Failed to create {}", args.output_dir.display()))?;
    let mut policies = Vec::new();
    for agent in [&agent1, &agent2] {
        let path = policy_path(&args.output_dir, agent.name(), args.format);
        save_agent(agent, &path, TrainingMetadata::for_agent(agent, config.rounds))?;
        print_kv("Saved", &path.display().to_string());
        policies.push(path);
    }

    if let Some(path) = &args.summary {
        let summary = TrainingSummaryFile {
            training: &result,
            metrics,
            config: &config,
            policies,
        };
        let file = File::create(path)
            .with_context(|| format!("Failed to create summary {}", path.display()))?;
        to_writer_pretty(file, &summary)?;
        print_kv("Summary", &path.display().to_string());
    }

    Ok(())
}

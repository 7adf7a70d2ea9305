//! Train, inspect and play through the command layer on temp files

use std::path::Path;

use clap::Parser;
use tempfile::TempDir;
use tictactoe_td::{
    adapters::{ScriptedMoveSource, StdinMoveSource},
    cli::{
        commands::{
            inspect::{self, InspectArgs},
            play::{self, PlayArgs},
            train::{self, TrainArgs},
        },
        storage::load_policy,
    },
};

fn train_into(dir: &Path, rounds: &str, extra: &[&str]) {
    let out = dir.to_str().unwrap();
    let mut argv = vec![
        "train",
        "--rounds",
        rounds,
        "--seed",
        "17",
        "--output-dir",
        out,
        "--no-progress",
    ];
    argv.extend_from_slice(extra);
    train::execute(TrainArgs::parse_from(argv)).expect("training succeeds");
}

#[test]
fn test_train_then_inspect_then_play_json() {
    let temp_dir = TempDir::new().unwrap();
    let summary = temp_dir.path().join("summary.json");
    let observations = temp_dir.path().join("rounds.jsonl");
    train_into(
        temp_dir.path(),
        "300",
        &[
            "--summary",
            summary.to_str().unwrap(),
            "--observations",
            observations.to_str().unwrap(),
        ],
    );

    let p1 = temp_dir.path().join("policy_p1.json");
    let p2 = temp_dir.path().join("policy_p2.json");
    assert!(p1.exists());
    assert!(p2.exists());

    let summary: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&summary).unwrap()).unwrap();
    assert_eq!(summary["training"]["rounds"], 300);
    assert_eq!(summary["metrics"]["total_rounds"], 300);
    assert_eq!(
        std::fs::read_to_string(&observations)
            .unwrap()
            .lines()
            .count(),
        300
    );

    inspect::execute(InspectArgs::parse_from([
        "inspect",
        p1.to_str().unwrap(),
        "--top",
        "3",
        "--position",
        "O... X....",
    ]))
    .expect("inspect succeeds");

    // Every cell in order: taken cells are re-prompted past.
    let input = "1\n2\n3\n4\n5\n6\n7\n8\n9\n";
    let source = StdinMoveSource::with_io("tester", input.as_bytes(), Vec::new());
    let args = PlayArgs::parse_from(["play", p1.to_str().unwrap(), "--games", "1"]);
    let scoreboard = play::run(&args, source).expect("play succeeds");
    assert_eq!(scoreboard.games(), 1);
}

#[test]
fn test_msgpack_policies_and_learning_play() {
    let temp_dir = TempDir::new().unwrap();
    train_into(
        temp_dir.path(),
        "1",
        &["--format", "msgpack", "--board-size", "2"],
    );

    let p1 = temp_dir.path().join("policy_p1.msgpack");
    assert!(p1.exists());
    inspect::execute(InspectArgs::parse_from(["inspect", p1.to_str().unwrap()]))
        .expect("inspect succeeds");

    // On 2x2 every pair of cells is a line, so the opening agent wins with
    // its second move whatever the script does. Occupied answers are
    // reported and asked again.
    let learned = temp_dir.path().join("policy_p1_learned.msgpack");
    let source = ScriptedMoveSource::new("script", [0, 1, 2, 3]);
    let args = PlayArgs::parse_from([
        "play",
        p1.to_str().unwrap(),
        "--games",
        "1",
        "--learn",
        "--save",
        learned.to_str().unwrap(),
    ]);

    let scoreboard = play::run(&args, source).expect("play succeeds");
    assert_eq!(scoreboard.agent_wins, 1);
    assert_eq!(scoreboard.games(), 1);

    let before = load_policy(&p1, None).unwrap();
    let after = load_policy(&learned, None).unwrap();
    assert_eq!(after.table.board_size(), 2);
    assert_ne!(after.table, before.table);
    assert!(after.table.len() >= before.table.len());
}

#[test]
fn test_train_rejects_bad_reward() {
    let temp_dir = TempDir::new().unwrap();
    let out = temp_dir.path().to_str().unwrap();
    let args = TrainArgs::parse_from([
        "train",
        "--rounds",
        "5",
        "--reward",
        "win=lots",
        "--output-dir",
        out,
        "--no-progress",
    ]);
    assert!(train::execute(args).is_err());
    assert!(!temp_dir.path().join("policy_p1.json").exists());
}

#[test]
fn test_config_file_drives_training() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("run.json");
    std::fs::write(
        &config,
        r#"{"rounds": 40, "board_size": 2, "seed": 3,
            "agent1": {"name": "alice"}, "agent2": {"name": "bob", "epsilon": 0.0}}"#,
    )
    .unwrap();

    let out = temp_dir.path().to_str().unwrap();
    train::execute(TrainArgs::parse_from([
        "train",
        "--config",
        config.to_str().unwrap(),
        "--output-dir",
        out,
        "--no-progress",
    ]))
    .unwrap();

    assert!(temp_dir.path().join("policy_alice.json").exists());
    assert!(temp_dir.path().join("policy_bob.json").exists());
}

//! Integration tests driving whole episodes through the public API.
//!
//! Each test builds a world the way the engine binary does (config, setup
//! builder, seeded RNG) or from a hand-drawn map, then runs ticks and
//! checks the invariants that must hold across crate boundaries.

#![allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects,
    clippy::missing_panics_doc
)]

use gridchase_agents::AgentRegistry;
use gridchase_core::config::{AgentConfig, SimulationConfig};
use gridchase_core::decision::{RandomPolicy, ScriptedPolicy, StayPolicy};
use gridchase_core::episode::{EndReason, EpisodeManager};
use gridchase_core::render::NoOpRenderer;
use gridchase_core::runner::{RunBounds, run_simulation};
use gridchase_core::setup::EpisodeSetup;
use gridchase_core::tick::run_tick;
use gridchase_types::{Action, AgentColor, Cell, Control, Position, Role};
use gridchase_world::{GridWorld, MazeParams, is_connected};
use rand::SeedableRng;
use rand::rngs::SmallRng;

/// Parse an ASCII map: `#` wall, `*` reward, anything else empty.
fn grid_from(map: &[&str]) -> GridWorld {
    let rows = map
        .iter()
        .map(|line| {
            line.chars()
                .map(|c| match c {
                    '#' => Cell::Wall,
                    '*' => Cell::Reward,
                    _ => Cell::Empty,
                })
                .collect()
        })
        .collect();
    GridWorld::from_rows(rows).unwrap()
}

fn seeded_config(seed: u64) -> SimulationConfig {
    let mut config = SimulationConfig::default();
    config.world.size = 12;
    config.world.wall_ratio = 0.25;
    config.world.seed = seed;
    config
}

fn build(config: &SimulationConfig) -> EpisodeManager {
    let mut rng = SmallRng::seed_from_u64(config.world.seed);
    EpisodeSetup::from_config(config).build(&mut rng).unwrap()
}

/// Every agent stands on passable terrain and the occupancy index agrees.
fn assert_roster_consistent(manager: &EpisodeManager) {
    let registry: &AgentRegistry = manager.agents();
    for agent in registry.agents() {
        assert!(manager.world().is_passable(agent.position));
        assert!(registry.occupied_by(agent.position, agent.role));
    }
    for role in [Role::Pursuer, Role::Target] {
        assert_eq!(
            registry.occupancy(role).total(),
            registry.with_role(role).count()
        );
    }
}

#[test]
fn generated_worlds_are_connected() {
    for seed in 0..10 {
        let manager = build(&seeded_config(seed));
        assert!(is_connected(manager.world()), "seed {seed}");
        assert_roster_consistent(&manager);
    }
}

#[test]
fn random_play_keeps_moves_legal() {
    let mut manager = build(&seeded_config(5));
    let mut policy = RandomPolicy::new(SmallRng::seed_from_u64(17));

    for _ in 0..300 {
        let before: Vec<Position> = manager
            .agents()
            .agents()
            .iter()
            .map(|a| a.position)
            .collect();
        let summary = run_tick(&mut manager, &mut policy).unwrap();
        assert!(summary.invalid_moves.is_empty());
        if summary.terminal.is_none() {
            for (agent, from) in manager.agents().agents().iter().zip(&before) {
                assert!(agent.position.manhattan(*from) <= 1);
            }
        }
        assert_roster_consistent(&manager);
    }
}

#[test]
fn rewards_are_collected_once_and_clearing_the_board_resets() {
    let terrain = grid_from(&["*.*", "...", "*.*"]);
    let mut rng = SmallRng::seed_from_u64(0);
    let mut manager = EpisodeSetup::new(MazeParams::new(3, 0.0))
        .with_terrain(terrain)
        .with_agent(
            AgentConfig::new(Role::Target, AgentColor::Yellow, Control::External)
                .at(Position::new(1, 1)),
        )
        .build(&mut rng)
        .unwrap();

    let walk = [
        Action::Up,
        Action::Left,
        Action::Right,
        Action::Right,
        Action::Left,
        Action::Down,
        Action::Down,
        Action::Left,
        Action::Right,
        Action::Right,
    ];
    let (last, leading) = walk.split_last().unwrap();
    let mut collected = 0;
    for &action in leading {
        let report = manager.step(0, action).unwrap();
        if report.outcome.reward_collected {
            collected += 1;
        }
        assert_eq!(report.terminal, None);
        assert_eq!(manager.state().score, collected);
        assert_eq!(
            manager.world().count(Cell::Reward),
            4 - usize::try_from(collected).unwrap()
        );
    }
    assert_eq!(collected, 3);

    let report = manager.step(0, *last).unwrap();
    assert!(report.outcome.reward_collected);
    let end = report.terminal.unwrap();
    assert_eq!(end.reason, EndReason::RewardsExhausted);
    assert_eq!(end.final_score, 4);
    assert_eq!(end.iteration, 1);
    assert_eq!(manager.state().high_score, 4);
    assert_eq!(manager.state().score, 0);
    assert_eq!(manager.world().count(Cell::Reward), 4);
    assert_eq!(manager.world(), manager.snapshot().world());
}

#[test]
fn capture_increments_iteration_and_restores_world() {
    let terrain = grid_from(&[".*..", "....", "....", "...*"]);
    let mut rng = SmallRng::seed_from_u64(0);
    let mut manager = EpisodeSetup::new(MazeParams::new(4, 0.0))
        .with_terrain(terrain)
        .with_agent(
            AgentConfig::new(Role::Target, AgentColor::Yellow, Control::External)
                .at(Position::new(0, 0)),
        )
        .with_agent(
            AgentConfig::new(Role::Pursuer, AgentColor::Red, Control::ScriptedPursuit)
                .at(Position::new(3, 0)),
        )
        .build(&mut rng)
        .unwrap();
    let snapshot = manager.snapshot().clone();

    // Target eats the reward, then holds still while the pursuer closes in.
    manager.step(0, Action::Right).unwrap();
    assert_eq!(manager.state().score, 1);

    let mut end = None;
    for _ in 0..10 {
        let report = manager.step(1, Action::Stay).unwrap();
        if report.terminal.is_some() {
            end = report.terminal;
            break;
        }
    }

    let end = end.unwrap();
    assert_eq!(end.iteration, 1);
    assert_eq!(end.final_score, 1);
    assert!(matches!(
        end.reason,
        EndReason::Capture(capture) if capture.position == Position::new(0, 1)
    ));
    assert_eq!(manager.state().iteration, 1);
    assert_eq!(manager.state().score, 0);
    assert_eq!(manager.world(), snapshot.world());
    assert_eq!(manager.agents().agents(), snapshot.agents());
    assert_roster_consistent(&manager);
}

#[test]
fn scripted_chase_completes_episodes() {
    let config = seeded_config(3);
    let mut manager = build(&config);
    let mut policy = ScriptedPolicy::new(SmallRng::seed_from_u64(config.world.seed));

    let result = run_simulation(
        &mut manager,
        &mut policy,
        RunBounds::new(5_000, 1),
        &mut NoOpRenderer,
    )
    .unwrap();

    assert_eq!(result.episodes_completed, 1);
    assert_eq!(result.invalid_moves, 0);
    assert_eq!(manager.world(), manager.snapshot().world());
}

#[test]
fn every_reset_returns_to_the_snapshot() {
    let config = seeded_config(4);
    let mut manager = build(&config);
    let mut policy = ScriptedPolicy::new(SmallRng::seed_from_u64(config.world.seed));
    let mut episodes = 0;

    for _ in 0..20_000 {
        let summary = run_tick(&mut manager, &mut policy).unwrap();
        if let Some(end) = summary.terminal {
            episodes += 1;
            assert_eq!(end.iteration, episodes);
            assert_eq!(manager.state().iteration, episodes);
            assert_eq!(manager.state().score, 0);
            assert_eq!(manager.state().episode_turns, 0);
            assert_eq!(manager.world(), manager.snapshot().world());
            assert_eq!(manager.agents().agents(), manager.snapshot().agents());
            assert_roster_consistent(&manager);
            if episodes == 3 {
                break;
            }
        }
    }

    assert_eq!(episodes, 3);
}

#[test]
fn same_seed_same_run() {
    let run = || {
        let config = seeded_config(11);
        let mut manager = build(&config);
        let mut policy = RandomPolicy::new(SmallRng::seed_from_u64(99));
        let result = run_simulation(
            &mut manager,
            &mut policy,
            RunBounds::new(200, 0),
            &mut NoOpRenderer,
        )
        .unwrap();
        (result, manager.agents().agents().to_vec())
    };
    assert_eq!(run(), run());
}

#[test]
fn stay_policy_never_scores() {
    let config = seeded_config(8);
    let mut manager = build(&config);
    for _ in 0..50 {
        let summary = run_tick(&mut manager, &mut StayPolicy).unwrap();
        assert_eq!(summary.rewards_collected, 0);
        assert_eq!(manager.state().score, 0);
    }
}

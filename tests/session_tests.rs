//! Whole sessions played by the hint search

use tile_cascade::core::matcher::has_run;
use tile_cascade::core::{CascadeEngine, SessionConfig};
use tile_cascade::engine::best_swap;
use tile_cascade::types::{GameEvent, SessionOutcome};

fn assert_settled(engine: &CascadeEngine, budget: u32) {
    let board = engine.board();
    let state = engine.state();
    assert_eq!(board.count_empty(), 0);
    assert!(!has_run(board), "runs left on a settled board");
    assert_eq!(state.blockers_remaining as usize, board.count_blockers());
    assert_eq!(state.moves_remaining + state.moves_made, budget);
    assert!(!state.aborted);
    if state.blockers_remaining == 0 {
        assert_eq!(state.outcome, SessionOutcome::Cleared);
    }
}

#[test]
fn test_hinted_play_keeps_board_settled() {
    for seed in 1..=20 {
        let config = SessionConfig::default().with_seed(seed);
        let mut engine = CascadeEngine::new(config).unwrap();
        assert_settled(&engine, config.move_budget);

        while let Some(hint) = best_swap(&engine) {
            let outcome = engine.swap(hint.from, hint.to).unwrap();
            assert!(outcome.is_accepted(), "seed {}: hinted swap refused", seed);
            assert_settled(&engine, config.move_budget);
        }

        // The search only stops on a finished session or a dead board
        if engine.outcome() == SessionOutcome::Playing {
            assert!(engine.moves_remaining() > 0);
        }
    }
}

#[test]
fn test_budget_exhaustion_fails_the_session() {
    let config = SessionConfig {
        move_budget: 1,
        ..SessionConfig::default()
    };
    let mut engine = (1..50)
        .map(|seed| CascadeEngine::new(config.with_seed(seed)).unwrap())
        .find(|e| {
            best_swap(e).is_some_and(|h| h.report.blockers_destroyed < e.blockers_remaining())
        })
        .expect("some seed has a non-winning first move");
    engine.drain_events();

    let hint = best_swap(&engine).unwrap();
    engine.swap(hint.from, hint.to).unwrap();

    assert_eq!(engine.outcome(), SessionOutcome::Failed);
    assert_eq!(
        engine.drain_events().last(),
        Some(&GameEvent::SessionEnded {
            outcome: SessionOutcome::Failed
        })
    );
    assert!(best_swap(&engine).is_none());
}

#[test]
fn test_same_seed_same_events() {
    let config = SessionConfig::default().with_seed(7);
    let mut a = CascadeEngine::new(config).unwrap();
    let mut b = CascadeEngine::new(config).unwrap();
    assert_eq!(a.drain_events(), b.drain_events());

    for _ in 0..5 {
        let Some(hint) = best_swap(&a) else {
            break;
        };
        let outcome_a = a.swap(hint.from, hint.to).unwrap();
        let outcome_b = b.swap(hint.from, hint.to).unwrap();
        assert_eq!(outcome_a, outcome_b);
        assert_eq!(a.drain_events(), b.drain_events());
        assert_eq!(a.board(), b.board());
    }
}

#[test]
fn test_population_reports_every_cell() {
    let mut engine = CascadeEngine::new(SessionConfig::default()).unwrap();
    let spawned = engine
        .drain_events()
        .iter()
        .filter(|e| matches!(e, GameEvent::TileSpawned { .. }))
        .count();
    assert!(spawned >= 64);
}

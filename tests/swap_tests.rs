//! Swap validation and resolution paths, through the session API

use tile_cascade::core::swap::{attempt_swap, precheck};
use tile_cascade::core::{Board, CascadeEngine, EngineError, SwapOutcome, TileGenerator};
use tile_cascade::types::{GameEvent, Pos, ResolutionPath, SwapRejection, Tile};

fn engine(layout: &str, moves: u32, script: Vec<u8>) -> CascadeEngine {
    let board = Board::parse(layout).unwrap();
    CascadeEngine::from_board(board, moves, TileGenerator::scripted(script, 8), Vec::new()).unwrap()
}

#[test]
fn test_adjacency_is_checked_before_tile_kinds() {
    let board = Board::parse("#.A").unwrap();
    assert_eq!(
        precheck(&board, Pos::new(0, 0), Pos::new(2, 0)),
        Err(SwapRejection::NotAdjacent)
    );
    assert_eq!(
        precheck(&board, Pos::new(0, 0), Pos::new(1, 0)),
        Err(SwapRejection::BlockerEndpoint)
    );
    assert_eq!(
        precheck(&board, Pos::new(1, 0), Pos::new(2, 0)),
        Err(SwapRejection::EmptyEndpoint)
    );
}

#[test]
fn test_diagonal_swap_is_rejected_without_consuming_a_move() {
    let mut e = engine("#DC\nDAD\nABA", 5, vec![4]);
    let outcome = e.request_swap(0, 0, 1, 1).unwrap();
    assert_eq!(outcome, SwapOutcome::Rejected(SwapRejection::NotAdjacent));
    assert_eq!(e.moves_remaining(), 5);
    assert_eq!(e.state().moves_made, 0);
}

#[test]
fn test_negative_coordinates_are_errors() {
    let mut e = engine("#DC\nDAD\nABA", 5, vec![4]);
    assert_eq!(
        e.request_swap(0, 0, -1, 0),
        Err(EngineError::InvalidCoordinate { x: -1, y: 0 })
    );
    assert_eq!(e.moves_remaining(), 5);
}

#[test]
fn test_blocker_swap_leaves_board_unchanged() {
    let mut e = engine("CDC\nDAD\n#BA", 5, vec![4]);
    let before = e.board().clone();
    let outcome = e.request_swap(0, 0, 1, 0).unwrap();
    assert_eq!(outcome.rejection(), Some(SwapRejection::BlockerEndpoint));
    assert_eq!(e.board(), &before);
}

#[test]
fn test_wildcard_on_wildcard_consumes_both() {
    let mut e = engine(
        "**#\n\
         DEF\n\
         EFD",
        5,
        vec![0, 1],
    );
    let outcome = e.request_swap(0, 2, 1, 2).unwrap();
    let SwapOutcome::Resolved { path, report } = outcome else {
        panic!("swap should resolve");
    };
    assert_eq!(path, ResolutionPath::WildcardActivation);
    assert_eq!(report.tiles_destroyed, 2);
    assert_eq!(report.tiles_refilled, 2);
    assert_eq!(e.board().rows_top_down(), vec!["AB#", "DEF", "EFD"]);
    assert_eq!(e.moves_remaining(), 4);
}

#[test]
fn test_line_tile_swap_needs_no_match() {
    // Swapping a column clearer sideways clears the column it lands in
    let mut e = engine(
        "#DE\n\
         D|F\n\
         EFD",
        5,
        vec![0, 1, 2],
    );
    let outcome = e.request_swap(1, 1, 2, 1).unwrap();
    let SwapOutcome::Resolved { path, report } = outcome else {
        panic!("swap should resolve");
    };
    assert_eq!(path, ResolutionPath::LineActivation);
    // column 2: the line tile plus two coloured tiles
    assert_eq!(report.tiles_destroyed, 3);
    assert_eq!(e.board().rows_top_down(), vec!["#DC", "DFB", "EFA"]);
}

#[test]
fn test_accepted_swap_reports_both_moves_first() {
    let mut e = engine("#DC\nDAD\nABA", 5, vec![4, 5, 6]);
    e.request_swap(1, 1, 1, 0).unwrap();
    let events = e.drain_events();
    assert_eq!(
        events[0],
        GameEvent::TileMoved {
            from: Pos::new(1, 1),
            to: Pos::new(1, 0),
            tile: Tile::Colored(0),
        }
    );
    assert_eq!(
        events[1],
        GameEvent::TileMoved {
            from: Pos::new(1, 0),
            to: Pos::new(1, 1),
            tile: Tile::Colored(1),
        }
    );
}

#[test]
fn test_attempt_swap_on_plain_board() {
    let mut board = Board::parse("ABA\nBAB").unwrap();
    let plan = attempt_swap(&mut board, Pos::new(1, 1), Pos::new(1, 0)).unwrap();
    assert_eq!(plan.path(), ResolutionPath::Match);
    assert_eq!(board.rows_top_down(), vec!["AAA", "BBB"]);
}

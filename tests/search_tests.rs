//! Behavioral search and evaluation checks run through the public API:
//! tactical awareness, termination conditions, and evaluation sanity.

use chess_core::board::Board;
use chess_core::config::SearchConfig;
use chess_core::control::Stopper;
use chess_core::eval;
use chess_core::search;
use chess_core::tt::TranspositionTable;
use chess_core::types::{Move, MoveFlag, MoveList, Square};

fn best_move_at(fen: &str, depth: u32) -> Move {
    let mut board = Board::from_fen(fen).unwrap();
    let mut tt = TranspositionTable::new(4);
    let config = SearchConfig::with_depth(depth);
    let stopper = Stopper::new();
    search::search(&mut board, &mut tt, &config, stopper, |_| {}).expect("a move should be found")
}

#[test]
fn avoids_hanging_the_queen() {
    // White queen on f3 could wander to c6, undefended and forkable by the
    // pawn on b7; any reasonable move avoids giving it away for nothing.
    let mv = best_move_at("r1bqkbnr/pppppppp/2n5/8/4P3/5Q2/PPPP1PPP/RNB1KBNR w KQkq - 0 3", 4);
    assert_ne!(mv.to_uci(), "f3c6", "should not hang the queen on c6");
}

#[test]
fn captures_a_free_piece() {
    // The bishop on c6 hangs to Bxc6 or Nxc6.
    let mv = best_move_at("rnbqk1nr/pppp1ppp/2b5/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 0 4", 4);
    assert_eq!(mv.to(), Square::from_algebraic("c6").unwrap(), "should capture the hanging bishop");
}

#[test]
fn single_legal_move_is_forced() {
    // White king on a1, boxed in by a black rook on h1; a2 is the only flight square.
    let mv = best_move_at("8/8/8/8/8/8/8/K6rk w - - 0 1", 4);
    assert_eq!(mv.to_uci(), "a1a2");
}

#[test]
fn returns_none_when_already_checkmated() {
    let mut board =
        Board::from_fen("rnb1kbnr/pppp1ppp/4p3/8/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 0 1").unwrap();
    let mut tt = TranspositionTable::new(1);
    let config = SearchConfig::with_depth(4);
    let stopper = Stopper::new();
    let best = search::search(&mut board, &mut tt, &config, stopper, |_| {});
    assert!(best.is_none());
}

#[test]
fn iterative_deepening_moves_are_always_legal() {
    for depth in [2, 4] {
        let mut board = Board::startpos();
        let mut tt = TranspositionTable::new(4);
        let config = SearchConfig::with_depth(depth);
        let stopper = Stopper::new();
        let best = search::search(&mut board, &mut tt, &config, stopper, |_| {}).unwrap();

        let mut legal = MoveList::new();
        board.generate_legal(&mut legal);
        assert!(legal.contains(best), "move at depth {depth} should be legal");
    }
}

#[test]
fn draw_by_threefold_repetition_is_detected() {
    let mut board = Board::startpos();
    let shuffle = [
        ("g1", "f3"),
        ("g8", "f6"),
        ("f3", "g1"),
        ("f6", "g8"),
    ];
    for _ in 0..2 {
        for &(from, to) in &shuffle {
            let mv = Move::new(
                Square::from_algebraic(from).unwrap(),
                Square::from_algebraic(to).unwrap(),
                MoveFlag::Quiet,
            );
            board.make_move(mv);
        }
    }
    assert!(board.is_repetition());
}

#[test]
fn stalemate_has_no_legal_moves_and_no_check() {
    let board = Board::from_fen("k7/8/1QK5/8/8/8/8/8 b - - 0 1").unwrap();
    let mut list = MoveList::new();
    board.generate_legal(&mut list);
    assert!(list.is_empty());
    assert!(!board.in_check());
}

#[test]
fn startpos_evaluation_is_exactly_balanced() {
    let board = Board::startpos();
    assert_eq!(eval::evaluate(&board), 0);
}

#[test]
fn missing_queen_is_a_large_material_swing() {
    let white_up = Board::from_fen("rnb1kbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap();
    let black_up = Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNB1KBNR w KQkq - 0 1").unwrap();
    assert!(eval::evaluate(&white_up) > 800);
    assert!(eval::evaluate(&black_up) < -800);
}

#[test]
fn search_at_moderate_depth_completes_quickly() {
    use std::time::{Duration, Instant};

    let mut board = Board::startpos();
    let mut tt = TranspositionTable::new(16);
    let config = SearchConfig::with_depth(6);
    let stopper = Stopper::new();

    let start = Instant::now();
    let best = search::search(&mut board, &mut tt, &config, stopper, |_| {});
    assert!(best.is_some());
    assert!(start.elapsed() < Duration::from_secs(60));
}

//! Integration tests for the `search::search` entry point: depth- and
//! time-bounded invocations through the public API.

use std::time::{Duration, Instant};

use chess_core::board::Board;
use chess_core::config::SearchConfig;
use chess_core::control::Stopper;
use chess_core::search;
use chess_core::tt::TranspositionTable;

#[test]
fn depth_limited_search_returns_a_legal_move() {
    let mut board = Board::startpos();
    let mut tt = TranspositionTable::new(4);
    let config = SearchConfig::with_depth(1);
    let stopper = Stopper::new();

    let best = search::search(&mut board, &mut tt, &config, stopper, |_| {});
    assert!(best.is_some());
}

#[test]
fn time_limited_search_returns_within_budget() {
    let mut board = Board::startpos();
    let mut tt = TranspositionTable::new(4);
    let config = SearchConfig::with_time(Duration::from_millis(50));
    let stopper = Stopper::with_time_limit(Duration::from_millis(50));

    let start = Instant::now();
    let best = search::search(&mut board, &mut tt, &config, stopper, |_| {});
    assert!(best.is_some());
    assert!(start.elapsed() < Duration::from_secs(5), "search overran its time budget");
}

#[test]
fn info_callback_is_invoked_once_per_completed_depth() {
    let mut board = Board::startpos();
    let mut tt = TranspositionTable::new(4);
    let config = SearchConfig::with_depth(3);
    let stopper = Stopper::new();

    let mut depths_seen = Vec::new();
    search::search(&mut board, &mut tt, &config, stopper, |info| {
        depths_seen.push(info.depth.expect("depth should always be set"));
    });

    assert_eq!(depths_seen, vec![1, 2, 3]);
}

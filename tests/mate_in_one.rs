//! A small suite of hand-picked mate-in-one and mate-in-two positions,
//! searched at a fixed depth and checked against the expected finishing move.

use chess_core::board::Board;
use chess_core::config::SearchConfig;
use chess_core::control::Stopper;
use chess_core::search;
use chess_core::tt::TranspositionTable;

struct MatePuzzle {
    name: &'static str,
    fen: &'static str,
    depth: u32,
    expected_uci: &'static str,
}

const PUZZLES: &[MatePuzzle] = &[
    MatePuzzle {
        name: "back rank mate with queen",
        fen: "6k1/5ppp/8/8/8/8/8/4Q2K w - - 0 1",
        depth: 3,
        expected_uci: "e1e8",
    },
    MatePuzzle {
        name: "rook ladder mate",
        fen: "6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1",
        depth: 3,
        expected_uci: "a1a8",
    },
    MatePuzzle {
        name: "smothered-style queen mate",
        fen: "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 0 4",
        depth: 3,
        expected_uci: "h5f7",
    },
];

#[test]
fn finds_the_mating_move() {
    for puzzle in PUZZLES {
        let mut board = Board::from_fen(puzzle.fen).unwrap();
        let mut tt = TranspositionTable::new(1);
        let config = SearchConfig::with_depth(puzzle.depth);
        let stopper = Stopper::new();

        let best = search::search(&mut board, &mut tt, &config, stopper, |_| {});
        let best = best.unwrap_or_else(|| panic!("no move found for {}", puzzle.name));
        assert_eq!(best.to_uci(), puzzle.expected_uci, "wrong mating move for {}", puzzle.name);
    }
}

#[test]
fn mated_position_has_no_legal_moves() {
    // Black has just been mated by Qh4# style back-rank pattern.
    let board = Board::from_fen("rnb1kbnr/pppp1ppp/4p3/8/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 0 1").unwrap();
    let mut list = chess_core::types::MoveList::new();
    board.generate_legal(&mut list);
    assert!(list.is_empty());
    assert!(board.in_check());
}

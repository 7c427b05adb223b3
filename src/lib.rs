//! A bitboard chess engine core: move generation, evaluation, and search,
//! with no UCI/text-protocol front-end — that's left to a caller.

pub mod attacks;
pub mod bitboard;
pub mod board;
pub mod config;
pub mod control;
pub mod error;
pub mod eval;
pub mod info;
pub mod ordering;
pub mod search;
pub mod see;
pub mod tt;
pub mod types;
pub mod zobrist;

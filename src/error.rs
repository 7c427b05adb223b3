//! Small error types for the crate's boundary operations (FEN parsing,
//! search misconfiguration). Internal invariants — conditions a correct
//! caller can never trigger — use `debug_assert!` instead, since a release
//! build should degrade rather than panic on a bug that slipped through.

use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BoardError {
    MalformedFen(String),
    BadPieceChar(char),
    BadSideToMove(String),
    BadCastlingChar(char),
    BadEpSquare(String),
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::MalformedFen(s) => write!(f, "malformed FEN: {s}"),
            BoardError::BadPieceChar(c) => write!(f, "invalid piece character: {c}"),
            BoardError::BadSideToMove(s) => write!(f, "invalid side-to-move field: {s}"),
            BoardError::BadCastlingChar(c) => write!(f, "invalid castling-rights character: {c}"),
            BoardError::BadEpSquare(s) => write!(f, "invalid en-passant square: {s}"),
        }
    }
}

impl std::error::Error for BoardError {}

/// Misuse of the search entry point itself — never expected on a correct
/// call path, distinct from the recoverable `BoardError` parsing surface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchError {
    MissingStopper,
    EmptyMoveList,
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::MissingStopper => write!(f, "search called without a stop oracle"),
            SearchError::EmptyMoveList => write!(f, "search called on a position with no legal moves"),
        }
    }
}

impl std::error::Error for SearchError {}

//! Zobrist hashing for chess positions.
//!
//! Provides incrementally-updatable 64-bit position hashes for transposition tables.

use rand::prelude::*;

struct ZobristKeys {
    /// piece_keys[color][piece_type][square]
    piece_keys: [[[u64; 64]; 6]; 2],
    black_to_move: u64,
    castling: [u64; 16],
    en_passant_file: [u64; 8],
}

impl ZobristKeys {
    fn new() -> Self {
        // Fixed seed: hashes must be stable across runs so perft/TT-based
        // tests are deterministic.
        let mut rng = StdRng::seed_from_u64(1234567890_u64);
        let mut piece_keys = [[[0u64; 64]; 6]; 2];
        for color in piece_keys.iter_mut() {
            for piece in color.iter_mut() {
                for key in piece.iter_mut() {
                    *key = rng.gen();
                }
            }
        }
        let black_to_move = rng.gen();
        let mut castling = [0u64; 16];
        for key in castling.iter_mut() {
            *key = rng.gen();
        }
        let mut en_passant_file = [0u64; 8];
        for key in en_passant_file.iter_mut() {
            *key = rng.gen();
        }
        ZobristKeys { piece_keys, black_to_move, castling, en_passant_file }
    }
}

static ZOBRIST: std::sync::LazyLock<ZobristKeys> = std::sync::LazyLock::new(ZobristKeys::new);

#[inline]
pub fn piece_key(color_idx: usize, piece_idx: usize, square_idx: usize) -> u64 {
    ZOBRIST.piece_keys[color_idx][piece_idx][square_idx]
}

#[inline]
pub fn side_to_move_key() -> u64 {
    ZOBRIST.black_to_move
}

#[inline]
pub fn castling_key(rights: u8) -> u64 {
    ZOBRIST.castling[rights as usize]
}

#[inline]
pub fn en_passant_key(file: u8) -> u64 {
    ZOBRIST.en_passant_file[file as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_stable_across_calls() {
        assert_eq!(piece_key(0, 0, 0), piece_key(0, 0, 0));
    }

    #[test]
    fn distinct_squares_get_distinct_keys() {
        assert_ne!(piece_key(0, 0, 0), piece_key(0, 0, 1));
    }
}

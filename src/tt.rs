//! Transposition table for caching search results.
//!
//! Uses Zobrist hashes to store and retrieve position evaluations,
//! enabling significant search tree pruning.

use std::mem;

use crate::types::{Move, MATE_THRESHOLD};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundType {
    Exact,
    LowerBound, // failed low, score <= alpha
    UpperBound, // failed high, score >= beta
}

#[derive(Clone, Debug)]
pub(crate) struct TTEntry {
    hash: u64,
    depth: u32,
    score: i32,
    eval: i32,
    bound_type: BoundType,
    best_move: Option<Move>,
    generation: u16,
}

impl TTEntry {
    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn eval(&self) -> i32 {
        self.eval
    }

    pub fn bound_type(&self) -> BoundType {
        self.bound_type
    }

    pub fn best_move(&self) -> Option<Move> {
        self.best_move
    }
}

/// Converts a mate score found `ply` nodes below the root into one relative
/// to the root, so it can be compared against scores found at other plies.
/// Applied on store (ply -> 0) and inverted on probe (0 -> ply).
fn to_tt_score(score: i32, ply: i32) -> i32 {
    if score > MATE_THRESHOLD {
        score + ply
    } else if score < -MATE_THRESHOLD {
        score - ply
    } else {
        score
    }
}

fn from_tt_score(score: i32, ply: i32) -> i32 {
    if score > MATE_THRESHOLD {
        score - ply
    } else if score < -MATE_THRESHOLD {
        score + ply
    } else {
        score
    }
}

pub struct TranspositionTable {
    table: Vec<[Option<TTEntry>; 4]>,
    mask: usize,
    occupied: usize,
}

impl TranspositionTable {
    #[must_use]
    pub fn new(size_mb: usize) -> Self {
        let entry_size = mem::size_of::<[Option<TTEntry>; 4]>();
        let mut num_entries = (size_mb * 1024 * 1024) / entry_size;

        num_entries = num_entries.next_power_of_two() / 2;
        if num_entries == 0 {
            num_entries = 1024;
        }

        #[cfg(feature = "logging")]
        log::debug!("allocating transposition table: {size_mb}MB, {num_entries} buckets");

        TranspositionTable {
            table: vec![[None, None, None, None]; num_entries],
            mask: num_entries - 1,
            occupied: 0,
        }
    }

    fn index(&self, hash: u64) -> usize {
        (hash as usize) & self.mask
    }

    /// Probe for `hash`, translating any stored mate score from root-relative
    /// back to the caller's `ply`.
    pub(crate) fn probe(&self, hash: u64, ply: u32) -> Option<TTEntry> {
        let index = self.index(hash);
        let bucket = &self.table[index];
        bucket.iter().flatten().find(|entry| entry.hash == hash).map(|entry| {
            let mut adjusted = entry.clone();
            adjusted.score = from_tt_score(entry.score, ply as i32);
            adjusted
        })
    }

    /// Store an entry, translating a mate score found at `ply` into a
    /// root-relative one before it lands in the table.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn store(
        &mut self,
        hash: u64,
        depth: u32,
        score: i32,
        eval: i32,
        ply: u32,
        bound_type: BoundType,
        best_move: Option<Move>,
        generation: u16,
    ) {
        let score = to_tt_score(score, ply as i32);
        let index = self.index(hash);
        let bucket = &mut self.table[index];

        for slot in bucket.iter_mut() {
            if let Some(existing) = slot {
                if existing.hash == hash {
                    // Keep the existing entry if it was searched deeper and
                    // the new one isn't an exact bound — a shallow fail-
                    // low/fail-high shouldn't clobber a deep exact score.
                    if existing.depth > depth && bound_type != BoundType::Exact {
                        return;
                    }
                    *slot = Some(TTEntry { hash, depth, score, eval, bound_type, best_move, generation });
                    return;
                }
            }
        }

        for slot in bucket.iter_mut() {
            if slot.is_none() {
                *slot = Some(TTEntry { hash, depth, score, eval, bound_type, best_move, generation });
                self.occupied += 1;
                return;
            }
        }

        let mut replace_idx = 0;
        let mut worst_priority = i32::MAX;

        for (idx, slot) in bucket.iter().enumerate() {
            if let Some(entry) = slot {
                let age = generation.wrapping_sub(entry.generation);
                let priority = entry.depth.saturating_mul(2) as i32 - age as i32;
                if idx == 0 || priority < worst_priority {
                    replace_idx = idx;
                    worst_priority = priority;
                }
            }
        }

        bucket[replace_idx] = Some(TTEntry { hash, depth, score, eval, bound_type, best_move, generation });
    }

    #[must_use]
    pub fn hashfull_per_mille(&self) -> u32 {
        let total_slots = self.table.len().saturating_mul(4);
        if total_slots == 0 {
            return 0;
        }
        ((self.occupied as u64 * 1000) / total_slots as u64) as u32
    }

    pub fn clear(&mut self) {
        for bucket in self.table.iter_mut() {
            *bucket = [None, None, None, None];
        }
        self.occupied = 0;
    }
}

//! Tunable search parameters, separated from the search driver so callers
//! can adjust node/time limits and TT size without touching `search.rs`.

use std::time::Duration;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug)]
pub struct SearchConfig {
    pub max_depth: u32,
    pub max_time: Option<Duration>,
    pub max_nodes: Option<u64>,
    pub tt_size_mb: usize,
    /// Heuristic toggles, on by default. Turning one off isolates it for
    /// testing/debugging without touching `search.rs` — the struct-field
    /// equivalent of the teacher's `set_ordering_enabled`-style globals.
    pub null_move: bool,
    pub lmr: bool,
    pub futility: bool,
    pub see_pruning: bool,
    pub singular_extensions: bool,
}

impl SearchConfig {
    #[must_use]
    pub fn with_depth(max_depth: u32) -> Self {
        SearchConfig { max_depth, ..SearchConfig::default() }
    }

    #[must_use]
    pub fn with_time(max_time: Duration) -> Self {
        SearchConfig {
            max_depth: crate::types::MAX_PLY as u32,
            max_time: Some(max_time),
            ..SearchConfig::default()
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            max_depth: 6,
            max_time: None,
            max_nodes: None,
            tt_size_mb: 16,
            null_move: true,
            lmr: true,
            futility: true,
            see_pruning: true,
            singular_extensions: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_depth_leaves_time_unset() {
        let cfg = SearchConfig::with_depth(8);
        assert_eq!(cfg.max_depth, 8);
        assert!(cfg.max_time.is_none());
    }

    #[test]
    fn heuristic_toggles_default_enabled_and_can_be_disabled() {
        let mut cfg = SearchConfig::with_depth(4);
        assert!(cfg.null_move && cfg.lmr && cfg.futility && cfg.see_pruning && cfg.singular_extensions);
        cfg.null_move = false;
        cfg.singular_extensions = false;
        assert!(!cfg.null_move);
        assert!(!cfg.singular_extensions);
        assert!(cfg.lmr, "disabling one toggle should not affect the others");
    }
}

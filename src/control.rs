//! Cooperative search cancellation.
//!
//! A `Stopper` is polled periodically by the search driver (every 2048
//! nodes, matching the original engine's `communicate()` cadence) rather
//! than on every node, to keep the check cheap.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Nodes between cancellation polls.
pub const POLL_INTERVAL: u64 = 2048;

/// Thread-safe stop flag shared between a search thread and its caller.
#[derive(Clone, Debug)]
pub struct Stopper {
    flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
    node_limit: Option<u64>,
    nodes: Arc<AtomicU64>,
}

impl Stopper {
    #[must_use]
    pub fn new() -> Self {
        Stopper {
            flag: Arc::new(AtomicBool::new(false)),
            deadline: None,
            node_limit: None,
            nodes: Arc::new(AtomicU64::new(0)),
        }
    }

    #[must_use]
    pub fn with_time_limit(max_time: Duration) -> Self {
        let mut s = Stopper::new();
        s.deadline = Some(Instant::now() + max_time);
        s
    }

    #[must_use]
    pub fn with_node_limit(max_nodes: u64) -> Self {
        let mut s = Stopper::new();
        s.node_limit = Some(max_nodes);
        s
    }

    pub fn stop(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn reset(&self) {
        self.flag.store(false, Ordering::Relaxed);
        self.nodes.store(0, Ordering::Relaxed);
    }

    #[inline]
    pub fn node_visited(&self) -> u64 {
        self.nodes.fetch_add(1, Ordering::Relaxed) + 1
    }

    #[inline]
    #[must_use]
    pub fn nodes(&self) -> u64 {
        self.nodes.load(Ordering::Relaxed)
    }

    /// Cheap poll: must only be called every `POLL_INTERVAL` nodes.
    #[must_use]
    pub fn should_stop(&self) -> bool {
        if self.flag.load(Ordering::Relaxed) {
            return true;
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return true;
            }
        }
        if let Some(limit) = self.node_limit {
            if self.nodes.load(Ordering::Relaxed) >= limit {
                return true;
            }
        }
        false
    }
}

impl Default for Stopper {
    fn default() -> Self {
        Self::new()
    }
}

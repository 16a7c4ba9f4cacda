use std::time::Instant;

use tracing::trace;

use super::memory::MiningStats;

/// Driver phases, entered strictly in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MiningPhase {
    Seed,
    Expand,
    Drain,
    Done,
}

/// State owned by exactly one run: the rising support threshold, the phase
/// and the counters. Nothing here outlives the call that created it.
#[derive(Debug)]
pub struct MiningSession {
    /// Minimum support a rule needs to enter the top-k set
    min_support: u32,
    phase: MiningPhase,
    next_id: u64,
    stats: MiningStats,
    started: Instant,
}

impl MiningSession {
    pub fn new() -> Self {
        Self {
            min_support: 1,
            phase: MiningPhase::Seed,
            next_id: 0,
            stats: MiningStats::default(),
            started: Instant::now(),
        }
    }

    pub fn min_support(&self) -> u32 {
        self.min_support
    }

    /// The threshold never decreases.
    pub fn raise_min_support(&mut self, support: u32) {
        assert!(
            support >= self.min_support,
            "support threshold would drop from {} to {}",
            self.min_support,
            support
        );
        if support > self.min_support {
            trace!(from = self.min_support, to = support, "raised minimum support");
            self.min_support = support;
            self.stats.threshold_raises += 1;
        }
    }

    /// Creation order for the next candidate; breaks ranking ties.
    pub fn next_candidate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn phase(&self) -> MiningPhase {
        self.phase
    }

    pub fn enter(&mut self, next: MiningPhase) {
        assert!(
            next > self.phase,
            "cannot enter {:?} from {:?}",
            next,
            self.phase
        );
        self.phase = next;
    }

    /// Records a frontier size after a registration.
    pub fn observe_frontier(&mut self, len: usize, bytes: usize) {
        self.stats.candidates_generated += 1;
        if len > self.stats.max_candidate_count {
            self.stats.max_candidate_count = len;
        }
        if bytes > self.stats.peak_frontier_bytes {
            self.stats.peak_frontier_bytes = bytes;
        }
    }

    pub fn record_pruned(&mut self, count: usize) {
        self.stats.pruned_items += count;
    }

    pub fn stats(&self) -> &MiningStats {
        &self.stats
    }

    pub(crate) fn stats_mut(&mut self) -> &mut MiningStats {
        &mut self.stats
    }

    pub fn finish(mut self) -> MiningStats {
        self.stats.final_min_support = self.min_support;
        self.stats.elapsed = self.started.elapsed();
        self.stats
    }
}

impl Default for MiningSession {
    fn default() -> Self {
        Self::new()
    }
}

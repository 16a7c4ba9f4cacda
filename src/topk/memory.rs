use std::time::Duration;

use super::rule::RuleCandidate;

/// Counters collected over one mining run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MiningStats {
    pub transactions: usize,
    pub max_item: u32,
    pub candidates_generated: usize,
    /// High-water mark of the frontier.
    pub max_candidate_count: usize,
    /// Approximate frontier footprint when it was largest.
    pub peak_frontier_bytes: usize,
    /// Infrequent items compacted out of the scan buffer.
    pub pruned_items: usize,
    pub threshold_raises: usize,
    pub final_min_support: u32,
    pub elapsed: Duration,
}

impl MiningStats {
    pub fn peak_frontier_mb(&self) -> f64 {
        self.peak_frontier_bytes as f64 / (1024.0 * 1024.0)
    }
}

/// Rough heap plus inline size of a candidate. `tids1` is shared between
/// siblings and is not counted.
pub fn estimate_candidate_size(candidate: &RuleCandidate) -> usize {
    let items = candidate.antecedent().len() + candidate.consequent().len();
    std::mem::size_of::<RuleCandidate>()
        + items * std::mem::size_of::<u32>()
        + candidate.common().serialized_size()
}

pub fn estimate_transactions_size(transactions: &[Vec<u32>]) -> usize {
    let item_size = std::mem::size_of::<u32>();
    transactions
        .iter()
        .map(|items| std::mem::size_of::<Vec<u32>>() + items.capacity() * item_size)
        .sum()
}

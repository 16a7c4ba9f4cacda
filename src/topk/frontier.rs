use std::collections::BinaryHeap;

use super::memory::estimate_candidate_size;
use super::rule::{Ranked, RuleCandidate};

/// Candidates waiting to be expanded, popped strongest first.
#[derive(Debug, Default)]
pub struct CandidateFrontier {
    heap: BinaryHeap<Ranked>,
    bytes: usize,
}

impl CandidateFrontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, candidate: RuleCandidate) {
        self.bytes += estimate_candidate_size(&candidate);
        self.heap.push(Ranked(candidate));
    }

    pub fn pop(&mut self) -> Option<RuleCandidate> {
        let Ranked(candidate) = self.heap.pop()?;
        self.bytes = self.bytes.saturating_sub(estimate_candidate_size(&candidate));
        Some(candidate)
    }

    pub fn peek_support(&self) -> Option<u32> {
        self.heap.peek().map(|Ranked(candidate)| candidate.support())
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Estimated footprint of the queued candidates.
    pub fn approx_bytes(&self) -> usize {
        self.bytes
    }
}

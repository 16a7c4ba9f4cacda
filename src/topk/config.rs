use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::error::{MiningError, Result};

/// Whether the top-k set keeps redundant rules (TopKRules) or removes rules
/// subsumed by an equally supported, equally confident rule (TNR).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redundancy {
    Keep,
    /// `delta` extra slots are held during the run and trimmed at the end.
    Eliminate { delta: usize },
}

#[derive(Debug, Clone)]
pub struct MinerConfig {
    pub k: usize,
    pub min_confidence: f64,
    pub redundancy: Redundancy,
    pub max_antecedent_size: Option<usize>,
    pub max_consequent_size: Option<usize>,
    pub parallel_seed: bool,
    pub cancel_flag: Option<Arc<AtomicBool>>,
}

impl MinerConfig {
    pub fn new(k: usize, min_confidence: f64) -> Self {
        Self {
            k,
            min_confidence,
            redundancy: Redundancy::Keep,
            max_antecedent_size: None,
            max_consequent_size: None,
            parallel_seed: false,
            cancel_flag: None,
        }
    }

    pub fn with_delta(mut self, delta: usize) -> Self {
        self.redundancy = Redundancy::Eliminate { delta };
        self
    }

    pub fn with_max_antecedent_size(mut self, size: usize) -> Self {
        self.max_antecedent_size = Some(size);
        self
    }

    pub fn with_max_consequent_size(mut self, size: usize) -> Self {
        self.max_consequent_size = Some(size);
        self
    }

    pub fn with_parallel_seed(mut self, parallel: bool) -> Self {
        self.parallel_seed = parallel;
        self
    }

    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel_flag = Some(flag);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.k == 0 {
            return Err(MiningError::invalid("k must be at least 1"));
        }
        if !self.min_confidence.is_finite() || !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(MiningError::invalid(format!(
                "min_confidence must lie in [0, 1], got {}",
                self.min_confidence
            )));
        }
        if self.max_antecedent_size == Some(0) || self.max_consequent_size == Some(0) {
            return Err(MiningError::invalid("rule side size limits must be at least 1"));
        }
        Ok(())
    }

    pub(crate) fn can_grow_antecedent(&self, len: usize) -> bool {
        self.max_antecedent_size.map_or(true, |max| len < max)
    }

    pub(crate) fn can_grow_consequent(&self, len: usize) -> bool {
        self.max_consequent_size.map_or(true, |max| len < max)
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancel_flag
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

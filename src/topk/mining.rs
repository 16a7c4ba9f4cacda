use std::sync::Arc;

use rayon::prelude::*;
use roaring::RoaringBitmap;
use tracing::{debug, info, warn};

use super::config::MinerConfig;
use super::database::{TransactionStore, VerticalIndex};
use super::error::{MiningError, Result};
use super::expansion::ScanBuffer;
use super::frontier::CandidateFrontier;
use super::memory::{estimate_transactions_size, MiningStats};
use super::rule::{AssociationRule, RuleCandidate};
use super::state::{MiningPhase, MiningSession};
use super::top_set::TopKSet;

/// Rules of one run, strongest first, with the run's counters.
#[derive(Debug, Clone)]
pub struct MiningResult {
    pub rules: Vec<AssociationRule>,
    pub stats: MiningStats,
}

#[derive(Debug, Clone)]
pub struct TopKMiner {
    config: MinerConfig,
}

impl TopKMiner {
    pub fn new(config: MinerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MinerConfig {
        &self.config
    }

    /// Finds the `k` rules of highest support whose confidence reaches
    /// `min_confidence`. Fewer rules come back when the database has fewer.
    pub fn mine(&self, store: &TransactionStore) -> Result<MiningResult> {
        self.config.validate()?;
        if store.transaction_count() == 0 {
            return Err(MiningError::invalid("the database holds no transactions"));
        }

        let mut run = MiningRun::new(&self.config, store);

        run.seed();
        debug!(
            candidates = run.frontier.len(),
            held = run.top_set.len(),
            min_support = run.session.min_support(),
            "seeded 1-1 rules"
        );

        run.session.enter(MiningPhase::Expand);
        run.expand()?;

        run.session.enter(MiningPhase::Drain);
        run.top_set.clean_result(&mut run.session);

        run.session.enter(MiningPhase::Done);
        Ok(run.finish())
    }
}

/// TopKRules: no redundancy elimination.
pub fn top_k_rules(store: &TransactionStore, k: usize, min_confidence: f64) -> Result<MiningResult> {
    TopKMiner::new(MinerConfig::new(k, min_confidence)).mine(store)
}

/// TNR: rules subsumed by an equally supported and confident rule are
/// dropped. `delta` extra slots improve the approximation.
pub fn top_k_non_redundant_rules(
    store: &TransactionStore,
    k: usize,
    min_confidence: f64,
    delta: usize,
) -> Result<MiningResult> {
    TopKMiner::new(MinerConfig::new(k, min_confidence).with_delta(delta)).mine(store)
}

/// Everything one call to [`TopKMiner::mine`] works on.
pub(crate) struct MiningRun<'a> {
    pub(crate) config: &'a MinerConfig,
    pub(crate) index: &'a VerticalIndex,
    pub(crate) buffer: ScanBuffer,
    pub(crate) top_set: TopKSet,
    pub(crate) frontier: CandidateFrontier,
    pub(crate) session: MiningSession,
}

impl<'a> MiningRun<'a> {
    pub(crate) fn new(config: &'a MinerConfig, store: &'a TransactionStore) -> Self {
        let index = store.vertical_index();
        let buffer = ScanBuffer::new(
            store
                .transactions()
                .iter()
                .map(|items| index.to_slots(items))
                .collect(),
        );
        debug!(
            bytes = estimate_transactions_size(buffer.transactions()),
            "copied transactions into the scan buffer"
        );

        let mut session = MiningSession::new();
        session.stats_mut().transactions = store.transaction_count();
        session.stats_mut().max_item = store.max_item();

        Self {
            config,
            index,
            buffer,
            top_set: TopKSet::new(config.k, config.redundancy),
            frontier: CandidateFrontier::new(),
            session,
        }
    }

    /// Builds every 1-1 rule `{i} ==> {j}` and `{j} ==> {i}` over pairs of
    /// item slots that still meet the threshold.
    pub(crate) fn seed(&mut self) {
        let index = self.index;
        let item_count = index.item_count() as u32;

        if self.config.parallel_seed {
            // the threshold only rises, so pairs below the current one can
            // never qualify; the rest is re-checked in order below
            let floor = self.session.min_support();
            let pairs: Vec<Vec<(u32, u32, RoaringBitmap)>> = (0..item_count)
                .into_par_iter()
                .map(|i| {
                    if index.support(i) < floor {
                        return Vec::new();
                    }
                    ((i + 1)..item_count)
                        .filter(|&j| index.support(j) >= floor)
                        .filter_map(|j| {
                            let common = index.tidset(i) & index.tidset(j);
                            (common.len() >= u64::from(floor)).then_some((i, j, common))
                        })
                        .collect()
                })
                .collect();

            for (i, j, common) in pairs.into_iter().flatten() {
                self.seed_pair(i, j, common);
            }
        } else {
            for i in 0..item_count {
                if index.support(i) < self.session.min_support() {
                    continue;
                }
                for j in (i + 1)..item_count {
                    if index.support(j) < self.session.min_support() {
                        continue;
                    }
                    let common = index.tidset(i) & index.tidset(j);
                    self.seed_pair(i, j, common);
                }
            }
        }
    }

    fn seed_pair(&mut self, i: u32, j: u32, common: RoaringBitmap) {
        let min_support = self.session.min_support();
        if self.index.support(i) < min_support
            || self.index.support(j) < min_support
            || common.len() < u64::from(min_support)
        {
            return;
        }

        let common = Arc::new(common);
        let id = self.session.next_candidate_id();
        let forward = RuleCandidate::seed(id, i, j, self.index.shared_tidset(i), Arc::clone(&common));
        self.admit(forward);

        let id = self.session.next_candidate_id();
        let backward = RuleCandidate::seed(id, j, i, self.index.shared_tidset(j), common);
        self.admit(backward);
    }

    /// Saves `candidate` if it is confident enough and queues it for
    /// expansion either way: a later extension may still reach the
    /// confidence.
    pub(crate) fn admit(&mut self, candidate: RuleCandidate) {
        if candidate.support() < self.session.min_support() {
            return;
        }
        if candidate.confidence() >= self.config.min_confidence {
            self.top_set.save(candidate.clone(), &mut self.session);
        }
        self.register(candidate);
    }

    fn register(&mut self, candidate: RuleCandidate) {
        let can_grow = self.config.can_grow_consequent(candidate.consequent().len())
            || (candidate.expands_both_sides()
                && self.config.can_grow_antecedent(candidate.antecedent().len()));
        if !can_grow {
            return;
        }
        self.frontier.push(candidate);
        self.session
            .observe_frontier(self.frontier.len(), self.frontier.approx_bytes());
    }

    /// Pops candidates strongest first until none can reach the threshold.
    pub(crate) fn expand(&mut self) -> Result<()> {
        loop {
            if self.config.is_cancelled() {
                warn!(
                    pending = self.frontier.len(),
                    held = self.top_set.len(),
                    "mining cancelled"
                );
                return Err(MiningError::Cancelled);
            }

            let Some(candidate) = self.frontier.pop() else {
                break;
            };
            // supports only decrease from here on
            if candidate.support() < self.session.min_support() {
                break;
            }

            if candidate.expands_both_sides() {
                self.expand_left_right(&candidate);
            } else {
                self.expand_right(&candidate);
            }
        }
        Ok(())
    }

    pub(crate) fn finish(self) -> MiningResult {
        let rules = self.top_set.to_rules(self.index);
        let stats = self.session.finish();
        info!(
            rules = rules.len(),
            min_support = stats.final_min_support,
            candidates = stats.candidates_generated,
            max_candidates = stats.max_candidate_count,
            peak_frontier_mb = stats.peak_frontier_mb(),
            pruned_items = stats.pruned_items,
            elapsed_ms = stats.elapsed.as_millis() as u64,
            "top-k rule mining finished"
        );
        MiningResult { rules, stats }
    }
}

use std::collections::BTreeMap;

use roaring::RoaringBitmap;

use super::mining::MiningRun;
use super::rule::RuleCandidate;

/// Run-local copy of the transactions, in index slots, that is compacted as
/// the support threshold rises. Items stay sorted strictly descending.
#[derive(Debug, Clone)]
pub struct ScanBuffer {
    transactions: Vec<Vec<u32>>,
}

impl ScanBuffer {
    pub fn new(transactions: Vec<Vec<u32>>) -> Self {
        debug_assert!(transactions
            .iter()
            .all(|items| items.windows(2).all(|pair| pair[0] > pair[1])));
        Self { transactions }
    }

    pub fn transaction(&self, tid: u32) -> &[u32] {
        &self.transactions[tid as usize]
    }

    pub fn transactions(&self) -> &[Vec<u32>] {
        &self.transactions
    }

    /// Drops the items of `tid` rejected by `active`; returns how many went.
    pub fn compact(&mut self, tid: u32, mut active: impl FnMut(u32) -> bool) -> usize {
        let items = &mut self.transactions[tid as usize];
        let before = items.len();
        items.retain(|&item| active(item));
        before - items.len()
    }
}

/// Per extension item, the transactions where the extended rule holds.
#[derive(Debug, Default)]
struct Extensions {
    left: BTreeMap<u32, RoaringBitmap>,
    right: BTreeMap<u32, RoaringBitmap>,
}

impl MiningRun<'_> {
    /// Grows the antecedent and the consequent of a rule that has only ever
    /// been extended on the left.
    pub(crate) fn expand_left_right(&mut self, rule: &RuleCandidate) {
        let grow_left = self.config.can_grow_antecedent(rule.antecedent().len());
        let grow_right = self.config.can_grow_consequent(rule.consequent().len());
        let extensions = self.scan(rule, grow_left, grow_right);

        self.add_right_extensions(rule, extensions.right);
        self.add_left_extensions(rule, extensions.left);
    }

    /// Grows only the consequent. Everything produced here stays right-only,
    /// so no rule is reachable along two expansion paths.
    pub(crate) fn expand_right(&mut self, rule: &RuleCandidate) {
        let grow_right = self.config.can_grow_consequent(rule.consequent().len());
        let extensions = self.scan(rule, false, grow_right);

        self.add_right_extensions(rule, extensions.right);
    }

    /// Walks the transactions containing `rule`. Left items must exceed
    /// `max_left` and be absent from the consequent; right items must exceed
    /// `max_right` and be absent from the antecedent.
    fn scan(&mut self, rule: &RuleCandidate, grow_left: bool, grow_right: bool) -> Extensions {
        let mut extensions = Extensions::default();
        let max_left = rule.max_left();
        let max_right = rule.max_right();

        // transactions are descending, nothing below the floor can extend the rule
        let floor = match (grow_left, grow_right) {
            (true, true) => max_left.min(max_right),
            (true, false) => max_left,
            (false, true) => max_right,
            (false, false) => return extensions,
        };

        let index = self.index;
        let min_support = self.session.min_support();
        let mut pruned = 0;

        for tid in rule.common().iter() {
            let mut stale = false;

            for &item in self.buffer.transaction(tid) {
                if item < floor {
                    break;
                }
                if index.support(item) < min_support {
                    stale = true;
                    continue;
                }
                if grow_left && item > max_left && !rule.consequent_contains(item) {
                    extensions.left.entry(item).or_default().insert(tid);
                }
                if grow_right && item > max_right && !rule.antecedent_contains(item) {
                    extensions.right.entry(item).or_default().insert(tid);
                }
            }

            if stale {
                pruned += self
                    .buffer
                    .compact(tid, |item| index.support(item) >= min_support);
            }
        }

        self.session.record_pruned(pruned);
        extensions
    }

    fn add_right_extensions(&mut self, rule: &RuleCandidate, right: BTreeMap<u32, RoaringBitmap>) {
        for (item, common) in right {
            if common.len() < u64::from(self.session.min_support()) {
                continue;
            }
            let id = self.session.next_candidate_id();
            self.admit(rule.extend_right(id, item, common));
        }
    }

    fn add_left_extensions(&mut self, rule: &RuleCandidate, left: BTreeMap<u32, RoaringBitmap>) {
        for (item, common) in left {
            if common.len() < u64::from(self.session.min_support()) {
                continue;
            }
            // a larger antecedent matches fewer transactions
            let tids1 = rule.tids1() & self.index.tidset(item);
            let id = self.session.next_candidate_id();
            self.admit(rule.extend_left(id, item, tids1, common));
        }
    }
}

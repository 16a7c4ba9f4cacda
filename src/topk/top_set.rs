use std::collections::{BTreeMap, BTreeSet};

use super::config::Redundancy;
use super::database::VerticalIndex;
use super::rule::{AssociationRule, Ranked, RuleCandidate};
use super::state::MiningSession;

/// The best rules found so far, bucketed by support so the global minimum
/// and the rules sharing a support value are both one lookup away.
///
/// Holds at most `capacity` rules, except that rules tied with the current
/// threshold are kept until a better rule pushes them out.
#[derive(Debug)]
pub struct TopKSet {
    k: usize,
    capacity: usize,
    redundancy: Redundancy,
    buckets: BTreeMap<u32, BTreeSet<Ranked>>,
    len: usize,
}

impl TopKSet {
    pub fn new(k: usize, redundancy: Redundancy) -> Self {
        let capacity = match redundancy {
            Redundancy::Keep => k,
            Redundancy::Eliminate { delta } => k.saturating_add(delta),
        };
        Self {
            k,
            capacity,
            redundancy,
            buckets: BTreeMap::new(),
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn minimum_support(&self) -> Option<u32> {
        self.buckets.keys().next().copied()
    }

    /// Admits `candidate`, which must already meet the support threshold and
    /// the minimum confidence. Returns false if an equivalent, more general
    /// rule is already held.
    pub fn save(&mut self, candidate: RuleCandidate, session: &mut MiningSession) -> bool {
        debug_assert!(candidate.support() >= session.min_support());
        let support = candidate.support();

        if matches!(self.redundancy, Redundancy::Eliminate { .. })
            && !self.remove_redundant(&candidate)
        {
            return false;
        }

        self.insert(candidate);

        if self.len > self.capacity {
            if support > session.min_support() {
                while self.len > self.capacity {
                    self.pop_minimum();
                }
            }
            if let Some(minimum) = self.minimum_support() {
                session.raise_min_support(minimum);
            }
        }
        true
    }

    /// Compares `candidate` with held rules of the same support and
    /// confidence. Returns false when one of them subsumes the candidate;
    /// otherwise drops the held rules the candidate subsumes.
    fn remove_redundant(&mut self, candidate: &RuleCandidate) -> bool {
        let Some(bucket) = self.buckets.get_mut(&candidate.support()) else {
            return true;
        };

        let equivalent = |held: &RuleCandidate| held.same_confidence(candidate);

        if bucket
            .iter()
            .rev()
            .any(|Ranked(held)| equivalent(held) && held.subsumes(candidate))
        {
            return false;
        }

        let before = bucket.len();
        bucket.retain(|Ranked(held)| !(equivalent(held) && candidate.subsumes(held)));
        self.len -= before - bucket.len();
        if bucket.is_empty() {
            self.buckets.remove(&candidate.support());
        }
        true
    }

    fn insert(&mut self, candidate: RuleCandidate) {
        if self
            .buckets
            .entry(candidate.support())
            .or_default()
            .insert(Ranked(candidate))
        {
            self.len += 1;
        }
    }

    pub fn pop_minimum(&mut self) -> Option<RuleCandidate> {
        let mut lowest = self.buckets.first_entry()?;
        let rule = lowest.get_mut().pop_first().map(|Ranked(rule)| rule);
        if lowest.get().is_empty() {
            lowest.remove();
        }
        if rule.is_some() {
            self.len -= 1;
        }
        rule
    }

    /// Trims to the requested `k` and settles the threshold on the weakest
    /// remaining rule.
    pub fn clean_result(&mut self, session: &mut MiningSession) {
        while self.len > self.k {
            self.pop_minimum();
        }
        if let Some(minimum) = self.minimum_support() {
            session.raise_min_support(minimum);
        }
        assert!(self.len <= self.k, "top-k set holds {} rules after trimming to {}", self.len, self.k);
    }

    /// Held rules from the strongest to the weakest.
    pub fn iter(&self) -> impl Iterator<Item = &RuleCandidate> {
        self.buckets
            .values()
            .rev()
            .flat_map(|bucket| bucket.iter().rev().map(|Ranked(rule)| rule))
    }

    /// Held rules with their slots mapped back to item ids.
    pub fn to_rules(&self, index: &VerticalIndex) -> Vec<AssociationRule> {
        self.iter()
            .map(|rule| AssociationRule::from_candidate(rule, index))
            .collect()
    }
}

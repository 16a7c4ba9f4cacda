use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use roaring::RoaringBitmap;

use super::database::VerticalIndex;

/// A rule under construction: `antecedent ==> consequent` with the tidsets
/// needed to extend it without rescanning the whole database.
///
/// Items are slots of the vertical index. Both sides are ascending and
/// disjoint. `tids1` holds the transactions containing the antecedent,
/// `common` those containing the whole rule.
/// `id` is the creation order within a run.
#[derive(Debug, Clone)]
pub struct RuleCandidate {
    id: u64,
    antecedent: Vec<u32>,
    consequent: Vec<u32>,
    support: u32,
    tids1: Arc<RoaringBitmap>,
    common: Arc<RoaringBitmap>,
    max_left: u32,
    max_right: u32,
    expand_lr: bool,
}

impl RuleCandidate {
    /// The 1-1 rule `{left} ==> {right}`.
    pub fn seed(
        id: u64,
        left: u32,
        right: u32,
        tids1: Arc<RoaringBitmap>,
        common: Arc<RoaringBitmap>,
    ) -> Self {
        Self {
            id,
            antecedent: vec![left],
            consequent: vec![right],
            support: common.len() as u32,
            tids1,
            common,
            max_left: left,
            max_right: right,
            expand_lr: true,
        }
    }

    /// Appends `item` to the consequent. The antecedent and its tidset are shared.
    pub fn extend_right(&self, id: u64, item: u32, common: RoaringBitmap) -> Self {
        debug_assert!(item > self.max_right);
        let mut consequent = Vec::with_capacity(self.consequent.len() + 1);
        consequent.extend_from_slice(&self.consequent);
        consequent.push(item);

        Self {
            id,
            antecedent: self.antecedent.clone(),
            consequent,
            support: common.len() as u32,
            tids1: Arc::clone(&self.tids1),
            common: Arc::new(common),
            max_left: self.max_left,
            max_right: item,
            expand_lr: false,
        }
    }

    /// Appends `item` to the antecedent; `tids1` must already be narrowed to it.
    pub fn extend_left(
        &self,
        id: u64,
        item: u32,
        tids1: RoaringBitmap,
        common: RoaringBitmap,
    ) -> Self {
        debug_assert!(item > self.max_left);
        let mut antecedent = Vec::with_capacity(self.antecedent.len() + 1);
        antecedent.extend_from_slice(&self.antecedent);
        antecedent.push(item);

        Self {
            id,
            antecedent,
            consequent: self.consequent.clone(),
            support: common.len() as u32,
            tids1: Arc::new(tids1),
            common: Arc::new(common),
            max_left: item,
            max_right: self.max_right,
            expand_lr: true,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn antecedent(&self) -> &[u32] {
        &self.antecedent
    }

    pub fn consequent(&self) -> &[u32] {
        &self.consequent
    }

    pub fn support(&self) -> u32 {
        self.support
    }

    /// Number of transactions containing the antecedent.
    pub fn antecedent_support(&self) -> u64 {
        self.tids1.len()
    }

    pub fn tids1(&self) -> &RoaringBitmap {
        &self.tids1
    }

    pub fn common(&self) -> &RoaringBitmap {
        &self.common
    }

    pub fn max_left(&self) -> u32 {
        self.max_left
    }

    pub fn max_right(&self) -> u32 {
        self.max_right
    }

    pub fn expands_both_sides(&self) -> bool {
        self.expand_lr
    }

    pub fn confidence(&self) -> f64 {
        self.support as f64 / self.tids1.len() as f64
    }

    pub fn antecedent_contains(&self, item: u32) -> bool {
        self.antecedent.binary_search(&item).is_ok()
    }

    pub fn consequent_contains(&self, item: u32) -> bool {
        self.consequent.binary_search(&item).is_ok()
    }

    /// Ranking used by the top-k set and the frontier: support, antecedent
    /// size, consequent size, confidence, then earlier creation ranks higher
    /// so that ties resolve the same way on every run.
    pub fn rank(&self, other: &Self) -> Ordering {
        self.support
            .cmp(&other.support)
            .then_with(|| self.antecedent.len().cmp(&other.antecedent.len()))
            .then_with(|| self.consequent.len().cmp(&other.consequent.len()))
            .then_with(|| self.cmp_confidence(other))
            .then_with(|| other.id.cmp(&self.id))
            .then_with(|| self.antecedent.cmp(&other.antecedent))
            .then_with(|| self.consequent.cmp(&other.consequent))
    }

    /// Exact confidence comparison by cross-multiplication.
    fn cmp_confidence(&self, other: &Self) -> Ordering {
        let lhs = self.support as u64 * other.antecedent_support();
        let rhs = other.support as u64 * self.antecedent_support();
        lhs.cmp(&rhs)
    }

    pub fn same_confidence(&self, other: &Self) -> bool {
        self.cmp_confidence(other) == Ordering::Equal
    }

    /// `self` makes `other` redundant: a smaller (or equal) antecedent that
    /// concludes a larger (or equal) consequent.
    pub fn subsumes(&self, other: &Self) -> bool {
        self.antecedent.len() <= other.antecedent.len()
            && self.consequent.len() >= other.consequent.len()
            && is_subset(&self.antecedent, &other.antecedent)
            && is_subset(&other.consequent, &self.consequent)
    }
}

/// Both slices ascending.
fn is_subset(small: &[u32], large: &[u32]) -> bool {
    let mut rest = large.iter();
    small
        .iter()
        .all(|item| rest.by_ref().any(|candidate| candidate == item))
}

impl PartialEq for RuleCandidate {
    fn eq(&self, other: &Self) -> bool {
        self.antecedent == other.antecedent && self.consequent == other.consequent
    }
}

impl Eq for RuleCandidate {}

/// Orders candidates by [`RuleCandidate::rank`] inside ordered containers.
#[derive(Debug, Clone)]
pub(crate) struct Ranked(pub(crate) RuleCandidate);

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ranked {}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.rank(&other.0)
    }
}

/// A mined rule, detached from its tidsets.
#[derive(Debug, Clone, PartialEq)]
pub struct AssociationRule {
    pub antecedent: Vec<u32>,
    pub consequent: Vec<u32>,
    pub support: u32,
    pub confidence: f64,
}

impl AssociationRule {
    /// Detaches `candidate`, whose sides hold slots of `index`.
    pub fn from_candidate(candidate: &RuleCandidate, index: &VerticalIndex) -> Self {
        let items = |slots: &[u32]| -> Vec<u32> { slots.iter().map(|&slot| index.item(slot)).collect() };
        Self {
            antecedent: items(&candidate.antecedent),
            consequent: items(&candidate.consequent),
            support: candidate.support,
            confidence: candidate.confidence(),
        }
    }
}

fn write_items(f: &mut fmt::Formatter<'_>, items: &[u32]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for AssociationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_items(f, &self.antecedent)?;
        f.write_str(" ==> ")?;
        write_items(f, &self.consequent)?;
        write!(f, " #SUP: {} #CONF: {:?}", self.support, self.confidence)
    }
}

//! Canonical itemset representation

use std::fmt;

/// Column index of an item in the transaction matrix.
pub type ItemId = usize;

/// A non-empty, sorted, duplicate-free set of items.
///
/// Itemsets are always kept in canonical order, so two itemsets holding the
/// same items compare and hash equal regardless of how they were built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Itemset(Vec<ItemId>);

impl Itemset {
    /// Build an itemset from arbitrary items, sorting and deduplicating them.
    ///
    /// Returns `None` when no items are given.
    pub fn new(items: impl IntoIterator<Item = ItemId>) -> Option<Self> {
        let mut items: Vec<ItemId> = items.into_iter().collect();
        if items.is_empty() {
            return None;
        }
        items.sort_unstable();
        items.dedup();
        Some(Self(items))
    }

    pub fn singleton(item: ItemId) -> Self {
        Self(vec![item])
    }

    /// Items in ascending order.
    pub fn items(&self) -> &[ItemId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Never true for a constructed itemset.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, item: ItemId) -> bool {
        self.0.binary_search(&item).is_ok()
    }

    /// True when every item of `self` is also in `other`.
    pub fn is_subset_of(&self, other: &Itemset) -> bool {
        if self.len() > other.len() {
            return false;
        }
        let mut rest = other.0.iter();
        self.0
            .iter()
            .all(|item| rest.by_ref().any(|candidate| candidate == item))
    }

    pub fn is_disjoint(&self, other: &Itemset) -> bool {
        self.0.iter().all(|item| !other.contains(*item))
    }

    pub fn union(&self, other: &Itemset) -> Itemset {
        let mut items = Vec::with_capacity(self.len() + other.len());
        items.extend_from_slice(&self.0);
        items.extend_from_slice(&other.0);
        items.sort_unstable();
        items.dedup();
        Itemset(items)
    }

    /// Items of `self` not in `other`, or `None` if nothing remains.
    pub fn difference(&self, other: &Itemset) -> Option<Itemset> {
        let items: Vec<ItemId> = self
            .0
            .iter()
            .copied()
            .filter(|item| !other.contains(*item))
            .collect();
        if items.is_empty() {
            None
        } else {
            Some(Itemset(items))
        }
    }

    /// Join two itemsets of size k that share their first k-1 items.
    ///
    /// Only yields a candidate when `self`'s last item sorts before
    /// `other`'s, so each (k+1)-candidate is produced by exactly one pair.
    pub fn join(&self, other: &Itemset) -> Option<Itemset> {
        let k = self.len();
        if k != other.len() || self.0[..k - 1] != other.0[..k - 1] {
            return None;
        }
        let (last, other_last) = (self.0[k - 1], other.0[k - 1]);
        if last >= other_last {
            return None;
        }
        let mut items = self.0.clone();
        items.push(other_last);
        Some(Itemset(items))
    }

    /// All subsets obtained by dropping exactly one item.
    ///
    /// Yields nothing for singletons since the empty set is not an itemset.
    pub fn immediate_subsets(&self) -> impl Iterator<Item = Itemset> + '_ {
        let k = if self.len() > 1 { self.len() } else { 0 };
        (0..k).map(move |skip| {
            Itemset(
                self.0
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != skip)
                    .map(|(_, &item)| item)
                    .collect(),
            )
        })
    }
}

impl fmt::Display for Itemset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, item) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", item)?;
        }
        write!(f, "}}")
    }
}

/// Join every pair of same-size itemsets sharing a common prefix, dropping
/// candidates that have a subset outside `is_known`.
///
/// `level` must be sorted in canonical order; candidates come out sorted.
pub(crate) fn join_level<F>(level: &[Itemset], is_known: F) -> (Vec<Itemset>, usize)
where
    F: Fn(&Itemset) -> bool,
{
    let mut candidates = Vec::new();
    let mut pruned = 0;

    for (i, left) in level.iter().enumerate() {
        for right in &level[i + 1..] {
            // Sorted input: once the prefix differs, no later itemset shares it
            let Some(candidate) = left.join(right) else {
                break;
            };
            if candidate.immediate_subsets().all(|subset| is_known(&subset)) {
                candidates.push(candidate);
            } else {
                pruned += 1;
            }
        }
    }

    (candidates, pruned)
}

//! Association rule generation and scoring

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::{MiningError, MiningResult};
use crate::itemset::{join_level, Itemset};
use crate::miner::FrequentItemsetTable;

/// Metric used to filter and rank rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Support,
    Confidence,
    Lift,
    Leverage,
    Conviction,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::Support,
        Metric::Confidence,
        Metric::Lift,
        Metric::Leverage,
        Metric::Conviction,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Support => "support",
            Metric::Confidence => "confidence",
            Metric::Lift => "lift",
            Metric::Leverage => "leverage",
            Metric::Conviction => "conviction",
        }
    }

    /// Check that `threshold` lies in the metric's natural range.
    ///
    /// Support and confidence live in [0, 1]; lift and conviction are
    /// non-negative; leverage is at least -1. NaN is never valid.
    pub fn validate_threshold(&self, threshold: f64) -> MiningResult<()> {
        let valid = match self {
            Metric::Support | Metric::Confidence => (0.0..=1.0).contains(&threshold),
            Metric::Lift | Metric::Conviction => threshold >= 0.0,
            Metric::Leverage => threshold >= -1.0,
        };
        if valid {
            Ok(())
        } else {
            Err(MiningError::InvalidThreshold {
                metric: *self,
                threshold,
            })
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|metric| metric.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "unknown metric '{}', expected one of: support, confidence, lift, leverage, conviction",
                    s
                )
            })
    }
}

/// An implication `antecedent -> consequent` with its association metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub antecedent: Itemset,
    pub consequent: Itemset,
    pub antecedent_support: f64,
    pub consequent_support: f64,
    /// Support of antecedent and consequent together
    pub support: f64,
    pub confidence: f64,
    pub lift: f64,
    pub leverage: f64,
    /// `f64::INFINITY` when confidence is 1
    pub conviction: f64,
}

impl Rule {
    fn from_supports(
        antecedent: Itemset,
        consequent: Itemset,
        support: f64,
        antecedent_support: f64,
        consequent_support: f64,
    ) -> Self {
        let confidence = support / antecedent_support;
        let conviction = if confidence >= 1.0 {
            f64::INFINITY
        } else {
            (1.0 - consequent_support) / (1.0 - confidence)
        };

        Self {
            antecedent,
            consequent,
            antecedent_support,
            consequent_support,
            support,
            confidence,
            lift: confidence / consequent_support,
            leverage: support - antecedent_support * consequent_support,
            conviction,
        }
    }

    pub fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Support => self.support,
            Metric::Confidence => self.confidence,
            Metric::Lift => self.lift,
            Metric::Leverage => self.leverage,
            Metric::Conviction => self.conviction,
        }
    }

    /// Whether the rule's `metric` reaches `threshold`.
    ///
    /// An infinite metric value only satisfies an infinite threshold.
    pub fn satisfies(&self, metric: Metric, threshold: f64) -> bool {
        let value = self.metric(metric);
        if value.is_infinite() {
            return threshold.is_infinite() && value >= threshold;
        }
        value >= threshold
    }

    /// The frequent itemset the rule was split from.
    pub fn itemset(&self) -> Itemset {
        self.antecedent.union(&self.consequent)
    }
}

/// Generate every rule from `table` whose `metric` is at least `min_threshold`.
///
/// # Arguments
/// * `table` - Frequent itemsets from [`crate::miner::mine`]
/// * `metric` - Metric the threshold applies to
/// * `min_threshold` - Minimum metric value, validated against the metric's range
///
/// # Returns
/// * Rules sorted by antecedent, then consequent
pub fn generate(
    table: &FrequentItemsetTable,
    metric: Metric,
    min_threshold: f64,
) -> MiningResult<Vec<Rule>> {
    metric.validate_threshold(min_threshold)?;

    let itemsets: Vec<(&Itemset, f64)> = table.iter().filter(|(itemset, _)| itemset.len() >= 2).collect();

    let partials = itemsets
        .par_iter()
        .map(|&(itemset, support)| rules_for_itemset(table, itemset, support, metric, min_threshold))
        .collect::<MiningResult<Vec<Vec<Rule>>>>()?;

    let mut rules: Vec<Rule> = partials.into_iter().flatten().collect();
    rules.sort_by(|a, b| {
        a.antecedent
            .cmp(&b.antecedent)
            .then_with(|| a.consequent.cmp(&b.consequent))
    });

    info!(
        metric = %metric,
        min_threshold,
        itemsets = itemsets.len(),
        rules = rules.len(),
        "association rules generated"
    );

    Ok(rules)
}

/// Split one frequent itemset into all passing rules.
///
/// Consequents grow level-wise from single items. For confidence, a
/// consequent that fails the threshold is never extended: moving items from
/// the antecedent to the consequent can only lower confidence.
fn rules_for_itemset(
    table: &FrequentItemsetTable,
    itemset: &Itemset,
    support: f64,
    metric: Metric,
    min_threshold: f64,
) -> MiningResult<Vec<Rule>> {
    let prune = metric == Metric::Confidence;
    let mut rules = Vec::new();
    let mut consequents: Vec<Itemset> = itemset.items().iter().map(|&item| Itemset::singleton(item)).collect();
    let mut skipped = 0usize;

    while consequents.first().is_some_and(|c| c.len() < itemset.len()) {
        let mut extendable = Vec::with_capacity(consequents.len());

        for consequent in consequents {
            let Some(antecedent) = itemset.difference(&consequent) else {
                continue;
            };
            let antecedent_support = lookup(table, &antecedent)?;
            let consequent_support = lookup(table, &consequent)?;

            let rule = Rule::from_supports(
                antecedent,
                consequent.clone(),
                support,
                antecedent_support,
                consequent_support,
            );
            let passes = rule.satisfies(metric, min_threshold);
            if passes {
                rules.push(rule);
            }
            if passes || !prune {
                extendable.push(consequent);
            } else {
                skipped += 1;
            }
        }

        let known: HashSet<&Itemset> = extendable.iter().collect();
        consequents = join_level(&extendable, |candidate| known.contains(candidate)).0;
    }

    if skipped > 0 {
        debug!(itemset = %itemset, skipped, "consequents pruned");
    }

    Ok(rules)
}

fn lookup(table: &FrequentItemsetTable, itemset: &Itemset) -> MiningResult<f64> {
    table
        .support(itemset)
        .ok_or_else(|| MiningError::IncompleteTable(itemset.items().to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::itemset::ItemId;
    use crate::matrix::TransactionMatrix;
    use crate::miner::mine;

    fn set(items: &[ItemId]) -> Itemset {
        Itemset::new(items.iter().copied()).unwrap()
    }

    fn xyz_table() -> FrequentItemsetTable {
        let matrix = TransactionMatrix::from_transactions(&[
            vec!["X", "Y"],
            vec!["X", "Y", "Z"],
            vec!["X"],
            vec!["Y", "Z"],
        ])
        .unwrap();
        mine(&matrix, 0.5).unwrap()
    }

    fn find<'a>(rules: &'a [Rule], antecedent: &[ItemId], consequent: &[ItemId]) -> Option<&'a Rule> {
        rules
            .iter()
            .find(|r| r.antecedent == set(antecedent) && r.consequent == set(consequent))
    }

    #[test]
    fn test_xyz_rules_by_confidence() {
        let rules = generate(&xyz_table(), Metric::Confidence, 0.5).unwrap();
        assert_eq!(rules.len(), 2);

        let x_to_y = find(&rules, &[0], &[1]).unwrap();
        assert_eq!(x_to_y.support, 0.5);
        assert!((x_to_y.confidence - 2.0 / 3.0).abs() < 1e-12);
        assert!((x_to_y.lift - 8.0 / 9.0).abs() < 1e-12);
        assert!((x_to_y.leverage - (0.5 - 0.75 * 0.75)).abs() < 1e-12);
        assert!((x_to_y.conviction - 0.75).abs() < 1e-12);
        assert_eq!(x_to_y.antecedent_support, 0.75);
        assert_eq!(x_to_y.consequent_support, 0.75);

        let y_to_x = find(&rules, &[1], &[0]).unwrap();
        assert!((y_to_x.confidence - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_threshold_filters_rules() {
        let table = xyz_table();
        assert!(generate(&table, Metric::Confidence, 0.7).unwrap().is_empty());
        assert!(generate(&table, Metric::Lift, 1.0).unwrap().is_empty());
        assert_eq!(generate(&table, Metric::Lift, 0.8).unwrap().len(), 2);
        assert_eq!(generate(&table, Metric::Leverage, -0.1).unwrap().len(), 2);
    }

    #[test]
    fn test_invalid_thresholds_rejected() {
        let table = xyz_table();
        let cases = [
            (Metric::Confidence, 1.5),
            (Metric::Confidence, -0.1),
            (Metric::Support, 2.0),
            (Metric::Lift, -1.0),
            (Metric::Conviction, -0.5),
            (Metric::Leverage, -2.0),
            (Metric::Lift, f64::NAN),
        ];
        for (metric, threshold) in cases {
            let result = generate(&table, metric, threshold);
            assert!(
                matches!(result, Err(MiningError::InvalidThreshold { .. })),
                "{} {}",
                metric,
                threshold
            );
        }
    }

    #[test]
    fn test_conviction_infinite_at_full_confidence() {
        // every transaction with a also has b
        let matrix = TransactionMatrix::from_transactions(&[
            vec!["a", "b"],
            vec!["a", "b"],
            vec!["b"],
            vec!["c"],
        ])
        .unwrap();
        let table = mine(&matrix, 0.25).unwrap();
        let rules = generate(&table, Metric::Confidence, 0.0).unwrap();

        let a_to_b = find(&rules, &[0], &[1]).unwrap();
        assert_eq!(a_to_b.confidence, 1.0);
        assert!(a_to_b.conviction.is_infinite());

        assert!(!a_to_b.satisfies(Metric::Conviction, 1000.0));
        assert!(a_to_b.satisfies(Metric::Conviction, f64::INFINITY));

        let by_conviction = generate(&table, Metric::Conviction, 0.0).unwrap();
        assert!(find(&by_conviction, &[0], &[1]).is_none());
        assert!(find(&by_conviction, &[1], &[0]).is_some());
    }

    #[test]
    fn test_three_item_itemset_yields_six_rules() {
        let matrix = TransactionMatrix::from_transactions(&[
            vec!["a", "b", "c"],
            vec!["a", "b", "c"],
            vec!["a", "b"],
            vec!["c"],
        ])
        .unwrap();
        let table = mine(&matrix, 0.5).unwrap();
        let rules = generate(&table, Metric::Support, 0.5).unwrap();

        let from_triple: Vec<&Rule> = rules.iter().filter(|r| r.itemset() == set(&[0, 1, 2])).collect();
        assert_eq!(from_triple.len(), 6);
        for rule in &from_triple {
            assert!(rule.antecedent.is_disjoint(&rule.consequent));
            assert_eq!(rule.support, 0.5);
        }
    }

    #[test]
    fn test_confidence_pruning_matches_exhaustive_filter() {
        let matrix = TransactionMatrix::from_transactions(&[
            vec!["a", "b", "c", "d"],
            vec!["a", "b", "c"],
            vec!["a", "b"],
            vec!["a", "c", "d"],
            vec!["b", "c", "d"],
            vec!["a", "d"],
        ])
        .unwrap();
        let table = mine(&matrix, 0.3).unwrap();

        let all = generate(&table, Metric::Leverage, -1.0).unwrap();
        for threshold in [0.0, 0.4, 0.6, 0.75, 1.0] {
            let expected: Vec<&Rule> = all.iter().filter(|r| r.confidence >= threshold).collect();
            let pruned = generate(&table, Metric::Confidence, threshold).unwrap();
            assert_eq!(pruned.iter().collect::<Vec<_>>(), expected, "threshold {}", threshold);
        }
    }

    #[test]
    fn test_output_order_is_canonical() {
        let matrix = TransactionMatrix::from_transactions(&[
            vec!["a", "b", "c"],
            vec!["a", "b", "c"],
            vec!["a", "c"],
        ])
        .unwrap();
        let table = mine(&matrix, 0.5).unwrap();
        let rules = generate(&table, Metric::Confidence, 0.0).unwrap();

        let keys: Vec<(Itemset, Itemset)> = rules
            .iter()
            .map(|r| (r.antecedent.clone(), r.consequent.clone()))
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        assert_eq!(rules, generate(&table, Metric::Confidence, 0.0).unwrap());
    }

    #[test]
    fn test_metric_from_str() {
        assert_eq!("lift".parse::<Metric>(), Ok(Metric::Lift));
        assert_eq!(" Confidence ".parse::<Metric>(), Ok(Metric::Confidence));
        assert!("zhang".parse::<Metric>().is_err());
        for metric in Metric::ALL {
            assert_eq!(metric.to_string().parse::<Metric>(), Ok(metric));
        }
    }
}

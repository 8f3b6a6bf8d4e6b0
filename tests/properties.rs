//! Property tests for the miner and rule generator over random matrices

use assocforge::{generate, mine, Itemset, Metric, TransactionMatrix};
use ndarray::Array2;
use proptest::prelude::*;

fn matrix_strategy() -> impl Strategy<Value = TransactionMatrix> {
    (1usize..12, 1usize..6).prop_flat_map(|(rows, cols)| {
        prop::collection::vec(any::<bool>(), rows * cols).prop_map(move |flags| {
            let data = Array2::from_shape_vec((rows, cols), flags).unwrap();
            let names = (0..cols).map(|i| format!("item{}", i)).collect();
            TransactionMatrix::new(data, names).unwrap()
        })
    })
}

/// Fraction of rows containing every item, counted row by row
fn brute_support(matrix: &TransactionMatrix, itemset: &Itemset) -> f64 {
    let data = matrix.data();
    let hits = data
        .rows()
        .into_iter()
        .filter(|row| itemset.items().iter().all(|&item| row[item]))
        .count();
    hits as f64 / data.nrows() as f64
}

/// Every non-empty subset of the matrix's items
fn all_itemsets(n_items: usize) -> Vec<Itemset> {
    (1u32..(1 << n_items))
        .filter_map(|mask| Itemset::new((0..n_items).filter(|i| mask & (1 << i) != 0)))
        .collect()
}

proptest! {
    #[test]
    fn supports_match_row_counts(matrix in matrix_strategy(), min_support in 0.05f64..=1.0) {
        let table = mine(&matrix, min_support).unwrap();
        for (itemset, support) in table.iter() {
            prop_assert_eq!(support, brute_support(&matrix, itemset));
            prop_assert!(support >= min_support);
        }
        // Nothing frequent is missing
        for itemset in all_itemsets(matrix.n_items()) {
            let expected = brute_support(&matrix, &itemset) >= min_support;
            prop_assert_eq!(table.contains(&itemset), expected, "{}", itemset);
        }
    }

    #[test]
    fn frequent_itemsets_are_downward_closed(matrix in matrix_strategy(), min_support in 0.05f64..=1.0) {
        let table = mine(&matrix, min_support).unwrap();
        for (itemset, support) in table.iter() {
            for subset in all_itemsets(matrix.n_items()) {
                if subset.is_subset_of(itemset) {
                    let subset_support = table.support(&subset);
                    prop_assert!(subset_support.is_some(), "{} missing subset {}", itemset, subset);
                    prop_assert!(subset_support.unwrap() >= support);
                }
            }
        }
    }

    #[test]
    fn rules_are_well_formed(matrix in matrix_strategy(), min_support in 0.05f64..=1.0) {
        let table = mine(&matrix, min_support).unwrap();
        let rules = generate(&table, Metric::Confidence, 0.0).unwrap();

        let expected: usize = table
            .iter()
            .map(|(itemset, _)| (1usize << itemset.len()) - 2)
            .sum();
        prop_assert_eq!(rules.len(), expected);

        for rule in &rules {
            prop_assert!(rule.antecedent.is_disjoint(&rule.consequent));
            prop_assert_eq!(table.support(&rule.itemset()), Some(rule.support));
            prop_assert!((0.0..=1.0).contains(&rule.confidence));

            let implies = matrix.data().rows().into_iter().all(|row| {
                !rule.antecedent.items().iter().all(|&i| row[i])
                    || rule.consequent.items().iter().all(|&i| row[i])
            });
            prop_assert_eq!(rule.confidence == 1.0, implies);
            prop_assert_eq!(rule.conviction.is_infinite(), implies);
        }
    }

    #[test]
    fn mining_is_deterministic(matrix in matrix_strategy(), min_support in 0.05f64..=1.0, threshold in 0.0f64..=1.0) {
        let first = mine(&matrix, min_support).unwrap();
        let second = mine(&matrix, min_support).unwrap();
        prop_assert_eq!(
            first.iter().collect::<Vec<_>>(),
            second.iter().collect::<Vec<_>>()
        );

        let rules_a = generate(&first, Metric::Confidence, threshold).unwrap();
        let rules_b = generate(&second, Metric::Confidence, threshold).unwrap();
        prop_assert_eq!(rules_a, rules_b);
    }

    #[test]
    fn threshold_filter_is_exact(matrix in matrix_strategy(), min_support in 0.05f64..=1.0, threshold in 0.0f64..=1.0) {
        let table = mine(&matrix, min_support).unwrap();
        let everything = generate(&table, Metric::Confidence, 0.0).unwrap();
        let filtered = generate(&table, Metric::Confidence, threshold).unwrap();

        let expected: Vec<_> = everything.into_iter().filter(|r| r.confidence >= threshold).collect();
        prop_assert_eq!(filtered, expected);
    }
}

//! Ranking and text rendering of itemsets and rules

use std::fmt::Write;

use crate::itemset::Itemset;
use crate::miner::FrequentItemsetTable;
use crate::rules::{Metric, Rule};

/// Sort rules by `metric`, highest first, and keep the first `top`.
///
/// Ties keep their canonical (antecedent, consequent) order.
pub fn rank_rules(rules: &[Rule], metric: Metric, top: usize) -> Vec<&Rule> {
    let mut ranked: Vec<&Rule> = rules.iter().collect();
    ranked.sort_by(|a, b| b.metric(metric).total_cmp(&a.metric(metric)));
    ranked.truncate(top);
    ranked
}

/// Item names of `itemset` joined with `", "`
pub fn join_items(itemset: &Itemset, table: &FrequentItemsetTable) -> String {
    itemset
        .items()
        .iter()
        .map(|&item| table.item_name(item).map_or_else(|| item.to_string(), str::to_owned))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render rules as a fixed-width table
pub fn render_rules(rules: &[&Rule], table: &FrequentItemsetTable) -> String {
    let rows: Vec<(String, String)> = rules
        .iter()
        .map(|rule| (join_items(&rule.antecedent, table), join_items(&rule.consequent, table)))
        .collect();
    let ante_width = column_width("antecedents", rows.iter().map(|(a, _)| a));
    let cons_width = column_width("consequents", rows.iter().map(|(_, c)| c));

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<aw$} | {:<cw$} | {:>8} | {:>10} | {:>8} | {:>9} | {:>10}",
        "antecedents",
        "consequents",
        "support",
        "confidence",
        "lift",
        "leverage",
        "conviction",
        aw = ante_width,
        cw = cons_width,
    );
    let _ = writeln!(
        out,
        "{}-+-{}-+-{}-+-{}-+-{}-+-{}-+-{}",
        "-".repeat(ante_width),
        "-".repeat(cons_width),
        "-".repeat(8),
        "-".repeat(10),
        "-".repeat(8),
        "-".repeat(9),
        "-".repeat(10),
    );
    for ((antecedents, consequents), rule) in rows.iter().zip(rules) {
        let _ = writeln!(
            out,
            "{:<aw$} | {:<cw$} | {:>8.4} | {:>10.4} | {:>8.4} | {:>9.4} | {:>10.4}",
            antecedents,
            consequents,
            rule.support,
            rule.confidence,
            rule.lift,
            rule.leverage,
            rule.conviction,
            aw = ante_width,
            cw = cons_width,
        );
    }
    out
}

/// Render frequent itemsets with their supports, by size then canonical order
pub fn render_itemsets(table: &FrequentItemsetTable) -> String {
    let rows: Vec<(String, f64)> = table
        .iter()
        .map(|(itemset, support)| (join_items(itemset, table), support))
        .collect();
    let width = column_width("itemsets", rows.iter().map(|(name, _)| name));

    let mut out = String::new();
    let _ = writeln!(out, "{:<w$} | {:>8}", "itemsets", "support", w = width);
    let _ = writeln!(out, "{}-+-{}", "-".repeat(width), "-".repeat(8));
    for (name, support) in &rows {
        let _ = writeln!(out, "{:<w$} | {:>8.4}", name, support, w = width);
    }
    out
}

fn column_width<'a>(header: &str, values: impl Iterator<Item = &'a String>) -> usize {
    values
        .map(|value| value.chars().count())
        .max()
        .unwrap_or(0)
        .max(header.len())
}

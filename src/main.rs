//! AssocForge: association rule mining CLI
//!
//! This is the main entrypoint that orchestrates data loading, one-hot
//! encoding, itemset mining, rule generation and reporting.

use anyhow::Result;
use assocforge::{generate, load_categories, logging, mine_with, report, Args, CancellationToken};
use clap::Parser;
use std::time::Instant;
use tracing::info;

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_tracing(args.verbose);
    args.configure_threads()?;

    if args.verbose {
        println!("AssocForge - Association Rule Mining");
        println!("====================================\n");
    }

    run_pipeline(&args)
}

/// Run the full mining pipeline
fn run_pipeline(args: &Args) -> Result<()> {
    let start_time = Instant::now();

    // Step 1: Load categorical columns and one-hot encode them
    if args.verbose {
        println!("Step 1: Loading data");
        println!("  Input file: {}", args.input);
        println!("  Columns: {}", args.columns.join(", "));
    }

    let data = load_categories(&args.input, &args.columns)?;
    let matrix = data.one_hot()?;
    info!(
        transactions = matrix.n_transactions(),
        items = matrix.n_items(),
        "transaction matrix built"
    );

    println!(
        "✓ Data loaded: {} transactions, {} distinct items",
        matrix.n_transactions(),
        matrix.n_items()
    );
    if args.verbose {
        for column in &data.columns {
            println!("  {}: {} categories", column, data.categories(column).len());
        }
    }

    // Step 2: Mine frequent itemsets
    if args.verbose {
        println!("\nStep 2: Mining frequent itemsets");
        println!("  Minimum support: {}", args.min_support);
        if let Some(max_len) = args.max_len {
            println!("  Maximum itemset size: {}", max_len);
        }
    }

    let mine_start = Instant::now();
    let table = mine_with(&matrix, &args.miner_options(), &CancellationToken::new())?;
    let mine_time = mine_start.elapsed();

    println!(
        "✓ Frequent itemsets: {} (largest size {})",
        table.len(),
        table.max_len()
    );
    if args.verbose {
        println!("  Mining time: {:.2}s", mine_time.as_secs_f64());
    }

    if args.show_itemsets {
        println!("\n=== Frequent Itemsets ===");
        print!("{}", report::render_itemsets(&table));
    }

    // Step 3: Generate association rules
    if args.verbose {
        println!("\nStep 3: Generating association rules");
        println!("  Metric: {} >= {}", args.metric, args.min_threshold);
    }

    let rules_start = Instant::now();
    let rules = generate(&table, args.metric, args.min_threshold)?;
    let rules_time = rules_start.elapsed();

    println!("✓ Association rules: {}", rules.len());
    if args.verbose {
        println!("  Generation time: {:.2}s", rules_time.as_secs_f64());
    }

    // Step 4: Rank and print the top rules
    println!("\n=== Top {} Rules by {} ===", args.top, args.metric);
    if rules.is_empty() {
        println!("No rules satisfy {} >= {}", args.metric, args.min_threshold);
    } else {
        let ranked = report::rank_rules(&rules, args.metric, args.top);
        print!("{}", report::render_rules(&ranked, &table));
    }

    let total_time = start_time.elapsed();
    println!("\n=== Pipeline Complete ===");
    println!("Total processing time: {:.2}s", total_time.as_secs_f64());

    Ok(())
}

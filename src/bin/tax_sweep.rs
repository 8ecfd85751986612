//! Sweep gross incomes across both regimes
//!
//! Writes one CSV row per income with the tax under each regime and the
//! recommendation, for charting the regime crossover and the rebate cliff.

use anyhow::{ensure, Context, Result};
use clap::Parser;
use fiscal_calculators::data::{resolve_data_dir, FiscalData};
use fiscal_calculators::tax::{Deductions, Regime, RegimeComparison};
use rayon::prelude::*;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "tax_sweep", about = "Tax under both regimes across an income grid")]
struct SweepArgs {
    #[arg(long, default_value_t = 0.0)]
    min_income: f64,

    #[arg(long, default_value_t = 5_000_000.0)]
    max_income: f64,

    #[arg(long, default_value_t = 10_000.0)]
    step: f64,

    /// Section 80C claim applied to the old regime
    #[arg(long, default_value_t = 0.0)]
    section_80c: f64,

    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[arg(long, default_value = "tax_sweep_output.csv")]
    output: PathBuf,
}

#[derive(Debug, Serialize)]
struct SweepRow {
    gross_income: f64,
    new_taxable: f64,
    new_tax: f64,
    new_effective_rate: f64,
    old_taxable: f64,
    old_tax: f64,
    old_effective_rate: f64,
    recommended: Regime,
    savings: f64,
}

impl From<&RegimeComparison> for SweepRow {
    fn from(c: &RegimeComparison) -> Self {
        SweepRow {
            gross_income: c.new.gross_income,
            new_taxable: c.new.taxable_income,
            new_tax: c.new.total_tax,
            new_effective_rate: c.new.effective_rate,
            old_taxable: c.old.taxable_income,
            old_tax: c.old.total_tax,
            old_effective_rate: c.old.effective_rate,
            recommended: c.recommended,
            savings: c.savings,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args = SweepArgs::parse();
    ensure!(args.step > 0.0, "step must be positive, got {}", args.step);
    ensure!(
        args.min_income >= 0.0 && args.max_income >= args.min_income,
        "income range {}..{} is invalid",
        args.min_income,
        args.max_income
    );

    let start = Instant::now();
    let data_dir = resolve_data_dir(args.data_dir.as_deref());
    let data = FiscalData::load_from(&data_dir)
        .with_context(|| format!("failed to load fiscal data from {}", data_dir.display()))?;
    let engine = data.tax_engine()?;
    let deductions = Deductions {
        savings: args.section_80c,
        ..Deductions::default()
    };

    let steps = ((args.max_income - args.min_income) / args.step).floor() as usize;
    let incomes: Vec<f64> = (0..=steps)
        .map(|i| args.min_income + i as f64 * args.step)
        .collect();
    println!("Sweeping {} incomes...", incomes.len());

    // Each income is independent; the engine is shared read-only
    let rows: Vec<SweepRow> = incomes
        .par_iter()
        .map(|&income| {
            engine
                .compare(income, Some(&deductions))
                .map(|comparison| SweepRow::from(&comparison))
        })
        .collect::<Result<_, _>>()?;

    println!("Sweep complete in {:?}", start.elapsed());

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("failed to create {}", args.output.display()))?;
    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    let crossover = rows
        .windows(2)
        .find(|pair| pair[0].recommended != pair[1].recommended)
        .map(|pair| pair[1].gross_income);

    println!("Output written to {}", args.output.display());
    match crossover {
        Some(income) => println!("  Recommendation first changes at Rs {:.0}", income),
        None => println!("  Same regime recommended across the whole range"),
    }
    println!("Total time: {:?}", start.elapsed());

    Ok(())
}

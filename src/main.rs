//! Fiscal Calculators CLI
//!
//! Command-line front end for the tax, EMI and cost-of-living engines

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use serde::Serialize;
use std::path::{Path, PathBuf};

use fiscal_calculators::cost_of_living::{default_expenses, ExpensePreset};
use fiscal_calculators::data::{resolve_data_dir, FiscalData};
use fiscal_calculators::loan::{
    amortization_schedule, compute_emi, rate_impact, LoanType, SpreadLevel,
};
use fiscal_calculators::tax::{allocate_tax, Deductions, Regime, TaxBreakdown};

/// Policy repo rate used when none is given (percent)
const DEFAULT_REPO_RATE: f64 = 6.5;

#[derive(Parser, Debug)]
#[command(name = "fiscal-calc", version, about = "Tax, loan EMI and cost-of-living calculators")]
struct Cli {
    /// Directory holding the fiscal data files
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Tax breakdown for one regime
    Tax {
        /// Gross annual income in rupees
        income: f64,

        #[arg(long, value_enum, default_value_t = CliRegime::New)]
        regime: CliRegime,

        #[command(flatten)]
        deductions: DeductionArgs,

        /// Also split the tax across the Union budget's expenditure heads
        #[arg(long)]
        allocate: bool,
    },

    /// Compute both regimes and recommend the cheaper one
    Compare {
        income: f64,

        #[command(flatten)]
        deductions: DeductionArgs,
    },

    /// Monthly installment and rate sensitivity for a loan
    Emi {
        #[arg(long, value_enum, default_value_t = CliLoanType::Home)]
        loan_type: CliLoanType,

        /// Principal in rupees (defaults to the loan type's typical amount)
        #[arg(long)]
        principal: Option<f64>,

        /// Tenure in years (defaults to the loan type's typical tenure)
        #[arg(long)]
        years: Option<u32>,

        /// Annual interest rate; derived from repo rate plus spread if omitted
        #[arg(long)]
        rate: Option<f64>,

        #[arg(long, default_value_t = DEFAULT_REPO_RATE)]
        repo_rate: f64,

        #[arg(long, value_enum, default_value_t = CliSpreadLevel::Typical)]
        spread: CliSpreadLevel,

        /// Print the year-by-year amortization schedule
        #[arg(long)]
        schedule: bool,
    },

    /// What a monthly budget would have cost in an earlier year
    Cost {
        /// Preset budget; the default itemized budget is used if omitted
        #[arg(long, value_enum)]
        preset: Option<CliPreset>,

        /// Earlier fiscal year, e.g. 2019-20 (defaults to the first available)
        #[arg(long)]
        from: Option<String>,

        /// Later fiscal year (defaults to the last available)
        #[arg(long)]
        to: Option<String>,
    },

    /// List fiscal years with headline CPI data
    Periods,
}

#[derive(Args, Debug)]
struct DeductionArgs {
    /// Section 80C investments
    #[arg(long, default_value_t = 0.0)]
    section_80c: f64,

    /// Section 80D premium, self and family
    #[arg(long, default_value_t = 0.0)]
    section_80d_self: f64,

    /// Section 80D premium, parents
    #[arg(long, default_value_t = 0.0)]
    section_80d_parents: f64,

    /// Section 80CCD(1B) NPS contribution
    #[arg(long, default_value_t = 0.0)]
    section_80ccd1b: f64,

    /// Section 24(b) home-loan interest
    #[arg(long, default_value_t = 0.0)]
    section_24b: f64,

    /// HRA exemption
    #[arg(long, default_value_t = 0.0)]
    hra: f64,

    /// Section 80TTA savings interest
    #[arg(long, default_value_t = 0.0)]
    section_80tta: f64,
}

impl From<&DeductionArgs> for Deductions {
    fn from(args: &DeductionArgs) -> Self {
        Deductions {
            savings: args.section_80c,
            health_self: args.section_80d_self,
            health_parents: args.section_80d_parents,
            retirement_top_up: args.section_80ccd1b,
            home_loan_interest: args.section_24b,
            house_rent: args.hra,
            savings_interest: args.section_80tta,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliRegime {
    New,
    Old,
}

impl From<CliRegime> for Regime {
    fn from(value: CliRegime) -> Self {
        match value {
            CliRegime::New => Regime::New,
            CliRegime::Old => Regime::Old,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliLoanType {
    Home,
    Car,
    Personal,
}

impl From<CliLoanType> for LoanType {
    fn from(value: CliLoanType) -> Self {
        match value {
            CliLoanType::Home => LoanType::Home,
            CliLoanType::Car => LoanType::Car,
            CliLoanType::Personal => LoanType::Personal,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliSpreadLevel {
    Min,
    Typical,
    Max,
}

impl From<CliSpreadLevel> for SpreadLevel {
    fn from(value: CliSpreadLevel) -> Self {
        match value {
            CliSpreadLevel::Min => SpreadLevel::Min,
            CliSpreadLevel::Typical => SpreadLevel::Typical,
            CliSpreadLevel::Max => SpreadLevel::Max,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliPreset {
    Single,
    Family,
}

impl From<CliPreset> for ExpensePreset {
    fn from(value: CliPreset) -> Self {
        match value {
            CliPreset::Single => ExpensePreset::Single,
            CliPreset::Family => ExpensePreset::Family,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let data_dir = resolve_data_dir(cli.data_dir.as_deref());
    let data = load_data(&data_dir)?;

    match &cli.command {
        Command::Tax {
            income,
            regime,
            deductions,
            allocate,
        } => {
            let engine = data.tax_engine()?;
            let breakdown = engine.compute(*income, (*regime).into(), Some(&Deductions::from(deductions)))?;
            let allocation = if *allocate {
                allocate_tax(breakdown.total_tax, &data.expenditure_shares.shares)
            } else {
                Vec::new()
            };

            if cli.json {
                #[derive(Serialize)]
                struct TaxOutput<'a> {
                    breakdown: &'a TaxBreakdown,
                    #[serde(skip_serializing_if = "Vec::is_empty")]
                    allocation: Vec<fiscal_calculators::tax::ShareAllocation>,
                }
                print_json(&TaxOutput {
                    breakdown: &breakdown,
                    allocation,
                })?;
            } else {
                print_breakdown(&breakdown);
                if !allocation.is_empty() {
                    println!("\nWhere it goes ({}):", data.expenditure_shares.year);
                    for share in &allocation {
                        match share.human_context_count {
                            Some(count) => println!(
                                "  {:<22} Rs {:>10.0}  ({:.0} {})",
                                share.name, share.amount, count, share.human_context
                            ),
                            None => println!("  {:<22} Rs {:>10.0}", share.name, share.amount),
                        }
                    }
                }
            }
        }

        Command::Compare { income, deductions } => {
            let comparison = data.tax_engine()?.compare(*income, Some(&Deductions::from(deductions)))?;

            if cli.json {
                print_json(&comparison)?;
            } else {
                print_breakdown(&comparison.new);
                println!();
                print_breakdown(&comparison.old);
                println!(
                    "\nRecommended: {} regime (saves Rs {:.0})",
                    comparison.recommended, comparison.savings
                );
            }
        }

        Command::Emi {
            loan_type,
            principal,
            years,
            rate,
            repo_rate,
            spread,
            schedule,
        } => {
            let loan_type = LoanType::from(*loan_type);
            let principal = principal.unwrap_or_else(|| loan_type.default_amount());
            let years = years.unwrap_or_else(|| loan_type.default_tenure_years());
            let term_months = years
                .checked_mul(12)
                .context("loan tenure is too long")?;
            let annual_rate = match rate {
                Some(rate) => *rate,
                None => data
                    .loan_spreads
                    .effective_rate(*repo_rate, loan_type, (*spread).into())?,
            };
            info!(
                "{} loan: principal {:.0}, {} months at {:.2}%",
                loan_type, principal, term_months, annual_rate
            );

            let emi = compute_emi(principal, annual_rate, term_months)?;
            let impact = rate_impact(principal, term_months, annual_rate)?;
            let amortization = if *schedule {
                Some(amortization_schedule(principal, annual_rate, term_months)?)
            } else {
                None
            };

            if cli.json {
                #[derive(Serialize)]
                struct EmiOutput<'a> {
                    loan_type: LoanType,
                    principal: f64,
                    term_months: u32,
                    emi: &'a fiscal_calculators::loan::EmiBreakdown,
                    rate_impact: &'a fiscal_calculators::loan::RateChangeImpact,
                    #[serde(skip_serializing_if = "Option::is_none")]
                    yearly_schedule: Option<Vec<fiscal_calculators::loan::AmortizationYear>>,
                }
                print_json(&EmiOutput {
                    loan_type,
                    principal,
                    term_months,
                    emi: &emi,
                    rate_impact: &impact,
                    yearly_schedule: amortization.as_ref().map(|s| s.yearly_summary()),
                })?;
            } else {
                println!("{} loan of Rs {:.0} over {} years at {:.2}%", loan_type, principal, years, annual_rate);
                println!("  Monthly EMI:    Rs {:>12.0}", emi.monthly_emi);
                println!("  Total payment:  Rs {:>12.0}", emi.total_payment);
                println!("  Total interest: Rs {:>12.0}", emi.total_interest);

                println!("\nIf the rate moves:");
                for scenario in &impact.scenarios {
                    println!(
                        "  {:<10} {:>6.2}%  EMI Rs {:>10.0}  ({:+.0}/month, {:+.0} total)",
                        scenario.label,
                        scenario.rate,
                        scenario.monthly_emi,
                        scenario.monthly_diff,
                        scenario.total_diff
                    );
                }

                if let Some(amortization) = &amortization {
                    println!("\n{:>4} {:>14} {:>14} {:>14}", "Year", "Interest", "Principal", "Balance");
                    for year in amortization.yearly_summary() {
                        println!(
                            "{:>4} {:>14.0} {:>14.0} {:>14.0}",
                            year.year, year.interest, year.principal_repaid, year.closing_balance
                        );
                    }
                }
            }
        }

        Command::Cost { preset, from, to } => {
            let periods = data.available_periods();
            let from = match from {
                Some(from) => from.clone(),
                None => periods.first().cloned().context("no CPI periods in data")?,
            };
            let to = match to {
                Some(to) => to.clone(),
                None => periods.last().cloned().context("no CPI periods in data")?,
            };
            if from == to {
                bail!("comparison years must differ, got {} twice", from);
            }

            let expenses = match preset {
                Some(preset) => ExpensePreset::from(*preset).expenses(),
                None => default_expenses(),
            };
            let result = data.cost_of_living_engine().compute(&expenses, &from, &to);

            if cli.json {
                print_json(&result)?;
            } else {
                println!(
                    "Monthly budget of Rs {:.0} in {} would have cost Rs {:.0} in {}",
                    result.current_total, result.to_period, result.adjusted_total, result.from_period
                );
                println!(
                    "  Cumulative inflation: {:.1}% ({:.1}% a year)",
                    result.cumulative_inflation, result.annualized_rate
                );
                println!("  Purchasing power lost: Rs {:.0} a month\n", result.purchasing_power_loss);
                for category in &result.by_category {
                    println!(
                        "  {:<26} Rs {:>8.0} -> Rs {:>8.0}  {:>6.1}%  [{:?}]",
                        category.label,
                        category.current_amount,
                        category.adjusted_amount,
                        category.category_inflation,
                        category.source
                    );
                }
            }
        }

        Command::Periods => {
            let periods = data.available_periods();
            if cli.json {
                print_json(&periods)?;
            } else {
                for period in periods {
                    println!("{}", period);
                }
            }
        }
    }

    Ok(())
}

fn load_data(dir: &Path) -> Result<FiscalData> {
    FiscalData::load_from(dir)
        .with_context(|| format!("failed to load fiscal data from {}", dir.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

fn print_breakdown(breakdown: &TaxBreakdown) {
    println!("{} regime", breakdown.regime);
    println!("  Gross income:        Rs {:>12.0}", breakdown.gross_income);
    println!("  Standard deduction:  Rs {:>12.0}", breakdown.standard_deduction);
    for line in &breakdown.deductions {
        println!(
            "  {:<20} Rs {:>12.0}  (claimed {:.0}, sec. {})",
            line.kind.label(),
            line.allowed,
            line.claimed,
            line.kind.section()
        );
    }
    println!("  Taxable income:      Rs {:>12.0}", breakdown.taxable_income);
    for slab in breakdown.slabwise_tax.iter().filter(|s| s.taxable_in_slab > 0.0) {
        let upper = slab
            .slab
            .to
            .map(|to| to.to_string())
            .unwrap_or_else(|| "above".to_string());
        println!(
            "    {:>9} - {:<9} @ {:>4.1}%  Rs {:>10.0}",
            slab.slab.from, upper, slab.slab.rate, slab.tax_on_slab
        );
    }
    if breakdown.rebate_applied {
        println!("  Rebate (87A):        tax of Rs {:.0} waived", breakdown.base_tax);
    }
    if breakdown.surcharge > 0.0 {
        println!(
            "  Surcharge ({:.0}%):     Rs {:>12.0}",
            breakdown.surcharge_rate, breakdown.surcharge
        );
    }
    println!("  Cess:                Rs {:>12.0}", breakdown.cess);
    println!(
        "  Total tax:           Rs {:>12.0}  ({:.2}% effective)",
        breakdown.total_tax, breakdown.effective_rate
    );
}

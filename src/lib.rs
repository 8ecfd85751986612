//! Fiscal Calculators - deterministic engines behind the personal-finance explainers
//!
//! This library provides:
//! - Progressive income tax under the new and old regimes, with rebate, surcharge and cess
//! - Loan EMI, amortization schedules and repo-rate sensitivity
//! - Cost-of-living comparison over CPI series with category/headline fallback
//! - Loading of the static fiscal tables from JSON/CSV

pub mod error;
pub mod tax;
pub mod loan;
pub mod cost_of_living;
pub mod data;

// Re-export commonly used types
pub use error::{CalcError, DataError};
pub use tax::{compare_regimes, compute_tax, Deductions, Regime, TaxBreakdown, TaxEngine, TaxSlabTable};
pub use loan::{compute_emi, rate_impact, EmiBreakdown, LoanType, RateChangeImpact};
pub use cost_of_living::{compute_cost_change, CostOfLivingEngine, CostOfLivingResult, ExpenseCategory};
pub use data::FiscalData;

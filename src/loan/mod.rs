//! Loan engine: EMI, rate sensitivity, amortization, lender spreads

mod emi;
mod schedule;
mod sensitivity;
mod spreads;

pub use emi::{compute_emi, monthly_rate, EmiBreakdown};
pub use schedule::{amortization_schedule, AmortizationRow, AmortizationSchedule, AmortizationYear};
pub use sensitivity::{
    rate_impact, rate_impact_with_ladder, RateChangeImpact, RateScenario, DEFAULT_BPS_LADDER,
};
pub use spreads::{LoanSpread, LoanSpreadTable, LoanType, SpreadLevel};

//! Cost-of-living engine: CPI series, expense budgets, purchasing power

mod engine;
mod expenses;
mod series;

pub use engine::{compute_cost_change, CategoryResult, CostOfLivingEngine, CostOfLivingResult, IndexSource};
pub use expenses::{default_expenses, ExpenseCategory, ExpensePreset};
pub use series::{
    available_periods, cumulative_multiplier, fiscal_year_start, headline_series, years_between,
    CategorySeries, CpiPoint, InflationPoint,
};

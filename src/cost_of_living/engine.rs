//! Purchasing-power engine
//!
//! Each expense is deflated by the compounded CPI change between two fiscal
//! years. Index resolution per category: category series, then headline
//! series, then "no change". The level used is recorded so callers can
//! disclose it.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::expenses::ExpenseCategory;
use super::series::{cumulative_multiplier, years_between, CategorySeries, CpiPoint};

/// Which index produced a category's multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexSource {
    Category,
    Headline,
    /// Neither series covered the span; prices assumed flat
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryResult {
    pub id: String,
    pub label: String,
    pub current_amount: f64,
    /// What the same basket cost in the comparison year
    pub adjusted_amount: f64,
    pub multiplier: f64,
    /// Cumulative % change for this category
    pub category_inflation: f64,
    pub source: IndexSource,
    /// True whenever the category series was not used
    pub used_fallback: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostOfLivingResult {
    pub from_period: String,
    pub to_period: String,
    pub current_total: f64,
    pub adjusted_total: f64,
    pub cumulative_inflation: f64,
    /// Geometric-mean annual rate (percent)
    pub annualized_rate: f64,
    /// Rupees of monthly purchasing power lost to inflation
    pub purchasing_power_loss: f64,
    pub by_category: Vec<CategoryResult>,
}

/// Holds the CPI data and answers cost-change queries against it
#[derive(Debug, Clone)]
pub struct CostOfLivingEngine {
    headline: Vec<CpiPoint>,
    categories: Vec<CategorySeries>,
}

impl CostOfLivingEngine {
    pub fn new(headline: Vec<CpiPoint>, categories: Vec<CategorySeries>) -> Self {
        Self {
            headline,
            categories,
        }
    }

    pub fn compute(&self, expenses: &[ExpenseCategory], from: &str, to: &str) -> CostOfLivingResult {
        let categories = (!self.categories.is_empty()).then_some(self.categories.as_slice());
        compute_cost_change(expenses, categories, &self.headline, from, to)
    }
}

fn resolve_multiplier(
    expense: &ExpenseCategory,
    categories: Option<&[CategorySeries]>,
    headline: &[CpiPoint],
    from: &str,
    to: &str,
) -> (f64, IndexSource) {
    let category_series = expense.coicop_division.as_deref().and_then(|code| {
        categories?
            .iter()
            .find(|c| c.division == code && !c.series.is_empty())
    });

    category_series
        .and_then(|c| cumulative_multiplier(&c.series, from, to))
        .map(|m| (m, IndexSource::Category))
        .or_else(|| cumulative_multiplier(headline, from, to).map(|m| (m, IndexSource::Headline)))
        .unwrap_or_else(|| {
            warn!(
                "no CPI coverage for '{}' between {} and {}; assuming no price change",
                expense.id, from, to
            );
            (1.0, IndexSource::Unchanged)
        })
}

/// Compare the cost of a monthly budget today against an earlier fiscal year
pub fn compute_cost_change(
    expenses: &[ExpenseCategory],
    categories: Option<&[CategorySeries]>,
    headline: &[CpiPoint],
    from: &str,
    to: &str,
) -> CostOfLivingResult {
    let by_category: Vec<CategoryResult> = expenses
        .iter()
        .map(|expense| {
            let (multiplier, source) = resolve_multiplier(expense, categories, headline, from, to);
            debug!("{}: multiplier {:.4} from {:?} index", expense.id, multiplier, source);

            CategoryResult {
                id: expense.id.clone(),
                label: expense.label.clone(),
                current_amount: expense.amount,
                adjusted_amount: expense.amount / multiplier,
                multiplier,
                category_inflation: (multiplier - 1.0) * 100.0,
                source,
                used_fallback: source != IndexSource::Category,
            }
        })
        .collect();

    let current_total: f64 = by_category.iter().map(|c| c.current_amount).sum();
    let adjusted_total: f64 = by_category.iter().map(|c| c.adjusted_amount).sum();

    let cumulative_inflation = if adjusted_total > 0.0 {
        (current_total / adjusted_total - 1.0) * 100.0
    } else {
        0.0
    };

    let years = years_between(from, to);
    let annualized_rate = if years > 0 && adjusted_total > 0.0 {
        ((current_total / adjusted_total).powf(1.0 / years as f64) - 1.0) * 100.0
    } else {
        0.0
    };

    CostOfLivingResult {
        from_period: from.to_string(),
        to_period: to.to_string(),
        current_total,
        adjusted_total,
        cumulative_inflation,
        annualized_rate,
        purchasing_power_loss: current_total - adjusted_total,
        by_category,
    }
}

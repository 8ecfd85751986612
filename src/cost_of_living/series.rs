//! CPI time series keyed by fiscal year ("2019-20")
//!
//! Values are annual percentage changes, not index levels.

use serde::{Deserialize, Serialize};

/// Annual CPI change for one fiscal year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpiPoint {
    pub period: String,
    pub value: f64,
}

impl CpiPoint {
    pub fn new(period: impl Into<String>, value: f64) -> Self {
        Self {
            period: period.into(),
            value,
        }
    }
}

/// Category-specific CPI, selected by a COICOP division code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySeries {
    pub division: String,
    pub name: String,
    pub series: Vec<CpiPoint>,
}

/// One row of the published inflation table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InflationPoint {
    pub period: String,
    pub cpi_headline: Option<f64>,
    #[serde(default)]
    pub cpi_food: Option<f64>,
    #[serde(default)]
    pub cpi_core: Option<f64>,
}

/// Starting calendar year of a fiscal-year label ("2019-20" -> 2019)
pub fn fiscal_year_start(period: &str) -> Option<i32> {
    period.split('-').next()?.trim().parse().ok()
}

/// Whole years between two fiscal-year labels, 0 if either is unreadable
pub fn years_between(from: &str, to: &str) -> u32 {
    match (fiscal_year_start(from), fiscal_year_start(to)) {
        (Some(a), Some(b)) => a.abs_diff(b),
        _ => 0,
    }
}

/// Headline CPI as a plain series, skipping years without a headline figure
pub fn headline_series(points: &[InflationPoint]) -> Vec<CpiPoint> {
    points
        .iter()
        .filter_map(|p| p.cpi_headline.map(|v| CpiPoint::new(p.period.clone(), v)))
        .collect()
}

/// Periods with a headline figure, ascending
pub fn available_periods(points: &[InflationPoint]) -> Vec<String> {
    let mut periods: Vec<String> = points
        .iter()
        .filter(|p| p.cpi_headline.is_some())
        .map(|p| p.period.clone())
        .collect();
    periods.sort();
    periods
}

/// Compounded price change from `from` to `to`
///
/// Returns `None` when either period is missing, `from` is not strictly before
/// `to`, or any year in between is missing from the series. Input order does
/// not matter.
pub fn cumulative_multiplier(series: &[CpiPoint], from: &str, to: &str) -> Option<f64> {
    let mut sorted: Vec<&CpiPoint> = series.iter().collect();
    sorted.sort_by(|a, b| a.period.cmp(&b.period));

    let from_idx = sorted.iter().position(|p| p.period == from)?;
    let to_idx = sorted.iter().position(|p| p.period == to)?;
    if from_idx >= to_idx {
        return None;
    }

    // A skipped year would understate compounding
    for pair in sorted[from_idx..=to_idx].windows(2) {
        let curr = fiscal_year_start(&pair[0].period)?;
        let next = fiscal_year_start(&pair[1].period)?;
        if next - curr != 1 {
            return None;
        }
    }

    let multiplier: f64 = sorted[from_idx + 1..=to_idx]
        .iter()
        .map(|p| 1.0 + p.value / 100.0)
        .product();

    (multiplier.is_finite() && multiplier > 0.0).then_some(multiplier)
}

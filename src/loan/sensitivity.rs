//! Rate-sensitivity ladder: how the EMI moves when the policy rate does

use serde::{Deserialize, Serialize};

use super::emi::{check_loan_inputs, compute_emi};
use crate::error::{CalcError, Result};

/// Offsets in basis points around the current rate
pub const DEFAULT_BPS_LADDER: [i32; 5] = [-50, -25, 0, 25, 50];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateScenario {
    pub label: String,
    pub bps_change: i32,
    /// Hypothetical annual rate (percent), floored at zero
    pub rate: f64,
    pub monthly_emi: f64,
    /// Positive when the scenario is costlier than today
    pub monthly_diff: f64,
    pub total_diff: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateChangeImpact {
    pub scenarios: Vec<RateScenario>,
    /// Position of the 0 bps scenario in `scenarios`
    pub current_scenario_index: usize,
}

impl RateChangeImpact {
    pub fn current(&self) -> &RateScenario {
        &self.scenarios[self.current_scenario_index]
    }
}

fn scenario_label(bps: i32) -> String {
    match bps {
        0 => "Current".to_string(),
        b if b > 0 => format!("+{} bps", b),
        b => format!("{} bps", b),
    }
}

/// Scenarios over the default ±50 bps ladder
pub fn rate_impact(principal: f64, term_months: u32, current_rate: f64) -> Result<RateChangeImpact> {
    rate_impact_with_ladder(principal, term_months, current_rate, &DEFAULT_BPS_LADDER)
}

/// Scenarios over a caller-supplied ladder, which must include 0
pub fn rate_impact_with_ladder(
    principal: f64,
    term_months: u32,
    current_rate: f64,
    ladder: &[i32],
) -> Result<RateChangeImpact> {
    check_loan_inputs(principal, current_rate, term_months)?;

    let current_scenario_index = ladder
        .iter()
        .position(|&bps| bps == 0)
        .ok_or_else(|| CalcError::invalid("ladder", "rate ladder must contain a 0 bps step"))?;

    let current = compute_emi(principal, current_rate, term_months)?;

    let scenarios = ladder
        .iter()
        .map(|&bps| {
            let rate = (current_rate + bps as f64 / 100.0).max(0.0);
            let breakdown = compute_emi(principal, rate, term_months)?;
            Ok(RateScenario {
                label: scenario_label(bps),
                bps_change: bps,
                rate,
                monthly_emi: breakdown.monthly_emi,
                monthly_diff: breakdown.monthly_emi - current.monthly_emi,
                total_diff: breakdown.total_payment - current.total_payment,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(RateChangeImpact {
        scenarios,
        current_scenario_index,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_ladder() {
        let impact = rate_impact(5_000_000.0, 240, 8.5).unwrap();

        assert_eq!(impact.scenarios.len(), 5);
        assert_eq!(impact.current_scenario_index, 2);

        let labels: Vec<_> = impact.scenarios.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, ["-50 bps", "-25 bps", "Current", "+25 bps", "+50 bps"]);

        let current = impact.current();
        assert_eq!(current.rate, 8.5);
        assert_eq!(current.monthly_diff, 0.0);
        assert_eq!(current.total_diff, 0.0);

        assert!(impact.scenarios[0].monthly_diff < 0.0);
        assert!(impact.scenarios[4].monthly_diff > 0.0);
        assert!(impact.scenarios[4].total_diff > impact.scenarios[3].total_diff);
    }

    #[test]
    fn test_rate_is_floored_at_zero() {
        let impact = rate_impact(120_000.0, 12, 0.3).unwrap();

        assert_eq!(impact.scenarios[0].rate, 0.0);
        assert_eq!(impact.scenarios[0].monthly_emi, 10_000.0);
        assert!((impact.scenarios[1].rate - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_custom_ladder_must_contain_current() {
        assert!(rate_impact_with_ladder(100_000.0, 12, 8.0, &[-100, 100]).is_err());

        let impact = rate_impact_with_ladder(100_000.0, 12, 8.0, &[0, 100, 200]).unwrap();
        assert_eq!(impact.current_scenario_index, 0);
        assert_eq!(impact.scenarios[2].label, "+200 bps");
    }

    #[test]
    fn test_very_long_term_scenarios_are_finite() {
        let impact = rate_impact(1_000_000.0, 100_000, 30.0).unwrap();
        for scenario in &impact.scenarios {
            assert!(scenario.monthly_emi.is_finite(), "{:?}", scenario);
            assert!(scenario.total_diff.is_finite(), "{:?}", scenario);
        }
        assert!(impact.scenarios[4].monthly_diff > 0.0);
    }

    #[test]
    fn test_invalid_loan_is_rejected() {
        assert!(rate_impact(100_000.0, 0, 8.0).is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn prop_current_scenario_has_no_delta(principal in 0u64..50_000_000, rate_bp in 0u32..2000, months in 1u32..360) {
            let impact = rate_impact(principal as f64, months, rate_bp as f64 / 100.0).unwrap();
            let current = impact.current();
            prop_assert_eq!(current.bps_change, 0);
            prop_assert_eq!(current.monthly_diff, 0.0);
            prop_assert_eq!(current.total_diff, 0.0);
        }
    }
}

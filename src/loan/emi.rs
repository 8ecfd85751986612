//! Equated monthly installment on a reducing-balance loan
//!
//! EMI = P × r × (1+r)^n / ((1+r)^n − 1), r = annual rate / 12 / 100, n = months.
//!
//! Evaluated as P × r / (1 − (1+r)^−n) through `ln_1p`/`exp_m1`, which stays
//! finite for very long terms and very small rates.

use serde::{Deserialize, Serialize};

use crate::error::{CalcError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EmiBreakdown {
    pub monthly_emi: f64,
    pub total_payment: f64,
    pub total_interest: f64,
    /// Annual rate the EMI was computed at (percent)
    pub effective_rate: f64,
    /// Interest paid per rupee borrowed
    pub interest_ratio: f64,
}

/// Monthly periodic rate as a decimal
pub fn monthly_rate(annual_rate_percent: f64) -> f64 {
    annual_rate_percent / 12.0 / 100.0
}

pub(crate) fn check_loan_inputs(principal: f64, annual_rate: f64, term_months: u32) -> Result<()> {
    if term_months == 0 {
        return Err(CalcError::invalid("term_months", "loan term must be at least one month"));
    }
    if !principal.is_finite() || principal < 0.0 {
        return Err(CalcError::invalid(
            "principal",
            format!("must be a non-negative amount, got {}", principal),
        ));
    }
    if !annual_rate.is_finite() || annual_rate < 0.0 {
        return Err(CalcError::invalid(
            "annual_rate",
            format!("must be a non-negative percentage, got {}", annual_rate),
        ));
    }
    Ok(())
}

/// Compute the installment and lifetime cost of a loan
pub fn compute_emi(principal: f64, annual_rate: f64, term_months: u32) -> Result<EmiBreakdown> {
    check_loan_inputs(principal, annual_rate, term_months)?;

    if principal == 0.0 {
        return Ok(EmiBreakdown::default());
    }

    let n = term_months as f64;

    // The closed form is 0/0 at r = 0
    if annual_rate == 0.0 {
        return Ok(EmiBreakdown {
            monthly_emi: principal / n,
            total_payment: principal,
            total_interest: 0.0,
            effective_rate: 0.0,
            interest_ratio: 0.0,
        });
    }

    let r = monthly_rate(annual_rate);
    // 1 − (1+r)^−n, without cancellation when n·r is tiny or overflow when n is huge
    let annuity_denominator = -(-n * r.ln_1p()).exp_m1();
    let monthly_emi = principal * r / annuity_denominator;
    let total_payment = monthly_emi * n;
    // Rounding can leave a sub-paisa negative residue at near-zero rates
    let total_interest = (total_payment - principal).max(0.0);

    Ok(EmiBreakdown {
        monthly_emi,
        total_payment,
        total_interest,
        effective_rate: annual_rate,
        interest_ratio: total_interest / principal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use proptest::prelude::*;

    #[test]
    fn test_home_loan_reference() {
        // 50 lakh at 8.5% over 20 years
        let emi = compute_emi(5_000_000.0, 8.5, 240).unwrap();

        assert_eq!(emi.monthly_emi.round(), 43_391.0);
        assert_relative_eq!(emi.total_payment, emi.monthly_emi * 240.0);
        assert_relative_eq!(emi.total_interest, emi.total_payment - 5_000_000.0);
        assert!((emi.interest_ratio - 1.08).abs() < 0.01, "ratio {}", emi.interest_ratio);
        assert_eq!(emi.effective_rate, 8.5);
    }

    #[test]
    fn test_zero_principal_is_all_zero() {
        let emi = compute_emi(0.0, 9.0, 60).unwrap();
        assert_eq!(emi, EmiBreakdown::default());
    }

    #[test]
    fn test_zero_rate_is_simple_division() {
        let emi = compute_emi(120_000.0, 0.0, 12).unwrap();
        assert_eq!(emi.monthly_emi, 10_000.0);
        assert_eq!(emi.total_payment, 120_000.0);
        assert_eq!(emi.total_interest, 0.0);
        assert_eq!(emi.interest_ratio, 0.0);
    }

    #[test]
    fn test_single_month_loan() {
        let emi = compute_emi(100_000.0, 12.0, 1).unwrap();
        assert_abs_diff_eq!(emi.monthly_emi, 101_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_extreme_terms_and_rates_stay_finite() {
        let cases = [
            (1_000_000.0, 30.0, 100_000),
            (1_000_000.0, 1e-14, 12),
            (1_000_000.0, 8.0, 3_000_000_000),
        ];

        for (principal, rate, months) in cases {
            let emi = compute_emi(principal, rate, months).unwrap();
            assert!(emi.monthly_emi.is_finite() && emi.monthly_emi > 0.0, "{:?}", emi);
            assert!(emi.total_payment.is_finite() && emi.total_payment > 0.0, "{:?}", emi);
            assert!(emi.total_interest.is_finite() && emi.total_interest >= 0.0, "{:?}", emi);
            assert!(emi.interest_ratio.is_finite(), "{:?}", emi);
        }

        // Very long terms converge to interest-only payments
        let long = compute_emi(1_000_000.0, 30.0, 100_000).unwrap();
        assert_relative_eq!(long.monthly_emi, 1_000_000.0 * 0.025, max_relative = 1e-9);

        let perpetual = compute_emi(1_000_000.0, 8.0, 3_000_000_000).unwrap();
        assert_relative_eq!(perpetual.monthly_emi, 1_000_000.0 * monthly_rate(8.0), max_relative = 1e-9);

        // A vanishing rate behaves like simple division
        let tiny = compute_emi(1_000_000.0, 1e-14, 12).unwrap();
        assert_relative_eq!(tiny.monthly_emi, 1_000_000.0 / 12.0, max_relative = 1e-9);
    }

    #[test]
    fn test_rejects_invalid_inputs() {
        assert!(matches!(
            compute_emi(100_000.0, 8.0, 0),
            Err(CalcError::InvalidInput { param: "term_months", .. })
        ));
        assert!(matches!(
            compute_emi(-1.0, 8.0, 12),
            Err(CalcError::InvalidInput { param: "principal", .. })
        ));
        assert!(matches!(
            compute_emi(100_000.0, -0.5, 12),
            Err(CalcError::InvalidInput { param: "annual_rate", .. })
        ));
        assert!(compute_emi(f64::INFINITY, 8.0, 12).is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_zero_rate_has_no_interest(principal in 0u64..100_000_000, months in 1u32..480) {
            let emi = compute_emi(principal as f64, 0.0, months).unwrap();
            prop_assert_eq!(emi.total_interest, 0.0);
            prop_assert_eq!(emi.monthly_emi, principal as f64 / months as f64);
        }

        #[test]
        fn prop_zero_principal_is_all_zero(rate_bp in 0u32..3000, months in 1u32..480) {
            let emi = compute_emi(0.0, rate_bp as f64 / 100.0, months).unwrap();
            prop_assert_eq!(emi, EmiBreakdown::default());
        }

        #[test]
        fn prop_positive_rate_costs_interest(principal in 1_000u64..100_000_000, rate_bp in 1u32..3000, months in 1u32..480) {
            let emi = compute_emi(principal as f64, rate_bp as f64 / 100.0, months).unwrap();
            prop_assert!(emi.total_interest > 0.0);
            prop_assert!(emi.monthly_emi.is_finite());
        }
    }
}

//! Progressive income-tax engine
//!
//! Computation order for one gross income under one regime:
//! 1. Itemized deductions (old regime only), capped per bucket
//! 2. Taxable income after standard and itemized deductions, floored at zero
//! 3. Slab walk in ascending order
//! 4. Rebate cliff: all-or-nothing at the regime's rebate limit
//! 5. Surcharge from the income bracket, capped per regime (no marginal relief)
//! 6. Cess on tax plus surcharge
//! 7. Total rounded to the rupee

use log::debug;
use serde::{Deserialize, Serialize};

use super::deductions::{DeductionLine, Deductions};
use super::slabs::{TaxRegime, TaxSlab, TaxSlabTable};
use super::Regime;
use crate::error::{CalcError, Result};

/// Tax attributed to one slab
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlabTax {
    pub slab: TaxSlab,
    /// Portion of taxable income that fell into this slab
    pub taxable_in_slab: f64,
    pub tax_on_slab: f64,
}

/// Full tax computation for one income under one regime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    pub regime: Regime,
    pub gross_income: f64,
    pub standard_deduction: f64,
    pub deductions: Vec<DeductionLine>,
    pub total_deductions: f64,
    pub taxable_income: f64,
    pub slabwise_tax: Vec<SlabTax>,
    pub base_tax: f64,
    pub rebate_applied: bool,
    pub tax_after_rebate: f64,
    pub surcharge_rate: f64,
    pub surcharge: f64,
    pub cess: f64,
    pub total_tax: f64,
    /// Total tax as a percentage of gross income
    pub effective_rate: f64,
}

/// Side-by-side result for both regimes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeComparison {
    pub new: TaxBreakdown,
    pub old: TaxBreakdown,
    /// Regime with the lower total; the new regime wins ties
    pub recommended: Regime,
    /// How much the recommended regime saves over the other
    pub savings: f64,
}

/// Tax engine over a validated slab table
#[derive(Debug, Clone)]
pub struct TaxEngine {
    table: TaxSlabTable,
}

impl TaxEngine {
    /// Validate the table once so later computations can walk it freely
    pub fn new(table: TaxSlabTable) -> Result<Self> {
        table.validate()?;
        Ok(Self { table })
    }

    pub fn table(&self) -> &TaxSlabTable {
        &self.table
    }

    /// Compute the full breakdown for one gross income
    ///
    /// `deductions` is ignored under the new regime.
    pub fn compute(
        &self,
        gross_income: f64,
        regime: Regime,
        deductions: Option<&Deductions>,
    ) -> Result<TaxBreakdown> {
        if !gross_income.is_finite() || gross_income < 0.0 {
            return Err(CalcError::invalid(
                "gross_income",
                format!("must be a non-negative amount, got {}", gross_income),
            ));
        }

        let rules = self.table.regime(regime);
        let standard_deduction = rules.standard_deduction as f64;

        let lines = match (regime, deductions) {
            (Regime::Old, Some(claims)) => claims.itemize(),
            _ => Vec::new(),
        };
        let total_deductions: f64 = lines.iter().map(|line| line.allowed).sum();

        let taxable_income = (gross_income - standard_deduction - total_deductions).max(0.0);

        let (slabwise_tax, base_tax) = slab_tax(taxable_income, rules);

        let rebate_applied = taxable_income <= rules.rebate_limit as f64 && base_tax > 0.0;
        let tax_after_rebate = if rebate_applied { 0.0 } else { base_tax };

        let surcharge_rate = self
            .table
            .surcharge_rate(taxable_income, rules.surcharge_max_rate);
        let surcharge = tax_after_rebate * surcharge_rate / 100.0;

        let tax_plus_surcharge = tax_after_rebate + surcharge;
        let cess = tax_plus_surcharge * self.table.cess / 100.0;
        let total_tax = (tax_plus_surcharge + cess).round();

        let effective_rate = if gross_income > 0.0 {
            total_tax / gross_income * 100.0
        } else {
            0.0
        };

        debug!(
            "{} regime: gross={:.0} taxable={:.0} base={:.2} rebate={} surcharge={:.2} cess={:.2} total={:.0}",
            regime, gross_income, taxable_income, base_tax, rebate_applied, surcharge, cess, total_tax
        );

        Ok(TaxBreakdown {
            regime,
            gross_income,
            standard_deduction,
            deductions: lines,
            total_deductions,
            taxable_income,
            slabwise_tax,
            base_tax,
            rebate_applied,
            tax_after_rebate,
            surcharge_rate,
            surcharge,
            cess,
            total_tax,
            effective_rate,
        })
    }

    /// Compute both regimes and pick the cheaper one
    pub fn compare(&self, gross_income: f64, deductions: Option<&Deductions>) -> Result<RegimeComparison> {
        let new = self.compute(gross_income, Regime::New, deductions)?;
        let old = self.compute(gross_income, Regime::Old, deductions)?;

        let (recommended, savings) = if new.total_tax <= old.total_tax {
            (Regime::New, old.total_tax - new.total_tax)
        } else {
            (Regime::Old, new.total_tax - old.total_tax)
        };

        Ok(RegimeComparison {
            new,
            old,
            recommended,
            savings,
        })
    }
}

/// Walk the slabs, consuming taxable income from the bottom up
///
/// Slabs above the exhausted income still appear with zero tax.
fn slab_tax(taxable_income: f64, rules: &TaxRegime) -> (Vec<SlabTax>, f64) {
    let mut remaining = taxable_income;
    let mut base_tax = 0.0;
    let mut slabwise = Vec::with_capacity(rules.slabs.len());

    for slab in &rules.slabs {
        if remaining <= 0.0 {
            slabwise.push(SlabTax {
                slab: *slab,
                taxable_in_slab: 0.0,
                tax_on_slab: 0.0,
            });
            continue;
        }

        let taxable_in_slab = remaining.min(slab.width());
        let tax_on_slab = taxable_in_slab * slab.rate / 100.0;

        slabwise.push(SlabTax {
            slab: *slab,
            taxable_in_slab,
            tax_on_slab,
        });
        base_tax += tax_on_slab;
        remaining -= taxable_in_slab;
    }

    (slabwise, base_tax)
}

/// One-shot computation that validates the table on every call
pub fn compute_tax(
    gross_income: f64,
    regime: Regime,
    table: &TaxSlabTable,
    deductions: Option<&Deductions>,
) -> Result<TaxBreakdown> {
    table.validate()?;
    TaxEngine {
        table: table.clone(),
    }
    .compute(gross_income, regime, deductions)
}

/// One-shot regime comparison
pub fn compare_regimes(
    gross_income: f64,
    table: &TaxSlabTable,
    deductions: Option<&Deductions>,
) -> Result<RegimeComparison> {
    TaxEngine::new(table.clone())?.compare(gross_income, deductions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tax::deductions::DeductionKind;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    fn engine() -> TaxEngine {
        TaxEngine::new(TaxSlabTable::fy2025_26()).unwrap()
    }

    /// Old-regime table with a 75,000 standard deduction
    fn old_regime_with_75k() -> TaxEngine {
        let mut table = TaxSlabTable::fy2025_26();
        table.regimes.old.standard_deduction = 75_000;
        TaxEngine::new(table).unwrap()
    }

    #[test]
    fn test_old_regime_with_deductions() {
        let engine = old_regime_with_75k();
        let deductions = Deductions::default()
            .with(DeductionKind::Savings, 150_000.0)
            .with(DeductionKind::HealthSelf, 25_000.0);

        let result = engine
            .compute(1_200_000.0, Regime::Old, Some(&deductions))
            .unwrap();

        assert_eq!(result.total_deductions, 175_000.0);
        assert_eq!(result.taxable_income, 950_000.0);
        assert!(!result.rebate_applied);

        // 0 on the first 250,001; 5% on 250,000; 20% on the remaining 449,999
        let expected_base = 250_000.0 * 0.05 + 449_999.0 * 0.20;
        assert_abs_diff_eq!(result.base_tax, expected_base, epsilon = 1e-6);

        let slab_sum: f64 = result.slabwise_tax.iter().map(|s| s.tax_on_slab).sum();
        assert_abs_diff_eq!(slab_sum, result.base_tax, epsilon = 1e-9);
        assert_eq!(result.slabwise_tax.len(), 4);
        assert_eq!(result.slabwise_tax[3].tax_on_slab, 0.0);

        assert_eq!(result.surcharge, 0.0);
        assert_abs_diff_eq!(result.cess, expected_base * 0.04, epsilon = 1e-6);
        assert_eq!(result.total_tax, (expected_base * 1.04).round());
    }

    #[test]
    fn test_new_regime_ignores_deductions() {
        let engine = engine();
        let deductions = Deductions::default().with(DeductionKind::Savings, 150_000.0);

        let with = engine
            .compute(1_500_000.0, Regime::New, Some(&deductions))
            .unwrap();
        let without = engine.compute(1_500_000.0, Regime::New, None).unwrap();

        assert!(with.deductions.is_empty());
        assert_eq!(with.total_deductions, 0.0);
        assert_eq!(with, without);
    }

    #[test]
    fn test_rebate_cliff() {
        let engine = engine();

        // Taxable exactly at the limit: full rebate
        let at_limit = engine.compute(1_275_000.0, Regime::New, None).unwrap();
        assert_eq!(at_limit.taxable_income, 1_200_000.0);
        assert!(at_limit.rebate_applied);
        assert!(at_limit.base_tax > 0.0);
        assert_eq!(at_limit.tax_after_rebate, 0.0);
        assert_eq!(at_limit.total_tax, 0.0);

        // One rupee over: the whole liability returns
        let over = engine.compute(1_275_001.0, Regime::New, None).unwrap();
        assert!(!over.rebate_applied);
        assert!(over.tax_after_rebate > 0.0);
        assert_abs_diff_eq!(over.base_tax, 60_000.0, epsilon = 1e-6);
        assert_eq!(over.total_tax, 62_400.0);
    }

    #[test]
    fn test_no_rebate_flag_when_no_tax() {
        let result = engine().compute(300_000.0, Regime::New, None).unwrap();
        assert_eq!(result.base_tax, 0.0);
        assert!(!result.rebate_applied);
    }

    #[test]
    fn test_zero_income() {
        let result = engine().compute(0.0, Regime::Old, None).unwrap();
        assert_eq!(result.taxable_income, 0.0);
        assert_eq!(result.total_tax, 0.0);
        assert_eq!(result.effective_rate, 0.0);
        assert!(result.slabwise_tax.iter().all(|s| s.tax_on_slab == 0.0));
    }

    #[test]
    fn test_taxable_income_floors_at_zero() {
        let deductions = Deductions::default().with(DeductionKind::HouseRent, 900_000.0);
        let result = engine()
            .compute(400_000.0, Regime::Old, Some(&deductions))
            .unwrap();
        assert_eq!(result.taxable_income, 0.0);
    }

    #[test]
    fn test_surcharge_applies_and_is_capped() {
        let engine = engine();

        // 6 crore: top bracket is 37%, new regime caps at 25%
        let new = engine.compute(60_075_000.0, Regime::New, None).unwrap();
        assert_eq!(new.surcharge_rate, 25.0);
        assert_abs_diff_eq!(new.surcharge, new.tax_after_rebate * 0.25, epsilon = 1e-6);

        let old = engine.compute(60_050_000.0, Regime::Old, None).unwrap();
        assert_eq!(old.surcharge_rate, 37.0);

        // 75 lakh falls in the 10% bracket
        let mid = engine.compute(7_575_000.0, Regime::New, None).unwrap();
        assert_eq!(mid.surcharge_rate, 10.0);
        assert_abs_diff_eq!(
            mid.cess,
            (mid.tax_after_rebate + mid.surcharge) * 0.04,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_effective_rate() {
        let result = engine().compute(2_000_000.0, Regime::New, None).unwrap();
        assert_abs_diff_eq!(
            result.effective_rate,
            result.total_tax / 2_000_000.0 * 100.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_rejects_negative_income() {
        let err = engine().compute(-1.0, Regime::New, None).unwrap_err();
        assert!(matches!(err, CalcError::InvalidInput { param: "gross_income", .. }));
        assert!(engine().compute(f64::NAN, Regime::New, None).is_err());
    }

    #[test]
    fn test_compute_tax_rejects_malformed_table() {
        let mut table = TaxSlabTable::fy2025_26();
        table.regimes.new.slabs.remove(1);
        assert!(compute_tax(1_000_000.0, Regime::New, &table, None).is_err());
        assert!(TaxEngine::new(table).is_err());
    }

    #[test]
    fn test_compare_prefers_cheaper_regime() {
        let table = TaxSlabTable::fy2025_26();

        // No deductions: new regime is cheaper (rebate up to 12 lakh)
        let plain = compare_regimes(1_200_000.0, &table, None).unwrap();
        assert_eq!(plain.recommended, Regime::New);
        assert_eq!(plain.savings, plain.old.total_tax - plain.new.total_tax);

        // Heavy deductions at a high income favour the old regime
        let heavy = Deductions::default()
            .with(DeductionKind::Savings, 150_000.0)
            .with(DeductionKind::HealthSelf, 25_000.0)
            .with(DeductionKind::HealthParents, 25_000.0)
            .with(DeductionKind::RetirementTopUp, 50_000.0)
            .with(DeductionKind::HomeLoanInterest, 200_000.0)
            .with(DeductionKind::HouseRent, 600_000.0);
        let deducted = compare_regimes(2_500_000.0, &table, Some(&heavy)).unwrap();
        assert_eq!(deducted.recommended, Regime::Old);
        assert!(deducted.savings > 0.0);
    }

    #[test]
    fn test_ties_go_to_new_regime() {
        let comparison = compare_regimes(0.0, &TaxSlabTable::fy2025_26(), None).unwrap();
        assert_eq!(comparison.recommended, Regime::New);
        assert_eq!(comparison.savings, 0.0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_slab_contributions_sum_to_base_tax(income in 0u64..100_000_000, old in any::<bool>()) {
            let regime = if old { Regime::Old } else { Regime::New };
            let result = engine().compute(income as f64, regime, None).unwrap();

            let slab_sum: f64 = result.slabwise_tax.iter().map(|s| s.tax_on_slab).sum();
            prop_assert!((slab_sum - result.base_tax).abs() < 1e-6);

            let taxed: f64 = result.slabwise_tax.iter().map(|s| s.taxable_in_slab).sum();
            prop_assert!((taxed - result.taxable_income).abs() < 1e-6);
        }

        #[test]
        fn prop_rebate_cliff_holds(taxable in 0u64..=1_200_000) {
            let engine = engine();
            let standard = engine.table().regimes.new.standard_deduction;

            let below = engine.compute((taxable + standard) as f64, Regime::New, None).unwrap();
            prop_assert_eq!(below.tax_after_rebate, 0.0);
            prop_assert_eq!(below.total_tax, 0.0);

            let above = engine.compute((1_200_001 + standard) as f64, Regime::New, None).unwrap();
            prop_assert!(above.tax_after_rebate > 0.0);
        }

        #[test]
        fn prop_old_regime_rebate_cliff_holds(taxable in 0u64..=500_000) {
            let engine = engine();
            let standard = engine.table().regimes.old.standard_deduction;

            let below = engine.compute((taxable + standard) as f64, Regime::Old, None).unwrap();
            prop_assert_eq!(below.tax_after_rebate, 0.0);
            prop_assert_eq!(below.total_tax, 0.0);

            let above = engine.compute((500_001 + standard) as f64, Regime::Old, None).unwrap();
            prop_assert!(!above.rebate_applied);
            prop_assert!(above.tax_after_rebate > 0.0);
        }
    }
}

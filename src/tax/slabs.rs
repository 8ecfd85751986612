//! Tax slab tables: marginal-rate slabs, surcharge brackets, cess
//!
//! Tables arrive as data (see `data/tax_slabs.json`) and are validated before
//! any computation walks them.

use serde::{Deserialize, Serialize};

use super::Regime;
use crate::error::{CalcError, Result};

/// Default cap on the surcharge rate when a regime does not configure one
pub const DEFAULT_SURCHARGE_MAX_RATE: f64 = 37.0;

/// A contiguous income range taxed at a single marginal rate
///
/// `to = None` marks the unbounded top slab.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxSlab {
    pub from: u64,
    pub to: Option<u64>,
    /// Percentage (e.g. 5.0 for 5%)
    pub rate: f64,
}

impl TaxSlab {
    pub fn new(from: u64, to: Option<u64>, rate: f64) -> Self {
        Self { from, to, rate }
    }

    /// Number of rupees the slab can absorb (inclusive bounds)
    pub fn width(&self) -> f64 {
        match self.to {
            Some(to) => to.saturating_sub(self.from).saturating_add(1) as f64,
            None => f64::INFINITY,
        }
    }

    /// Whether an amount falls inside this range
    ///
    /// The upper bound covers the whole final rupee, so paise above `to` still
    /// belong here rather than falling between slabs.
    pub fn contains(&self, amount: f64) -> bool {
        amount >= self.from as f64 && self.to.map_or(true, |to| amount < to.saturating_add(1) as f64)
    }
}

/// Rules for one regime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxRegime {
    pub slabs: Vec<TaxSlab>,
    pub standard_deduction: u64,
    pub rebate_limit: u64,
    #[serde(default = "default_surcharge_max_rate")]
    pub surcharge_max_rate: f64,
}

fn default_surcharge_max_rate() -> f64 {
    DEFAULT_SURCHARGE_MAX_RATE
}

impl TaxRegime {
    /// Check that slabs start at zero, ascend, and leave no gaps or overlaps
    pub fn validate(&self, regime: Regime) -> Result<()> {
        let malformed = |message: String| CalcError::MalformedSlabs {
            regime: regime.to_string(),
            message,
        };

        let first = self
            .slabs
            .first()
            .ok_or_else(|| malformed("no slabs configured".to_string()))?;
        if first.from != 0 {
            return Err(malformed(format!("first slab starts at {} instead of 0", first.from)));
        }

        for (i, slab) in self.slabs.iter().enumerate() {
            if !(0.0..=100.0).contains(&slab.rate) {
                return Err(malformed(format!("slab {} has rate {} outside 0-100", i, slab.rate)));
            }
            if let Some(to) = slab.to {
                if to < slab.from {
                    return Err(malformed(format!("slab {} ends ({}) before it starts ({})", i, to, slab.from)));
                }
            }

            let Some(next) = self.slabs.get(i + 1) else {
                continue;
            };
            let Some(to) = slab.to else {
                return Err(malformed(format!("unbounded slab {} is not the last slab", i)));
            };
            if to.checked_add(1) != Some(next.from) {
                return Err(malformed(format!(
                    "slab {} ends at {} but slab {} starts at {}",
                    i,
                    to,
                    i + 1,
                    next.from
                )));
            }
        }

        if !(0.0..=100.0).contains(&self.surcharge_max_rate) {
            return Err(malformed(format!(
                "surcharge cap {} outside 0-100",
                self.surcharge_max_rate
            )));
        }

        Ok(())
    }
}

/// Both regimes of one assessment year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Regimes {
    pub new: TaxRegime,
    pub old: TaxRegime,
}

/// Complete tax configuration for one assessment year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxSlabTable {
    pub assessment_year: String,
    pub financial_year: String,
    pub regimes: Regimes,
    /// Cess percentage levied on tax plus surcharge
    pub cess: f64,
    /// Income brackets selecting the surcharge rate, independent of the slabs
    pub surcharge_slabs: Vec<TaxSlab>,
}

impl TaxSlabTable {
    /// Rules for FY 2025-26 (AY 2026-27)
    pub fn fy2025_26() -> Self {
        Self {
            assessment_year: "2026-27".to_string(),
            financial_year: "2025-26".to_string(),
            regimes: Regimes {
                new: TaxRegime {
                    slabs: vec![
                        TaxSlab::new(0, Some(400_000), 0.0),
                        TaxSlab::new(400_001, Some(800_000), 5.0),
                        TaxSlab::new(800_001, Some(1_200_000), 10.0),
                        TaxSlab::new(1_200_001, Some(1_600_000), 15.0),
                        TaxSlab::new(1_600_001, Some(2_000_000), 20.0),
                        TaxSlab::new(2_000_001, Some(2_400_000), 25.0),
                        TaxSlab::new(2_400_001, None, 30.0),
                    ],
                    standard_deduction: 75_000,
                    rebate_limit: 1_200_000,
                    // The new regime tops out at 25%
                    surcharge_max_rate: 25.0,
                },
                old: TaxRegime {
                    slabs: vec![
                        TaxSlab::new(0, Some(250_000), 0.0),
                        TaxSlab::new(250_001, Some(500_000), 5.0),
                        TaxSlab::new(500_001, Some(1_000_000), 20.0),
                        TaxSlab::new(1_000_001, None, 30.0),
                    ],
                    standard_deduction: 50_000,
                    rebate_limit: 500_000,
                    surcharge_max_rate: DEFAULT_SURCHARGE_MAX_RATE,
                },
            },
            cess: 4.0,
            surcharge_slabs: vec![
                TaxSlab::new(5_000_001, Some(10_000_000), 10.0),
                TaxSlab::new(10_000_001, Some(20_000_000), 15.0),
                TaxSlab::new(20_000_001, Some(50_000_000), 25.0),
                TaxSlab::new(50_000_001, None, 37.0),
            ],
        }
    }

    pub fn regime(&self, regime: Regime) -> &TaxRegime {
        match regime {
            Regime::New => &self.regimes.new,
            Regime::Old => &self.regimes.old,
        }
    }

    /// Validate both regimes, the surcharge brackets and the cess
    pub fn validate(&self) -> Result<()> {
        self.regimes.new.validate(Regime::New)?;
        self.regimes.old.validate(Regime::Old)?;

        if !(0.0..=100.0).contains(&self.cess) {
            return Err(CalcError::invalid("cess", format!("{} is outside 0-100", self.cess)));
        }

        let malformed = |message: String| CalcError::MalformedSurcharge { message };
        for (i, bracket) in self.surcharge_slabs.iter().enumerate() {
            if !(0.0..=100.0).contains(&bracket.rate) {
                return Err(malformed(format!("bracket {} has rate {} outside 0-100", i, bracket.rate)));
            }
            if matches!(bracket.to, Some(to) if to < bracket.from) {
                return Err(malformed(format!("bracket {} ends before it starts", i)));
            }
            if let Some(next) = self.surcharge_slabs.get(i + 1) {
                match bracket.to {
                    Some(to) if next.from > to => {}
                    _ => {
                        return Err(malformed(format!(
                            "bracket {} overlaps or is out of order with bracket {}",
                            i,
                            i + 1
                        )))
                    }
                }
            }
        }

        Ok(())
    }

    /// Surcharge rate for a taxable income, capped for the regime
    ///
    /// Incomes outside every bracket carry no surcharge.
    pub fn surcharge_rate(&self, taxable_income: f64, max_rate: f64) -> f64 {
        self.surcharge_slabs
            .iter()
            .find(|bracket| bracket.contains(taxable_income))
            .map(|bracket| bracket.rate.min(max_rate))
            .unwrap_or(0.0)
    }
}

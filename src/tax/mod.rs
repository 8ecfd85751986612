//! Income-tax engine: slab tables, deductions, breakdowns, regime comparison

mod allocation;
mod deductions;
mod engine;
mod slabs;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use allocation::{allocate_tax, ExpenditureShare, ExpenditureSharesData, ShareAllocation};
pub use deductions::{DeductionKind, DeductionLine, Deductions};
pub use engine::{compare_regimes, compute_tax, RegimeComparison, SlabTax, TaxBreakdown, TaxEngine};
pub use slabs::{Regimes, TaxRegime, TaxSlab, TaxSlabTable, DEFAULT_SURCHARGE_MAX_RATE};

/// The two mutually exclusive rule sets a filer chooses between
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Regime {
    /// Lower rates, standard deduction only
    New,
    /// Higher rates, itemized deductions allowed
    Old,
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Regime::New => write!(f, "new"),
            Regime::Old => write!(f, "old"),
        }
    }
}

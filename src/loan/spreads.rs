//! Lender spreads over the policy repo rate

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{CalcError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanType {
    Home,
    Car,
    Personal,
}

impl LoanType {
    pub const ALL: [LoanType; 3] = [LoanType::Home, LoanType::Car, LoanType::Personal];

    /// Typical loan amount offered as a starting point
    pub fn default_amount(self) -> f64 {
        match self {
            LoanType::Home => 5_000_000.0,
            LoanType::Car => 800_000.0,
            LoanType::Personal => 300_000.0,
        }
    }

    pub fn default_tenure_years(self) -> u32 {
        match self {
            LoanType::Home => 20,
            LoanType::Car => 5,
            LoanType::Personal => 3,
        }
    }
}

impl fmt::Display for LoanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoanType::Home => write!(f, "home"),
            LoanType::Car => write!(f, "car"),
            LoanType::Personal => write!(f, "personal"),
        }
    }
}

/// Which end of the published spread range to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpreadLevel {
    Min,
    #[default]
    Typical,
    Max,
}

/// Spread range in percentage points over the repo rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanSpread {
    pub min_spread: f64,
    pub typical_spread: f64,
    pub max_spread: f64,
    #[serde(default)]
    pub source: String,
}

impl LoanSpread {
    pub fn at(&self, level: SpreadLevel) -> f64 {
        match level {
            SpreadLevel::Min => self.min_spread,
            SpreadLevel::Typical => self.typical_spread,
            SpreadLevel::Max => self.max_spread,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanSpreadTable {
    pub year: String,
    #[serde(default)]
    pub last_updated: String,
    pub spreads: BTreeMap<LoanType, LoanSpread>,
}

impl LoanSpreadTable {
    pub fn spread(&self, loan_type: LoanType) -> Result<&LoanSpread> {
        self.spreads
            .get(&loan_type)
            .ok_or_else(|| CalcError::UnknownLoanType(loan_type.to_string()))
    }

    /// Annual rate a borrower would face: repo rate plus the chosen spread
    pub fn effective_rate(&self, repo_rate: f64, loan_type: LoanType, level: SpreadLevel) -> Result<f64> {
        Ok(repo_rate + self.spread(loan_type)?.at(level))
    }

    /// Spreads must be ordered min <= typical <= max and non-negative
    pub fn validate(&self) -> Result<()> {
        for (loan_type, spread) in &self.spreads {
            let ordered = 0.0 <= spread.min_spread
                && spread.min_spread <= spread.typical_spread
                && spread.typical_spread <= spread.max_spread;
            if !ordered {
                return Err(CalcError::invalid(
                    "loan_spreads",
                    format!(
                        "{} spreads must satisfy 0 <= min <= typical <= max, got {}/{}/{}",
                        loan_type, spread.min_spread, spread.typical_spread, spread.max_spread
                    ),
                ));
            }
        }
        Ok(())
    }
}

//! Itemized deductions allowed under the old regime

use serde::{Deserialize, Serialize};

/// The seven deduction buckets the old regime recognises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeductionKind {
    /// 80C: PPF, ELSS, EPF, LIC, tuition fees
    Savings,
    /// 80D: health insurance for self and family
    HealthSelf,
    /// 80D: health insurance for parents
    HealthParents,
    /// 80CCD(1B): additional NPS contribution
    RetirementTopUp,
    /// 24(b): interest on a home loan
    HomeLoanInterest,
    /// HRA exemption, already computed by the caller
    HouseRent,
    /// 80TTA: savings account interest
    SavingsInterest,
}

impl DeductionKind {
    pub const ALL: [DeductionKind; 7] = [
        DeductionKind::Savings,
        DeductionKind::HealthSelf,
        DeductionKind::HealthParents,
        DeductionKind::RetirementTopUp,
        DeductionKind::HomeLoanInterest,
        DeductionKind::HouseRent,
        DeductionKind::SavingsInterest,
    ];

    /// Statutory cap, `None` when the claim passes through unchanged
    pub fn cap(self) -> Option<f64> {
        match self {
            DeductionKind::Savings => Some(150_000.0),
            DeductionKind::HealthSelf => Some(25_000.0),
            DeductionKind::HealthParents => Some(25_000.0),
            DeductionKind::RetirementTopUp => Some(50_000.0),
            DeductionKind::HomeLoanInterest => Some(200_000.0),
            DeductionKind::HouseRent => None,
            DeductionKind::SavingsInterest => Some(10_000.0),
        }
    }

    pub fn section(self) -> &'static str {
        match self {
            DeductionKind::Savings => "80C",
            DeductionKind::HealthSelf | DeductionKind::HealthParents => "80D",
            DeductionKind::RetirementTopUp => "80CCD(1B)",
            DeductionKind::HomeLoanInterest => "24(b)",
            DeductionKind::HouseRent => "HRA",
            DeductionKind::SavingsInterest => "80TTA",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DeductionKind::Savings => "Section 80C",
            DeductionKind::HealthSelf => "Section 80D - Self & Family",
            DeductionKind::HealthParents => "Section 80D - Parents",
            DeductionKind::RetirementTopUp => "Section 80CCD(1B)",
            DeductionKind::HomeLoanInterest => "Section 24(b)",
            DeductionKind::HouseRent => "HRA Exemption",
            DeductionKind::SavingsInterest => "Section 80TTA",
        }
    }

    /// Clamp a claim to the cap
    pub fn allowed(self, claimed: f64) -> f64 {
        match self.cap() {
            Some(cap) => claimed.min(cap),
            None => claimed,
        }
    }
}

/// Amounts claimed per bucket, before capping
///
/// Field names accept the section-style keys used by the calculator front end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Deductions {
    #[serde(default, alias = "section80C")]
    pub savings: f64,
    #[serde(default, alias = "section80D_self")]
    pub health_self: f64,
    #[serde(default, alias = "section80D_parents")]
    pub health_parents: f64,
    #[serde(default, alias = "section80CCD1B")]
    pub retirement_top_up: f64,
    #[serde(default, alias = "section24b")]
    pub home_loan_interest: f64,
    #[serde(default, alias = "hra")]
    pub house_rent: f64,
    #[serde(default, alias = "section80TTA")]
    pub savings_interest: f64,
}

/// One bucket as it appears in a breakdown
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeductionLine {
    pub kind: DeductionKind,
    pub claimed: f64,
    pub allowed: f64,
}

impl Deductions {
    pub fn claimed(&self, kind: DeductionKind) -> f64 {
        match kind {
            DeductionKind::Savings => self.savings,
            DeductionKind::HealthSelf => self.health_self,
            DeductionKind::HealthParents => self.health_parents,
            DeductionKind::RetirementTopUp => self.retirement_top_up,
            DeductionKind::HomeLoanInterest => self.home_loan_interest,
            DeductionKind::HouseRent => self.house_rent,
            DeductionKind::SavingsInterest => self.savings_interest,
        }
    }

    /// Builder-style setter
    pub fn with(mut self, kind: DeductionKind, amount: f64) -> Self {
        let slot = match kind {
            DeductionKind::Savings => &mut self.savings,
            DeductionKind::HealthSelf => &mut self.health_self,
            DeductionKind::HealthParents => &mut self.health_parents,
            DeductionKind::RetirementTopUp => &mut self.retirement_top_up,
            DeductionKind::HomeLoanInterest => &mut self.home_loan_interest,
            DeductionKind::HouseRent => &mut self.house_rent,
            DeductionKind::SavingsInterest => &mut self.savings_interest,
        };
        *slot = amount;
        self
    }

    /// Capped lines for every bucket with a positive claim
    pub fn itemize(&self) -> Vec<DeductionLine> {
        DeductionKind::ALL
            .iter()
            .filter_map(|&kind| {
                let claimed = self.claimed(kind);
                (claimed > 0.0).then(|| DeductionLine {
                    kind,
                    claimed,
                    allowed: kind.allowed(claimed),
                })
            })
            .collect()
    }

    /// Sum of capped claims
    pub fn total_allowed(&self) -> f64 {
        self.itemize().iter().map(|line| line.allowed).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_are_capped() {
        let deductions = Deductions::default()
            .with(DeductionKind::Savings, 200_000.0)
            .with(DeductionKind::HealthSelf, 10_000.0)
            .with(DeductionKind::SavingsInterest, 40_000.0);

        let lines = deductions.itemize();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].allowed, 150_000.0);
        assert_eq!(lines[1].allowed, 10_000.0);
        assert_eq!(lines[2].allowed, 10_000.0);
        assert_eq!(deductions.total_allowed(), 170_000.0);
    }

    #[test]
    fn test_section_codes() {
        assert_eq!(DeductionKind::HealthSelf.section(), DeductionKind::HealthParents.section());
        assert_eq!(DeductionKind::HomeLoanInterest.section(), "24(b)");

        let sections: Vec<_> = DeductionKind::ALL.iter().map(|k| k.section()).collect();
        assert_eq!(sections, ["80C", "80D", "80D", "80CCD(1B)", "24(b)", "HRA", "80TTA"]);
    }

    #[test]
    fn test_house_rent_is_uncapped() {
        let deductions = Deductions::default().with(DeductionKind::HouseRent, 480_000.0);
        assert_eq!(deductions.total_allowed(), 480_000.0);
    }

    #[test]
    fn test_only_positive_claims_are_itemized() {
        let deductions = Deductions::default()
            .with(DeductionKind::HomeLoanInterest, 0.0)
            .with(DeductionKind::RetirementTopUp, -5_000.0)
            .with(DeductionKind::HealthParents, 30_000.0);

        let lines = deductions.itemize();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].kind, DeductionKind::HealthParents);
        assert_eq!(lines[0].allowed, 25_000.0);
    }

    #[test]
    fn test_deserializes_section_keys() {
        let json = r#"{"section80C": 150000, "section80D_self": 25000, "hra": 120000}"#;
        let deductions: Deductions = serde_json::from_str(json).unwrap();
        assert_eq!(deductions.savings, 150_000.0);
        assert_eq!(deductions.health_self, 25_000.0);
        assert_eq!(deductions.house_rent, 120_000.0);
        assert_eq!(deductions.savings_interest, 0.0);
    }
}

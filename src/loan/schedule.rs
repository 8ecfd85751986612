//! Month-by-month amortization on the reducing balance

use serde::{Deserialize, Serialize};

use super::emi::{compute_emi, monthly_rate};
use crate::error::Result;

/// A single installment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub month: u32,
    pub opening_balance: f64,
    pub installment: f64,
    pub interest: f64,
    pub principal_repaid: f64,
    pub closing_balance: f64,
}

/// Installments rolled up into a loan year
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AmortizationYear {
    pub year: u32,
    pub interest: f64,
    pub principal_repaid: f64,
    pub closing_balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub monthly_emi: f64,
    pub rows: Vec<AmortizationRow>,
}

impl AmortizationSchedule {
    pub fn total_interest(&self) -> f64 {
        self.rows.iter().map(|r| r.interest).sum()
    }

    pub fn total_paid(&self) -> f64 {
        self.rows.iter().map(|r| r.installment).sum()
    }

    /// Per-year totals; a trailing partial year is kept
    pub fn yearly_summary(&self) -> Vec<AmortizationYear> {
        self.rows
            .chunks(12)
            .enumerate()
            .map(|(i, months)| AmortizationYear {
                year: i as u32 + 1,
                interest: months.iter().map(|r| r.interest).sum(),
                principal_repaid: months.iter().map(|r| r.principal_repaid).sum(),
                closing_balance: months.last().map(|r| r.closing_balance).unwrap_or(0.0),
            })
            .collect()
    }
}

/// Build the full repayment schedule
///
/// The final installment absorbs floating-point residue so the loan closes at
/// exactly zero.
pub fn amortization_schedule(principal: f64, annual_rate: f64, term_months: u32) -> Result<AmortizationSchedule> {
    let emi = compute_emi(principal, annual_rate, term_months)?;
    let r = monthly_rate(annual_rate);

    let mut rows = Vec::with_capacity(term_months as usize);
    let mut balance = principal;

    for month in 1..=term_months {
        let opening_balance = balance;
        let interest = opening_balance * r;
        let principal_repaid = if month == term_months {
            opening_balance
        } else {
            (emi.monthly_emi - interest).min(opening_balance)
        };
        balance = opening_balance - principal_repaid;

        rows.push(AmortizationRow {
            month,
            opening_balance,
            installment: interest + principal_repaid,
            interest,
            principal_repaid,
            closing_balance: balance,
        });
    }

    Ok(AmortizationSchedule {
        monthly_emi: emi.monthly_emi,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_schedule_matches_emi_totals() {
        let schedule = amortization_schedule(5_000_000.0, 8.5, 240).unwrap();
        let emi = compute_emi(5_000_000.0, 8.5, 240).unwrap();

        assert_eq!(schedule.rows.len(), 240);
        assert_eq!(schedule.rows.last().unwrap().closing_balance, 0.0);
        assert_relative_eq!(schedule.total_interest(), emi.total_interest, max_relative = 1e-9);
        assert_relative_eq!(schedule.total_paid(), emi.total_payment, max_relative = 1e-9);
    }

    #[test]
    fn test_interest_is_front_loaded() {
        let schedule = amortization_schedule(1_000_000.0, 9.0, 120).unwrap();
        let first = schedule.rows.first().unwrap();
        let last = schedule.rows.last().unwrap();

        assert!(first.interest > last.interest);
        assert!(first.principal_repaid < last.principal_repaid);
        assert_relative_eq!(first.interest, 7_500.0, max_relative = 1e-12);
    }

    #[test]
    fn test_yearly_summary() {
        let schedule = amortization_schedule(800_000.0, 9.5, 30).unwrap();
        let years = schedule.yearly_summary();

        assert_eq!(years.len(), 3);
        assert_eq!(years[2].year, 3);
        assert_eq!(years[2].closing_balance, 0.0);

        let repaid: f64 = years.iter().map(|y| y.principal_repaid).sum();
        assert_relative_eq!(repaid, 800_000.0, max_relative = 1e-12);
    }

    #[test]
    fn test_zero_rate_schedule() {
        let schedule = amortization_schedule(12_000.0, 0.0, 12).unwrap();
        assert!(schedule.rows.iter().all(|r| r.interest == 0.0));
        assert!(schedule.rows.iter().all(|r| r.installment == 1_000.0));
    }
}

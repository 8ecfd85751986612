//! Splits a tax bill across the Union budget's expenditure heads

use serde::{Deserialize, Serialize};

/// One expenditure head and its share of total spending
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenditureShare {
    pub id: String,
    pub name: String,
    pub percent_of_expenditure: f64,
    #[serde(default)]
    pub human_context: String,
    /// Units of `human_context` funded per lakh of tax; 0 disables the count
    #[serde(default)]
    pub human_context_multiplier: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenditureSharesData {
    pub year: String,
    pub shares: Vec<ExpenditureShare>,
}

/// Rupees of one taxpayer's bill attributed to an expenditure head
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareAllocation {
    pub id: String,
    pub name: String,
    pub percent_of_expenditure: f64,
    pub amount: f64,
    /// Rounded count of `human_context` units, when meaningful
    pub human_context_count: Option<f64>,
    pub human_context: String,
}

/// Allocate `total_tax` across shares; nothing is allocated for a zero bill
pub fn allocate_tax(total_tax: f64, shares: &[ExpenditureShare]) -> Vec<ShareAllocation> {
    if total_tax <= 0.0 {
        return Vec::new();
    }

    shares
        .iter()
        .map(|share| {
            let amount = (total_tax * share.percent_of_expenditure / 100.0).round();
            let human_context_count = (share.human_context_multiplier > 0.0 && amount > 0.0)
                .then(|| (amount * share.human_context_multiplier * 0.00001).round());

            ShareAllocation {
                id: share.id.clone(),
                name: share.name.clone(),
                percent_of_expenditure: share.percent_of_expenditure,
                amount,
                human_context_count,
                human_context: share.human_context.clone(),
            }
        })
        .collect()
}

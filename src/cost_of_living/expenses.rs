//! Household expense categories and preset budgets

use serde::{Deserialize, Serialize};

/// A monthly spend line
///
/// `coicop_division` selects a category CPI series; `None` means headline CPI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseCategory {
    pub id: String,
    pub label: String,
    pub amount: f64,
    #[serde(default)]
    pub coicop_division: Option<String>,
}

impl ExpenseCategory {
    pub fn new(id: &str, label: &str, amount: f64, coicop_division: Option<&str>) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            amount,
            coicop_division: coicop_division.map(str::to_string),
        }
    }
}

/// Default household budget (monthly rupees)
pub fn default_expenses() -> Vec<ExpenseCategory> {
    vec![
        ExpenseCategory::new("housing", "Rent / Housing", 15_000.0, Some("04")),
        ExpenseCategory::new("food", "Groceries", 8_000.0, Some("01")),
        ExpenseCategory::new("transport", "Getting around", 3_000.0, Some("07")),
        ExpenseCategory::new("education", "School & college", 5_000.0, Some("10")),
        ExpenseCategory::new("healthcare", "Doctor & medicines", 2_000.0, Some("06")),
        ExpenseCategory::new("utilities", "Electricity, gas, water", 2_000.0, Some("04")),
        ExpenseCategory::new("other", "Everything else", 3_000.0, None),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpensePreset {
    /// Single person, Rs 25K a month
    Single,
    /// Family, Rs 50K a month
    Family,
}

impl ExpensePreset {
    pub fn total(self) -> f64 {
        match self {
            ExpensePreset::Single => 25_000.0,
            ExpensePreset::Family => 50_000.0,
        }
    }

    /// Share of the total going to each default category
    pub fn weight(self, id: &str) -> f64 {
        let weights: [(&str, f64); 7] = match self {
            ExpensePreset::Single => [
                ("housing", 0.40),
                ("food", 0.20),
                ("transport", 0.12),
                ("education", 0.04),
                ("healthcare", 0.06),
                ("utilities", 0.08),
                ("other", 0.10),
            ],
            ExpensePreset::Family => [
                ("housing", 0.30),
                ("food", 0.20),
                ("transport", 0.08),
                ("education", 0.16),
                ("healthcare", 0.06),
                ("utilities", 0.06),
                ("other", 0.14),
            ],
        };
        weights
            .iter()
            .find(|(key, _)| *key == id)
            .map(|(_, w)| *w)
            .unwrap_or(0.0)
    }

    /// Default categories with amounts spread by the preset's weights
    pub fn expenses(self) -> Vec<ExpenseCategory> {
        default_expenses()
            .into_iter()
            .map(|mut category| {
                category.amount = (self.total() * self.weight(&category.id)).round();
                category
            })
            .collect()
    }
}

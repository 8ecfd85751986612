//! Static data loader
//!
//! Reads the fiscal tables from JSON/CSV files in data/

use log::info;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::cost_of_living::{CategorySeries, CpiPoint, InflationPoint};
use crate::error::DataError;
use crate::loan::LoanSpreadTable;
use crate::tax::{ExpenditureSharesData, TaxSlabTable};

/// Default path to the data directory
pub const DEFAULT_DATA_PATH: &str = "data";

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "FISCAL_DATA_DIR";

pub const TAX_SLABS_FILE: &str = "tax_slabs.json";
pub const LOAN_SPREADS_FILE: &str = "loan_spreads.json";
pub const INFLATION_FILE: &str = "inflation.json";
pub const CPI_BY_CATEGORY_FILE: &str = "cpi_by_category.csv";
pub const EXPENDITURE_SHARES_FILE: &str = "expenditure_shares.json";

/// RBI's inflation tolerance band (percent)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetBand {
    pub lower: f64,
    pub upper: f64,
}

/// Headline/food/core CPI by fiscal year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InflationData {
    pub year: String,
    pub target_band: TargetBand,
    pub series: Vec<InflationPoint>,
    #[serde(default)]
    pub source: String,
}

/// One row of cpi_by_category.csv
#[derive(Debug, Deserialize)]
struct CategoryCsvRow {
    division: String,
    name: String,
    period: String,
    value: f64,
}

/// Explicit directory if given, else `FISCAL_DATA_DIR`, else the default path
pub fn resolve_data_dir(explicit: Option<&Path>) -> PathBuf {
    match explicit {
        Some(dir) => dir.to_path_buf(),
        None => std::env::var(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_PATH)),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, DataError> {
    let file = File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| DataError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Load and validate the tax slab table
pub fn load_tax_slabs(dir: &Path) -> Result<TaxSlabTable, DataError> {
    let path = dir.join(TAX_SLABS_FILE);
    let table: TaxSlabTable = read_json(&path)?;
    table.validate().map_err(|source| DataError::Invalid { path, source })?;
    Ok(table)
}

/// Load and validate lender spreads
pub fn load_loan_spreads(dir: &Path) -> Result<LoanSpreadTable, DataError> {
    let path = dir.join(LOAN_SPREADS_FILE);
    let table: LoanSpreadTable = read_json(&path)?;
    table.validate().map_err(|source| DataError::Invalid { path, source })?;
    Ok(table)
}

pub fn load_inflation(dir: &Path) -> Result<InflationData, DataError> {
    read_json(&dir.join(INFLATION_FILE))
}

/// Load category CPI from CSV, one series per division in file order
pub fn load_cpi_by_category(dir: &Path) -> Result<Vec<CategorySeries>, DataError> {
    let path = dir.join(CPI_BY_CATEGORY_FILE);
    let csv_err = |source: csv::Error| DataError::Csv {
        path: path.clone(),
        source,
    };
    let mut reader = csv::Reader::from_path(&path).map_err(csv_err)?;

    let mut categories: Vec<CategorySeries> = Vec::new();
    for result in reader.deserialize() {
        let row: CategoryCsvRow = result.map_err(csv_err)?;
        let point = CpiPoint::new(row.period, row.value);

        match categories.iter_mut().find(|c| c.division == row.division) {
            Some(existing) => existing.series.push(point),
            None => categories.push(CategorySeries {
                division: row.division,
                name: row.name,
                series: vec![point],
            }),
        }
    }

    Ok(categories)
}

pub fn load_expenditure_shares(dir: &Path) -> Result<ExpenditureSharesData, DataError> {
    read_json(&dir.join(EXPENDITURE_SHARES_FILE))
}

/// Every table the calculators need
#[derive(Debug, Clone)]
pub struct FiscalData {
    pub tax_slabs: TaxSlabTable,
    pub loan_spreads: LoanSpreadTable,
    pub inflation: InflationData,
    pub cpi_by_category: Vec<CategorySeries>,
    pub expenditure_shares: ExpenditureSharesData,
}

impl FiscalData {
    /// Load all tables from a specific directory
    pub fn load_from(dir: &Path) -> Result<Self, DataError> {
        let data = Self {
            tax_slabs: load_tax_slabs(dir)?,
            loan_spreads: load_loan_spreads(dir)?,
            inflation: load_inflation(dir)?,
            cpi_by_category: load_cpi_by_category(dir)?,
            expenditure_shares: load_expenditure_shares(dir)?,
        };

        info!(
            "Loaded fiscal data from {}: AY {}, {} CPI years, {} CPI categories, {} expenditure heads",
            dir.display(),
            data.tax_slabs.assessment_year,
            data.inflation.series.len(),
            data.cpi_by_category.len(),
            data.expenditure_shares.shares.len()
        );

        Ok(data)
    }
}

//! Static fiscal tables and the engines built from them

pub mod loader;

pub use loader::{
    resolve_data_dir, FiscalData, InflationData, TargetBand, DATA_DIR_ENV, DEFAULT_DATA_PATH,
};

use crate::cost_of_living::{available_periods, headline_series, CostOfLivingEngine};
use crate::error::CalcError;
use crate::tax::TaxEngine;

impl FiscalData {
    pub fn tax_engine(&self) -> Result<TaxEngine, CalcError> {
        TaxEngine::new(self.tax_slabs.clone())
    }

    /// Engine over headline CPI plus every category series
    pub fn cost_of_living_engine(&self) -> CostOfLivingEngine {
        CostOfLivingEngine::new(
            headline_series(&self.inflation.series),
            self.cpi_by_category.clone(),
        )
    }

    /// Fiscal years with headline CPI, ascending
    pub fn available_periods(&self) -> Vec<String> {
        available_periods(&self.inflation.series)
    }
}

//! Error types for the calculation engines and the data loader

use std::path::PathBuf;
use thiserror::Error;

/// Precondition violations raised by the engines
///
/// Missing CPI data is never reported here: the cost-of-living engine resolves
/// it through its fallback chain instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    #[error("invalid input '{param}': {message}")]
    InvalidInput { param: &'static str, message: String },

    #[error("malformed slab table for {regime} regime: {message}")]
    MalformedSlabs { regime: String, message: String },

    #[error("malformed surcharge brackets: {message}")]
    MalformedSurcharge { message: String },

    #[error("no spread configured for {0} loans")]
    UnknownLoanType(String),
}

impl CalcError {
    pub(crate) fn invalid(param: &'static str, message: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            param,
            message: message.into(),
        }
    }
}

/// Errors raised while reading the static data files
#[derive(Error, Debug)]
pub enum DataError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("CSV error in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("invalid configuration in {}: {source}", path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: CalcError,
    },
}

pub type Result<T> = std::result::Result<T, CalcError>;

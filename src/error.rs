use std::path::PathBuf;

use thiserror::Error;

use crate::{epoch::ParsingError as EpochParsingError, regression::RegressionError};

/// Errors that may rise while parsing one of the input files
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParsingError {
    #[error("invalid timestamp: {0}")]
    Epoch(#[from] EpochParsingError),
    #[error("failed to parse \"{field}\" from \"{content}\"")]
    FloatField { field: &'static str, content: String },
    #[error("expecting at least {expected} fields, got {found}")]
    MissingFields { expected: usize, found: usize },
}

/// Library errors. Every fatal condition of the pipeline is expressed here,
/// the caller decides whether it terminates the process.
#[derive(Error, Debug)]
pub enum Error {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("{path}:{line}: {source}")]
    Parsing {
        path: PathBuf,
        line: usize,
        #[source]
        source: ParsingError,
    },
    #[error("{path}: missing \"{column}\" column")]
    MissingColumn { path: PathBuf, column: String },
    #[error("Different Overflight Times: {lidar} lidar overflights, {satellite} satellite passes")]
    OverflightCount { lidar: usize, satellite: usize },
    #[error("Different Overflight Times: overflight #{index} lidar={lidar} satellite={satellite}")]
    OverflightMismatch {
        index: usize,
        lidar: hifitime::Epoch,
        satellite: hifitime::Epoch,
    },
    #[error("series length mismatch: {0} timestamps, {1} values")]
    SeriesLength(usize, usize),
    #[error("product \"{0}\" is not available on this dataset")]
    UnsupportedProduct(String),
    #[error("wind interpolation: {0}")]
    WindInterpolation(#[source] RegressionError),
    #[error("{product}: {source}")]
    Regression {
        product: String,
        #[source]
        source: RegressionError,
    },
}

impl Error {
    /// Returns true if this error is the overflight integrity gate
    pub fn is_integrity_error(&self) -> bool {
        matches!(
            self,
            Self::OverflightCount { .. } | Self::OverflightMismatch { .. }
        )
    }
}

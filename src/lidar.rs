//! LiDAR overflight CSV: one row per overflight, columns declared by the header.
use std::{path::Path, str::FromStr};

use hifitime::Epoch;
use thiserror::Error;

use crate::{
    epoch,
    error::{Error, ParsingError},
};

#[cfg(feature = "log")]
use log::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Timestamp column
pub const TIME_COLUMN: &str = "time";

/// Return power column. Older files name it "l_amp".
pub const AMPLITUDE_COLUMNS: &[&str] = &["l_rpw", "l_amp"];

#[derive(Error, Debug, Clone, PartialEq)]
#[error("not a valid lidar index \"{0}\"")]
pub struct LidarIndexError(pub String);

/// LiDAR statistic extracted around each overflight
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LidarIndex {
    /// Quadratic regression over 4 hours of 6 minute data
    #[default]
    SixMinuteQuad2h,
    /// Average of 2200 seconds of data around the overflight
    Mean,
    /// Linear regression of 2200 seconds of data around the overflight
    Linear1100,
    /// Quadratic regression of 4 hours of data around the overflight
    Quad2h,
}

impl LidarIndex {
    /// All supported statistics
    pub const ALL: [Self; 4] = [
        Self::SixMinuteQuad2h,
        Self::Mean,
        Self::Linear1100,
        Self::Quad2h,
    ];
    /// Column name in the overflight CSV
    pub fn column(&self) -> &'static str {
        match self {
            Self::SixMinuteQuad2h => "l_6m_quad2h",
            Self::Mean => "l_mean",
            Self::Linear1100 => "l_lin1100",
            Self::Quad2h => "l_quad2h",
        }
    }
    /// Human readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::SixMinuteQuad2h => "4 hour quadratic regression on the 6 minute data",
            Self::Mean => "average of 2200 seconds of data around the overflight",
            Self::Linear1100 => "linear regression of 2200 seconds of data around the overflight",
            Self::Quad2h => "quadratic regression of 4 hours of data around the overflight",
        }
    }
}

impl std::fmt::Display for LidarIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for LidarIndex {
    type Err = LidarIndexError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|index| index.column() == s.trim())
            .ok_or_else(|| LidarIndexError(s.to_string()))
    }
}

/// Columns extracted from the overflight CSV, sharing one timestamp index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overflights {
    /// Overflight timestamps, in file order
    pub epochs: Vec<Epoch>,
    /// One vector per requested column, in request order
    pub columns: Vec<Vec<f64>>,
}

/*
 * Empty fields are missing values
 */
fn parse_value(field: &'static str, content: &str) -> Result<f64, ParsingError> {
    let content = content.trim();
    if content.is_empty() {
        return Ok(f64::NAN);
    }
    f64::from_str(content).map_err(|_| ParsingError::FloatField {
        field,
        content: content.to_string(),
    })
}

impl Overflights {
    /// Reads given overflight CSV.
    /// `wanted` lists the columns to extract: each entry is a set of accepted
    /// names, the first one present in the header wins.
    pub fn from_path(path: &Path, wanted: &[&[&'static str]]) -> Result<Self, Error> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)?;

        let headers = reader.headers()?.clone();
        let position = |names: &[&'static str]| -> Option<(usize, &'static str)> {
            names
                .iter()
                .find_map(|name| headers.iter().position(|h| h == *name).map(|p| (p, *name)))
        };

        let (time_pos, _) = position(&[TIME_COLUMN]).ok_or_else(|| Error::MissingColumn {
            path: path.to_path_buf(),
            column: TIME_COLUMN.to_string(),
        })?;

        let mut positions = Vec::with_capacity(wanted.len());
        for names in wanted.iter().copied() {
            let found = position(names).ok_or_else(|| Error::MissingColumn {
                path: path.to_path_buf(),
                column: names.join("|"),
            })?;
            positions.push(found);
        }

        let mut ret = Self {
            epochs: Vec::with_capacity(128),
            columns: vec![Vec::with_capacity(128); wanted.len()],
        };

        for record in reader.records() {
            let record = record?;
            let line = record.position().map(|p| p.line() as usize).unwrap_or(0);
            let err = |source: ParsingError| Error::Parsing {
                path: path.to_path_buf(),
                line,
                source,
            };

            let time = record.get(time_pos).unwrap_or_default();
            let t = epoch::parse_iso(time).map_err(|e| err(e.into()))?;
            ret.epochs.push(t);

            for (column, (pos, name)) in ret.columns.iter_mut().zip(positions.iter()) {
                let value = parse_value(name, record.get(*pos).unwrap_or_default())
                    .map_err(err)?;
                column.push(value);
            }
        }

        #[cfg(feature = "log")]
        debug!("{}: {} overflights", path.display(), ret.epochs.len());

        Ok(ret)
    }
}

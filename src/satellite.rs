//! Satellite pass files: one whitespace separated line per overflight.
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use hifitime::Epoch;

use crate::{
    epoch,
    error::{Error, ParsingError},
};

#[cfg(feature = "log")]
use log::debug;

/// Minimal number of value fields following the timestamp
const MIN_VALUES: usize = 2;

/// One satellite pass over the site
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SatellitePass {
    /// Overflight instant
    pub epoch: Epoch,
    /// Measured sea surface height
    pub ssh: f64,
    /// Site correction term. At Harvest, this is the benchmark SSH.
    pub correction: f64,
    /// Radar backscatter coefficient, NaN when not provided
    pub backscatter: f64,
    /// Significant wave height, NaN when not provided
    pub swh: f64,
}

fn parse_float(field: &'static str, content: Option<&&str>) -> Result<f64, ParsingError> {
    match content {
        None => Ok(f64::NAN),
        Some(content) => content
            .parse::<f64>()
            .map_err(|_| ParsingError::FloatField {
                field,
                content: content.to_string(),
            }),
    }
}

impl SatellitePass {
    /// Parses a single pass description
    pub fn parse(line: &str) -> Result<Self, ParsingError> {
        let tokens = line.split_whitespace().collect::<Vec<_>>();
        let (epoch, consumed) = epoch::parse_pass_time(&tokens)?;

        let values = &tokens[consumed.min(tokens.len())..];
        if values.len() < MIN_VALUES {
            return Err(ParsingError::MissingFields {
                expected: consumed + MIN_VALUES,
                found: tokens.len(),
            });
        }

        Ok(Self {
            epoch,
            ssh: parse_float("ssh", values.first())?,
            correction: parse_float("correction", values.get(1))?,
            backscatter: parse_float("backscatter", values.get(2))?,
            swh: parse_float("swh", values.get(3))?,
        })
    }
}

/// Reads all passes contained in given file, in file order.
/// Blank lines are ignored.
pub fn read_passes(path: &Path) -> Result<Vec<SatellitePass>, Error> {
    let fd = File::open(path)?;
    let reader = BufReader::new(fd);

    let mut passes = Vec::with_capacity(128);
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let pass = SatellitePass::parse(&line).map_err(|source| Error::Parsing {
            path: path.to_path_buf(),
            line: index + 1,
            source,
        })?;
        passes.push(pass);
    }

    #[cfg(feature = "log")]
    debug!("{}: {} satellite passes", path.display(), passes.len());

    Ok(passes)
}

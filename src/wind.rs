//! Wind station logs (Harvest only) and their smoothing onto overflight instants.
//!
//! The station log has no header and fixed columns:
//! `YY MM DD hh mm WDIR WSPD GDR GST GTIME`. Only the first five (date and
//! clock) and the wind speed (m/s, column 6) are used here.
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use hifitime::Epoch;

use crate::{
    epoch,
    error::{Error, ParsingError},
    regression::{quadreg, RegressionError},
};

#[cfg(feature = "log")]
use log::debug;

/// Wind speed column
const SPEED_COLUMN: usize = 6;

/// One wind station sample
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct WindSample {
    pub epoch: Epoch,
    /// Wind speed, in m/s
    pub speed: f64,
}

fn integer<T: std::str::FromStr>(field: &'static str, content: &str) -> Result<T, ParsingError> {
    content.parse::<T>().map_err(|_| ParsingError::FloatField {
        field,
        content: content.to_string(),
    })
}

impl WindSample {
    /// Parses one station log line
    pub fn parse(line: &str) -> Result<Self, ParsingError> {
        let tokens = line.split_whitespace().collect::<Vec<_>>();
        if tokens.len() <= SPEED_COLUMN {
            return Err(ParsingError::MissingFields {
                expected: SPEED_COLUMN + 1,
                found: tokens.len(),
            });
        }

        let y = integer::<i32>("year", tokens[0])?;
        let m = integer::<u8>("month", tokens[1])?;
        let d = integer::<u8>("day", tokens[2])?;
        let hh = integer::<u8>("hours", tokens[3])?;
        let mm = integer::<u8>("minutes", tokens[4])?;
        let epoch = epoch::calendar(y, m, d, hh, mm, 0, 0)?;

        let speed = tokens[SPEED_COLUMN]
            .parse::<f64>()
            .map_err(|_| ParsingError::FloatField {
                field: "wind speed",
                content: tokens[SPEED_COLUMN].to_string(),
            })?;

        Ok(Self { epoch, speed })
    }
}

/// Reads a wind station log. Blank lines and '#' comment lines
/// (the two header lines of station logs) are ignored.
pub fn read_wind(path: &Path) -> Result<Vec<WindSample>, Error> {
    let fd = File::open(path)?;
    let reader = BufReader::new(fd);

    let mut samples = Vec::with_capacity(1024);
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let sample = WindSample::parse(trimmed).map_err(|source| Error::Parsing {
            path: path.to_path_buf(),
            line: index + 1,
            source,
        })?;
        samples.push(sample);
    }

    #[cfg(feature = "log")]
    debug!("{}: {} wind samples", path.display(), samples.len());

    Ok(samples)
}

/// Smoothed wind speed at instant `t`: degree-2 fit of every sample within
/// [t - 2h, t + 2h] (both ends included), evaluated at `t`.
/// An empty window resolves to 0.
pub fn interpolate(samples: &[WindSample], t: Epoch) -> Result<f64, RegressionError> {
    let (start, end) = (t - epoch::two_hours(), t + epoch::two_hours());
    let (x, y): (Vec<Epoch>, Vec<f64>) = samples
        .iter()
        .filter(|s| s.epoch >= start && s.epoch <= end)
        .map(|s| (s.epoch, s.speed))
        .unzip();
    quadreg(&x, &y, t)
}

/// [interpolate] at every instant of `epochs`
pub fn interpolate_onto(
    samples: &[WindSample],
    epochs: &[Epoch],
) -> Result<Vec<f64>, RegressionError> {
    epochs.iter().map(|t| interpolate(samples, *t)).collect()
}

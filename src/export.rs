//! CSV export of computed bias series
use std::{io::Write, path::Path};

use hifitime::Epoch;
use itertools::Itertools;

use crate::{epoch, error::Error, pipeline::BiasSeries};

/// Column names of the exported CSV
pub const HEADER: [&str; 4] = ["time", "bias_mm", "status", "trend_mm"];

enum Row {
    Inlier(Epoch, f64, f64),
    Outlier(Epoch, f64),
}

impl Row {
    fn epoch(&self) -> Epoch {
        match self {
            Self::Inlier(t, _, _) | Self::Outlier(t, _) => *t,
        }
    }
    fn record(&self) -> [String; 4] {
        match self {
            Self::Inlier(t, value, trend) => [
                epoch::format(*t),
                format!("{:.6}", value),
                "inlier".to_string(),
                format!("{:.6}", trend),
            ],
            Self::Outlier(t, value) => [
                epoch::format(*t),
                format!("{:.6}", value),
                "outlier".to_string(),
                String::new(),
            ],
        }
    }
}

/// Writes given [BiasSeries] as CSV, one chronological row per sample.
/// Trend values are only defined for inliers.
pub fn write_csv<W: Write>(series: &BiasSeries, w: W) -> Result<(), Error> {
    let mut writer = csv::Writer::from_writer(w);
    writer.write_record(HEADER)?;

    let inliers = series
        .inliers
        .iter()
        .zip(series.trend.fitted.iter())
        .map(|((t, value), trend)| Row::Inlier(t, value, *trend));

    let outliers = series
        .outliers
        .iter()
        .map(|(t, value)| Row::Outlier(t, value));

    for row in inliers.merge_by(outliers, |a, b| a.epoch() <= b.epoch()) {
        writer.write_record(row.record())?;
    }

    writer.flush()?;
    Ok(())
}

/// [write_csv] into a new file
pub fn to_path(series: &BiasSeries, path: &Path) -> Result<(), Error> {
    let fd = std::fs::File::create(path)?;
    write_csv(series, std::io::BufWriter::new(fd))
}

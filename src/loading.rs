//! Site loaders: overflight CSV, satellite passes and wind logs,
//! aligned on the overflight timestamps.
use std::path::Path;

use hifitime::Epoch;

use crate::{
    calibration::{CatalinaRecord, HarvestRecord},
    error::Error,
    lidar::{LidarIndex, Overflights, AMPLITUDE_COLUMNS},
    satellite::{read_passes, SatellitePass},
    series::TimeSeries,
    wind::{interpolate_onto, read_wind},
};

#[cfg(feature = "log")]
use log::debug;

/// Bubbler column (Harvest)
pub const BUBBLER_COLUMN: &str = "bub";
/// Radar column (Harvest)
pub const RADAR_COLUMN: &str = "rad";
/// Acoustic column (Catalina)
pub const ACOUSTIC_COLUMN: &str = "acoust";

/// Verifies that both timestamp sequences describe the same overflights,
/// in the same order.
pub fn check_overflights(lidar: &[Epoch], passes: &[SatellitePass]) -> Result<(), Error> {
    if lidar.len() != passes.len() {
        return Err(Error::OverflightCount {
            lidar: lidar.len(),
            satellite: passes.len(),
        });
    }
    for (index, (t, pass)) in lidar.iter().zip(passes.iter()).enumerate() {
        if *t != pass.epoch {
            return Err(Error::OverflightMismatch {
                index,
                lidar: *t,
                satellite: pass.epoch,
            });
        }
    }
    Ok(())
}

/// Harvest platform dataset, one entry per overflight
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HarvestData {
    pub epochs: Vec<Epoch>,
    pub lidar: Vec<f64>,
    pub amplitude: Vec<f64>,
    pub radar: Vec<f64>,
    pub bubbler: Vec<f64>,
    pub ssh: Vec<f64>,
    pub benchmark: Vec<f64>,
    pub backscatter: Vec<f64>,
    pub swh: Vec<f64>,
    /// Wind speed smoothed onto each overflight
    pub wind: Vec<f64>,
}

impl HarvestData {
    /// Number of overflights
    pub fn len(&self) -> usize {
        self.epochs.len()
    }
    pub fn is_empty(&self) -> bool {
        self.epochs.is_empty()
    }
    /// Returns i-th overflight
    pub fn record(&self, i: usize) -> HarvestRecord {
        HarvestRecord {
            lidar: self.lidar[i],
            amplitude: self.amplitude[i],
            radar: self.radar[i],
            bubbler: self.bubbler[i],
            ssh: self.ssh[i],
            benchmark: self.benchmark[i],
            backscatter: self.backscatter[i],
            swh: self.swh[i],
            wind: self.wind[i],
        }
    }
    /// Iterates overflights in chronological order
    pub fn records(&self) -> impl Iterator<Item = (Epoch, HarvestRecord)> + '_ {
        (0..self.len()).map(|i| (self.epochs[i], self.record(i)))
    }
    /// Smoothed wind speed as a [TimeSeries]
    pub fn wind_series(&self) -> TimeSeries {
        self.epochs
            .iter()
            .copied()
            .zip(self.wind.iter().copied())
            .collect()
    }
}

/// Loads the Harvest dataset.
/// Fails with an integrity error when overflight and satellite
/// timestamps differ, in which case nothing is returned.
pub fn load_harvest(
    lidar_csv: &Path,
    satellite: &Path,
    wind: &Path,
    index: LidarIndex,
) -> Result<HarvestData, Error> {
    let mut overflights = Overflights::from_path(
        lidar_csv,
        &[
            &[index.column()],
            AMPLITUDE_COLUMNS,
            &[BUBBLER_COLUMN],
            &[RADAR_COLUMN],
        ],
    )?;

    let passes = read_passes(satellite)?;
    check_overflights(&overflights.epochs, &passes)?;

    let samples = read_wind(wind)?;
    let wind =
        interpolate_onto(&samples, &overflights.epochs).map_err(Error::WindInterpolation)?;

    #[cfg(feature = "log")]
    debug!(
        "harvest: {} overflights, {} wind samples",
        overflights.epochs.len(),
        samples.len()
    );

    let radar = overflights.columns.pop().unwrap_or_default();
    let bubbler = overflights.columns.pop().unwrap_or_default();
    let amplitude = overflights.columns.pop().unwrap_or_default();
    let lidar = overflights.columns.pop().unwrap_or_default();

    Ok(HarvestData {
        epochs: overflights.epochs,
        lidar,
        amplitude,
        radar,
        bubbler,
        ssh: passes.iter().map(|p| p.ssh).collect(),
        benchmark: passes.iter().map(|p| p.correction).collect(),
        backscatter: passes.iter().map(|p| p.backscatter).collect(),
        swh: passes.iter().map(|p| p.swh).collect(),
        wind,
    })
}

/// Catalina dataset, one entry per overflight
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalinaData {
    pub epochs: Vec<Epoch>,
    pub lidar: Vec<f64>,
    pub amplitude: Vec<f64>,
    pub acoustic: Vec<f64>,
    pub ssh: Vec<f64>,
    pub correction: Vec<f64>,
    pub backscatter: Vec<f64>,
    pub swh: Vec<f64>,
}

impl CatalinaData {
    /// Number of overflights
    pub fn len(&self) -> usize {
        self.epochs.len()
    }
    pub fn is_empty(&self) -> bool {
        self.epochs.is_empty()
    }
    /// Returns i-th overflight
    pub fn record(&self, i: usize) -> CatalinaRecord {
        CatalinaRecord {
            lidar: self.lidar[i],
            amplitude: self.amplitude[i],
            acoustic: self.acoustic[i],
            ssh: self.ssh[i],
            correction: self.correction[i],
            backscatter: self.backscatter[i],
            swh: self.swh[i],
        }
    }
    /// Iterates overflights in chronological order
    pub fn records(&self) -> impl Iterator<Item = (Epoch, CatalinaRecord)> + '_ {
        (0..self.len()).map(|i| (self.epochs[i], self.record(i)))
    }
}

/// Loads the Catalina dataset, same integrity rules as [load_harvest].
pub fn load_catalina(
    lidar_csv: &Path,
    satellite: &Path,
    index: LidarIndex,
) -> Result<CatalinaData, Error> {
    let mut overflights = Overflights::from_path(
        lidar_csv,
        &[&[index.column()], AMPLITUDE_COLUMNS, &[ACOUSTIC_COLUMN]],
    )?;

    let passes = read_passes(satellite)?;
    check_overflights(&overflights.epochs, &passes)?;

    let acoustic = overflights.columns.pop().unwrap_or_default();
    let amplitude = overflights.columns.pop().unwrap_or_default();
    let lidar = overflights.columns.pop().unwrap_or_default();

    Ok(CatalinaData {
        epochs: overflights.epochs,
        lidar,
        amplitude,
        acoustic,
        ssh: passes.iter().map(|p| p.ssh).collect(),
        correction: passes.iter().map(|p| p.correction).collect(),
        backscatter: passes.iter().map(|p| p.backscatter).collect(),
        swh: passes.iter().map(|p| p.swh).collect(),
    })
}

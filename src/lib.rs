#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

/*
 * Altimetry cal/val SSH bias time series.
 * Harvest platform and Catalina / LA tide gauge sites.
 * This crate is shipped under both Apache-2.0 and MIT License.
 *
 * Homepage: https://github.com/ccarocean/altimetry-calval-timeseries
 */

pub mod calibration;
pub mod epoch;
pub mod export;
pub mod lidar;
pub mod loading;
pub mod pipeline;
pub mod regression;
pub mod satellite;
pub mod series;
pub mod statistics;
pub mod wind;

mod error;

#[cfg(test)]
mod tests;

/// Package to include all basic structures
pub mod prelude {
    pub use crate::{
        calibration::{Calibration, CatalinaCalibration, HarvestCalibration},
        error::{Error, ParsingError},
        lidar::LidarIndex,
        loading::{load_catalina, load_harvest, CatalinaData, HarvestData},
        pipeline::{BiasSeries, Correction, Dataset, Pipeline, Product, Sensor, Site},
        regression::{linreg, quadreg, quadreg_or_nan, LinearFit, RegressionError},
        series::TimeSeries,
    };

    // pub re-export
    pub use hifitime::{Duration, Epoch, TimeScale};
}

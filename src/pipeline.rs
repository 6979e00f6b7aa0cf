//! Correction & outlier pipeline.
//!
//! One parameterized pipeline serves every (site, sensor, correction)
//! combination. A [Product] selects the bias model and the recentring policy,
//! the [Dataset] evaluates the bias model on each overflight.
use hifitime::Epoch;
use itertools::Itertools;

use crate::{
    calibration::{
        Calibration, CatalinaCalibration, CatalinaRecord, HarvestCalibration, HarvestRecord,
    },
    epoch::{decimal_years, trend_reference},
    error::Error,
    loading::{CatalinaData, HarvestData},
    regression::{linreg, LinearFit},
    series::TimeSeries,
    statistics::Statistical,
};

#[cfg(feature = "log")]
use log::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default backscatter quality threshold
pub const DEFAULT_BACKSCATTER_MAX: f64 = 15.0;

/// Outlier rejection threshold, in standard deviations
pub const OUTLIER_SIGMAS: f64 = 3.0;

/// Calibration site
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Site {
    /// Harvest oil platform
    Harvest,
    /// Catalina island and LA tide gauge
    Catalina,
}

impl Site {
    /// Short name, used in file system paths
    pub fn short_name(&self) -> &'static str {
        match self {
            Self::Harvest => "harv",
            Self::Catalina => "cata",
        }
    }
    /// Products computed at this site, in processing order
    pub fn products(&self) -> &'static [Product] {
        match self {
            Self::Harvest => &Product::HARVEST,
            Self::Catalina => &Product::CATALINA,
        }
    }
}

impl std::fmt::Display for Site {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Harvest => write!(f, "Harvest"),
            Self::Catalina => write!(f, "Catalina"),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Sensor {
    Lidar,
    Bubbler,
    Radar,
    Acoustic,
    /// Elementwise average of the two tide gauges of the site
    Average,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Correction {
    Raw,
    /// Corrected for environmental effects (wind, waves, return power)
    Corrected,
}

/// How a bias series is brought back around zero
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Recentring {
    /// Absolute offsets of the bias model are trusted
    FixedOffset,
    /// Sample mean is removed (after quality filtering)
    SampleMean,
}

/// One bias time series
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Product {
    pub site: Site,
    pub sensor: Sensor,
    pub correction: Correction,
}

impl Product {
    const fn new(site: Site, sensor: Sensor, correction: Correction) -> Self {
        Self {
            site,
            sensor,
            correction,
        }
    }

    /// Harvest products
    pub const HARVEST: [Self; 8] = [
        Self::new(Site::Harvest, Sensor::Lidar, Correction::Raw),
        Self::new(Site::Harvest, Sensor::Lidar, Correction::Corrected),
        Self::new(Site::Harvest, Sensor::Bubbler, Correction::Raw),
        Self::new(Site::Harvest, Sensor::Bubbler, Correction::Corrected),
        Self::new(Site::Harvest, Sensor::Radar, Correction::Raw),
        Self::new(Site::Harvest, Sensor::Radar, Correction::Corrected),
        Self::new(Site::Harvest, Sensor::Average, Correction::Raw),
        Self::new(Site::Harvest, Sensor::Average, Correction::Corrected),
    ];

    /// Catalina products
    pub const CATALINA: [Self; 3] = [
        Self::new(Site::Catalina, Sensor::Lidar, Correction::Raw),
        Self::new(Site::Catalina, Sensor::Acoustic, Correction::Raw),
        Self::new(Site::Catalina, Sensor::Average, Correction::Raw),
    ];

    /// Output file name, without extension.
    /// None if this combination is not produced.
    pub fn file_stem(&self) -> Option<&'static str> {
        match (self.site, self.sensor, self.correction) {
            (Site::Harvest, Sensor::Lidar, Correction::Raw) => Some("TS_RawLiDAR"),
            (Site::Harvest, Sensor::Lidar, Correction::Corrected) => Some("TS_CorrLiDAR"),
            (Site::Harvest, Sensor::Bubbler, Correction::Raw) => Some("TS_RawBubbler"),
            (Site::Harvest, Sensor::Bubbler, Correction::Corrected) => Some("TS_CorrBubbler"),
            (Site::Harvest, Sensor::Radar, Correction::Raw) => Some("TS_RawRadar"),
            (Site::Harvest, Sensor::Radar, Correction::Corrected) => Some("TS_CorrRadar"),
            (Site::Harvest, Sensor::Average, Correction::Raw) => Some("TS_RawAverage"),
            (Site::Harvest, Sensor::Average, Correction::Corrected) => Some("TS_CorrAverage"),
            (Site::Catalina, Sensor::Lidar, Correction::Raw) => Some("TS_RawLiDAR_Catalina"),
            (Site::Catalina, Sensor::Acoustic, Correction::Raw) => Some("TS_RawAcoust_LA"),
            (Site::Catalina, Sensor::Average, Correction::Raw) => Some("TS_RawAvg_Catalina"),
            _ => None,
        }
    }

    /// Plot title
    pub fn title(&self) -> &'static str {
        match (self.site, self.sensor, self.correction) {
            (Site::Harvest, Sensor::Lidar, Correction::Raw) => {
                "Raw LiDAR Jason 3 SSH Bias Time Series"
            },
            (Site::Harvest, Sensor::Lidar, Correction::Corrected) => {
                "Corrected LiDAR Jason 3 SSH Bias Time Series"
            },
            (Site::Harvest, Sensor::Bubbler, Correction::Raw) => {
                "Raw Bubbler Jason 3 SSH Bias Time Series"
            },
            (Site::Harvest, Sensor::Bubbler, Correction::Corrected) => {
                "Corrected Bubbler Jason 3 SSH Bias Time Series"
            },
            (Site::Harvest, Sensor::Radar, Correction::Raw) => {
                "Raw Radar Jason 3 SSH Bias Time Series"
            },
            (Site::Harvest, Sensor::Radar, Correction::Corrected) => {
                "Corrected Radar Jason 3 SSH Bias Time Series"
            },
            (Site::Harvest, Sensor::Average, Correction::Raw) => {
                "Average Raw Bubbler & Radar Jason 3 SSH Bias Time Series"
            },
            (Site::Harvest, Sensor::Average, Correction::Corrected) => {
                "Average Corrected Bubbler & Radar Jason 3 SSH Bias Time Series"
            },
            (Site::Catalina, Sensor::Lidar, _) => {
                "Raw LiDAR Jason 3 SSH Bias Time Series at Catalina"
            },
            (Site::Catalina, Sensor::Acoustic, _) => {
                "Raw Acoustic Jason 3 SSH Bias Time Series at LA Tide Gauge"
            },
            (Site::Catalina, Sensor::Average, _) => {
                "Raw Average LiDAR/Acoustic Jason 3 SSH Bias Time Series in San Pedro Channel"
            },
            _ => "Jason 3 SSH Bias Time Series",
        }
    }

    /// Recentring policy: Catalina series are relative,
    /// Harvest series use absolute offsets.
    pub fn recentring(&self) -> Recentring {
        match self.site {
            Site::Harvest => Recentring::FixedOffset,
            Site::Catalina => Recentring::SampleMean,
        }
    }

    /// True if the backscatter quality gate applies
    pub fn backscatter_gated(&self) -> bool {
        self.site == Site::Catalina
    }
}

impl std::fmt::Display for Product {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} {:?} {:?}",
            self.site.short_name(),
            self.correction,
            self.sensor
        )
    }
}

/// Aligned site dataset, on which bias models are evaluated
pub trait Dataset {
    /// Site this dataset describes
    fn site(&self) -> Site;
    /// Overflight timestamps
    fn epochs(&self) -> &[Epoch];
    /// Satellite backscatter, one per overflight
    fn backscatter(&self) -> &[f64];
    /// Evaluates the bias model of `product` (mm) at each overflight
    fn bias(&self, product: &Product, calibration: &Calibration) -> Result<Vec<f64>, Error>;
}

type HarvestModel = fn(&HarvestCalibration, &HarvestRecord) -> f64;
type CatalinaModel = fn(&CatalinaCalibration, &CatalinaRecord) -> f64;

impl Dataset for HarvestData {
    fn site(&self) -> Site {
        Site::Harvest
    }
    fn epochs(&self) -> &[Epoch] {
        &self.epochs
    }
    fn backscatter(&self) -> &[f64] {
        &self.backscatter
    }
    fn bias(&self, product: &Product, calibration: &Calibration) -> Result<Vec<f64>, Error> {
        let model: HarvestModel = match (product.site, product.sensor, product.correction) {
            (Site::Harvest, Sensor::Lidar, Correction::Raw) => HarvestCalibration::raw_lidar,
            (Site::Harvest, Sensor::Lidar, Correction::Corrected) => {
                HarvestCalibration::corrected_lidar
            },
            (Site::Harvest, Sensor::Bubbler, Correction::Raw) => HarvestCalibration::raw_bubbler,
            (Site::Harvest, Sensor::Bubbler, Correction::Corrected) => {
                HarvestCalibration::corrected_bubbler
            },
            (Site::Harvest, Sensor::Radar, Correction::Raw) => HarvestCalibration::raw_radar,
            (Site::Harvest, Sensor::Radar, Correction::Corrected) => {
                HarvestCalibration::corrected_radar
            },
            (Site::Harvest, Sensor::Average, Correction::Raw) => HarvestCalibration::raw_average,
            (Site::Harvest, Sensor::Average, Correction::Corrected) => {
                HarvestCalibration::corrected_average
            },
            _ => return Err(Error::UnsupportedProduct(product.to_string())),
        };
        let cal = &calibration.harvest;
        Ok(self.records().map(|(_, r)| model(cal, &r)).collect())
    }
}

impl Dataset for CatalinaData {
    fn site(&self) -> Site {
        Site::Catalina
    }
    fn epochs(&self) -> &[Epoch] {
        &self.epochs
    }
    fn backscatter(&self) -> &[f64] {
        &self.backscatter
    }
    fn bias(&self, product: &Product, calibration: &Calibration) -> Result<Vec<f64>, Error> {
        let model: CatalinaModel = match (product.site, product.sensor, product.correction) {
            (Site::Catalina, Sensor::Lidar, Correction::Raw) => CatalinaCalibration::raw_lidar,
            (Site::Catalina, Sensor::Acoustic, Correction::Raw) => {
                CatalinaCalibration::raw_acoustic
            },
            (Site::Catalina, Sensor::Average, Correction::Raw) => {
                CatalinaCalibration::raw_average
            },
            _ => return Err(Error::UnsupportedProduct(product.to_string())),
        };
        let cal = &calibration.catalina;
        Ok(self.records().map(|(_, r)| model(cal, &r)).collect())
    }
}

/// Inlier / outlier partition of a sample
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    /// Sample mean, prior rejection
    pub mean: f64,
    /// Sample (population) standard deviation, prior rejection
    pub stddev: f64,
    /// Indices of the retained samples
    pub inliers: Vec<usize>,
    /// Indices of the rejected samples
    pub outliers: Vec<usize>,
}

/// Splits `values` at mean ± [OUTLIER_SIGMAS] standard deviations.
/// A value strictly beyond either bound is an outlier; a value lying
/// exactly on a bound is retained.
pub fn sigma_clip(values: &[f64]) -> Partition {
    let mean = values.mean();
    let stddev = values.stddev();
    let (upper, lower) = (
        mean + OUTLIER_SIGMAS * stddev,
        mean - OUTLIER_SIGMAS * stddev,
    );
    let (outliers, inliers): (Vec<usize>, Vec<usize>) =
        (0..values.len()).partition(|i| values[*i] > upper || values[*i] < lower);
    Partition {
        mean,
        stddev,
        inliers,
        outliers,
    }
}

/// Pipeline outcome for one [Product]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BiasSeries {
    pub product: Product,
    /// Retained samples (mm)
    pub inliers: TimeSeries,
    /// 3σ outliers (mm)
    pub outliers: TimeSeries,
    /// Mean of the classified sample (mm)
    pub mean: f64,
    /// Standard deviation of the classified sample (mm)
    pub stddev: f64,
    /// Standard deviation of the inliers (mm)
    pub inlier_stddev: f64,
    /// Linear trend of the inliers, against years elapsed since 2016-01-01
    pub trend: LinearFit,
}

impl BiasSeries {
    /// Trend slope, in mm/yr
    pub fn slope(&self) -> f64 {
        self.trend.slope
    }
    /// Fitted trend value at each inlier
    pub fn trend_series(&self) -> TimeSeries {
        self.inliers
            .epochs
            .iter()
            .copied()
            .zip(self.trend.fitted.iter().copied())
            .collect()
    }
}

/// Correction & outlier pipeline, over one site dataset
pub struct Pipeline<'a, D: Dataset> {
    dataset: &'a D,
    calibration: Calibration,
    backscatter_max: f64,
}

impl<'a, D: Dataset> Pipeline<'a, D> {
    /// Builds a new [Pipeline] with default backscatter threshold
    pub fn new(dataset: &'a D, calibration: Calibration) -> Self {
        Self {
            dataset,
            calibration,
            backscatter_max: DEFAULT_BACKSCATTER_MAX,
        }
    }
    /// Copies and returns [Pipeline] with given backscatter threshold.
    /// Only passes with backscatter strictly below it are retained,
    /// on sites where the quality gate applies.
    pub fn with_backscatter_max(&self, backscatter_max: f64) -> Self {
        Self {
            dataset: self.dataset,
            calibration: self.calibration,
            backscatter_max,
        }
    }

    /// Runs the pipeline for every product of the dataset site
    pub fn run_all(&self) -> Result<Vec<BiasSeries>, Error> {
        self.dataset
            .site()
            .products()
            .iter()
            .map(|product| self.run(product))
            .collect()
    }

    /// Runs the pipeline for given [Product]
    pub fn run(&self, product: &Product) -> Result<BiasSeries, Error> {
        if product.site != self.dataset.site() {
            return Err(Error::UnsupportedProduct(product.to_string()));
        }

        let bias = self.dataset.bias(product, &self.calibration)?;
        let epochs = self.dataset.epochs();
        let backscatter = self.dataset.backscatter();

        // non finite values are withdrawn first
        let mut retained = bias.iter().positions(|v| v.is_finite()).collect::<Vec<_>>();

        // passes from older files carry no backscatter (NaN): not gated
        if product.backscatter_gated() {
            retained.retain(|i| {
                backscatter[*i].is_nan() || backscatter[*i] < self.backscatter_max
            });
        }

        let mut values = retained.iter().map(|i| bias[*i]).collect::<Vec<_>>();

        if product.recentring() == Recentring::SampleMean {
            let mean = values.mean();
            values.iter_mut().for_each(|v| *v -= mean);
        }

        let partition = sigma_clip(&values);

        let inliers = partition
            .inliers
            .iter()
            .map(|i| (epochs[retained[*i]], values[*i]))
            .collect::<TimeSeries>();

        let outliers = partition
            .outliers
            .iter()
            .map(|i| (epochs[retained[*i]], values[*i]))
            .collect::<TimeSeries>();

        #[cfg(feature = "log")]
        debug!(
            "{}: {} overflights, {} retained, {} outliers",
            product,
            bias.len(),
            retained.len(),
            outliers.len()
        );

        let reference = trend_reference();
        let x = inliers
            .epochs
            .iter()
            .map(|t| decimal_years(*t, reference))
            .collect::<Vec<_>>();

        let trend = linreg(&x, &inliers.values).map_err(|source| Error::Regression {
            product: product.to_string(),
            source,
        })?;
        let inlier_stddev = inliers.values.stddev();

        Ok(BiasSeries {
            product: *product,
            inliers,
            outliers,
            mean: partition.mean,
            stddev: partition.stddev,
            inlier_stddev,
            trend,
        })
    }
}

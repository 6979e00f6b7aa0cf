//! Calibration constants and the per-sensor bias models.
//!
//! Every empirical constant of the bias models lives in one of the tables
//! below. The models themselves are evaluated on a single overflight record,
//! so each can be audited and tested without going through the pipeline.
//! All biases are expressed in millimeters.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One Harvest overflight, as aligned by the loader.
/// Satellite SSH, benchmark and sensor ranges are in meters.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct HarvestRecord {
    /// Selected LiDAR statistic
    pub lidar: f64,
    /// LiDAR return power
    pub amplitude: f64,
    /// Radar tide gauge
    pub radar: f64,
    /// Bubbler tide gauge
    pub bubbler: f64,
    /// Satellite SSH
    pub ssh: f64,
    /// Benchmark SSH
    pub benchmark: f64,
    /// Satellite backscatter
    pub backscatter: f64,
    /// Significant wave height (m)
    pub swh: f64,
    /// Smoothed wind speed (m/s)
    pub wind: f64,
}

/// One Catalina overflight. Satellite SSH and correction are in millimeters,
/// sensor ranges in meters.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct CatalinaRecord {
    /// Selected LiDAR statistic
    pub lidar: f64,
    /// LiDAR return power
    pub amplitude: f64,
    /// LA acoustic tide gauge
    pub acoustic: f64,
    /// Satellite SSH
    pub ssh: f64,
    /// Site correction
    pub correction: f64,
    /// Satellite backscatter
    pub backscatter: f64,
    /// Significant wave height (m)
    pub swh: f64,
}

/// Harvest platform bias models
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HarvestCalibration {
    /// LiDAR datum (m)
    pub lidar_datum_m: f64,
    /// LiDAR absolute offset (mm)
    pub lidar_bias_mm: f64,
    /// Wind coefficient of the corrected LiDAR model (m per m/s)
    pub lidar_wind: f64,
    /// Return power coefficient of the corrected LiDAR model
    pub lidar_amplitude: f64,
    /// Additional offset of the corrected LiDAR model (mm)
    pub lidar_corrected_bias_mm: f64,
    /// Bubbler datum (m)
    pub bubbler_datum_m: f64,
    /// Raw bubbler absolute offset (mm)
    pub bubbler_bias_mm: f64,
    /// SWH coefficient of the corrected bubbler model
    pub bubbler_swh: f64,
    /// Radar datum (mm)
    pub radar_datum_mm: f64,
    /// Corrected radar model: SWH term
    pub radar_swh: f64,
    /// Corrected radar model: wind term
    pub radar_wind: f64,
    /// Corrected radar model: SWH² term
    pub radar_swh2: f64,
    /// Corrected radar model: SWH x wind term
    pub radar_swh_wind: f64,
    /// Radar offset of the raw average (mm)
    pub average_radar_bias_mm: f64,
    /// SWH below this threshold is ignored by the bubbler
    /// component of the corrected average (m)
    pub average_swh_floor_m: f64,
}

impl Default for HarvestCalibration {
    fn default() -> Self {
        Self {
            lidar_datum_m: 6.85,
            lidar_bias_mm: 25.0,
            lidar_wind: 0.0054,
            lidar_amplitude: 0.0000087,
            lidar_corrected_bias_mm: 88.25,
            bubbler_datum_m: 20.15,
            bubbler_bias_mm: 50.0,
            bubbler_swh: 0.031,
            radar_datum_mm: 20150.0,
            radar_swh: 0.5,
            radar_wind: 50.0,
            radar_swh2: 9.0,
            radar_swh_wind: 0.3,
            average_radar_bias_mm: 50.0,
            average_swh_floor_m: 0.5,
        }
    }
}

impl HarvestCalibration {
    pub fn raw_lidar(&self, r: &HarvestRecord) -> f64 {
        (r.ssh - r.benchmark + r.lidar - self.lidar_datum_m) * 1000.0 - self.lidar_bias_mm
    }
    /// LiDAR corrected for wind, then return power
    pub fn corrected_lidar(&self, r: &HarvestRecord) -> f64 {
        let range = r.lidar - self.lidar_wind * r.wind + self.lidar_amplitude * r.amplitude;
        (r.ssh - r.benchmark + range - self.lidar_datum_m) * 1000.0
            - self.lidar_bias_mm
            - self.lidar_corrected_bias_mm
    }
    /*
     * Bubbler bias, without absolute offset, for given SWH correction
     */
    fn bubbler(&self, r: &HarvestRecord, swh: f64) -> f64 {
        let bubbler = r.bubbler + self.bubbler_swh * swh;
        (r.ssh - r.benchmark - (bubbler - self.bubbler_datum_m)) * 1000.0
    }
    pub fn raw_bubbler(&self, r: &HarvestRecord) -> f64 {
        self.bubbler(r, 0.0) - self.bubbler_bias_mm
    }
    /// Bubbler corrected for wave height. The absolute offset does not apply.
    pub fn corrected_bubbler(&self, r: &HarvestRecord) -> f64 {
        self.bubbler(r, r.swh)
    }
    pub fn raw_radar(&self, r: &HarvestRecord) -> f64 {
        (r.ssh - r.benchmark - r.radar) * 1000.0 + self.radar_datum_mm
    }
    /// Radar corrected for wave height, wind, and their interaction
    pub fn corrected_radar(&self, r: &HarvestRecord) -> f64 {
        let (swh, wind) = (r.swh, r.wind);
        (1000.0 * self.raw_radar(r) + self.radar_swh * swh - self.radar_wind * wind
            + self.radar_swh2 * swh * swh
            - self.radar_swh_wind * swh * wind)
            / 1000.0
    }
    /// Mean of raw radar and raw bubbler. NaN if either is NaN.
    pub fn raw_average(&self, r: &HarvestRecord) -> f64 {
        let radar = self.raw_radar(r) - self.average_radar_bias_mm;
        let bubbler = self.bubbler(r, 0.0);
        (radar + bubbler) / 2.0
    }
    /// Mean of corrected radar and corrected bubbler,
    /// small waves are ignored by the bubbler component.
    pub fn corrected_average(&self, r: &HarvestRecord) -> f64 {
        let radar = self.corrected_radar(r);
        let swh = if r.swh < self.average_swh_floor_m {
            0.0
        } else {
            r.swh
        };
        let bubbler = self.bubbler(r, swh);
        (radar + bubbler) / 2.0
    }
}

/// Catalina / LA tide gauge bias models
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CatalinaCalibration {
    /// LiDAR range to millimeters
    pub lidar_scale: f64,
    /// Acoustic range to millimeters
    pub acoustic_scale: f64,
}

impl Default for CatalinaCalibration {
    fn default() -> Self {
        Self {
            lidar_scale: 1000.0,
            acoustic_scale: 1000.0,
        }
    }
}

impl CatalinaCalibration {
    pub fn raw_lidar(&self, r: &CatalinaRecord) -> f64 {
        r.ssh - r.correction + r.lidar * self.lidar_scale
    }
    pub fn raw_acoustic(&self, r: &CatalinaRecord) -> f64 {
        r.ssh - r.correction - r.acoustic * self.acoustic_scale
    }
    /// Half difference of both sensors, on top of the satellite term
    pub fn raw_average(&self, r: &CatalinaRecord) -> f64 {
        r.ssh - r.correction + (r.lidar * self.lidar_scale - r.acoustic * self.acoustic_scale) / 2.0
    }
}

/// Calibration constants of both sites
#[derive(Debug, Copy, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Calibration {
    pub harvest: HarvestCalibration,
    pub catalina: CatalinaCalibration,
}

#[cfg(test)]
mod test {
    use super::*;
    fn record() -> HarvestRecord {
        HarvestRecord {
            lidar: 6.9,
            amplitude: 1000.0,
            radar: 0.05,
            bubbler: 20.1,
            ssh: 1.2,
            benchmark: 1.1,
            backscatter: 12.0,
            swh: 2.0,
            wind: 5.0,
        }
    }
    fn close(a: f64, b: f64) {
        assert!((a - b).abs() < 1.0E-6, "{} != {}", a, b);
    }
    #[test]
    fn harvest_models() {
        let cal = HarvestCalibration::default();
        let r = record();
        // (0.1 + 6.9 - 6.85) * 1000 - 25
        close(cal.raw_lidar(&r), 125.0);
        // (0.1 + 6.9 - 0.027 + 0.0087 - 6.85) * 1000 - 25 - 88.25
        close(cal.corrected_lidar(&r), 18.45);
        // (0.1 - (20.1 - 20.15)) * 1000 - 50
        close(cal.raw_bubbler(&r), 100.0);
        // (0.1 - (20.162 - 20.15)) * 1000
        close(cal.corrected_bubbler(&r), 88.0);
        // (0.1 - 0.05) * 1000 + 20150
        close(cal.raw_radar(&r), 20200.0);
        // (20200000 + 1 - 250 + 36 - 3) / 1000
        close(cal.corrected_radar(&r), 20199.784);
        close(cal.raw_average(&r), (20150.0 + 150.0) / 2.0);
        close(cal.corrected_average(&r), (20199.784 + 88.0) / 2.0);
    }
    #[test]
    fn harvest_swh_floor() {
        let cal = HarvestCalibration::default();
        let r = HarvestRecord {
            swh: 0.4,
            ..record()
        };
        let radar = cal.corrected_radar(&r);
        // wave height is ignored by the bubbler component only
        close(cal.corrected_average(&r), (radar + 150.0) / 2.0);
        assert!((cal.corrected_bubbler(&r) - 150.0).abs() > 1.0);

        let r = HarvestRecord {
            swh: f64::NAN,
            ..record()
        };
        assert!(cal.corrected_average(&r).is_nan());
        assert!(cal.raw_average(&r).is_finite());
    }
    #[test]
    fn catalina_models() {
        let cal = CatalinaCalibration::default();
        let r = CatalinaRecord {
            lidar: 0.25,
            amplitude: 100.0,
            acoustic: 0.1,
            ssh: 500.0,
            correction: 450.0,
            backscatter: 10.0,
            swh: 1.0,
        };
        close(cal.raw_lidar(&r), 300.0);
        close(cal.raw_acoustic(&r), -50.0);
        close(cal.raw_average(&r), 125.0);
        close(
            cal.raw_average(&r),
            (cal.raw_lidar(&r) + cal.raw_acoustic(&r)) / 2.0,
        );
    }
}

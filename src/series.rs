//! Timestamped series
use hifitime::Epoch;

use crate::prelude::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Ordered (timestamp, value) pairs of one physical quantity
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimeSeries {
    /// Timestamps, in chronological order
    pub epochs: Vec<Epoch>,
    /// One value per timestamp
    pub values: Vec<f64>,
}

impl TimeSeries {
    /// Builds a new [TimeSeries], both vectors must have the same length
    pub fn new(epochs: Vec<Epoch>, values: Vec<f64>) -> Result<Self, Error> {
        if epochs.len() != values.len() {
            return Err(Error::SeriesLength(epochs.len(), values.len()));
        }
        Ok(Self { epochs, values })
    }
    /// Number of samples
    pub fn len(&self) -> usize {
        self.values.len()
    }
    /// Returns true if this series has no sample
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
    /// Pushes a new sample
    pub fn push(&mut self, t: Epoch, value: f64) {
        self.epochs.push(t);
        self.values.push(value);
    }
    /// Iterates (timestamp, value) pairs
    pub fn iter(&self) -> impl Iterator<Item = (Epoch, f64)> + '_ {
        self.epochs.iter().copied().zip(self.values.iter().copied())
    }
}

impl FromIterator<(Epoch, f64)> for TimeSeries {
    fn from_iter<I: IntoIterator<Item = (Epoch, f64)>>(iter: I) -> Self {
        let (epochs, values) = iter.into_iter().unzip();
        Self { epochs, values }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn series_construction() {
        let t0 = Epoch::from_gregorian_utc_at_midnight(2016, 1, 1);
        let t1 = Epoch::from_gregorian_utc_at_midnight(2016, 1, 2);
        assert!(TimeSeries::new(vec![t0, t1], vec![1.0]).is_err());

        let mut series = TimeSeries::new(vec![t0], vec![1.0]).unwrap();
        series.push(t1, 2.0);
        assert_eq!(series.len(), 2);
        assert_eq!(series.iter().collect::<Vec<_>>(), vec![(t0, 1.0), (t1, 2.0)]);

        let collected = series.iter().collect::<TimeSeries>();
        assert_eq!(collected, series);
        assert!(TimeSeries::default().is_empty());
    }
}

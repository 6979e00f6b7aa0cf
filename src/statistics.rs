/// Population statistics over a dataset
pub trait Statistical {
    /// Computes statistical mean of this dataset
    fn mean(&self) -> f64;
    /// Computes (population) standard deviation of this dataset
    fn stddev(&self) -> f64;
}

impl Statistical for [f64] {
    fn mean(&self) -> f64 {
        self.iter().sum::<f64>() / self.len() as f64
    }
    fn stddev(&self) -> f64 {
        let mean = self.mean();
        let var = self.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / self.len() as f64;
        var.sqrt()
    }
}

#[cfg(test)]
mod test {
    use super::Statistical;
    #[test]
    fn population_moments() {
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(data.mean(), 5.0);
        assert_eq!(data.stddev(), 2.0);
        let empty: [f64; 0] = [];
        assert!(empty.mean().is_nan());
    }
}

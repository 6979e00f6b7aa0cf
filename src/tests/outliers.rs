#[cfg(test)]
mod test {
    use crate::{
        pipeline::{sigma_clip, OUTLIER_SIGMAS},
        statistics::Statistical,
    };
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn single_spike() {
        // one spike among n samples lies sqrt(n-1) sigmas away
        let mut values = vec![0.0; 10];
        values.push(100.0);
        let partition = sigma_clip(&values);
        assert_eq!(partition.outliers, vec![10]);
        assert_eq!(partition.inliers, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn boundary_is_inlier() {
        // mean=10, sigma=30: the spike lies exactly on mean + 3 sigma
        let mut values = vec![0.0; 9];
        values.push(100.0);
        let partition = sigma_clip(&values);
        assert_eq!(partition.mean, 10.0);
        assert_eq!(partition.stddev, 30.0);
        assert_eq!(partition.mean + OUTLIER_SIGMAS * partition.stddev, 100.0);
        assert!(partition.outliers.is_empty());
        assert_eq!(partition.inliers.len(), 10);

        // same on the lower side
        let values = values.iter().map(|v| -v).collect::<Vec<_>>();
        let partition = sigma_clip(&values);
        assert!(partition.outliers.is_empty());
    }

    #[test]
    fn empty_sample() {
        let partition = sigma_clip(&[]);
        assert!(partition.inliers.is_empty());
        assert!(partition.outliers.is_empty());
    }

    #[test]
    fn random_samples() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..200 {
            let size = rng.gen_range(3..200);
            let values = (0..size)
                .map(|_| {
                    let value = rng.gen_range(-50.0..50.0);
                    if rng.gen_bool(0.05) {
                        value * 20.0
                    } else {
                        value
                    }
                })
                .collect::<Vec<f64>>();

            let partition = sigma_clip(&values);
            let (mean, stddev) = (values.mean(), values.stddev());
            assert_eq!(partition.mean, mean);
            assert_eq!(partition.stddev, stddev);

            let upper = mean + OUTLIER_SIGMAS * stddev;
            let lower = mean - OUTLIER_SIGMAS * stddev;

            assert_eq!(partition.inliers.len() + partition.outliers.len(), size);
            for i in partition.inliers.iter() {
                assert!(values[*i] <= upper && values[*i] >= lower);
            }
            for i in partition.outliers.iter() {
                assert!(values[*i] > upper || values[*i] < lower);
            }
            // chronological order is preserved
            assert!(partition.inliers.windows(2).all(|w| w[0] < w[1]));
            assert!(partition.outliers.windows(2).all(|w| w[0] < w[1]));
        }
    }
}

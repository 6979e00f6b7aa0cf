#[cfg(test)]
mod test {
    use crate::{
        prelude::*,
        tests::toolkit::{assert_close, resource, utc},
    };

    fn catalina(index: LidarIndex) -> CatalinaData {
        load_catalina(
            &resource("cata", "lidardata_overflights.csv"),
            &resource("cata", "passes.txt"),
            index,
        )
        .unwrap()
    }

    #[test]
    fn catalina_loading() {
        let data = catalina(LidarIndex::default());
        assert_eq!(data.len(), 5);
        assert_eq!(data.epochs[0], utc(2016, 4, 10, 17, 23, 41, 250_000_000));
        assert_eq!(data.epochs[3], utc(2017, 7, 25, 4, 19, 8, 125_000_000));
        assert_eq!(data.lidar, vec![0.250, 0.262, 0.241, 0.255, 0.248]);
        assert_eq!(data.amplitude, vec![900.0, 950.0, 870.0, 910.0, 890.0]);
        assert_eq!(data.acoustic, vec![0.100, 0.108, 0.095, 0.111, 0.102]);
        assert_eq!(data.correction, vec![450.0, 455.0, 452.0, 449.0, 451.0]);
        assert_eq!(data.backscatter, vec![10.0, 12.0, 15.0, 16.0, 11.0]);
        assert_eq!(data.swh, vec![1.2, 1.5, 0.8, 2.1, 1.0]);

        let data = catalina(LidarIndex::Mean);
        assert!(data.lidar[4].is_nan());
    }

    #[test]
    fn catalina_backscatter_gate() {
        let data = catalina(LidarIndex::default());
        let pipeline = Pipeline::new(&data, Calibration::default());
        let series = pipeline.run(&Product::CATALINA[0]).unwrap();
        assert_eq!(series.product.file_stem(), Some("TS_RawLiDAR_Catalina"));

        // 15.0 is not strictly below the threshold
        assert_eq!(series.inliers.len(), 3);
        assert_eq!(series.outliers.len(), 0);
        assert_eq!(
            series.inliers.epochs,
            vec![data.epochs[0], data.epochs[1], data.epochs[4]]
        );

        // recentred on the retained sample
        let mean = (300.0 + 317.0 + 299.0) / 3.0;
        for (value, raw) in series.inliers.values.iter().zip([300.0, 317.0, 299.0]) {
            assert_close(*value, raw - mean, 1.0E-6);
        }
        assert_close(series.mean, 0.0, 1.0E-9);

        let relaxed = pipeline.with_backscatter_max(20.0);
        let series = relaxed.run(&Product::CATALINA[0]).unwrap();
        assert_eq!(series.inliers.len(), 5);
        let mean = (300.0 + 317.0 + 287.0 + 311.0 + 299.0) / 5.0;
        assert_close(series.inliers.values[2], 287.0 - mean, 1.0E-6);
    }

    #[test]
    fn catalina_average() {
        let data = catalina(LidarIndex::default());
        let pipeline = Pipeline::new(&data, Calibration::default());
        let products = pipeline.run_all().unwrap();
        assert_eq!(products.len(), 3);

        let (lidar, acoustic, average) = (&products[0], &products[1], &products[2]);
        assert_eq!(acoustic.product.file_stem(), Some("TS_RawAcoust_LA"));
        assert_eq!(average.product.file_stem(), Some("TS_RawAvg_Catalina"));

        for i in 0..3 {
            assert_close(
                average.inliers.values[i],
                (lidar.inliers.values[i] + acoustic.inliers.values[i]) / 2.0,
                1.0E-6,
            );
        }
        for series in products.iter() {
            assert!(series.trend.r_squared.is_finite());
        }
    }

    #[test]
    fn catalina_missing_lidar() {
        let data = catalina(LidarIndex::Mean);
        let pipeline = Pipeline::new(&data, Calibration::default());
        let products = pipeline.run_all().unwrap();
        assert_eq!(products[0].inliers.len(), 2);
        assert_eq!(products[1].inliers.len(), 3);
        assert_eq!(products[2].inliers.len(), 2);
    }

    #[test]
    fn catalina_unsupported_products() {
        let data = catalina(LidarIndex::default());
        let pipeline = Pipeline::new(&data, Calibration::default());
        for product in Product::HARVEST.iter() {
            assert!(pipeline.run(product).is_err());
        }
        let corrected = Product {
            correction: Correction::Corrected,
            ..Product::CATALINA[0]
        };
        assert!(pipeline.run(&corrected).is_err());
        assert_eq!(corrected.file_stem(), None);
    }

    #[test]
    fn catalina_strict_passes() {
        // no backscatter nor swh columns
        let data = load_catalina(
            &resource("cata", "lidardata_overflights.csv"),
            &resource("cata", "passes_strict.txt"),
            LidarIndex::default(),
        )
        .unwrap();
        assert_eq!(data.len(), 5);
        assert!(data.backscatter.iter().all(|bs| bs.is_nan()));
        assert!(data.swh.iter().all(|swh| swh.is_nan()));

        let pipeline = Pipeline::new(&data, Calibration::default());
        let products = pipeline.run_all().unwrap();
        assert_eq!(products.len(), 3);

        let lidar = &products[0];
        assert_eq!(lidar.inliers.len(), 5);
        assert_eq!(lidar.outliers.len(), 0);
        let mean = (300.0 + 317.0 + 287.0 + 311.0 + 299.0) / 5.0;
        assert_close(lidar.inliers.values[1], 317.0 - mean, 1.0E-6);
        assert!(lidar.trend.r_squared.is_finite());
    }

    #[test]
    fn catalina_empty_trend() {
        let data = catalina(LidarIndex::default());
        let pipeline = Pipeline::new(&data, Calibration::default()).with_backscatter_max(0.0);
        let error = pipeline.run(&Product::CATALINA[0]).unwrap_err();
        match error {
            Error::Regression {
                ref product,
                source: RegressionError::EmptySample,
            } => assert_eq!(product, &Product::CATALINA[0].to_string()),
            ref e => panic!("unexpected error: {}", e),
        }
        let message = error.to_string();
        assert!(message.starts_with(&Product::CATALINA[0].to_string()));
        assert!(message.ends_with("regression on empty sample"));
    }
}

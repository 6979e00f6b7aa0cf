#[cfg(test)]
mod test {
    use crate::{prelude::*, tests::toolkit::resource};

    #[test]
    fn calibration_table() {
        let mut value = serde_json::to_value(Calibration::default()).unwrap();
        assert_eq!(value["harvest"]["lidar_datum_m"], 6.85);
        assert_eq!(value["catalina"]["acoustic_scale"], 1000.0);

        value["harvest"]["lidar_bias_mm"] = serde_json::json!(30.0);
        let parsed: Calibration = serde_json::from_value(value).unwrap();
        assert_eq!(parsed.harvest.lidar_bias_mm, 30.0);
        assert_eq!(parsed.catalina, CatalinaCalibration::default());
    }

    #[test]
    fn bias_series() {
        let data = load_catalina(
            &resource("cata", "lidardata_overflights.csv"),
            &resource("cata", "passes.txt"),
            LidarIndex::default(),
        )
        .unwrap();
        let series = Pipeline::new(&data, Calibration::default())
            .run(&Product::CATALINA[1])
            .unwrap();
        let value = serde_json::to_value(&series).unwrap();
        assert_eq!(value["product"]["site"], "Catalina");
        assert_eq!(value["product"]["sensor"], "Acoustic");
        assert_eq!(value["inliers"]["values"].as_array().map(|v| v.len()), Some(3));
    }
}

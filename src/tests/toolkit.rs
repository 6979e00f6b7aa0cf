use std::path::PathBuf;

use hifitime::Epoch;

/// Path to given test resource
pub fn resource(site: &str, name: &str) -> PathBuf {
    PathBuf::new()
        .join(env!("CARGO_MANIFEST_DIR"))
        .join("test_resources")
        .join(site)
        .join(name)
}

/// Asserts that `a` and `b` match within `tol`
pub fn assert_close(a: f64, b: f64, tol: f64) {
    assert!((a - b).abs() < tol, "{} != {} (tolerance {})", a, b, tol);
}

/// Builds a UTC epoch
pub fn utc(y: i32, m: u8, d: u8, hh: u8, mm: u8, ss: u8, ns: u32) -> Epoch {
    Epoch::from_gregorian_utc(y, m, d, hh, mm, ss, ns)
}

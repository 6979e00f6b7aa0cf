//! integrated tests
pub mod toolkit;

mod catalina;
mod outliers;

#[cfg(feature = "serde")]
mod serialization;

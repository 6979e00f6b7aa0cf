//! Polynomial least squares against a numeric time axis.
//!
//! Only what the bias pipeline needs: a degree-1 trend with goodness of fit
//! and a degree-2 smoother evaluated at a pivot instant.
use hifitime::Epoch;
use nalgebra::{DMatrix, DVector, SVD};
use thiserror::Error;

use crate::epoch::seconds_from;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegressionError {
    #[error("regression on empty sample")]
    EmptySample,
    #[error("x and y lengths differ ({0} / {1})")]
    LengthMismatch(usize, usize),
    #[error("least squares solver failure: {0}")]
    Solver(&'static str),
}

/// Degree-1 least squares fit
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinearFit {
    /// Fitted values, at each x
    pub fitted: Vec<f64>,
    /// b0
    pub intercept: f64,
    /// b1, in y units per x unit
    pub slope: f64,
    /// Regression sum of squares over total sum of squares
    pub r_squared: f64,
}

/// Least squares polynomial coefficients, in increasing degree order
/// (b0, b1, ..). Columns of the Vandermonde matrix are scaled to unit norm
/// prior solving. Rank deficient systems resolve to the minimum norm solution.
pub fn polyfit(x: &[f64], y: &[f64], degree: usize) -> Result<Vec<f64>, RegressionError> {
    if x.len() != y.len() {
        return Err(RegressionError::LengthMismatch(x.len(), y.len()));
    }
    if x.is_empty() {
        return Err(RegressionError::EmptySample);
    }

    let (nrows, ncols) = (x.len(), degree + 1);
    let mut a = DMatrix::<f64>::from_fn(nrows, ncols, |i, j| x[i].powi(j as i32));

    let mut scales = vec![1.0_f64; ncols];
    for (j, scale) in scales.iter_mut().enumerate() {
        let norm = a.column(j).norm();
        if norm > 0.0 && norm.is_finite() {
            *scale = norm;
            a.column_mut(j).unscale_mut(norm);
        }
    }

    let b = DVector::<f64>::from_column_slice(y);
    let svd = SVD::new(a, true, true);
    let eps = f64::EPSILON * nrows.max(ncols) as f64 * svd.singular_values.max();

    let solution = svd
        .solve(&b, eps)
        .map_err(RegressionError::Solver)?;

    Ok(solution
        .iter()
        .zip(scales.iter())
        .map(|(coef, scale)| coef / scale)
        .collect())
}

/// Ordinary least squares degree-1 fit of `y` against `x`.
/// R² is computed as SSR / SSTO, which is not finite for constant `y`.
pub fn linreg(x: &[f64], y: &[f64]) -> Result<LinearFit, RegressionError> {
    let coefs = polyfit(x, y, 1)?;
    let (intercept, slope) = (coefs[0], coefs[1]);

    let fitted = x
        .iter()
        .map(|x| intercept + slope * x)
        .collect::<Vec<_>>();

    let mean = y.iter().sum::<f64>() / y.len() as f64;
    let ssr = fitted.iter().map(|f| (f - mean).powi(2)).sum::<f64>();
    let ssto = y.iter().map(|y| (y - mean).powi(2)).sum::<f64>();

    Ok(LinearFit {
        fitted,
        intercept,
        slope,
        r_squared: ssr / ssto,
    })
}

fn quadreg_with_sentinel(
    x: &[Epoch],
    y: &[f64],
    pivot: Epoch,
    empty: f64,
) -> Result<f64, RegressionError> {
    if x.is_empty() && y.is_empty() {
        return Ok(empty);
    }
    let secs = x.iter().map(|t| seconds_from(*t, pivot)).collect::<Vec<_>>();
    let coefs = polyfit(&secs, y, 2)?;
    Ok(coefs[0])
}

/// Degree-2 fit of `y` against seconds elapsed from `pivot`.
/// Returns the fitted value at the pivot instant (intercept),
/// or 0.0 when the sample is empty.
pub fn quadreg(x: &[Epoch], y: &[f64], pivot: Epoch) -> Result<f64, RegressionError> {
    quadreg_with_sentinel(x, y, pivot, 0.0)
}

/// Same as [quadreg], but an empty sample resolves to NaN.
/// This is the variant used when smoothing LiDAR ranges around an overflight.
pub fn quadreg_or_nan(x: &[Epoch], y: &[f64], pivot: Epoch) -> Result<f64, RegressionError> {
    quadreg_with_sentinel(x, y, pivot, f64::NAN)
}

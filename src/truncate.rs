//! Coordinate precision reduction.
//!
//! Rounding is half away from zero (`f64::round`): `2.5 -> 3`, `-2.5 -> -3`.
//! Values are rounded in binary, so a decimal literal that sits just below a
//! tie (`1.005` is stored as `1.00499...`) rounds down.

use crate::error::Error;
use crate::model::{Geometry, Position};

/// Scaled magnitudes at or above this have no fractional digits left in an f64.
const MAX_EXACT: f64 = 9_007_199_254_740_992.0; // 2^53

/// Round every coordinate of `geometry` to `precision` decimal digits.
pub fn truncate(geometry: &Geometry, precision: i32) -> Result<Geometry, Error> {
    let precision = check_precision(precision)?;
    Ok(truncate_geometry(geometry, precision, None))
}

/// Like [`truncate`], but also cut every position down to at most
/// `dimensions` components (2 drops elevation).
pub fn truncate_with_dimensions(
    geometry: &Geometry,
    precision: i32,
    dimensions: usize,
) -> Result<Geometry, Error> {
    let precision = check_precision(precision)?;
    let dimensions = check_dimensions(dimensions)?;
    Ok(truncate_geometry(geometry, precision, Some(dimensions)))
}

pub(crate) fn check_precision(precision: i32) -> Result<u32, Error> {
    u32::try_from(precision).map_err(|_| {
        Error::InvalidPolicy(format!(
            "precision must be non-negative, got {}",
            precision
        ))
    })
}

pub(crate) fn check_dimensions(dimensions: usize) -> Result<usize, Error> {
    if dimensions < 2 {
        return Err(Error::InvalidPolicy(format!(
            "dimensions must be at least 2, got {}",
            dimensions
        )));
    }
    Ok(dimensions)
}

/// Copy `geometry` with every position rounded. Arguments are already validated.
pub(crate) fn truncate_geometry(
    geometry: &Geometry,
    precision: u32,
    dimensions: Option<usize>,
) -> Geometry {
    let mut out = geometry.clone();
    out.for_each_position_mut(|position| truncate_position(position, precision, dimensions));
    out
}

fn truncate_position(position: &mut Position, precision: u32, dimensions: Option<usize>) {
    if let Some(dimensions) = dimensions {
        position.truncate(dimensions);
    }
    for n in position.iter_mut() {
        *n = round_to(*n, precision);
    }
}

/// Round `n` to `precision` decimal digits, half away from zero.
pub fn round_to(n: f64, precision: u32) -> f64 {
    if !n.is_finite() {
        return n;
    }

    let factor = 10f64.powi(precision.min(i32::MAX as u32) as i32);
    let scaled = n * factor;

    // Already at (or beyond) representable precision
    if !scaled.is_finite() || scaled.abs() >= MAX_EXACT {
        return n;
    }

    let rounded = scaled.round() / factor;

    // -0.0 -> 0.0
    if rounded == 0.0 { 0.0 } else { rounded }
}

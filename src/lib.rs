//! geoshrink - A GeoJSON size reducer
//!
//! geoshrink makes feature collections smaller by dropping attributes that
//! are not needed and rounding coordinates to a fixed number of decimals.

use std::fs;
use std::path::Path;

mod error;
mod filter;
mod model;
mod parse;
mod reduce;
mod serialize;
mod stats;
mod truncate;

pub use error::*;
pub use filter::*;
pub use model::*;
pub use parse::*;
pub use reduce::*;
pub use serialize::*;
pub use stats::*;
pub use truncate::{round_to, truncate, truncate_with_dimensions};

/// Reduce a GeoJSON string and write it back compactly.
pub fn shrink(geojson: &str, policy: &ReductionPolicy) -> Result<String, Error> {
    shrink_with_options(geojson, policy, &WriteOptions::default())
}

/// Reduce a GeoJSON string with custom output options.
pub fn shrink_with_options(
    geojson: &str,
    policy: &ReductionPolicy,
    options: &WriteOptions,
) -> Result<String, Error> {
    let collection = parse_geojson(geojson)?;
    let reduced = reduce(&collection, policy)?;
    serialize(&reduced, options)
}

/// Reduce the GeoJSON file at `input` into `output`.
pub fn shrink_file(
    input: &Path,
    output: &Path,
    policy: &ReductionPolicy,
    options: &WriteOptions,
) -> Result<SizeReport, Error> {
    let geojson = fs::read_to_string(input)?;
    let reduced = shrink_with_options(&geojson, policy, options)?;
    fs::write(output, &reduced)?;

    let report = SizeReport::new(geojson.len(), reduced.len());
    tracing::debug!(input = %input.display(), output = %output.display(), %report, "wrote reduced file");
    Ok(report)
}

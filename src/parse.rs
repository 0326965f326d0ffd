//! GeoJSON parsing from JSON.

use serde_json::{Map, Value};

use crate::error::Error;
use crate::model::*;

/// Parse a GeoJSON FeatureCollection from a string.
pub fn parse_geojson(geojson: &str) -> Result<FeatureCollection, Error> {
    let value: Value = serde_json::from_str(geojson)?;
    collection_from_value(&value)
}

/// Build a FeatureCollection from an already-parsed JSON value.
pub fn collection_from_value(value: &Value) -> Result<FeatureCollection, Error> {
    let obj = value
        .as_object()
        .ok_or_else(|| Error::Malformed("Top-level value is not an object".into()))?;

    expect_type(obj, "FeatureCollection")?;

    let features = obj
        .get("features")
        .ok_or_else(|| Error::Malformed("FeatureCollection has no `features` member".into()))?
        .as_array()
        .ok_or_else(|| Error::Malformed("`features` is not an array".into()))?
        .iter()
        .enumerate()
        .map(|(i, f)| {
            parse_feature(f).map_err(|e| match e {
                Error::Malformed(msg) => Error::Malformed(format!("feature {}: {}", i, msg)),
                other => other,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FeatureCollection {
        features,
        bbox: parse_bbox(obj)?,
        foreign_members: foreign_members(obj, &["type", "bbox", "features"]),
    })
}

fn parse_feature(value: &Value) -> Result<Feature, Error> {
    let obj = value
        .as_object()
        .ok_or_else(|| Error::Malformed("Feature is not an object".into()))?;

    expect_type(obj, "Feature")?;

    let geometry = match obj.get("geometry") {
        None | Some(Value::Null) => None,
        Some(g) => Some(parse_geometry(g)?),
    };

    let properties = match obj.get("properties") {
        None | Some(Value::Null) => None,
        Some(Value::Object(props)) => Some(props.clone()),
        Some(_) => return Err(Error::Malformed("`properties` is not an object".into())),
    };

    let id = match obj.get("id") {
        None => None,
        Some(id @ (Value::String(_) | Value::Number(_))) => Some(id.clone()),
        Some(_) => return Err(Error::Malformed("`id` is not a string or number".into())),
    };

    Ok(Feature {
        id,
        bbox: parse_bbox(obj)?,
        geometry,
        properties,
        foreign_members: foreign_members(obj, &["type", "id", "bbox", "geometry", "properties"]),
    })
}

/// Parse a GeoJSON geometry object.
pub fn parse_geometry(value: &Value) -> Result<Geometry, Error> {
    let obj = value
        .as_object()
        .ok_or_else(|| Error::Malformed("Geometry is not an object".into()))?;

    let kind = obj
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::Malformed("Geometry has no `type`".into()))?;

    if kind == "GeometryCollection" {
        let members = obj
            .get("geometries")
            .and_then(Value::as_array)
            .ok_or_else(|| Error::Malformed("GeometryCollection has no `geometries` array".into()))?
            .iter()
            .map(parse_geometry)
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(Geometry::GeometryCollection(members));
    }

    let coords = || {
        obj.get("coordinates")
            .ok_or_else(|| Error::Malformed(format!("{} has no `coordinates`", kind)))
    };

    match kind {
        "Point" => Ok(Geometry::Point(parse_position(coords()?)?)),
        "MultiPoint" => Ok(Geometry::MultiPoint(parse_positions(coords()?)?)),
        "LineString" => Ok(Geometry::LineString(parse_positions(coords()?)?)),
        "MultiLineString" => Ok(Geometry::MultiLineString(parse_array(
            coords()?,
            parse_positions,
        )?)),
        "Polygon" => Ok(Geometry::Polygon(parse_array(coords()?, parse_positions)?)),
        "MultiPolygon" => Ok(Geometry::MultiPolygon(parse_array(coords()?, |rings| {
            parse_array(rings, parse_positions)
        })?)),
        other => Err(Error::UnsupportedGeometry(other.to_string())),
    }
}

fn parse_array<T>(
    value: &Value,
    item: impl Fn(&Value) -> Result<T, Error>,
) -> Result<Vec<T>, Error> {
    value
        .as_array()
        .ok_or_else(|| Error::Malformed("Expected an array of coordinates".into()))?
        .iter()
        .map(item)
        .collect()
}

fn parse_positions(value: &Value) -> Result<Vec<Position>, Error> {
    parse_array(value, parse_position)
}

fn parse_position(value: &Value) -> Result<Position, Error> {
    let position = parse_numbers(value)
        .ok_or_else(|| Error::Malformed(format!("Invalid position: {}", value)))?;
    if position.len() < 2 {
        return Err(Error::Malformed(format!(
            "Position needs at least 2 components, got {}",
            position.len()
        )));
    }
    Ok(position)
}

fn parse_numbers(value: &Value) -> Option<Vec<f64>> {
    value.as_array()?.iter().map(Value::as_f64).collect()
}

fn parse_bbox(obj: &Map<String, Value>) -> Result<Option<Vec<f64>>, Error> {
    match obj.get("bbox") {
        None | Some(Value::Null) => Ok(None),
        Some(b) => parse_numbers(b)
            .map(Some)
            .ok_or_else(|| Error::Malformed(format!("Invalid bbox: {}", b))),
    }
}

fn expect_type(obj: &Map<String, Value>, expected: &str) -> Result<(), Error> {
    match obj.get("type").and_then(Value::as_str) {
        Some(t) if t == expected => Ok(()),
        Some(t) => Err(Error::Malformed(format!(
            "Expected type `{}`, got `{}`",
            expected, t
        ))),
        None => Err(Error::Malformed(format!("Missing type, expected `{}`", expected))),
    }
}

fn foreign_members(obj: &Map<String, Value>, known: &[&str]) -> Map<String, Value> {
    obj.iter()
        .filter(|(k, _)| !known.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

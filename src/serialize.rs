//! GeoJSON serialization to compact JSON.

use serde_json::{Map, Value};

use crate::error::Error;
use crate::model::*;

/// Output options.
#[derive(Debug, Clone, Default)]
pub struct WriteOptions {
    /// Indent the output instead of writing it compactly
    pub pretty: bool,
}

/// Serialize a FeatureCollection to a JSON string.
pub fn serialize(collection: &FeatureCollection, options: &WriteOptions) -> Result<String, Error> {
    if options.pretty {
        return Ok(serde_json::to_string_pretty(&collection_to_value(collection))?);
    }

    let mut out = String::new();
    serialize_collection(&mut out, collection)?;
    Ok(out)
}

/// Convert a FeatureCollection back into an untyped JSON value.
pub fn collection_to_value(collection: &FeatureCollection) -> Value {
    let mut obj = Map::new();
    obj.insert("type".into(), "FeatureCollection".into());
    if let Some(bbox) = &collection.bbox {
        obj.insert("bbox".into(), numbers_to_value(bbox));
    }
    extend_foreign(&mut obj, &collection.foreign_members);
    obj.insert(
        "features".into(),
        Value::Array(collection.features.iter().map(feature_to_value).collect()),
    );
    Value::Object(obj)
}

fn feature_to_value(feature: &Feature) -> Value {
    let mut obj = Map::new();
    obj.insert("type".into(), "Feature".into());
    if let Some(id) = &feature.id {
        obj.insert("id".into(), id.clone());
    }
    if let Some(bbox) = &feature.bbox {
        obj.insert("bbox".into(), numbers_to_value(bbox));
    }
    obj.insert(
        "geometry".into(),
        feature.geometry.as_ref().map_or(Value::Null, geometry_to_value),
    );
    obj.insert(
        "properties".into(),
        feature
            .properties
            .as_ref()
            .map_or(Value::Null, |p| Value::Object(p.clone())),
    );
    extend_foreign(&mut obj, &feature.foreign_members);
    Value::Object(obj)
}

/// Convert a geometry into an untyped JSON value.
pub fn geometry_to_value(geometry: &Geometry) -> Value {
    let mut obj = Map::new();
    obj.insert("type".into(), geometry.type_name().into());
    match geometry {
        Geometry::GeometryCollection(members) => {
            obj.insert(
                "geometries".into(),
                Value::Array(members.iter().map(geometry_to_value).collect()),
            );
        }
        other => {
            obj.insert("coordinates".into(), coordinates_to_value(other));
        }
    }
    Value::Object(obj)
}

fn coordinates_to_value(geometry: &Geometry) -> Value {
    fn positions(ps: &[Position]) -> Value {
        Value::Array(ps.iter().map(|p| numbers_to_value(p)).collect())
    }
    fn rings(rs: &[Vec<Position>]) -> Value {
        Value::Array(rs.iter().map(|r| positions(r)).collect())
    }

    match geometry {
        Geometry::Point(p) => numbers_to_value(p),
        Geometry::MultiPoint(ps) | Geometry::LineString(ps) => positions(ps),
        Geometry::MultiLineString(ls) | Geometry::Polygon(ls) => rings(ls),
        Geometry::MultiPolygon(polys) => Value::Array(polys.iter().map(|p| rings(p)).collect()),
        Geometry::GeometryCollection(_) => Value::Null,
    }
}

fn numbers_to_value(ns: &[f64]) -> Value {
    Value::Array(ns.iter().map(|&n| Value::from(n)).collect())
}

fn extend_foreign(obj: &mut Map<String, Value>, foreign: &Map<String, Value>) {
    for (k, v) in foreign {
        obj.entry(k.clone()).or_insert_with(|| v.clone());
    }
}

fn serialize_collection(out: &mut String, collection: &FeatureCollection) -> Result<(), Error> {
    out.push_str("{\"type\":\"FeatureCollection\"");

    if let Some(bbox) = &collection.bbox {
        out.push_str(",\"bbox\":");
        push_numbers(out, bbox);
    }

    push_foreign(out, &collection.foreign_members)?;

    out.push_str(",\"features\":[");
    for (i, feature) in collection.features.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        serialize_feature(out, feature)?;
    }
    out.push_str("]}");
    Ok(())
}

fn serialize_feature(out: &mut String, feature: &Feature) -> Result<(), Error> {
    out.push_str("{\"type\":\"Feature\"");

    if let Some(id) = &feature.id {
        out.push_str(",\"id\":");
        out.push_str(&serde_json::to_string(id)?);
    }

    if let Some(bbox) = &feature.bbox {
        out.push_str(",\"bbox\":");
        push_numbers(out, bbox);
    }

    out.push_str(",\"geometry\":");
    match &feature.geometry {
        Some(geometry) => serialize_geometry(out, geometry),
        None => out.push_str("null"),
    }

    out.push_str(",\"properties\":");
    match &feature.properties {
        Some(props) => push_object(out, props)?,
        None => out.push_str("null"),
    }

    push_foreign(out, &feature.foreign_members)?;
    out.push('}');
    Ok(())
}

fn serialize_geometry(out: &mut String, geometry: &Geometry) {
    out.push_str("{\"type\":\"");
    out.push_str(geometry.type_name());
    out.push('"');

    match geometry {
        Geometry::GeometryCollection(members) => {
            out.push_str(",\"geometries\":");
            push_array(out, members, serialize_geometry);
        }
        Geometry::Point(p) => {
            out.push_str(",\"coordinates\":");
            push_numbers(out, p);
        }
        Geometry::MultiPoint(ps) | Geometry::LineString(ps) => {
            out.push_str(",\"coordinates\":");
            push_array(out, ps, |out, p| push_numbers(out, p));
        }
        Geometry::MultiLineString(ls) | Geometry::Polygon(ls) => {
            out.push_str(",\"coordinates\":");
            push_array(out, ls, |out, ring| push_positions(out, ring));
        }
        Geometry::MultiPolygon(polys) => {
            out.push_str(",\"coordinates\":");
            push_array(out, polys, |out, poly| {
                push_array(out, poly, |out, ring| push_positions(out, ring))
            });
        }
    }
    out.push('}');
}

fn push_positions(out: &mut String, positions: &[Position]) {
    push_array(out, positions, |out, p| push_numbers(out, p));
}

fn push_array<T>(out: &mut String, items: &[T], mut item: impl FnMut(&mut String, &T)) {
    out.push('[');
    for (i, x) in items.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        item(out, x);
    }
    out.push(']');
}

fn push_numbers(out: &mut String, ns: &[f64]) {
    push_array(out, ns, |out, &n| out.push_str(&format_number(n)));
}

fn push_object(out: &mut String, obj: &Map<String, Value>) -> Result<(), Error> {
    out.push('{');
    for (i, (k, v)) in obj.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&serde_json::to_string(k)?);
        out.push(':');
        out.push_str(&serde_json::to_string(v)?);
    }
    out.push('}');
    Ok(())
}

fn push_foreign(out: &mut String, foreign: &Map<String, Value>) -> Result<(), Error> {
    for (k, v) in foreign {
        out.push(',');
        out.push_str(&serde_json::to_string(k)?);
        out.push(':');
        out.push_str(&serde_json::to_string(v)?);
    }
    Ok(())
}

/// Format a coordinate as the shortest JSON number that round-trips.
///
/// Integral values lose their `.0`; non-finite values become `null`.
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        return "0".into();
    }
    if !n.is_finite() {
        return "null".into();
    }

    let mut buf = ryu::Buffer::new();
    let s = buf.format_finite(n);
    s.strip_suffix(".0").unwrap_or(s).to_string()
}

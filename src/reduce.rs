//! Feature collection reduction.

use std::collections::HashSet;

use serde_json::Value;

use crate::error::Error;
use crate::filter::filter_attributes;
use crate::model::*;
use crate::parse::collection_from_value;
use crate::serialize::collection_to_value;
use crate::truncate::{check_dimensions, check_precision, truncate_geometry};

/// What to keep when reducing a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct ReductionPolicy {
    /// Number of decimal digits kept per coordinate (default: 6)
    pub precision: i32,
    /// Attribute keys to keep; everything else is dropped
    pub allowed_keys: HashSet<String>,
    /// Maximum components per position (default: 3, keeps elevation)
    pub dimensions: usize,
}

impl ReductionPolicy {
    pub fn new<I, S>(precision: i32, allowed_keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            precision,
            allowed_keys: allowed_keys.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

impl Default for ReductionPolicy {
    fn default() -> Self {
        Self {
            precision: 6,
            allowed_keys: HashSet::new(),
            dimensions: 3,
        }
    }
}

/// Reduce every feature of `collection` according to `policy`.
///
/// Features keep their order. Filtered properties are always emitted, as an
/// empty map when nothing survives.
pub fn reduce(
    collection: &FeatureCollection,
    policy: &ReductionPolicy,
) -> Result<FeatureCollection, Error> {
    let precision = check_precision(policy.precision)?;
    let dimensions = check_dimensions(policy.dimensions)?;

    tracing::debug!(
        features = collection.features.len(),
        precision,
        dimensions,
        allowed_keys = policy.allowed_keys.len(),
        "reducing feature collection"
    );

    let reduce_one =
        |feature: &Feature| reduce_feature(feature, precision, dimensions, &policy.allowed_keys);

    #[cfg(feature = "parallel")]
    let features = {
        use rayon::prelude::*;
        collection.features.par_iter().map(reduce_one).collect()
    };

    #[cfg(not(feature = "parallel"))]
    let features = collection.features.iter().map(reduce_one).collect();

    Ok(FeatureCollection {
        features,
        bbox: collection.bbox.clone(),
        foreign_members: collection.foreign_members.clone(),
    })
}

/// Parse, reduce and re-encode an untyped GeoJSON value.
pub fn reduce_value(value: &Value, policy: &ReductionPolicy) -> Result<Value, Error> {
    let collection = collection_from_value(value)?;
    let reduced = reduce(&collection, policy)?;
    Ok(collection_to_value(&reduced))
}

fn reduce_feature(
    feature: &Feature,
    precision: u32,
    dimensions: usize,
    allowed_keys: &HashSet<String>,
) -> Feature {
    let properties = filter_attributes(feature.properties.as_ref(), allowed_keys);
    let geometry = feature
        .geometry
        .as_ref()
        .map(|g| truncate_geometry(g, precision, Some(dimensions)));

    Feature {
        id: feature.id.clone(),
        bbox: feature.bbox.clone(),
        geometry,
        properties: Some(properties),
        foreign_members: feature.foreign_members.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::truncate::truncate;
    use serde_json::json;

    fn props(value: Value) -> Option<Attributes> {
        value.as_object().cloned()
    }

    fn point(x: f64, y: f64, properties: Value) -> Feature {
        Feature::new(Geometry::Point(vec![x, y]), props(properties))
    }

    #[test]
    fn test_reduce_filters_and_truncates() {
        let fc = FeatureCollection::new(vec![point(
            1.123456789,
            2.987654321,
            json!({"name": "Test Point", "value": 42, "description": "A test feature"}),
        )]);

        let out = reduce(&fc, &ReductionPolicy::new(2, ["name", "value"])).unwrap();

        assert_eq!(out.features.len(), 1);
        let feature = &out.features[0];
        assert_eq!(feature.geometry, Some(Geometry::Point(vec![1.12, 2.99])));
        assert_eq!(
            feature.properties,
            props(json!({"name": "Test Point", "value": 42}))
        );
    }

    #[test]
    fn test_reduce_null_properties_become_empty() {
        let fc = FeatureCollection::new(vec![point(1.0, 2.0, Value::Null)]);
        let out = reduce(&fc, &ReductionPolicy::new(2, ["name"])).unwrap();
        assert_eq!(out.features[0].properties, Some(Attributes::new()));
    }

    #[test]
    fn test_reduce_empty_key_set() {
        let fc = FeatureCollection::new(vec![point(
            1.123456,
            2.987654,
            json!({"name": "Test", "value": 123}),
        )]);
        let out = reduce(&fc, &ReductionPolicy::new(3, Vec::<String>::new())).unwrap();
        assert_eq!(out.features[0].properties, Some(Attributes::new()));
        assert_eq!(
            out.features[0].geometry,
            Some(Geometry::Point(vec![1.123, 2.988]))
        );
    }

    #[test]
    fn test_reduce_multiple_features_in_order() {
        let fc = FeatureCollection::new(vec![
            point(1.1111, 2.2222, json!({"name": "A", "keep": true, "remove": "x"})),
            point(3.3333, 4.4444, json!({"name": "B", "keep": false, "remove": "y"})),
        ]);

        let out = reduce(&fc, &ReductionPolicy::new(2, ["name", "keep"])).unwrap();

        assert_eq!(out.features.len(), 2);
        assert_eq!(out.features[0].properties, props(json!({"name": "A", "keep": true})));
        assert_eq!(out.features[1].properties, props(json!({"name": "B", "keep": false})));
        assert_eq!(out.features[0].geometry, Some(Geometry::Point(vec![1.11, 2.22])));
        assert_eq!(out.features[1].geometry, Some(Geometry::Point(vec![3.33, 4.44])));
    }

    #[test]
    fn test_reduce_empty_collection() {
        let out = reduce(&FeatureCollection::default(), &ReductionPolicy::default()).unwrap();
        assert!(out.features.is_empty());
    }

    #[test]
    fn test_reduce_negative_precision() {
        let fc = FeatureCollection::new(vec![point(1.0, 2.0, Value::Null)]);
        let err = reduce(&fc, &ReductionPolicy::new(-1, ["name"])).unwrap_err();
        assert!(matches!(err, Error::InvalidPolicy(_)));
    }

    #[test]
    fn test_reduce_invalid_dimensions() {
        let policy = ReductionPolicy {
            dimensions: 1,
            ..ReductionPolicy::default()
        };
        let err = reduce(&FeatureCollection::default(), &policy).unwrap_err();
        assert!(matches!(err, Error::InvalidPolicy(_)));
    }

    #[test]
    fn test_reduce_does_not_mutate_input() {
        let fc = FeatureCollection::new(vec![point(1.23456, 6.54321, json!({"a": 1, "b": 2}))]);
        let before = fc.clone();
        let _ = reduce(&fc, &ReductionPolicy::new(1, ["a"])).unwrap();
        assert_eq!(fc, before);
    }

    #[test]
    fn test_reduce_keeps_ids_bbox_and_foreign_members() {
        let mut feature = point(0.123, 0.456, json!({"a": 1}));
        feature.id = Some(json!("f-1"));
        feature.bbox = Some(vec![0.123, 0.456, 0.123, 0.456]);
        feature.foreign_members.insert("source".into(), json!("survey"));
        let mut fc = FeatureCollection::new(vec![feature]);
        fc.foreign_members.insert("name".into(), json!("layer"));

        let out = reduce(&fc, &ReductionPolicy::new(1, ["a"])).unwrap();

        assert_eq!(out.foreign_members["name"], json!("layer"));
        let feature = &out.features[0];
        assert_eq!(feature.id, Some(json!("f-1")));
        assert_eq!(feature.bbox, Some(vec![0.123, 0.456, 0.123, 0.456]));
        assert_eq!(feature.foreign_members["source"], json!("survey"));
    }

    #[test]
    fn test_reduce_null_geometry_passes_through() {
        let fc = FeatureCollection::new(vec![Feature {
            properties: props(json!({"name": "nowhere"})),
            ..Feature::default()
        }]);
        let out = reduce(&fc, &ReductionPolicy::new(2, ["name"])).unwrap();
        assert_eq!(out.features[0].geometry, None);
    }

    #[test]
    fn test_reduce_order_independent() {
        let fc = FeatureCollection::new(vec![
            point(10.987654, -3.141592, json!({"name": "A", "x": 1})),
            Feature::new(
                Geometry::Polygon(vec![vec![
                    vec![0.00049, 0.99951],
                    vec![1.23456, 7.891011],
                    vec![0.00049, 0.99951],
                ]]),
                props(json!({"x": 2, "name": "B"})),
            ),
            Feature::default(),
        ]);
        let policy = ReductionPolicy::new(3, ["name"]);

        let reduced = reduce(&fc, &policy).unwrap();

        // truncate first, then filter
        let truncate_first: Vec<Feature> = fc
            .features
            .iter()
            .map(|f| Feature {
                geometry: f.geometry.as_ref().map(|g| truncate(g, 3).unwrap()),
                ..f.clone()
            })
            .map(|truncated| Feature {
                properties: Some(filter_attributes(
                    truncated.properties.as_ref(),
                    &policy.allowed_keys,
                )),
                ..truncated
            })
            .collect();

        assert_eq!(reduced.features, truncate_first);
    }

    #[test]
    fn test_reduce_value_rejects_unknown_geometry() {
        let value = json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "geometry": {"type": "Curve", "coordinates": []}, "properties": {}}
            ]
        });
        let err = reduce_value(&value, &ReductionPolicy::default()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedGeometry(kind) if kind == "Curve"));
    }

    #[test]
    fn test_reduce_value_round_trip() {
        let value = json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [1.23456, 2.5]}, "properties": null}
            ]
        });
        let out = reduce_value(&value, &ReductionPolicy::new(2, ["name"])).unwrap();
        assert_eq!(
            out,
            json!({
                "type": "FeatureCollection",
                "features": [
                    {"type": "Feature", "geometry": {"type": "Point", "coordinates": [1.23, 2.5]}, "properties": {}}
                ]
            })
        );
    }
}

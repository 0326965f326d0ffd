//! GeoJSON document model

use indexmap::IndexMap;
use serde_json::{Map, Value};

/// A single position: x, y and optional z (or more).
pub type Position = Vec<f64>;

/// Per-feature attributes, in source order.
pub type Attributes = Map<String, Value>;

/// A GeoJSON FeatureCollection.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureCollection {
    /// Features, in document order
    pub features: Vec<Feature>,
    /// Optional bounding box, carried through untouched
    pub bbox: Option<Vec<f64>>,
    /// Members other than `type`, `bbox` and `features`
    pub foreign_members: Map<String, Value>,
}

/// A GeoJSON Feature.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Feature {
    /// Feature identifier (string or number)
    pub id: Option<Value>,
    /// Optional bounding box, carried through untouched
    pub bbox: Option<Vec<f64>>,
    /// Geometry, `None` for `"geometry": null`
    pub geometry: Option<Geometry>,
    /// Attributes, `None` for absent or `null` properties
    pub properties: Option<Attributes>,
    /// Members other than the ones above
    pub foreign_members: Map<String, Value>,
}

/// A GeoJSON geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Position),
    MultiPoint(Vec<Position>),
    LineString(Vec<Position>),
    MultiLineString(Vec<Vec<Position>>),
    Polygon(Vec<Vec<Position>>),
    MultiPolygon(Vec<Vec<Vec<Position>>>),
    GeometryCollection(Vec<Geometry>),
}

impl Geometry {
    /// The GeoJSON `type` name of this geometry.
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::MultiPoint(_) => "MultiPoint",
            Geometry::LineString(_) => "LineString",
            Geometry::MultiLineString(_) => "MultiLineString",
            Geometry::Polygon(_) => "Polygon",
            Geometry::MultiPolygon(_) => "MultiPolygon",
            Geometry::GeometryCollection(_) => "GeometryCollection",
        }
    }

    /// Visit every position, descending into nested geometries.
    pub fn for_each_position(&self, mut f: impl FnMut(&Position)) {
        fn visit(geometry: &Geometry, f: &mut impl FnMut(&Position)) {
            match geometry {
                Geometry::Point(p) => f(p),
                Geometry::MultiPoint(ps) | Geometry::LineString(ps) => ps.iter().for_each(&mut *f),
                Geometry::MultiLineString(lines) | Geometry::Polygon(lines) => {
                    lines.iter().flatten().for_each(&mut *f)
                }
                Geometry::MultiPolygon(polys) => polys.iter().flatten().flatten().for_each(&mut *f),
                Geometry::GeometryCollection(members) => {
                    for member in members {
                        visit(member, f);
                    }
                }
            }
        }
        visit(self, &mut f);
    }

    /// Visit every position mutably, descending into nested geometries.
    pub fn for_each_position_mut(&mut self, mut f: impl FnMut(&mut Position)) {
        fn visit(geometry: &mut Geometry, f: &mut impl FnMut(&mut Position)) {
            match geometry {
                Geometry::Point(p) => f(p),
                Geometry::MultiPoint(ps) | Geometry::LineString(ps) => {
                    ps.iter_mut().for_each(&mut *f)
                }
                Geometry::MultiLineString(lines) | Geometry::Polygon(lines) => {
                    lines.iter_mut().flatten().for_each(&mut *f)
                }
                Geometry::MultiPolygon(polys) => {
                    polys.iter_mut().flatten().flatten().for_each(&mut *f)
                }
                Geometry::GeometryCollection(members) => {
                    for member in members {
                        visit(member, f);
                    }
                }
            }
        }
        visit(self, &mut f);
    }

    /// Total number of positions in this geometry.
    pub fn position_count(&self) -> usize {
        let mut count = 0;
        self.for_each_position(|_| count += 1);
        count
    }
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            features,
            ..Self::default()
        }
    }

    /// Collect every attribute key in first-seen order, with the number of
    /// features that carry it.
    pub fn attribute_keys(&self) -> Vec<(String, usize)> {
        let mut keys: IndexMap<&str, usize> = IndexMap::new();
        for props in self.features.iter().filter_map(|f| f.properties.as_ref()) {
            for key in props.keys() {
                *keys.entry(key.as_str()).or_insert(0) += 1;
            }
        }
        keys.into_iter().map(|(k, n)| (k.to_string(), n)).collect()
    }
}

impl Feature {
    pub fn new(geometry: Geometry, properties: Option<Attributes>) -> Self {
        Self {
            geometry: Some(geometry),
            properties,
            ..Self::default()
        }
    }
}

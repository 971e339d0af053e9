use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use geojson::{Feature, GeoJson, Value};
use serde::Serialize;
use tracing::{info, warn};

use crate::{Error, Position, RoadAttributes, RoadSegment};

/// A feature that did not make it into the dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedFeature {
    /// Index of the feature in the source collection.
    pub feature: usize,
    pub reason: String,
}

/// Outcome of a load: how many segments were accepted and what was dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadReport {
    pub accepted: usize,
    pub skipped: Vec<SkippedFeature>,
}

/// Immutable, ordered collection of road segments. Never patched in place:
/// a reload builds a new dataset and swaps it in through a [`DatasetHandle`].
#[derive(Debug, Clone, Default)]
pub struct RoadDataset {
    segments: Vec<RoadSegment>,
}

impl RoadDataset {
    pub fn from_segments(segments: Vec<RoadSegment>) -> Self {
        Self { segments }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<(Self, LoadReport), Error> {
        let path = path.as_ref();
        info!("Loading road network: {}", path.display());
        let raw = std::fs::read_to_string(path)?;
        Self::from_geojson_str(&raw)
    }

    /// Parses a GeoJSON `FeatureCollection` of road centerlines.
    ///
    /// `LineString` features become one segment, `MultiLineString` features one
    /// segment per part. Features with another geometry, and parts with fewer
    /// than two vertices, are skipped and listed in the [`LoadReport`].
    ///
    /// # Errors
    ///
    /// Fails only when the document itself is not valid GeoJSON.
    pub fn from_geojson_str(raw: &str) -> Result<(Self, LoadReport), Error> {
        let features = match raw.parse::<GeoJson>()? {
            GeoJson::FeatureCollection(collection) => collection.features,
            GeoJson::Feature(feature) => vec![feature],
            GeoJson::Geometry(geometry) => vec![Feature {
                bbox: None,
                geometry: Some(geometry),
                id: None,
                properties: None,
                foreign_members: None,
            }],
        };

        let mut segments = Vec::with_capacity(features.len());
        let mut report = LoadReport::default();

        for (index, feature) in features.iter().enumerate() {
            let attributes = feature
                .properties
                .as_ref()
                .map(RoadAttributes::from_properties)
                .unwrap_or_default();

            let parts: Vec<&Vec<Vec<f64>>> = match feature.geometry.as_ref().map(|g| &g.value) {
                Some(Value::LineString(line)) => vec![line],
                Some(Value::MultiLineString(lines)) => lines.iter().collect(),
                Some(other) => {
                    report.skip(index, format!("unsupported geometry {}", geometry_name(other)));
                    continue;
                }
                None => {
                    report.skip(index, "feature has no geometry".to_string());
                    continue;
                }
            };

            for part in parts {
                let vertices = match to_positions(part) {
                    Some(v) => v,
                    None => {
                        report.skip(index, "vertex without a lon/lat pair".to_string());
                        continue;
                    }
                };
                match RoadSegment::new(vertices, attributes.clone()) {
                    Ok(segment) => segments.push(segment),
                    Err(e) => report.skip(index, e.to_string()),
                }
            }
        }

        report.accepted = segments.len();
        info!(
            "Road network loaded: {} segments, {} skipped",
            report.accepted,
            report.skipped.len()
        );
        Ok((Self { segments }, report))
    }

    /// A fresh traversal of the segments in dataset order.
    pub fn iter(&self) -> impl Iterator<Item = &RoadSegment> + '_ {
        self.segments.iter()
    }

    pub fn count(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl LoadReport {
    fn skip(&mut self, feature: usize, reason: String) {
        warn!("Skipping road feature #{feature}: {reason}");
        self.skipped.push(SkippedFeature { feature, reason });
    }
}

fn geometry_name(value: &Value) -> &'static str {
    match value {
        Value::Point(_) => "Point",
        Value::MultiPoint(_) => "MultiPoint",
        Value::LineString(_) => "LineString",
        Value::MultiLineString(_) => "MultiLineString",
        Value::Polygon(_) => "Polygon",
        Value::MultiPolygon(_) => "MultiPolygon",
        Value::GeometryCollection(_) => "GeometryCollection",
    }
}

fn to_positions(line: &[Vec<f64>]) -> Option<Vec<Position>> {
    line.iter()
        .map(|c| match c.as_slice() {
            [lon, lat, ..] if lon.is_finite() && lat.is_finite() => Some(Position::new(*lon, *lat)),
            _ => None,
        })
        .collect()
}

/// Shared handle to the current dataset snapshot.
///
/// Readers take an `Arc` and keep using it for the whole query; a reload swaps
/// the pointer, so a query never observes a half-replaced dataset.
#[derive(Debug, Clone, Default)]
pub struct DatasetHandle {
    current: Arc<RwLock<Arc<RoadDataset>>>,
}

impl DatasetHandle {
    pub fn new(dataset: RoadDataset) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(dataset))),
        }
    }

    pub fn snapshot(&self) -> Arc<RoadDataset> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the dataset wholesale, returning the previous snapshot.
    pub fn replace(&self, dataset: RoadDataset) -> Arc<RoadDataset> {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *current, Arc::new(dataset))
    }
}

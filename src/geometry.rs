//! Projection of a point onto a road polyline.
//!
//! A polyline is walked pair by pair. For every pair the query point is
//! dropped perpendicularly onto the line through the two vertices, and the
//! foot is clamped to the pair's span (falling back to the nearer endpoint
//! when it lands outside). The closest foot over all pairs wins.

use geo::prelude::*;
use geo::Coord;
use serde::{Deserialize, Serialize};

use crate::{Error, Position};

/// How distances are measured. Whatever the metric, distances are meters and
/// the same metric drives search, ranking and display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// WGS84 lon/lat degrees, great-circle distance.
    #[default]
    Haversine,
    /// Planar coordinates that are already meters.
    Euclidean,
}

impl Metric {
    pub fn distance(self, a: Position, b: Position) -> f64 {
        match self {
            Metric::Haversine => a.point().haversine_distance(&b.point()),
            Metric::Euclidean => a.point().euclidean_distance(&b.point()),
        }
    }

    /// Horizontal scale of the local frame around `origin`. Longitude degrees
    /// shrink with latitude, so the perpendicular foot is found in a frame
    /// where both axes have the same ground length.
    fn x_scale(self, origin: Position) -> f64 {
        match self {
            Metric::Euclidean => 1.0,
            Metric::Haversine => {
                let scale = origin.lat.to_radians().cos();
                if scale.abs() < f64::EPSILON { 1.0 } else { scale }
            }
        }
    }

    /// Longitude offset from `origin` to `lon`. Geographic offsets take the
    /// short way around, so roads crossing the antimeridian stay contiguous.
    fn lon_offset(self, origin: f64, lon: f64) -> f64 {
        let d = lon - origin;
        match self {
            Metric::Euclidean => d,
            Metric::Haversine if d > 180.0 => d - 360.0,
            Metric::Haversine if d < -180.0 => d + 360.0,
            Metric::Haversine => d,
        }
    }

    fn wrap_lon(self, lon: f64) -> f64 {
        match self {
            Metric::Euclidean => lon,
            Metric::Haversine if lon > 180.0 => lon - 360.0,
            Metric::Haversine if lon < -180.0 => lon + 360.0,
            Metric::Haversine => lon,
        }
    }
}

/// The closest point of a polyline to a query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub point: Position,
    /// Meters between the query point and [`Projection::point`].
    pub distance: f64,
}

/// Projects `query` onto the vertex pair `a`-`b`, returning the clamped foot.
fn foot_on_pair(query: Position, a: Position, b: Position, metric: Metric) -> Position {
    let scale = metric.x_scale(query);
    let local = |p: Position| Coord {
        x: metric.lon_offset(query.lon, p.lon) * scale,
        y: p.lat - query.lat,
    };

    let (la, lb) = (local(a), local(b));
    let d = lb - la;
    let len_2 = d.x * d.x + d.y * d.y;
    if len_2 == 0.0 {
        return a;
    }

    // The query point is the local origin.
    let t = -(la.x * d.x + la.y * d.y) / len_2;
    if t <= 0.0 {
        return a;
    }
    if t >= 1.0 {
        return b;
    }

    let foot = la + d * t;
    Position::new(metric.wrap_lon(query.lon + foot.x / scale), query.lat + foot.y)
}

/// Snaps `query` onto the polyline `vertices`.
///
/// # Errors
///
/// Returns [`Error::InvalidGeometry`] when the polyline has fewer than two
/// vertices.
pub fn project_onto_polyline(
    query: Position,
    vertices: &[Position],
    metric: Metric,
) -> Result<Projection, Error> {
    if vertices.len() < 2 {
        return Err(Error::InvalidGeometry {
            vertices: vertices.len(),
        });
    }

    let mut best: Option<Projection> = None;
    for pair in vertices.windows(2) {
        let point = foot_on_pair(query, pair[0], pair[1], metric);
        let distance = metric.distance(query, point);
        if best.is_none_or(|b| distance < b.distance) {
            best = Some(Projection { point, distance });
        }
    }

    best.ok_or(Error::InvalidGeometry {
        vertices: vertices.len(),
    })
}

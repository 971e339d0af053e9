//! The recommendation pipeline: position × dataset → ranked routes.
//!
//! Everything here is pure. A query reads one dataset snapshot, allocates its
//! own results and holds no state between calls, so any number of queries can
//! run against the same snapshot at once.

use serde::Serialize;
use tracing::debug;

use crate::alternative::{AlternativeOutcome, resolve_alternative};
use crate::config::EngineConfig;
use crate::rank::{RouteCandidate, rank};
use crate::search::{SnapResult, find_nearest, find_top_k};
use crate::{Condition, Error, Position, RoadDataset};

/// The nearest road with its info-panel lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearestRoad<'a> {
    #[serde(flatten)]
    pub snap: SnapResult<'a>,
    pub info: Vec<String>,
    /// The road is in poor condition; the caller should offer the alternative.
    pub poor_condition: bool,
}

impl<'a> From<SnapResult<'a>> for NearestRoad<'a> {
    fn from(snap: SnapResult<'a>) -> Self {
        Self {
            info: snap.segment.info_lines(),
            poor_condition: snap.condition() == Condition::Poor,
            snap,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation<'a> {
    pub origin: Position,
    pub nearest: Option<NearestRoad<'a>>,
    pub alternative: AlternativeOutcome<'a>,
    pub routes: Vec<RouteCandidate>,
}

/// Google Maps directions link from `origin` to `target`.
pub fn directions_url(origin: Position, target: Position, travel_mode: &str) -> String {
    format!(
        "https://www.google.com/maps/dir/?api=1&origin={},{}&destination={},{}&travelmode={}",
        origin.lat, origin.lon, target.lat, target.lon, travel_mode
    )
}

#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the configuration would produce
    /// meaningless results, such as a non-positive walking speed.
    pub fn new(config: EngineConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Closest road regardless of condition.
    pub fn nearest_road<'a>(&self, position: Position, dataset: &'a RoadDataset) -> Option<SnapResult<'a>> {
        find_nearest(position, dataset, self.config.metric, |_| false)
    }

    /// Closest acceptable road when the closest road is poor.
    pub fn alternative_road<'a>(&self, position: Position, dataset: &'a RoadDataset) -> AlternativeOutcome<'a> {
        let nearest = self.nearest_road(position, dataset);
        resolve_alternative(position, dataset, self.config.metric, nearest.as_ref())
    }

    /// The `top_k` closest roads as ranked routes. Poor roads stay in the list
    /// and carry a warning.
    pub fn routes(&self, position: Position, dataset: &RoadDataset) -> Vec<RouteCandidate> {
        let candidates = find_top_k(position, dataset, self.config.metric, |_| false, self.config.top_k);
        rank(&candidates, self.config.walking_speed_kmh)
    }

    pub fn recommend<'a>(&self, position: Position, dataset: &'a RoadDataset) -> Recommendation<'a> {
        let nearest = self.nearest_road(position, dataset);
        let alternative = resolve_alternative(position, dataset, self.config.metric, nearest.as_ref());
        let routes = self.routes(position, dataset);

        debug!(
            "Recommendation for {position}: {} routes, alternative {:?}",
            routes.len(),
            alternative.road().map(|s| s.index)
        );
        Recommendation {
            origin: position,
            nearest: nearest.map(NearestRoad::from),
            alternative,
            routes,
        }
    }

    /// Directions hand-off for one recommended route.
    pub fn navigation_url(&self, origin: Position, route: &RouteCandidate) -> String {
        directions_url(origin, route.target, &self.config.travel_mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Metric;
    use crate::{RoadAttributes, RoadSegment, SafetyLevel};

    fn road(id: &str, x: f64, condition: Condition) -> RoadSegment {
        RoadSegment::new(
            vec![Position::new(x, 0.0), Position::new(x, 100.0)],
            RoadAttributes {
                road_id: Some(id.to_string()),
                condition,
                width_m: Some(6.0),
                ..Default::default()
            },
        )
        .unwrap()
    }

    fn planar() -> Engine {
        Engine::new(EngineConfig {
            metric: Metric::Euclidean,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn recommends_top_three_with_poor_escalation() {
        let dataset = RoadDataset::from_segments(vec![
            road("R1", 400.0, Condition::Good),
            road("R2", 10.0, Condition::Poor),
            road("R3", -50.0, Condition::Fair),
            road("R4", 900.0, Condition::VeryGood),
        ]);
        let origin = Position::new(0.0, 50.0);

        let rec = planar().recommend(origin, &dataset);

        let nearest = rec.nearest.as_ref().unwrap();
        assert_eq!(nearest.snap.index, 1);
        assert!(nearest.poor_condition);
        assert_eq!(nearest.info[0], "Road No: R2");

        assert_eq!(rec.alternative.road().map(|s| s.index), Some(2));

        let names: Vec<&str> = rec.routes.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Route via R2", "Route via R3", "Route via R1"]);
        assert_eq!(rec.routes[0].safety, SafetyLevel::Low);
        assert_eq!(rec.routes[0].warnings.len(), 1);
        assert_eq!(rec.routes[2].distance_m, 400.0);
        assert_eq!(rec.routes[2].time_min, 5);
    }

    #[test]
    fn empty_dataset_recommends_nothing() {
        let empty = RoadDataset::default();
        let rec = planar().recommend(Position::new(0.0, 0.0), &empty);
        assert!(rec.nearest.is_none());
        assert_eq!(rec.alternative, AlternativeOutcome::NotNeeded);
        assert!(rec.routes.is_empty());
    }

    #[test]
    fn rejects_unusable_config() {
        for walking_speed_kmh in [0.0, -5.0, f64::NAN] {
            let config = EngineConfig {
                walking_speed_kmh,
                ..Default::default()
            };
            assert!(matches!(Engine::new(config), Err(Error::Config(_))));
        }
        let config = EngineConfig {
            top_k: 0,
            ..Default::default()
        };
        assert!(matches!(Engine::new(config), Err(Error::Config(_))));
    }

    #[test]
    fn builds_directions_link() {
        assert_eq!(
            directions_url(Position::new(3.3792, 9.5244), Position::new(3.38, 9.53), "walking"),
            "https://www.google.com/maps/dir/?api=1&origin=9.5244,3.3792&destination=9.53,3.38&travelmode=walking"
        );
    }

    #[test]
    fn recommendation_serializes() {
        let dataset = RoadDataset::from_segments(vec![road("R2", 10.0, Condition::Poor)]);
        let rec = planar().recommend(Position::new(0.0, 50.0), &dataset);
        let json = serde_json::to_value(&rec).unwrap();

        assert_eq!(json["nearest"]["road"]["condition"], "Poor");
        assert_eq!(json["nearest"]["position"], serde_json::json!([10.0, 50.0]));
        assert_eq!(json["alternative"]["status"], "unavailable");
        assert_eq!(json["routes"][0]["warnings"][0], "Avoid this road – poor condition");
    }
}

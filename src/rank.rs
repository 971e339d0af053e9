use std::fmt;

use serde::{Serialize, Serializer};

use crate::{Condition, Position, SnapResult};

/// Warning attached to every route over a road in poor condition.
pub const POOR_CONDITION_WARNING: &str = "Avoid this road – poor condition";

/// Safety label derived from a road's condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SafetyLevel {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl SafetyLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            SafetyLevel::VeryHigh => "Very High",
            SafetyLevel::High => "High",
            SafetyLevel::Medium => "Medium",
            SafetyLevel::Low => "Low",
        }
    }
}

impl From<Condition> for SafetyLevel {
    fn from(condition: Condition) -> Self {
        match condition {
            Condition::VeryGood => SafetyLevel::VeryHigh,
            Condition::Good => SafetyLevel::High,
            Condition::Fair => SafetyLevel::Medium,
            Condition::Poor | Condition::Unknown => SafetyLevel::Low,
        }
    }
}

impl fmt::Display for SafetyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SafetyLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A recommended route: walk from the query position to `target` on a road.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteCandidate {
    /// 1-based position in the ranking.
    pub rank: usize,
    pub name: String,
    pub road_id: Option<String>,
    pub distance_m: f64,
    pub time_min: u32,
    pub safety: SafetyLevel,
    pub warnings: Vec<String>,
    pub landmarks: Vec<String>,
    pub target: Position,
}

impl RouteCandidate {
    pub fn distance_label(&self) -> String {
        format!("{:.1} m", self.distance_m)
    }

    pub fn time_label(&self) -> String {
        format!("{} min", self.time_min)
    }
}

/// Minutes needed to cover `distance_m` at `speed_kmh`, to the nearest minute.
pub fn travel_minutes(distance_m: f64, speed_kmh: f64) -> u32 {
    let km = distance_m / 1000.0;
    (km * 60.0 / speed_kmh).round() as u32
}

/// Annotates snapped roads as route recommendations.
///
/// The input order is kept as-is: the search stage already sorted by
/// distance, and ranking only labels.
pub fn rank(candidates: &[SnapResult<'_>], walking_speed_kmh: f64) -> Vec<RouteCandidate> {
    candidates
        .iter()
        .enumerate()
        .map(|(i, snap)| {
            let attributes = snap.segment.attributes();
            let condition = attributes.condition;

            let warnings = match condition {
                Condition::Poor => vec![POOR_CONDITION_WARNING.to_string()],
                _ => Vec::new(),
            };
            let width = attributes
                .width_m
                .map_or_else(|| "?".to_string(), |w| w.to_string());

            RouteCandidate {
                rank: i + 1,
                name: format!(
                    "Route via {}",
                    attributes.road_id.as_deref().unwrap_or("Unnamed Road")
                ),
                road_id: attributes.road_id.clone(),
                distance_m: snap.distance,
                time_min: travel_minutes(snap.distance, walking_speed_kmh),
                safety: SafetyLevel::from(condition),
                warnings,
                landmarks: vec![format!("Width: {width} m"), format!("Condition: {condition}")],
                target: snap.position,
            }
        })
        .collect()
}

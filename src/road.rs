use std::collections::HashMap;
use std::fmt;

use lazy_static::lazy_static;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::{Error, Position};

/// Road-quality category as surveyed. Anything unrecognised is `Unknown`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Condition {
    VeryGood,
    Good,
    Fair,
    Poor,
    #[default]
    Unknown,
}

impl Condition {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "Very Good" => Condition::VeryGood,
            "Good" => Condition::Good,
            "Fair" => Condition::Fair,
            "Poor" => Condition::Poor,
            _ => Condition::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Condition::VeryGood => "Very Good",
            Condition::Good => "Good",
            Condition::Fair => "Fair",
            Condition::Poor => "Poor",
            Condition::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Condition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

lazy_static! {
    static ref SURFACE_TYPES: HashMap<&'static str, &'static str> = HashMap::from([
        ("AS", "Asphalt"),
        ("GR", "Gravel"),
        ("ER", "Earth"),
        ("CB", "Cobblestone"),
        ("CN", "Concrete"),
        ("SD", "Sand"),
        ("ST", "Stone"),
        ("UN", "Unknown"),
        ("BM", "Bituminous Material"),
        ("BL", "Blacktop"),
    ]);
}

/// Human-readable name of a surface-type code.
pub fn surface_label(code: &str) -> &'static str {
    SURFACE_TYPES
        .get(code.trim())
        .copied()
        .unwrap_or("Unknown Surface")
}

/// Survey attributes of a road. Every field is optional in the source data.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RoadAttributes {
    pub road_id: Option<String>,
    pub lanes: Option<u32>,
    pub surface: Option<String>,
    pub pavement: Option<String>,
    pub condition: Condition,
    pub width_m: Option<f64>,
}

impl RoadAttributes {
    /// Reads the `ROADNO`/`LANES`/`SURFTYPE`/`PAVETYPE`/`CONDITION`/`WIDTH`
    /// properties of a road feature. Missing or ill-typed values are dropped.
    pub fn from_properties(properties: &Map<String, Value>) -> Self {
        Self {
            road_id: properties.get("ROADNO").and_then(text),
            lanes: properties
                .get("LANES")
                .and_then(number)
                .filter(|n| *n >= 0.0 && n.fract() == 0.0)
                .map(|n| n as u32),
            surface: properties.get("SURFTYPE").and_then(text),
            pavement: properties.get("PAVETYPE").and_then(text),
            condition: properties
                .get("CONDITION")
                .and_then(Value::as_str)
                .map(Condition::parse)
                .unwrap_or_default(),
            width_m: properties
                .get("WIDTH")
                .and_then(number)
                .filter(|w| *w > 0.0),
        }
    }
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|n| n.is_finite())
}

/// A single road: its centerline and what is known about it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoadSegment {
    geometry: Vec<Position>,
    attributes: RoadAttributes,
}

impl RoadSegment {
    /// # Errors
    ///
    /// Returns [`Error::InvalidGeometry`] for fewer than two vertices.
    pub fn new(geometry: Vec<Position>, attributes: RoadAttributes) -> Result<Self, Error> {
        if geometry.len() < 2 {
            return Err(Error::InvalidGeometry {
                vertices: geometry.len(),
            });
        }
        Ok(Self {
            geometry,
            attributes,
        })
    }

    pub fn geometry(&self) -> &[Position] {
        &self.geometry
    }

    pub fn attributes(&self) -> &RoadAttributes {
        &self.attributes
    }

    pub fn condition(&self) -> Condition {
        self.attributes.condition
    }

    /// Lines of the "nearest road" info panel, `N/A` where unknown.
    pub fn info_lines(&self) -> Vec<String> {
        let a = &self.attributes;
        let or_na = |v: Option<String>| v.unwrap_or_else(|| "N/A".to_string());
        vec![
            format!("Road No: {}", or_na(a.road_id.clone())),
            format!("Lanes: {}", or_na(a.lanes.map(|l| l.to_string()))),
            format!(
                "Surface: {}",
                or_na(a.surface.as_deref().map(|s| surface_label(s).to_string()))
            ),
            format!("Pavement: {}", or_na(a.pavement.clone())),
            format!("Condition: {}", a.condition),
            format!("Road Width: {} m", or_na(a.width_m.map(|w| w.to_string()))),
        ]
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn condition_parsing() {
        assert_eq!(Condition::parse("Very Good"), Condition::VeryGood);
        assert_eq!(Condition::parse(" Poor "), Condition::Poor);
        assert_eq!(Condition::parse("poor"), Condition::Unknown);
        assert_eq!(Condition::parse(""), Condition::Unknown);
        assert_eq!(Condition::Fair.to_string(), "Fair");
    }

    #[test]
    fn surface_labels() {
        assert_eq!(surface_label("AS"), "Asphalt");
        assert_eq!(surface_label("BM"), "Bituminous Material");
        assert_eq!(surface_label("XX"), "Unknown Surface");
    }

    #[test]
    fn attributes_tolerate_missing_and_mistyped_values() {
        let props = json!({
            "ROADNO": 104,
            "LANES": "two",
            "SURFTYPE": "GR",
            "CONDITION": 3,
            "WIDTH": "7.5",
        });
        let attrs = RoadAttributes::from_properties(props.as_object().unwrap());

        assert_eq!(attrs.road_id.as_deref(), Some("104"));
        assert_eq!(attrs.lanes, None);
        assert_eq!(attrs.surface.as_deref(), Some("GR"));
        assert_eq!(attrs.pavement, None);
        assert_eq!(attrs.condition, Condition::Unknown);
        assert_eq!(attrs.width_m, Some(7.5));
    }

    #[test]
    fn segment_requires_two_vertices() {
        let err = RoadSegment::new(vec![Position::new(0.0, 0.0)], RoadAttributes::default());
        assert!(matches!(err, Err(Error::InvalidGeometry { vertices: 1 })));
    }

    #[test]
    fn info_lines_fill_gaps() {
        let road = RoadSegment::new(
            vec![Position::new(0.0, 0.0), Position::new(1.0, 0.0)],
            RoadAttributes {
                road_id: Some("A1".into()),
                surface: Some("AS".into()),
                condition: Condition::Poor,
                width_m: Some(7.0),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(
            road.info_lines(),
            vec![
                "Road No: A1",
                "Lanes: N/A",
                "Surface: Asphalt",
                "Pavement: N/A",
                "Condition: Poor",
                "Road Width: 7 m",
            ]
        );
    }
}

use std::fmt;
use std::str::FromStr;

use geo::{Coord, Point};
use serde::{Deserialize, Serialize};

use crate::Error;

/// A (longitude, latitude) pair. Serialized GeoJSON-style as `[lon, lat]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Position {
    pub lon: f64,
    pub lat: f64,
}

impl Position {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Builds a position from untrusted input, rejecting non-finite values
    /// and coordinates outside the WGS84 range.
    pub fn checked(lon: f64, lat: f64) -> Result<Self, Error> {
        if !lon.is_finite() || !lat.is_finite() {
            return Err(Error::InvalidPosition(format!("{lon},{lat} is not finite")));
        }
        if !(-180.0..=180.0).contains(&lon) || !(-90.0..=90.0).contains(&lat) {
            return Err(Error::InvalidPosition(format!(
                "{lon},{lat} is outside lon [-180, 180] / lat [-90, 90]"
            )));
        }
        Ok(Self { lon, lat })
    }

    pub fn coord(self) -> Coord<f64> {
        Coord { x: self.lon, y: self.lat }
    }

    pub fn point(self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }
}

impl From<[f64; 2]> for Position {
    fn from([lon, lat]: [f64; 2]) -> Self {
        Self { lon, lat }
    }
}

impl From<Position> for [f64; 2] {
    fn from(value: Position) -> Self {
        [value.lon, value.lat]
    }
}

impl From<Coord<f64>> for Position {
    fn from(value: Coord<f64>) -> Self {
        Self { lon: value.x, lat: value.y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lon, self.lat)
    }
}

/// Parses `"lon,lat"`, as accepted on the command line.
impl FromStr for Position {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lon, lat) = s
            .split_once(',')
            .ok_or_else(|| Error::InvalidPosition(format!("expected `lon,lat`, got `{s}`")))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<f64>()
                .map_err(|e| Error::InvalidPosition(format!("`{v}`: {e}")))
        };
        Position::checked(parse(lon)?, parse(lat)?)
    }
}

/// Where the user's position comes from. The engine never decides this; the
/// shell picks an implementation from its configuration.
pub trait PositionSource {
    fn locate(&self) -> Result<Position, Error>;
}

/// A pinned coordinate, used in diagnostic mode.
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(Position);

impl FixedPosition {
    /// Central Nigeria.
    pub const DEBUG: Position = Position::new(3.3792, 9.5244);

    pub fn new(position: Position) -> Self {
        Self(position)
    }
}

impl Default for FixedPosition {
    fn default() -> Self {
        Self(Self::DEBUG)
    }
}

impl PositionSource for FixedPosition {
    fn locate(&self) -> Result<Position, Error> {
        Ok(self.0)
    }
}

/// The fix reported by the user's device, if it produced one.
#[derive(Debug, Clone, Copy, Default)]
pub struct DevicePosition(Option<Position>);

impl DevicePosition {
    pub fn new(reported: Option<Position>) -> Self {
        Self(reported)
    }
}

impl PositionSource for DevicePosition {
    fn locate(&self) -> Result<Position, Error> {
        let position = self.0.ok_or(Error::LocationUnavailable)?;
        Position::checked(position.lon, position.lat)
    }
}

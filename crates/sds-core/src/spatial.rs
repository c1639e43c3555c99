use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Units a caller can request distances in.
///
/// The query service always reports `__Distance` in kilometers; results are
/// converted into the unit the request names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    #[default]
    #[serde(alias = "km", alias = "kilometres")]
    Kilometers,
    #[serde(alias = "mi")]
    Miles,
    #[serde(alias = "m", alias = "metres")]
    Meters,
    #[serde(alias = "ft")]
    Feet,
    #[serde(alias = "yd")]
    Yards,
}

impl DistanceUnit {
    /// Length of one unit in meters.
    #[must_use]
    pub fn meters_per_unit(self) -> f64 {
        match self {
            DistanceUnit::Kilometers => 1_000.0,
            DistanceUnit::Miles => 1_609.344,
            DistanceUnit::Meters => 1.0,
            DistanceUnit::Feet => 0.3048,
            DistanceUnit::Yards => 0.9144,
        }
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistanceUnit::Kilometers => write!(f, "kilometers"),
            DistanceUnit::Miles => write!(f, "miles"),
            DistanceUnit::Meters => write!(f, "meters"),
            DistanceUnit::Feet => write!(f, "feet"),
            DistanceUnit::Yards => write!(f, "yards"),
        }
    }
}

impl FromStr for DistanceUnit {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "km" | "kilometers" | "kilometres" => Ok(DistanceUnit::Kilometers),
            "mi" | "miles" => Ok(DistanceUnit::Miles),
            "m" | "meters" | "metres" => Ok(DistanceUnit::Meters),
            "ft" | "feet" => Ok(DistanceUnit::Feet),
            "yd" | "yards" => Ok(DistanceUnit::Yards),
            _ => Err(CoreError::InvalidDistanceUnit(s.to_string())),
        }
    }
}

/// Converts `value` expressed in `from` into `to`.
#[must_use]
pub fn convert_distance(value: f64, from: DistanceUnit, to: DistanceUnit) -> f64 {
    if from == to {
        return value;
    }
    value * from.meters_per_unit() / to.meters_per_unit()
}

/// A WGS84 coordinate. Defaults to `0,0` when a result carries no coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Geometry encoded as Well-Known Text. Not parsed any further.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Geography {
    pub well_known_text: String,
}

impl Geography {
    #[must_use]
    pub fn new(well_known_text: impl Into<String>) -> Self {
        Self {
            well_known_text: well_known_text.into(),
        }
    }
}

//! Garmin vendor extensions to the GPX 1.1 schema.
//!
//! Covers the three published extension schemas:
//! - <https://www8.garmin.com/xmlschemas/GpxExtensions/v3/GpxExtensionsv3.xsd>
//! - <https://www8.garmin.com/xmlschemas/WaypointExtensionv1.xsd>
//! - <https://www8.garmin.com/xmlschemas/TrackPointExtensionv1.xsd>
//!
//! Real-world producers emit these elements either with an explicit
//! namespace prefix (`gpxx:`, `gpxtpx:`, `wptx1:`) or unprefixed under a
//! default namespace. Decoding matches local names only, so both
//! conventions resolve to the same records; encoding always writes the
//! prefixed form.

use serde::{Deserialize, Serialize};

use crate::model::Extensions;

/// GpxExtensions v3 namespace (`gpxx:` prefix).
pub const GPXX_NS: &str = "http://www.garmin.com/xmlschemas/GpxExtensions/v3";
/// TrackPointExtension v1 namespace (`gpxtpx:` prefix).
pub const GPXTPX_NS: &str = "http://www.garmin.com/xmlschemas/TrackPointExtension/v1";
/// WaypointExtension v1 namespace (`wptx1:` prefix).
pub const WPTX1_NS: &str = "http://www.garmin.com/xmlschemas/WaypointExtension/v1";

/// `wptx1:WaypointExtension`: Garmin GDB waypoint fields that GPX 1.1
/// cannot represent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WayPointExtension {
    /// Proximity alarm radius, metres.
    pub proximity: Option<f64>,
    /// Temperature, degrees Celsius.
    pub temperature: Option<f64>,
    /// Depth below the surface, metres.
    pub depth: Option<f64>,
    pub display_mode: Option<DisplayMode>,
    pub categories: Vec<String>,
    pub address: Option<Address>,
    pub phone_numbers: Vec<PhoneNumber>,
    /// Number of samples averaged into the position.
    pub samples: Option<u32>,
    pub expiration: Option<String>,
}

/// `gpxx:RouteExtension`: Garmin display settings for a route.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RouteExtension {
    pub is_auto_named: Option<bool>,
    pub display_color: Option<DisplayColor>,
    pub extensions: Option<Extensions>,
}

/// `gpxx:RoutePointExtension`: the calculated path between route points.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RoutePointExtension {
    pub subclass: Option<String>,
    pub auto_route_point: Option<AutoRoutePoint>,
    pub extensions: Option<Extensions>,
}

/// A `gpxx:rpt` auto-routing shape point.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AutoRoutePoint {
    pub lat: f64,
    pub lon: f64,
    pub subclass: Option<String>,
}

/// `gpxx:TrackExtension`: Garmin display settings for a track.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrackExtension {
    pub display_color: Option<DisplayColor>,
    pub extensions: Option<Extensions>,
}

/// `gpxtpx:TrackPointExtension`: per-point sensor data.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrackPointExtension {
    /// Ambient air temperature, degrees Celsius (`atemp`).
    pub air_temperature: Option<f64>,
    /// Water temperature, degrees Celsius (`wtemp`).
    pub water_temperature: Option<f64>,
    /// Depth below the surface, metres.
    pub depth: Option<f64>,
    /// Heart rate, beats per minute (`hr`).
    pub heart_rate: Option<u16>,
    /// Cadence, revolutions per minute (`cad`).
    pub cadence: Option<u16>,
    pub extensions: Option<Extensions>,
}

/// A `wptx1:Address` postal address.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Address {
    pub street_address: Vec<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    pub extensions: Option<Extensions>,
}

/// A `wptx1:PhoneNumber` with an optional `Category` attribute.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PhoneNumber {
    pub category: Option<String>,
    pub number: Option<String>,
}

/// How a waypoint is drawn on the map, e.g. `SymbolAndName`.
///
/// Open enumeration like [`crate::model::Fix`]: unknown strings decode
/// losslessly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayMode(String);

impl DisplayMode {
    pub const SYMBOL_ONLY: &'static str = "SymbolOnly";
    pub const SYMBOL_AND_NAME: &'static str = "SymbolAndName";
    pub const SYMBOL_AND_DESCRIPTION: &'static str = "SymbolAndDescription";

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DisplayMode {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Line/symbol colour for routes and tracks, e.g. `DarkRed`.
///
/// Open enumeration: unknown strings decode losslessly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayColor(String);

impl DisplayColor {
    pub const BLACK: &'static str = "Black";
    pub const DARK_RED: &'static str = "DarkRed";
    pub const DARK_GREEN: &'static str = "DarkGreen";
    pub const DARK_YELLOW: &'static str = "DarkYellow";
    pub const DARK_BLUE: &'static str = "DarkBlue";
    pub const DARK_MAGENTA: &'static str = "DarkMagenta";
    pub const DARK_CYAN: &'static str = "DarkCyan";
    pub const LIGHT_GRAY: &'static str = "LightGray";
    pub const DARK_GRAY: &'static str = "DarkGray";
    pub const RED: &'static str = "Red";
    pub const GREEN: &'static str = "Green";
    pub const YELLOW: &'static str = "Yellow";
    pub const BLUE: &'static str = "Blue";
    pub const MAGENTA: &'static str = "Magenta";
    pub const CYAN: &'static str = "Cyan";
    pub const WHITE: &'static str = "White";
    pub const TRANSPARENT: &'static str = "Transparent";

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DisplayColor {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Display for DisplayColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

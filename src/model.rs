//! GPX 1.1 schema model.
//!
//! Element and attribute names follow <http://www.topografix.com/GPX/1/1>.
//! Optional elements are `Option` fields so "absent" and "present but
//! zero-valued" stay distinguishable; a `None` field is omitted from
//! encoded output entirely.

use serde::{Deserialize, Serialize};

use crate::garmin::{
    RouteExtension, RoutePointExtension, TrackExtension, TrackPointExtension, WayPointExtension,
};

/// GPX 1.1 namespace, declared as the default namespace on encode.
pub const GPX_NS: &str = "http://www.topografix.com/GPX/1/1";

/// The `<gpx>` root element.
///
/// `version` and `creator` are required attributes in the schema; files
/// missing them still decode, with empty strings in their place.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Gpx {
    pub version: String,
    pub creator: String,
    pub metadata: Option<Metadata>,
    pub waypoints: Vec<WayPoint>,
    pub routes: Vec<Route>,
    pub tracks: Vec<Track>,
}

impl Gpx {
    pub fn new(version: impl Into<String>, creator: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            creator: creator.into(),
            ..Self::default()
        }
    }
}

/// The `<metadata>` element: information about the file itself.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Metadata {
    pub name: Option<String>,
    pub desc: Option<String>,
    pub author: Option<Person>,
    pub copyright: Option<Copyright>,
    pub links: Vec<Link>,
    pub time: Option<String>,
    pub keywords: Option<String>,
    pub bounds: Option<Bounds>,
    pub extensions: Option<Extensions>,
}

/// A single point record, shared by `<wpt>`, `<rtept>` and `<trkpt>`.
///
/// The three point kinds are structurally identical in GPX 1.1 and differ
/// only in which vendor extension record their `<extensions>` block may
/// carry, so that slot is the type parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point<E> {
    /// Latitude in decimal degrees, WGS84. Range -90.0 to 90.0.
    pub lat: f64,
    /// Longitude in decimal degrees, WGS84. Range -180.0 to 180.0.
    pub lon: f64,
    /// Elevation in metres.
    pub ele: Option<f64>,
    /// Timestamp, kept verbatim as the ISO 8601 string from the file.
    pub time: Option<String>,
    /// Magnetic variation at the point, degrees in [0, 360).
    pub magvar: Option<f64>,
    /// Height of the geoid above the WGS84 ellipsoid, metres.
    pub geoid_height: Option<f64>,
    pub name: Option<String>,
    pub cmt: Option<String>,
    pub desc: Option<String>,
    pub src: Option<String>,
    pub links: Vec<Link>,
    pub sym: Option<String>,
    pub point_type: Option<String>,
    pub fix: Option<Fix>,
    /// Number of satellites used to compute the fix.
    pub sat: Option<u32>,
    pub hdop: Option<f64>,
    pub vdop: Option<f64>,
    pub pdop: Option<f64>,
    /// Seconds since the last DGPS update.
    pub age_of_dgps_data: Option<f64>,
    /// DGPS station id, 0 to 1023.
    pub dgps_id: Option<u16>,
    pub extensions: Option<E>,
}

/// A `<wpt>` point of interest.
pub type WayPoint = Point<WayPointExtension>;
/// A `<rtept>` within a route.
pub type RoutePoint = Point<RoutePointExtension>;
/// A `<trkpt>` within a track segment.
pub type TrackPoint = Point<TrackPointExtension>;

impl<E> Point<E> {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            ele: None,
            time: None,
            magvar: None,
            geoid_height: None,
            name: None,
            cmt: None,
            desc: None,
            src: None,
            links: Vec::new(),
            sym: None,
            point_type: None,
            fix: None,
            sat: None,
            hdop: None,
            vdop: None,
            pdop: None,
            age_of_dgps_data: None,
            dgps_id: None,
            extensions: None,
        }
    }
}

impl<E> Default for Point<E> {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// A `<rte>`: an ordered list of route points leading to a destination.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Route {
    pub name: Option<String>,
    pub cmt: Option<String>,
    pub desc: Option<String>,
    pub src: Option<String>,
    pub links: Vec<Link>,
    pub number: Option<u32>,
    pub route_type: Option<String>,
    pub extensions: Option<RouteExtension>,
    pub points: Vec<RoutePoint>,
}

/// A `<trk>`: an ordered list of recorded points, grouped into segments.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Track {
    pub name: Option<String>,
    pub cmt: Option<String>,
    pub desc: Option<String>,
    pub src: Option<String>,
    pub links: Vec<Link>,
    pub number: Option<u32>,
    pub track_type: Option<String>,
    pub extensions: Option<TrackExtension>,
    pub segments: Vec<TrackSegment>,
}

/// A `<trkseg>`: a continuous span of track points.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrackSegment {
    pub points: Vec<TrackPoint>,
    pub extensions: Option<Extensions>,
}

/// An `<author>` person or organisation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Person {
    pub name: Option<String>,
    pub email: Option<Email>,
    pub link: Option<Link>,
}

/// An `<email>` address, split into id and domain attributes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Email {
    pub id: Option<String>,
    pub domain: Option<String>,
}

/// A `<copyright>` holder and license.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Copyright {
    /// Copyright holder, a required attribute.
    pub author: String,
    pub year: Option<i32>,
    pub license: Option<String>,
}

/// A `<link>` to an external resource.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    pub text: Option<String>,
    pub link_type: Option<String>,
}

/// `<bounds>`: the lat/lon extent of the data, four required attributes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

/// Presence marker for an opaque `<extensions>` block whose content is out
/// of schema. The content is absorbed on decode; encode emits an empty
/// element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Extensions;

/// Type of GPS fix, e.g. `<fix>3d</fix>`.
///
/// This is an open enumeration: the schema allows values outside the
/// published set, so any string decodes losslessly. The associated
/// constants cover the values GPX 1.1 names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fix(String);

impl Fix {
    pub const NONE: &'static str = "none";
    pub const TWO_D: &'static str = "2d";
    pub const THREE_D: &'static str = "3d";
    pub const DGPS: &'static str = "dgps";
    /// Military signal.
    pub const PPS: &'static str = "pps";

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Fix {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Fix {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for Fix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

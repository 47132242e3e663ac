//! GPX 1.1 reader/writer with Garmin extension support.
//!
//! Decodes GPX documents into a typed tree rooted at [`Gpx`] and encodes
//! them back to deterministically indented XML. Garmin vendor extensions
//! (heart rate, temperature, cadence, display styling) are decoded from
//! both the namespace-prefixed and default-namespace conventions found in
//! the wild, and always encoded in the prefixed form.
//!
//! ```no_run
//! let gpx = gpx_xml::parse_file("ride.gpx")?;
//! for track in &gpx.tracks {
//!     for segment in &track.segments {
//!         for point in &segment.points {
//!             println!("{} {}", point.lat, point.lon);
//!         }
//!     }
//! }
//! # Ok::<(), gpx_xml::GpxError>(())
//! ```

pub mod error;
pub mod garmin;
pub mod model;
pub mod parser;
pub mod writer;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub use error::GpxError;
pub use model::{
    Bounds, Copyright, Email, Extensions, Fix, Gpx, Link, Metadata, Person, Point, Route,
    RoutePoint, Track, TrackPoint, TrackSegment, WayPoint,
};
pub use parser::parse;
pub use writer::write_to;

/// Decode one GPX document from a byte buffer.
///
/// The buffer must be UTF-8; anything else is [`GpxError::MalformedInput`].
pub fn decode(bytes: &[u8]) -> Result<Gpx, GpxError> {
    let xml = std::str::from_utf8(bytes)
        .map_err(|e| GpxError::malformed(format!("input is not valid UTF-8: {e}")))?;
    parser::parse(xml)
}

/// Encode a document as an XML declaration plus the indented `<gpx>` tree.
pub fn encode(gpx: &Gpx) -> Result<Vec<u8>, GpxError> {
    let mut out = Vec::new();
    writer::write_to(gpx, &mut out)?;
    Ok(out)
}

/// Read and decode a GPX file.
///
/// An unreadable file (missing, permission denied) is
/// [`GpxError::SourceUnavailable`], distinct from
/// [`GpxError::MalformedInput`] for unreadable content, so callers can
/// special-case "file missing" vs "bad file".
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Gpx, GpxError> {
    let path = path.as_ref();
    let xml = fs::read_to_string(path).map_err(|e| {
        if e.kind() == io::ErrorKind::InvalidData {
            GpxError::malformed(format!("'{}' is not valid UTF-8", path.display()))
        } else {
            GpxError::SourceUnavailable {
                path: Some(path.to_path_buf()),
                source: e,
            }
        }
    })?;
    parser::parse(&xml)
}

/// Encode a document and write it to a file, appending a `.gpx` extension
/// when the path does not already carry one.
pub fn write_file<P: AsRef<Path>>(gpx: &Gpx, path: P) -> Result<(), GpxError> {
    let path = path.as_ref();
    let path: PathBuf = if path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gpx"))
    {
        path.to_path_buf()
    } else {
        let mut name = path.as_os_str().to_os_string();
        name.push(".gpx");
        PathBuf::from(name)
    };
    let bytes = encode(gpx)?;
    fs::write(&path, bytes).map_err(GpxError::EncodingFailure)
}

/// Single-shot decoding handle over a caller-supplied byte stream.
///
/// The stream is read to its end and decoded in one pass; the caller owns
/// the stream and closes it on all exit paths.
pub struct Decoder<R: io::Read> {
    source: R,
}

impl<R: io::Read> Decoder<R> {
    pub fn new(source: R) -> Self {
        Self { source }
    }

    /// Read the stream to the end and decode one GPX document.
    pub fn decode(&mut self) -> Result<Gpx, GpxError> {
        let mut xml = String::new();
        self.source.read_to_string(&mut xml).map_err(|e| {
            if e.kind() == io::ErrorKind::InvalidData {
                GpxError::malformed("stream is not valid UTF-8")
            } else {
                GpxError::SourceUnavailable {
                    path: None,
                    source: e,
                }
            }
        })?;
        parser::parse(&xml)
    }
}

/// Single-shot encoding handle over a caller-supplied byte sink.
pub struct Encoder<W: io::Write> {
    sink: W,
}

impl<W: io::Write> Encoder<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    /// Encode one GPX document into the sink. Sink failures surface as
    /// [`GpxError::EncodingFailure`].
    pub fn encode(&mut self, gpx: &Gpx) -> Result<(), GpxError> {
        writer::write_to(gpx, &mut self.sink)
    }
}

use std::io;
use std::path::PathBuf;

/// Errors surfaced by the GPX codec.
///
/// Anything not covered here decodes permissively: missing optional
/// elements, unknown extension content, and unrecognized enumeration
/// strings all resolve to defaults instead of failing.
#[derive(Debug)]
pub enum GpxError {
    /// The byte source could not be opened or read. Carries the path when
    /// decoding from a named file, `None` when decoding from a stream.
    SourceUnavailable {
        path: Option<PathBuf>,
        source: io::Error,
    },
    /// The input is not well-formed XML, not valid UTF-8, or its root
    /// element is not `<gpx>`.
    MalformedInput { detail: String },
    /// The output sink failed while writing (disk full, closed stream).
    EncodingFailure(io::Error),
}

impl GpxError {
    pub(crate) fn malformed(detail: impl Into<String>) -> Self {
        Self::MalformedInput {
            detail: detail.into(),
        }
    }
}

impl std::fmt::Display for GpxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SourceUnavailable {
                path: Some(path),
                source,
            } => write!(f, "cannot read '{}': {source}", path.display()),
            Self::SourceUnavailable { path: None, source } => {
                write!(f, "cannot read GPX source: {source}")
            }
            Self::MalformedInput { detail } => write!(f, "malformed GPX input: {detail}"),
            Self::EncodingFailure(e) => write!(f, "failed to write GPX output: {e}"),
        }
    }
}

impl std::error::Error for GpxError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::SourceUnavailable { source, .. } => Some(source),
            Self::MalformedInput { .. } => None,
            Self::EncodingFailure(e) => Some(e),
        }
    }
}

impl From<quick_xml::Error> for GpxError {
    fn from(e: quick_xml::Error) -> Self {
        Self::MalformedInput {
            detail: e.to_string(),
        }
    }
}

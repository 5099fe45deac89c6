//! Error types for VO queries.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::coord::CoordError;
use crate::transport::TransportError;
use crate::votable::ParseError;

/// Errors that can occur while running a VO query.
///
/// Protocol-level rejections (`QUERY_STATUS` of `ERROR` or `OVERFLOW` inside a
/// well-formed VOTable) are deliberately NOT represented here; they surface as
/// metadata on the returned [`crate::table::ResultTable`] so that batch
/// queries stay resilient.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed caller input. Raised before any network I/O, never retried.
    #[error(transparent)]
    Input(#[from] InputError),

    /// Network or HTTP failure after retries were exhausted.
    #[error("transport failure after {attempts} attempt(s): {source}")]
    Transport {
        attempts: u32,
        source: TransportError,
    },

    /// Response body could not be interpreted as a VOTable at all.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Failed to write a fetched artifact to disk.
    #[error("failed to write {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
}

impl From<CoordError> for Error {
    fn from(e: CoordError) -> Self {
        Error::Input(InputError::Coord(e))
    }
}

/// Malformed caller input, detected before any request is issued.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InputError {
    /// A radius list was given whose length does not match the coordinate list.
    #[error("radius list length {radii} does not match coordinate list length {coords}")]
    RadiusLengthMismatch { coords: usize, radii: usize },

    /// A coordinate string or pair could not be parsed.
    #[error("cannot parse coordinates: {0}")]
    Coord(#[from] CoordError),

    /// An image format keyword outside the SIA vocabulary.
    #[error("unrecognized image format {0:?}; expected one of FITS, JPEG, PNG, ALL, or GRAPHICS")]
    UnknownImageFormat(String),

    /// TAP upload requested without a table name to reference in the query.
    #[error("upload name must not be empty")]
    EmptyUploadName,
}

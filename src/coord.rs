//! Coordinate input normalization.
//!
//! Query entry points accept a single coordinate or a list, each given as a
//! free-text string, an `(ra, dec)` degree pair, or an already-parsed
//! [`SkyPoint`]. The accepted shapes are modelled as one tagged union,
//! [`Coords`], resolved exactly once into `Vec<SkyPoint>` at the entry point;
//! nothing deeper in the call chain inspects input shapes again.
//!
//! Free-text parsing covers the two forms VO tooling most commonly passes
//! around: decimal degrees (`"187.25 +2.05"`) and colon-separated sexagesimal
//! (`"12:00:00 +30:00:00"`, RA in hours, Dec in degrees). The components may
//! be separated by whitespace or a comma.

use thiserror::Error;

/// Errors from coordinate parsing or validation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoordError {
    /// Empty coordinate string.
    #[error("empty coordinate string")]
    Empty,

    /// The string did not split into an RA and a Dec component.
    #[error("expected an RA and a Dec component in {0:?}")]
    MissingComponent(String),

    /// The RA component could not be parsed.
    #[error("invalid right ascension {0:?}")]
    InvalidRa(String),

    /// The Dec component could not be parsed.
    #[error("invalid declination {0:?}")]
    InvalidDec(String),

    /// Declination outside [-90, 90].
    #[error("declination {0} out of range [-90, 90]")]
    DecOutOfRange(f64),
}

/// An equatorial sky position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyPoint {
    pub ra_deg: f64,
    pub dec_deg: f64,
}

impl SkyPoint {
    /// Creates a validated sky position.
    ///
    /// Right ascension is wrapped into [0, 360); declination outside
    /// [-90, 90] is rejected.
    pub fn new(ra_deg: f64, dec_deg: f64) -> Result<Self, CoordError> {
        if !ra_deg.is_finite() {
            return Err(CoordError::InvalidRa(ra_deg.to_string()));
        }
        if !(-90.0..=90.0).contains(&dec_deg) {
            return Err(CoordError::DecOutOfRange(dec_deg));
        }
        Ok(Self {
            ra_deg: ra_deg.rem_euclid(360.0),
            dec_deg,
        })
    }
}

/// One coordinate input, in any of the accepted shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordSpec {
    /// Free-text coordinate string.
    Text(String),
    /// RA/Dec pair in decimal degrees.
    RaDec(f64, f64),
    /// Already-parsed position.
    Point(SkyPoint),
}

impl CoordSpec {
    /// Resolves this input into a validated position.
    pub fn resolve(self) -> Result<SkyPoint, CoordError> {
        match self {
            CoordSpec::Text(s) => parse_coord(&s),
            CoordSpec::RaDec(ra, dec) => SkyPoint::new(ra, dec),
            CoordSpec::Point(p) => Ok(p),
        }
    }
}

/// A single coordinate or a list of them.
#[derive(Debug, Clone, PartialEq)]
pub enum Coords {
    One(CoordSpec),
    Many(Vec<CoordSpec>),
}

impl Coords {
    /// Resolves the input into a normalized sequence of positions.
    ///
    /// A single input becomes a length-1 sequence. The first unparseable
    /// entry fails the whole resolution.
    pub fn resolve(self) -> Result<Vec<SkyPoint>, CoordError> {
        let specs = match self {
            Coords::One(spec) => vec![spec],
            Coords::Many(specs) => specs,
        };
        specs.into_iter().map(CoordSpec::resolve).collect()
    }
}

impl From<&str> for Coords {
    fn from(s: &str) -> Self {
        Coords::One(CoordSpec::Text(s.to_string()))
    }
}

impl From<String> for Coords {
    fn from(s: String) -> Self {
        Coords::One(CoordSpec::Text(s))
    }
}

impl From<(f64, f64)> for Coords {
    fn from((ra, dec): (f64, f64)) -> Self {
        Coords::One(CoordSpec::RaDec(ra, dec))
    }
}

impl From<SkyPoint> for Coords {
    fn from(p: SkyPoint) -> Self {
        Coords::One(CoordSpec::Point(p))
    }
}

impl From<CoordSpec> for Coords {
    fn from(spec: CoordSpec) -> Self {
        Coords::One(spec)
    }
}

impl From<Vec<CoordSpec>> for Coords {
    fn from(specs: Vec<CoordSpec>) -> Self {
        Coords::Many(specs)
    }
}

impl From<Vec<&str>> for Coords {
    fn from(strings: Vec<&str>) -> Self {
        Coords::Many(
            strings
                .into_iter()
                .map(|s| CoordSpec::Text(s.to_string()))
                .collect(),
        )
    }
}

impl From<Vec<String>> for Coords {
    fn from(strings: Vec<String>) -> Self {
        Coords::Many(strings.into_iter().map(CoordSpec::Text).collect())
    }
}

impl From<Vec<SkyPoint>> for Coords {
    fn from(points: Vec<SkyPoint>) -> Self {
        Coords::Many(points.into_iter().map(CoordSpec::Point).collect())
    }
}

/// Parses a free-text coordinate string into a sky position.
///
/// RA given in sexagesimal (colon-separated) is interpreted as hours and
/// scaled to degrees; decimal RA is taken as degrees directly. Dec is always
/// in degrees.
pub fn parse_coord(text: &str) -> Result<SkyPoint, CoordError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(CoordError::Empty);
    }

    let parts: Vec<&str> = if trimmed.contains(',') {
        trimmed.split(',').map(str::trim).collect()
    } else {
        trimmed.split_whitespace().collect()
    };
    if parts.len() != 2 || parts.iter().any(|p| p.is_empty()) {
        return Err(CoordError::MissingComponent(text.to_string()));
    }

    let ra_deg = if parts[0].contains(':') {
        // Sexagesimal RA is in hours.
        parse_sexagesimal(parts[0]).ok_or_else(|| CoordError::InvalidRa(parts[0].to_string()))?
            * 15.0
    } else {
        parts[0]
            .parse::<f64>()
            .map_err(|_| CoordError::InvalidRa(parts[0].to_string()))?
    };

    let dec_deg = if parts[1].contains(':') {
        parse_sexagesimal(parts[1]).ok_or_else(|| CoordError::InvalidDec(parts[1].to_string()))?
    } else {
        parts[1]
            .parse::<f64>()
            .map_err(|_| CoordError::InvalidDec(parts[1].to_string()))?
    };

    SkyPoint::new(ra_deg, dec_deg)
}

/// Parses a signed `d:m[:s]` component into a decimal value.
fn parse_sexagesimal(text: &str) -> Option<f64> {
    let (sign, body) = match text.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, text.strip_prefix('+').unwrap_or(text)),
    };

    let fields: Vec<&str> = body.split(':').collect();
    if fields.len() < 2 || fields.len() > 3 {
        return None;
    }

    let mut value = 0.0;
    let mut scale = 1.0;
    for field in &fields {
        let v = field.parse::<f64>().ok()?;
        if v < 0.0 {
            return None;
        }
        value += v / scale;
        scale *= 60.0;
    }
    Some(sign * value)
}

//! Simple image access (SIA) queries.
//!
//! An image search asks a service for image products overlapping a sky
//! region: GET with `POS=ra,dec`, `SIZE` (region extent, degrees), and an
//! optional `FORMAT` filter. Results come back as [`ImageTable`]s whose
//! columns are addressable by [`ImageColumn`] mnemonic.

use crate::columns::ImageColumn;
use crate::config::QueryConfig;
use crate::coord::{Coords, SkyPoint};
use crate::error::{Error, InputError};
use crate::query::{query_loop, Radius};
use crate::service::ServiceDescriptor;
use crate::table::{MappedTable, ResultTable};
use crate::transport::{invoke, HttpClient, Request};
use crate::votable::parse_votable;

/// An image search result with UCD-based column mapping.
pub type ImageTable = MappedTable<ImageColumn>;

/// Image format filter accepted by SIA services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    All,
    Fits,
    Jpeg,
    Png,
    Graphics,
}

impl ImageFormat {
    /// Normalizes a caller-supplied format keyword.
    ///
    /// Matching is case-insensitive and tolerant of surrounding noise
    /// (`"image/fits"` and `"FITS"` both map to [`ImageFormat::Fits`]).
    /// Anything outside the SIA vocabulary is an input error, raised before
    /// any request is made.
    pub fn parse(keyword: &str) -> Result<Self, InputError> {
        let lower = keyword.to_ascii_lowercase();
        if lower.contains("fits") {
            Ok(ImageFormat::Fits)
        } else if lower.contains("jpeg") || lower.contains("jpg") {
            Ok(ImageFormat::Jpeg)
        } else if lower.contains("png") {
            Ok(ImageFormat::Png)
        } else if lower.contains("graphics") {
            Ok(ImageFormat::Graphics)
        } else if lower.contains("all") {
            Ok(ImageFormat::All)
        } else {
            Err(InputError::UnknownImageFormat(keyword.to_string()))
        }
    }

    /// The protocol token sent as the `FORMAT` parameter.
    pub fn as_param(&self) -> &'static str {
        match self {
            ImageFormat::All => "ALL",
            ImageFormat::Fits => "image/fits",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::Graphics => "GRAPHICS",
        }
    }
}

/// Image search client.
pub struct ImageClient<C: HttpClient> {
    http: C,
    config: QueryConfig,
}

impl<C: HttpClient> ImageClient<C> {
    /// Creates an image search client with default configuration.
    pub fn new(http: C) -> Self {
        Self {
            http,
            config: QueryConfig::default(),
        }
    }

    /// Creates an image search client with custom configuration.
    pub fn with_config(http: C, config: QueryConfig) -> Self {
        Self { http, config }
    }

    /// Runs one image search per input coordinate.
    ///
    /// `image_format` is an optional keyword from the SIA vocabulary
    /// (FITS, JPEG/JPG, PNG, GRAPHICS, ALL); an unrecognized keyword fails
    /// the whole call before any request. Returns one [`ImageTable`] per
    /// coordinate, in input order; failed items come back as error-tagged
    /// empty tables.
    pub async fn query(
        &self,
        service: &ServiceDescriptor,
        coords: impl Into<Coords>,
        radius: impl Into<Radius>,
        image_format: Option<&str>,
        verbose: bool,
    ) -> Result<Vec<ImageTable>, Error> {
        let format = match image_format {
            Some(keyword) => Some(ImageFormat::parse(keyword)?),
            None => None,
        };
        let points = coords.into().resolve().map_err(Error::from)?;
        let radii = radius.into().expand(points.len())?;
        let items: Vec<(SkyPoint, f64)> = points.into_iter().zip(radii).collect();

        let results = query_loop(items, verbose, |(pos, radius)| {
            self.one_image_search(service, pos, radius, format)
        })
        .await;

        Ok(results.into_iter().map(ImageTable::new).collect())
    }

    /// One image search against one position.
    async fn one_image_search(
        &self,
        service: &ServiceDescriptor,
        pos: SkyPoint,
        radius: f64,
        format: Option<ImageFormat>,
    ) -> Result<ResultTable, Error> {
        let mut params = vec![
            (
                "POS".to_string(),
                format!("{},{}", pos.ra_deg, pos.dec_deg),
            ),
            // SIA SIZE is a diameter, not a radius.
            ("SIZE".to_string(), (2.0 * radius).to_string()),
        ];
        if let Some(format) = format {
            params.push(("FORMAT".to_string(), format.as_param().to_string()));
        }

        let request = Request::Get {
            url: service.access_url().to_string(),
            params,
        };

        let body = invoke(&self.http, &request, &self.config).await?;
        Ok(parse_votable(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_normalization() {
        assert_eq!(ImageFormat::parse("fits").unwrap().as_param(), "image/fits");
        assert_eq!(
            ImageFormat::parse("image/fits").unwrap().as_param(),
            "image/fits"
        );
        assert_eq!(ImageFormat::parse("JPG").unwrap().as_param(), "image/jpeg");
        assert_eq!(ImageFormat::parse("jpeg").unwrap().as_param(), "image/jpeg");
        assert_eq!(ImageFormat::parse("png").unwrap().as_param(), "image/png");
        assert_eq!(
            ImageFormat::parse("graphics").unwrap().as_param(),
            "GRAPHICS"
        );
        assert_eq!(ImageFormat::parse("all").unwrap().as_param(), "ALL");
    }

    #[test]
    fn test_unknown_format_is_input_error() {
        assert!(matches!(
            ImageFormat::parse("tiff"),
            Err(InputError::UnknownImageFormat(_))
        ));
    }
}

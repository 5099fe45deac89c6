//! Simple spectral access (SSA) queries.
//!
//! Spectral searches share the SIA parameter shape (`POS`, `SIZE`, optional
//! `FORMAT`), but their results are identified by utype rather than UCD:
//! columns of a [`SpectraTable`] are addressable by [`SpectraColumn`]
//! mnemonic.

use crate::columns::SpectraColumn;
use crate::config::QueryConfig;
use crate::coord::{Coords, SkyPoint};
use crate::error::Error;
use crate::image::ImageFormat;
use crate::query::{query_loop, Radius};
use crate::service::ServiceDescriptor;
use crate::table::{MappedTable, ResultTable};
use crate::transport::{invoke, HttpClient, Request};
use crate::votable::parse_votable;

/// A spectral search result with utype-based column mapping.
pub type SpectraTable = MappedTable<SpectraColumn>;

/// Spectral search client.
pub struct SpectraClient<C: HttpClient> {
    http: C,
    config: QueryConfig,
}

impl<C: HttpClient> SpectraClient<C> {
    /// Creates a spectral search client with default configuration.
    pub fn new(http: C) -> Self {
        Self {
            http,
            config: QueryConfig::default(),
        }
    }

    /// Creates a spectral search client with custom configuration.
    pub fn with_config(http: C, config: QueryConfig) -> Self {
        Self { http, config }
    }

    /// Runs one spectral search per input coordinate.
    ///
    /// Accepts the same inputs as the image client, including the optional
    /// format keyword. Returns one [`SpectraTable`] per coordinate, in input
    /// order; failed items come back as error-tagged empty tables.
    pub async fn query(
        &self,
        service: &ServiceDescriptor,
        coords: impl Into<Coords>,
        radius: impl Into<Radius>,
        format: Option<&str>,
        verbose: bool,
    ) -> Result<Vec<SpectraTable>, Error> {
        let format = match format {
            Some(keyword) => Some(ImageFormat::parse(keyword)?),
            None => None,
        };
        let points = coords.into().resolve().map_err(Error::from)?;
        let radii = radius.into().expand(points.len())?;
        let items: Vec<(SkyPoint, f64)> = points.into_iter().zip(radii).collect();

        let results = query_loop(items, verbose, |(pos, radius)| {
            self.one_spectra_search(service, pos, radius, format)
        })
        .await;

        Ok(results.into_iter().map(SpectraTable::new).collect())
    }

    /// One spectral search against one position.
    async fn one_spectra_search(
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
            // SSA SIZE is a diameter, matching the SIA convention.
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

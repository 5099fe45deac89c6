//! Cone search queries.
//!
//! A cone search asks a service for all catalog entries within a given
//! angular radius of a sky position: GET with `RA`, `DEC` (decimal degrees)
//! and `SR` (radius, degrees) per item.

use crate::config::QueryConfig;
use crate::coord::{Coords, SkyPoint};
use crate::error::Error;
use crate::query::{query_loop, Radius};
use crate::service::ServiceDescriptor;
use crate::table::ResultTable;
use crate::transport::{invoke, HttpClient, Request};
use crate::votable::parse_votable;

/// Cone search client.
///
/// Holds the HTTP client and the timeout/retry configuration; carries no
/// other state, so one client can serve any number of queries.
pub struct ConeClient<C: HttpClient> {
    http: C,
    config: QueryConfig,
}

impl<C: HttpClient> ConeClient<C> {
    /// Creates a cone search client with default configuration.
    pub fn new(http: C) -> Self {
        Self {
            http,
            config: QueryConfig::default(),
        }
    }

    /// Creates a cone search client with custom configuration.
    pub fn with_config(http: C, config: QueryConfig) -> Self {
        Self { http, config }
    }

    /// Runs one cone search per input coordinate.
    ///
    /// Input coordinates may be a single string, a degree pair, a parsed
    /// position, or a list of any of those; the radius (degrees) is either
    /// one scalar for all items or a list matching the coordinate count.
    /// Returns one table per coordinate, in input order; failed items come
    /// back as error-tagged empty tables.
    pub async fn query(
        &self,
        service: &ServiceDescriptor,
        coords: impl Into<Coords>,
        radius: impl Into<Radius>,
        verbose: bool,
    ) -> Result<Vec<ResultTable>, Error> {
        let points = coords.into().resolve().map_err(Error::from)?;
        let radii = radius.into().expand(points.len())?;
        let items: Vec<(SkyPoint, f64)> = points.into_iter().zip(radii).collect();

        Ok(query_loop(items, verbose, |(pos, radius)| {
            self.one_cone_search(service, pos, radius)
        })
        .await)
    }

    /// One cone search against one position.
    async fn one_cone_search(
        &self,
        service: &ServiceDescriptor,
        pos: SkyPoint,
        radius: f64,
    ) -> Result<ResultTable, Error> {
        let request = Request::Get {
            url: service.access_url().to_string(),
            params: vec![
                ("RA".to_string(), pos.ra_deg.to_string()),
                ("DEC".to_string(), pos.dec_deg.to_string()),
                ("SR".to_string(), radius.to_string()),
            ],
        };

        let body = invoke(&self.http, &request, &self.config).await?;
        Ok(parse_votable(&body)?)
    }
}

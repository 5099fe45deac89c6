//! Table access protocol (TAP) queries.
//!
//! TAP services accept ADQL queries against arbitrary catalog tables. This
//! client covers the synchronous endpoint: POST to `<access_url>/sync` with
//! `REQUEST=doQuery`, `LANG=ADQL` and the query text, optionally with a
//! table uploaded as a multipart file part.
//!
//! Unlike the positional searches, TAP queries are single-item calls:
//! failures are raised to the caller rather than converted into error
//! placeholders.

use crate::config::QueryConfig;
use crate::error::{Error, InputError};
use crate::service::ServiceDescriptor;
use crate::table::{ColumnMeta, ResultTable};
use crate::transport::{invoke, HttpClient, Request};
use crate::votable::parse_votable;

/// Form field name the uploaded table travels under; the `UPLOAD` parameter
/// references it as `param:uplt`.
const UPLOAD_FIELD: &str = "uplt";

/// TAP client.
pub struct TapClient<C: HttpClient> {
    http: C,
    config: QueryConfig,
}

impl<C: HttpClient> TapClient<C> {
    /// Creates a TAP client with default configuration (fewer retries than
    /// the positional searches).
    pub fn new(http: C) -> Self {
        Self {
            http,
            config: QueryConfig::tap_default(),
        }
    }

    /// Creates a TAP client with custom configuration.
    pub fn with_config(http: C, config: QueryConfig) -> Self {
        Self { http, config }
    }

    /// Runs a synchronous ADQL query.
    pub async fn query(
        &self,
        service: &ServiceDescriptor,
        adql: &str,
    ) -> Result<ResultTable, Error> {
        let request = Request::PostForm {
            url: sync_url(service),
            form: base_params(adql),
        };

        let body = invoke(&self.http, &request, &self.config).await?;
        Ok(parse_votable(&body)?)
    }

    /// Runs a synchronous ADQL query with an uploaded table.
    ///
    /// The uploaded bytes must be a VOTable; `upload_name` is the name the
    /// query references the table by (`TAP_UPLOAD.<upload_name>`). An empty
    /// name is rejected before any request is made.
    pub async fn query_with_upload(
        &self,
        service: &ServiceDescriptor,
        adql: &str,
        upload_name: &str,
        table_bytes: Vec<u8>,
    ) -> Result<ResultTable, Error> {
        if upload_name.trim().is_empty() {
            return Err(InputError::EmptyUploadName.into());
        }

        let mut form = base_params(adql);
        form.push((
            "UPLOAD".to_string(),
            format!("{upload_name},param:{UPLOAD_FIELD}"),
        ));

        let request = Request::PostMultipart {
            url: sync_url(service),
            form,
            file_field: UPLOAD_FIELD.to_string(),
            file_name: "upload.xml".to_string(),
            bytes: table_bytes,
        };

        let body = invoke(&self.http, &request, &self.config).await?;
        Ok(parse_votable(&body)?)
    }

    /// Lists the qualified table names a service publishes.
    ///
    /// Queries the standard `TAP_SCHEMA.tables` table; with `contains` set,
    /// only names containing that substring are returned.
    pub async fn list_tables(
        &self,
        service: &ServiceDescriptor,
        contains: Option<&str>,
    ) -> Result<Vec<String>, Error> {
        let table = self
            .query(
                service,
                "SELECT schema_name, table_name FROM TAP_SCHEMA.tables",
            )
            .await?;

        let mut names = Vec::new();
        for row in 0..table.len() {
            let schema = table.cell(row, "schema_name").unwrap_or("").trim();
            let name = table.cell(row, "table_name").unwrap_or("").trim();
            if name.is_empty() {
                continue;
            }
            // Some services already qualify table_name with its schema.
            let qualified = if schema.is_empty() || name.starts_with(&format!("{schema}.")) {
                name.to_string()
            } else {
                format!("{schema}.{name}")
            };
            if contains.map_or(true, |c| qualified.contains(c)) {
                names.push(qualified);
            }
        }
        Ok(names)
    }

    /// Returns the declared column metadata of one table.
    ///
    /// Implemented as a `SELECT TOP 1 *` probe: the column declarations of
    /// the response describe the table even when it has no rows.
    pub async fn list_columns(
        &self,
        service: &ServiceDescriptor,
        table_name: &str,
    ) -> Result<Vec<ColumnMeta>, Error> {
        let adql = format!("SELECT TOP 1 * FROM {table_name}");
        let table = self.query(service, &adql).await?;
        Ok(table.columns().to_vec())
    }
}

/// The synchronous query endpoint of a TAP service.
fn sync_url(service: &ServiceDescriptor) -> String {
    format!("{}/sync", service.access_url().trim_end_matches('/'))
}

/// The parameter set every synchronous TAP query carries.
fn base_params(adql: &str) -> Vec<(String, String)> {
    vec![
        ("REQUEST".to_string(), "doQuery".to_string()),
        ("LANG".to_string(), "ADQL".to_string()),
        ("QUERY".to_string(), adql.to_string()),
    ]
}

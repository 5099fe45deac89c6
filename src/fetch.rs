//! Retrieval of referenced binary artifacts (FITS files, preview images).
//!
//! Result rows reference their data products by access URL. These helpers
//! resolve the URL from a row by mnemonic and download the artifact, either
//! to a caller-named file or into memory.

use std::path::Path;

use tokio::fs;
use tracing::info;

use crate::columns::{ImageColumn, SpectraColumn};
use crate::config::QueryConfig;
use crate::error::Error;
use crate::image::ImageTable;
use crate::spectra::SpectraTable;
use crate::transport::{invoke, HttpClient, Request};

/// The access URL referenced by one row of an image result, if present.
pub fn image_access_url(table: &ImageTable, row: usize) -> Option<&str> {
    table.cell_by_mnemonic(row, ImageColumn::AccessUrl)
}

/// The access URL referenced by one row of a spectral result, if present.
pub fn spectra_access_url(table: &SpectraTable, row: usize) -> Option<&str> {
    table.cell_by_mnemonic(row, SpectraColumn::AccessUrl)
}

/// Downloads an artifact into memory.
pub async fn fetch_bytes<C: HttpClient>(http: &C, url: &str) -> Result<Vec<u8>, Error> {
    let request = Request::Get {
        url: url.to_string(),
        params: Vec::new(),
    };
    invoke(http, &request, &QueryConfig::default()).await
}

/// Downloads an artifact to a caller-named file.
pub async fn fetch_to_file<C: HttpClient>(
    http: &C,
    url: &str,
    path: impl AsRef<Path>,
) -> Result<(), Error> {
    let path = path.as_ref();
    let bytes = fetch_bytes(http, url).await?;
    fs::write(path, &bytes).await.map_err(|e| Error::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    info!(url, path = %path.display(), bytes = bytes.len(), "artifact written");
    Ok(())
}

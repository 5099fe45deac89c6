//! voquery - Virtual Observatory query convenience layer
//!
//! This library wraps the common Virtual Observatory (VO) query protocols
//! behind one consistent client API: cone search, simple image access (SIA),
//! simple spectral access (SSA), and table access protocol (TAP).
//!
//! Callers hand over a service URL (or descriptor record), one or many sky
//! coordinates, and a search radius. The library expands the inputs into one
//! request per coordinate, runs each request with retry and timeout handling,
//! parses the VOTable responses into [`table::ResultTable`] values, and keeps
//! batch queries resilient: one unresponsive service or bad coordinate never
//! invalidates the rest of the batch.
//!
//! # Example
//!
//! ```ignore
//! use voquery::cone::ConeClient;
//! use voquery::transport::ReqwestClient;
//!
//! let client = ConeClient::new(ReqwestClient::new()?);
//! let results = client
//!     .query(&"https://example.org/conesearch".into(), "12:00:00 +30:00:00", 0.01, false)
//!     .await?;
//! ```

pub mod columns;
pub mod cone;
pub mod config;
pub mod coord;
pub mod error;
pub mod fetch;
pub mod image;
pub mod logging;
pub mod query;
pub mod service;
pub mod spectra;
pub mod table;
pub mod tap;
pub mod transport;
pub mod votable;

pub use error::{Error, InputError};
pub use service::ServiceDescriptor;

/// Version of the voquery library.
///
/// Defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

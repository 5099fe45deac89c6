//! Service descriptors.
//!
//! A VO query targets either a bare access URL or a descriptor record
//! selected from a registry result, which carries the access URL plus
//! optional service metadata. Both resolve to the same thing: the URL the
//! request is issued against. A descriptor is immutable once constructed.

use std::collections::BTreeMap;

/// A resolved VO service endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceDescriptor {
    /// A bare service URL.
    Url(String),

    /// A registry-style record: the access URL plus free-form metadata
    /// (protocol name, capabilities, publisher, ...).
    Record {
        access_url: String,
        meta: BTreeMap<String, String>,
    },
}

impl ServiceDescriptor {
    /// Creates a descriptor record with no metadata.
    pub fn record(access_url: impl Into<String>) -> Self {
        ServiceDescriptor::Record {
            access_url: access_url.into(),
            meta: BTreeMap::new(),
        }
    }

    /// Creates a descriptor record with metadata.
    pub fn record_with_meta(
        access_url: impl Into<String>,
        meta: BTreeMap<String, String>,
    ) -> Self {
        ServiceDescriptor::Record {
            access_url: access_url.into(),
            meta,
        }
    }

    /// The URL requests are issued against.
    pub fn access_url(&self) -> &str {
        match self {
            ServiceDescriptor::Url(url) => url,
            ServiceDescriptor::Record { access_url, .. } => access_url,
        }
    }

    /// Looks up a metadata value; always `None` for bare URLs.
    pub fn meta(&self, key: &str) -> Option<&str> {
        match self {
            ServiceDescriptor::Url(_) => None,
            ServiceDescriptor::Record { meta, .. } => meta.get(key).map(String::as_str),
        }
    }
}

impl From<&str> for ServiceDescriptor {
    fn from(url: &str) -> Self {
        ServiceDescriptor::Url(url.to_string())
    }
}

impl From<String> for ServiceDescriptor {
    fn from(url: String) -> Self {
        ServiceDescriptor::Url(url)
    }
}

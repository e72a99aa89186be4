#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Cadastral feature service access.
//!
//! Resolves the query bounding box from the map viewport, issues a single
//! WFS `GetFeature` request against the `VWorld` continuous cadastral
//! layer, and parses the GML 2 response into [`ParcelRecord`]s.
//!
//! [`ParcelRecord`]: parcel_map_parcel_models::ParcelRecord

pub mod bbox;
pub mod client;
pub mod config;
pub mod gml;

use thiserror::Error;

pub use client::{RawResponse, WfsClient};
pub use config::ServiceConfig;

/// Errors that end a render run.
#[derive(Debug, Error)]
pub enum WfsError {
    /// The request could not be completed.
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a status other than 200.
    #[error("Feature service request failed with status {status}")]
    UpstreamStatus {
        /// HTTP status code.
        status: u16,
    },

    /// The response contained no feature members.
    #[error("No parcels found in the requested area")]
    EmptyResult {
        /// Start of the raw response body.
        excerpt: String,
    },

    /// The response body is not well-formed XML.
    #[error("Failed to parse feature service response: {0}")]
    MalformedXml(#[from] gml::GmlError),
}

impl WfsError {
    /// Short machine-readable name of the error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transportFailure",
            Self::UpstreamStatus { .. } => "upstreamStatusError",
            Self::EmptyResult { .. } => "emptyResultWarning",
            Self::MalformedXml(_) => "malformedXml",
        }
    }

    /// Whether the run may be shown as a warning rather than a failure.
    #[must_use]
    pub const fn is_warning(&self) -> bool {
        matches!(self, Self::EmptyResult { .. })
    }
}

/// Validates a raw response and parses its parcels.
///
/// Checks run in order: HTTP status, empty body, XML well-formedness,
/// then presence of at least one feature member.
///
/// # Errors
///
/// Returns [`WfsError::UpstreamStatus`] for a non-200 status,
/// [`WfsError::EmptyResult`] for a blank body or a document without
/// feature members, and [`WfsError::MalformedXml`] for a body that is not
/// XML.
pub fn parse_response(
    raw: &RawResponse,
    excerpt_chars: usize,
) -> Result<gml::ParsedFeatures, WfsError> {
    if raw.status != 200 {
        return Err(WfsError::UpstreamStatus { status: raw.status });
    }

    if raw.body.iter().all(u8::is_ascii_whitespace) {
        return Err(WfsError::EmptyResult {
            excerpt: String::new(),
        });
    }

    let parsed = gml::parse_document(&raw.body)?;

    if parsed.member_count == 0 {
        return Err(WfsError::EmptyResult {
            excerpt: raw.excerpt(excerpt_chars),
        });
    }

    Ok(parsed)
}

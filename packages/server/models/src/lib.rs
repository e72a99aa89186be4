#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the parcel map server.
//!
//! These types are serialized to JSON for the browser UI. They are kept
//! apart from the pipeline types so the API contract can evolve on its
//! own.

use parcel_map_parcel_models::{
    CategoryGroup, CategoryVisibility, LatLng, ViewState, Viewport,
};
use parcel_map_render::MapView;
use serde::{Deserialize, Serialize};

/// Query parameters for the parcels endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParcelQueryParams {
    /// Viewport as `west,south,east,north`. Absent on first load.
    pub bbox: Option<String>,
    /// Farmland toggle (default on).
    pub farmland: Option<bool>,
    /// Salt field toggle (default on).
    pub salt_field: Option<bool>,
    /// Fish farm toggle (default on).
    pub fish_farm: Option<bool>,
    /// Forest toggle (default on).
    pub forest: Option<bool>,
}

impl ParcelQueryParams {
    /// Returns the viewport described by `bbox`, if it has four numbers.
    #[must_use]
    pub fn viewport(&self) -> Option<Viewport> {
        self.bbox.as_deref().and_then(parse_viewport)
    }

    /// Returns the toggle state, with missing toggles on.
    #[must_use]
    pub fn visibility(&self) -> CategoryVisibility {
        let defaults = CategoryVisibility::default();
        CategoryVisibility {
            farmland: self.farmland.unwrap_or(defaults.farmland),
            salt_field: self.salt_field.unwrap_or(defaults.salt_field),
            fish_farm: self.fish_farm.unwrap_or(defaults.fish_farm),
            forest: self.forest.unwrap_or(defaults.forest),
        }
    }

    /// Returns the snapshot a render run starts from.
    #[must_use]
    pub fn view_state(&self) -> ViewState {
        ViewState {
            viewport: self.viewport(),
            visibility: self.visibility(),
        }
    }
}

/// Parses a bounding box string `"west,south,east,north"` into a
/// [`Viewport`]. Returns `None` unless all four parts are numbers.
#[must_use]
pub fn parse_viewport(s: &str) -> Option<Viewport> {
    let parts: Vec<f64> = s
        .split(',')
        .map(|p| p.trim().parse().ok())
        .collect::<Option<_>>()?;
    if parts.len() == 4 {
        Some(Viewport::new(
            LatLng::new(parts[1], parts[0]),
            LatLng::new(parts[3], parts[2]),
        ))
    } else {
        None
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// A sidebar toggle as returned by the categories endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCategory {
    /// Group name, also the query parameter name of its toggle.
    pub group: CategoryGroup,
    /// Sidebar label.
    pub label: &'static str,
    /// Emoji shown before the label.
    pub emoji: &'static str,
    /// Fill color.
    pub color: Option<&'static str>,
    /// Category codes in this group.
    pub codes: Vec<String>,
    /// Whether the toggle starts on.
    pub default_visible: bool,
}

impl From<CategoryGroup> for ApiCategory {
    fn from(group: CategoryGroup) -> Self {
        Self {
            group,
            label: group.label(),
            emoji: group.emoji(),
            color: group.color(),
            codes: group.codes().iter().map(char::to_string).collect(),
            default_visible: CategoryVisibility::default().is_visible(group),
        }
    }
}

/// Sidebar and map configuration for the browser UI.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMapConfig {
    /// Map center on first load.
    pub center: LatLng,
    /// Initial zoom level.
    pub zoom: u8,
    /// Sidebar toggles in display order.
    pub categories: Vec<ApiCategory>,
}

/// Details of a run, reported when diagnostics are enabled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDiagnostics {
    /// Requested bbox string.
    pub bbox: String,
    /// Request URL with the access key redacted.
    pub request_url: Option<String>,
    /// HTTP status returned by the feature service.
    pub status: Option<u16>,
    /// One `pnu - symbol (code)` line per parsed parcel.
    pub parcels: Vec<String>,
}

/// Response of the parcels endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ApiParcelsResponse {
    /// Parcels were fetched and rendered.
    #[serde(rename_all = "camelCase")]
    Ok {
        /// Rendered map.
        map: MapView,
        /// Run details, when enabled.
        #[serde(skip_serializing_if = "Option::is_none")]
        diagnostics: Option<ApiDiagnostics>,
    },
    /// The run stopped without a map update, but nothing failed.
    #[serde(rename_all = "camelCase")]
    Warning {
        /// User-facing message.
        message: String,
        /// Start of the raw response body.
        excerpt: String,
        /// Run details, when enabled.
        #[serde(skip_serializing_if = "Option::is_none")]
        diagnostics: Option<ApiDiagnostics>,
    },
    /// The run failed.
    #[serde(rename_all = "camelCase")]
    Error {
        /// Error kind (e.g. `upstreamStatusError`).
        kind: String,
        /// User-facing message.
        message: String,
        /// Run details, when enabled.
        #[serde(skip_serializing_if = "Option::is_none")]
        diagnostics: Option<ApiDiagnostics>,
    },
}

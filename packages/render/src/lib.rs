#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Map overlay rendering for cadastral parcels.
//!
//! Every parcel becomes one polygon overlay. Parcels whose category is
//! toggled off (or unclassified) keep their black outline and get a
//! transparent fill, so boundaries stay visible.

pub mod color;
pub mod features;
pub mod html;

use parcel_map_parcel_models::{
    CategoryGroup, CategoryVisibility, LatLng, MAP_CENTER, MAP_ZOOM, ParcelRecord,
};
use serde::Serialize;

pub use color::color_for;

/// Outline color of every overlay.
pub const STROKE_COLOR: &str = "black";
/// Outline weight of every overlay.
pub const STROKE_WEIGHT: u32 = 1;
/// Fill opacity of a colored overlay.
pub const FILL_OPACITY: f64 = 0.3;
/// Fill color of an uncolored overlay.
pub const TRANSPARENT: &str = "transparent";

/// Leaflet-compatible path style for one overlay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayStyle {
    /// Fill color, or [`TRANSPARENT`].
    pub fill_color: &'static str,
    /// Outline color.
    pub color: &'static str,
    /// Outline weight.
    pub weight: u32,
    /// Fill opacity, 0 when unfilled.
    pub fill_opacity: f64,
}

impl OverlayStyle {
    /// Style for an overlay with the given fill, or an outline-only style.
    #[must_use]
    pub const fn for_fill(fill: Option<&'static str>) -> Self {
        match fill {
            Some(fill_color) => Self {
                fill_color,
                color: STROKE_COLOR,
                weight: STROKE_WEIGHT,
                fill_opacity: FILL_OPACITY,
            },
            None => Self {
                fill_color: TRANSPARENT,
                color: STROKE_COLOR,
                weight: STROKE_WEIGHT,
                fill_opacity: 0.0,
            },
        }
    }

    /// Whether this style fills the polygon.
    #[must_use]
    pub fn is_filled(&self) -> bool {
        self.fill_opacity > 0.0
    }
}

/// One parcel polygon on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParcelOverlay {
    /// Parcel number.
    pub id: String,
    /// Land category code.
    pub category_code: char,
    /// Group the code belongs to.
    pub group: CategoryGroup,
    /// Exterior ring as `[lon, lat]` pairs.
    pub ring: Vec<[f64; 2]>,
    /// Path style.
    pub style: OverlayStyle,
    /// Tooltip text.
    pub tooltip: String,
}

/// A rendered map: fixed center and zoom plus one overlay per parcel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    /// Map center.
    pub center: LatLng,
    /// Zoom level.
    pub zoom: u8,
    /// Parcel overlays in response order.
    pub overlays: Vec<ParcelOverlay>,
}

impl MapView {
    /// Number of overlays drawn with a fill.
    #[must_use]
    pub fn filled_count(&self) -> usize {
        self.overlays.iter().filter(|o| o.style.is_filled()).count()
    }
}

/// Builds the overlay for one record.
#[must_use]
pub fn overlay_for(record: &ParcelRecord, visibility: &CategoryVisibility) -> ParcelOverlay {
    let style = OverlayStyle::for_fill(color_for(record.category_code, visibility));

    ParcelOverlay {
        id: record.id.clone(),
        category_code: record.category_code,
        group: record.category_group(),
        ring: record
            .exterior_coords()
            .into_iter()
            .map(|(lon, lat)| [lon, lat])
            .collect(),
        style,
        tooltip: record.id.clone(),
    }
}

/// Renders all records onto a map centered on [`MAP_CENTER`].
#[must_use]
pub fn render(records: &[ParcelRecord], visibility: &CategoryVisibility) -> MapView {
    let overlays: Vec<ParcelOverlay> = records
        .iter()
        .map(|record| overlay_for(record, visibility))
        .collect();

    let view = MapView {
        center: MAP_CENTER,
        zoom: MAP_ZOOM,
        overlays,
    };

    log::debug!(
        "Rendered {} overlays ({} filled)",
        view.overlays.len(),
        view.filled_count()
    );

    view
}

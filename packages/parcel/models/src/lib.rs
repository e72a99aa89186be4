#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Parcel, viewport, and land category types for the parcel map.
//!
//! These types flow through every stage of a render run: the viewport
//! reported by the map widget becomes a [`BoundingBox`], the feature
//! service response becomes a list of [`ParcelRecord`]s, and the user's
//! sidebar toggles travel alongside them as a [`CategoryVisibility`]
//! inside a [`ViewState`]. Nothing here outlives a single run.

pub mod category;

use std::fmt;

use geo::{LineString, Polygon};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use category::{CategoryGroup, CategoryVisibility};

/// Coordinate reference system used for both the query bbox and the
/// returned geometry.
pub const CRS: &str = "EPSG:4326";

/// Center of the map on first load.
pub const MAP_CENTER: LatLng = LatLng {
    lat: 36.783_316,
    lng: 126.452_611,
};

/// Initial zoom level of the map.
pub const MAP_ZOOM: u8 = 16;

/// Minimum number of points needed to build a parcel polygon.
pub const MIN_RING_POINTS: usize = 3;

/// A geographic point in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lng: f64,
}

impl LatLng {
    /// Creates a new point.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// The visible rectangle of the map widget, as reported after a pan or
/// zoom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    /// South-west corner.
    pub south_west: LatLng,
    /// North-east corner.
    pub north_east: LatLng,
}

impl Viewport {
    /// Creates a viewport from its two corners.
    #[must_use]
    pub const fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self {
            south_west,
            north_east,
        }
    }
}

/// A query rectangle in [`CRS`] coordinates.
///
/// Bounds are passed through as given; a viewport with `west > east` is
/// not rejected, the feature service deals with it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Western longitude boundary.
    pub west: f64,
    /// Southern latitude boundary.
    pub south: f64,
    /// Eastern longitude boundary.
    pub east: f64,
    /// Northern latitude boundary.
    pub north: f64,
}

impl BoundingBox {
    /// Small area around [`MAP_CENTER`] used before the map widget has
    /// reported any bounds.
    pub const FALLBACK: Self = Self::new(126.45, 36.782, 126.455, 36.785);

    /// Creates a new bounding box from the given coordinates.
    #[must_use]
    pub const fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// Returns the coordinate reference system identifier.
    #[must_use]
    pub const fn crs(&self) -> &'static str {
        CRS
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{},{}",
            self.west,
            self.south,
            self.east,
            self.north,
            self.crs()
        )
    }
}

/// Errors raised while turning coordinate text into a polygon.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// Not enough points to form a ring.
    #[error("polygon needs at least 3 points, got {count}")]
    TooFewPoints {
        /// Number of points that were supplied.
        count: usize,
    },

    /// A coordinate pair could not be read as `lon,lat`.
    #[error("invalid coordinate pair '{token}'")]
    InvalidCoordinate {
        /// The offending whitespace-separated token.
        token: String,
    },
}

/// Builds a polygon whose exterior ring follows `coords` in order.
///
/// The ring is not validated for self-intersection. An open ring is closed
/// by repeating the first point.
///
/// # Errors
///
/// Returns [`GeometryError::TooFewPoints`] if fewer than
/// [`MIN_RING_POINTS`] coordinates are given.
pub fn polygon_from_coordinates(coords: &[(f64, f64)]) -> Result<Polygon<f64>, GeometryError> {
    if coords.len() < MIN_RING_POINTS {
        return Err(GeometryError::TooFewPoints {
            count: coords.len(),
        });
    }

    let exterior: LineString<f64> = coords.iter().copied().collect();
    Ok(Polygon::new(exterior, vec![]))
}

/// One cadastral parcel as returned by the feature service.
#[derive(Debug, Clone, PartialEq)]
pub struct ParcelRecord {
    /// Parcel number (PNU). Unique within one response, not globally.
    pub id: String,
    /// Full land category symbol text, trimmed (e.g. `"123-4답"`).
    pub symbol: String,
    /// Last character of [`Self::symbol`].
    pub category_code: char,
    /// Parcel boundary in `(lon, lat)` order.
    pub polygon: Polygon<f64>,
}

impl ParcelRecord {
    /// Returns the category group this parcel's code belongs to.
    #[must_use]
    pub const fn category_group(&self) -> CategoryGroup {
        CategoryGroup::from_code(self.category_code)
    }

    /// Returns the exterior ring as `(lon, lat)` pairs.
    #[must_use]
    pub fn exterior_coords(&self) -> Vec<(f64, f64)> {
        self.polygon
            .exterior()
            .coords()
            .map(|c| (c.x, c.y))
            .collect()
    }
}

/// Snapshot of the UI at the moment a render run starts.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ViewState {
    /// Current map viewport, absent on first load.
    pub viewport: Option<Viewport>,
    /// Sidebar toggle state.
    pub visibility: CategoryVisibility,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bbox_display_has_five_fields_ending_in_crs() {
        let bbox = BoundingBox::new(126.1, 36.2, 126.3, 36.4);
        let text = bbox.to_string();
        let fields: Vec<&str> = text.split(',').collect();
        assert_eq!(fields.len(), 5);
        assert_eq!(fields[4], CRS);
        assert_eq!(text, "126.1,36.2,126.3,36.4,EPSG:4326");
    }

    #[test]
    fn fallback_bbox_string() {
        assert_eq!(
            BoundingBox::FALLBACK.to_string(),
            "126.45,36.782,126.455,36.785,EPSG:4326"
        );
    }

    #[test]
    fn polygon_round_trips_closed_ring() {
        let coords = [
            (126.45, 36.78),
            (126.46, 36.78),
            (126.46, 36.79),
            (126.45, 36.78),
        ];
        let polygon = polygon_from_coordinates(&coords).unwrap();
        let record = ParcelRecord {
            id: "1".to_string(),
            symbol: "답".to_string(),
            category_code: '답',
            polygon,
        };
        assert_eq!(record.exterior_coords(), coords.to_vec());
    }

    #[test]
    fn polygon_closes_open_ring() {
        let coords = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)];
        let polygon = polygon_from_coordinates(&coords).unwrap();
        assert_eq!(polygon.exterior().coords().count(), 4);
    }

    #[test]
    fn rejects_degenerate_polygon() {
        let err = polygon_from_coordinates(&[(0.0, 0.0), (1.0, 1.0)]).unwrap_err();
        assert_eq!(err, GeometryError::TooFewPoints { count: 2 });
        assert!(polygon_from_coordinates(&[]).is_err());
    }

    #[test]
    fn record_category_group_follows_code() {
        let record = ParcelRecord {
            id: "4421010100100010000".to_string(),
            symbol: "1염".to_string(),
            category_code: '염',
            polygon: polygon_from_coordinates(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]).unwrap(),
        };
        assert_eq!(record.category_group(), CategoryGroup::SaltField);
    }
}

//! Viewport to query bounding box conversion.

use parcel_map_parcel_models::{BoundingBox, Viewport};

/// Resolves the query bounding box for the current viewport.
///
/// Falls back to [`BoundingBox::FALLBACK`] when the map widget has not
/// reported bounds yet. Corners are not validated.
#[must_use]
pub const fn resolve(viewport: Option<&Viewport>) -> BoundingBox {
    match viewport {
        Some(viewport) => BoundingBox::new(
            viewport.south_west.lng,
            viewport.south_west.lat,
            viewport.north_east.lng,
            viewport.north_east.lat,
        ),
        None => BoundingBox::FALLBACK,
    }
}

#[cfg(test)]
mod tests {
    use parcel_map_parcel_models::{CRS, LatLng};

    use super::*;

    #[test]
    fn resolves_viewport_corners() {
        let viewport = Viewport::new(LatLng::new(36.78, 126.45), LatLng::new(36.79, 126.46));
        let bbox = resolve(Some(&viewport));
        assert_eq!(bbox, BoundingBox::new(126.45, 36.78, 126.46, 36.79));
        assert_eq!(bbox.to_string(), "126.45,36.78,126.46,36.79,EPSG:4326");
    }

    #[test]
    fn absent_viewport_uses_fallback() {
        assert_eq!(
            resolve(None).to_string(),
            "126.45,36.782,126.455,36.785,EPSG:4326"
        );
    }

    #[test]
    fn inverted_viewport_passes_through() {
        let viewport = Viewport::new(LatLng::new(37.0, 127.0), LatLng::new(36.0, 126.0));
        let text = resolve(Some(&viewport)).to_string();
        let fields: Vec<&str> = text.split(',').collect();
        assert_eq!(fields, ["127", "37", "126", "36", CRS]);
    }
}

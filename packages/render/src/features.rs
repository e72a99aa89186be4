//! `GeoJSON` export of a rendered map.
//!
//! One `Feature` per overlay, carrying the parcel number, category code,
//! and the Leaflet path style as properties.

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};

use crate::{MapView, ParcelOverlay};

impl ParcelOverlay {
    /// Converts this overlay into a `GeoJSON` polygon feature.
    #[must_use]
    pub fn to_feature(&self) -> Feature {
        let ring: Vec<Vec<f64>> = self.ring.iter().map(|[lon, lat]| vec![*lon, *lat]).collect();

        let mut properties = JsonObject::new();
        properties.insert("pnu".to_string(), serde_json::Value::from(self.id.as_str()));
        properties.insert(
            "code".to_string(),
            serde_json::Value::from(self.category_code.to_string()),
        );
        properties.insert(
            "group".to_string(),
            serde_json::Value::from(self.group.as_ref()),
        );
        properties.insert(
            "style".to_string(),
            serde_json::json!({
                "fillColor": self.style.fill_color,
                "color": self.style.color,
                "weight": self.style.weight,
                "fillOpacity": self.style.fill_opacity,
            }),
        );

        Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::Polygon(vec![ring]))),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        }
    }
}

impl MapView {
    /// Converts every overlay into a `GeoJSON` `FeatureCollection`.
    #[must_use]
    pub fn to_feature_collection(&self) -> FeatureCollection {
        FeatureCollection {
            bbox: None,
            features: self.overlays.iter().map(ParcelOverlay::to_feature).collect(),
            foreign_members: None,
        }
    }
}

//! Standalone HTML page for a rendered map.
//!
//! Produces a single Leaflet document with the overlays inlined as
//! `GeoJSON`, so an exported map can be opened without the server.

use crate::MapView;

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";

/// Renders `map` as a self-contained HTML document.
///
/// # Errors
///
/// Returns a [`serde_json::Error`] if the overlays cannot be serialized.
pub fn render_page(map: &MapView, title: &str) -> Result<String, serde_json::Error> {
    let features = serde_json::to_string(&map.to_feature_collection())?;
    // Keep the inlined JSON from closing the script element.
    let features = features.replace("</", "<\\/");
    let title = escape_html(title);
    let lat = map.center.lat;
    let lng = map.center.lng;
    let zoom = map.zoom;

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="ko">
<head>
<meta charset="utf-8">
<title>{title}</title>
<meta name="viewport" content="width=device-width, initial-scale=1">
<link rel="stylesheet" href="{LEAFLET_CSS}">
<style>html, body, #map {{ height: 100%; margin: 0; }}</style>
</head>
<body>
<div id="map"></div>
<script src="{LEAFLET_JS}"></script>
<script>
const parcels = {features};
const map = L.map("map").setView([{lat}, {lng}], {zoom});
L.control.scale().addTo(map);
L.tileLayer("https://{{s}}.tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png", {{
  maxZoom: 19,
  attribution: "&copy; OpenStreetMap contributors",
}}).addTo(map);
const layer = L.geoJSON(parcels, {{
  style: (feature) => feature.properties.style,
  onEachFeature: (feature, l) => l.bindTooltip(document.createTextNode(feature.properties.pnu)),
}}).addTo(map);
if (parcels.features.length > 0) {{
  map.fitBounds(layer.getBounds());
}}
</script>
</body>
</html>
"#
    ))
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use parcel_map_parcel_models::{CategoryVisibility, ParcelRecord, polygon_from_coordinates};

    use super::*;
    use crate::render;

    #[test]
    fn inlines_features_and_view() {
        let records = [ParcelRecord {
            id: "4421010100100010000".to_string(),
            symbol: "1임".to_string(),
            category_code: '임',
            polygon: polygon_from_coordinates(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]).unwrap(),
        }];
        let page = render_page(&render(&records, &CategoryVisibility::default()), "Auto Solar")
            .unwrap();
        assert!(page.contains("<title>Auto Solar</title>"));
        assert!(page.contains("4421010100100010000"));
        assert!(page.contains("#264653"));
        assert!(page.contains("setView([36.783316, 126.452611], 16)"));
    }

    #[test]
    fn escapes_title_and_script_content() {
        let records = [ParcelRecord {
            id: "</script><b>".to_string(),
            symbol: "1답".to_string(),
            category_code: '답',
            polygon: polygon_from_coordinates(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]).unwrap(),
        }];
        let page = render_page(&render(&records, &CategoryVisibility::default()), "<x>").unwrap();
        assert!(page.contains("<title>&lt;x&gt;</title>"));
        assert_eq!(page.matches("</script>").count(), 2);
        assert!(page.contains("bindTooltip(document.createTextNode("));
    }
}

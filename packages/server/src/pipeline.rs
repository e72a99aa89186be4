//! One render run: resolve bbox, fetch, parse, color, render.
//!
//! Every viewport or toggle change restarts the whole run. Nothing from a
//! previous run is reused, and every failure ends up as a
//! [`PipelineOutcome`] instead of a panic.

use parcel_map_parcel_models::{BoundingBox, CategoryVisibility, ViewState};
use parcel_map_render::{MapView, render};
use parcel_map_server_models::{ApiDiagnostics, ApiParcelsResponse};
use parcel_map_wfs::{RawResponse, WfsClient, WfsError, bbox};

/// Number of body characters kept for the empty-result excerpt.
pub const EXCERPT_CHARS: usize = 1000;

/// Message shown when the service returned no feature members.
pub const EMPTY_RESULT_MESSAGE: &str = "No parcel data found. The area may contain no parcels, \
     or the request parameters may be wrong.";

/// How a run ended.
#[derive(Debug)]
pub enum PipelineOutcome {
    /// Parcels were rendered.
    Rendered {
        /// The rendered map.
        map: MapView,
        /// Run details.
        diagnostics: ApiDiagnostics,
    },
    /// The response was valid but held no parcels. No map update.
    Warning {
        /// User-facing message.
        message: String,
        /// Start of the raw response body.
        excerpt: String,
        /// Run details.
        diagnostics: ApiDiagnostics,
    },
    /// The run failed. No map update.
    Failed {
        /// What went wrong.
        error: WfsError,
        /// Run details.
        diagnostics: ApiDiagnostics,
    },
}

impl PipelineOutcome {
    /// Whether the run failed (as opposed to rendering or warning).
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Returns the rendered map, if any.
    #[must_use]
    pub const fn map(&self) -> Option<&MapView> {
        match self {
            Self::Rendered { map, .. } => Some(map),
            Self::Warning { .. } | Self::Failed { .. } => None,
        }
    }

    /// Converts the outcome into the API response. Diagnostics are only
    /// included when `include_diagnostics` is set.
    #[must_use]
    pub fn into_response(self, include_diagnostics: bool) -> ApiParcelsResponse {
        let keep = |diagnostics: ApiDiagnostics| include_diagnostics.then_some(diagnostics);

        match self {
            Self::Rendered { map, diagnostics } => ApiParcelsResponse::Ok {
                map,
                diagnostics: keep(diagnostics),
            },
            Self::Warning {
                message,
                excerpt,
                diagnostics,
            } => ApiParcelsResponse::Warning {
                message,
                excerpt,
                diagnostics: keep(diagnostics),
            },
            Self::Failed { error, diagnostics } => ApiParcelsResponse::Error {
                kind: error.kind().to_string(),
                message: error.to_string(),
                diagnostics: keep(diagnostics),
            },
        }
    }
}

/// Runs the full pipeline for `state`.
pub async fn run(client: &WfsClient, state: &ViewState) -> PipelineOutcome {
    let bbox = bbox::resolve(state.viewport.as_ref());
    log::info!("Fetching parcels for bbox {bbox}");

    match client.fetch(&bbox).await {
        Ok(raw) => evaluate(bbox, &raw, &state.visibility),
        Err(error) => {
            log::error!("Feature service request failed: {error}");
            PipelineOutcome::Failed {
                error,
                diagnostics: ApiDiagnostics {
                    bbox: bbox.to_string(),
                    ..ApiDiagnostics::default()
                },
            }
        }
    }
}

/// Turns a raw service response into an outcome.
#[must_use]
pub fn evaluate(
    bbox: BoundingBox,
    raw: &RawResponse,
    visibility: &CategoryVisibility,
) -> PipelineOutcome {
    let mut diagnostics = ApiDiagnostics {
        bbox: bbox.to_string(),
        request_url: Some(raw.url.clone()),
        status: Some(raw.status),
        parcels: Vec::new(),
    };

    match parcel_map_wfs::parse_response(raw, EXCERPT_CHARS) {
        Ok(parsed) => {
            diagnostics.parcels = parsed
                .records
                .iter()
                .map(|r| format!("{} - {} ({})", r.id, r.symbol, r.category_code))
                .collect();

            log::info!(
                "Parsed {} parcels from {} feature members",
                parsed.records.len(),
                parsed.member_count
            );

            PipelineOutcome::Rendered {
                map: render(&parsed.records, visibility),
                diagnostics,
            }
        }
        Err(WfsError::EmptyResult { excerpt }) => {
            log::warn!("No feature members in response for bbox {bbox}");
            PipelineOutcome::Warning {
                message: EMPTY_RESULT_MESSAGE.to_string(),
                excerpt,
                diagnostics,
            }
        }
        Err(error) => {
            log::error!("Failed to process feature service response: {error}");
            PipelineOutcome::Failed { error, diagnostics }
        }
    }
}

#[cfg(test)]
mod tests {
    use parcel_map_parcel_models::CategoryGroup;

    use super::*;

    const SALT_FIELD_RESPONSE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<wfs:FeatureCollection xmlns:wfs="http://www.opengis.net/wfs" xmlns:gml="http://www.opengis.net/gml" xmlns:sop="https://www.vworld.kr">
  <gml:featureMember>
    <sop:dt_d002 fid="dt_d002.1">
      <sop:ag_geom>
        <gml:Polygon><gml:outerBoundaryIs><gml:LinearRing>
          <gml:coordinates>126.45,36.78 126.46,36.78 126.46,36.79 126.45,36.78</gml:coordinates>
        </gml:LinearRing></gml:outerBoundaryIs></gml:Polygon>
      </sop:ag_geom>
      <sop:pnu>4421010100100010000</sop:pnu>
      <sop:lnm_lndcgr_smbol>1-2염</sop:lnm_lndcgr_smbol>
    </sop:dt_d002>
  </gml:featureMember>
</wfs:FeatureCollection>"#;

    fn raw(status: u16, body: &str) -> RawResponse {
        RawResponse {
            status,
            url: "https://api.vworld.kr/ned/wfs/getCtnlgsSpceWFS?key=***".to_string(),
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn renders_visible_salt_field() {
        let outcome = evaluate(
            BoundingBox::FALLBACK,
            &raw(200, SALT_FIELD_RESPONSE),
            &CategoryVisibility::default(),
        );
        let map = outcome.map().expect("expected a rendered map");
        assert_eq!(map.overlays.len(), 1);
        assert_eq!(map.overlays[0].style.fill_color, "#2a9d8f");
        assert!((map.overlays[0].style.fill_opacity - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn hidden_salt_field_keeps_transparent_overlay() {
        let visibility = CategoryVisibility::default().with(CategoryGroup::SaltField, false);
        let outcome = evaluate(
            BoundingBox::FALLBACK,
            &raw(200, SALT_FIELD_RESPONSE),
            &visibility,
        );
        let map = outcome.map().expect("expected a rendered map");
        assert_eq!(map.overlays.len(), 1);
        assert_eq!(map.overlays[0].style.fill_color, "transparent");
        assert!(map.overlays[0].style.fill_opacity.abs() < f64::EPSILON);
    }

    #[test]
    fn not_found_is_upstream_status_error() {
        let outcome = evaluate(
            BoundingBox::FALLBACK,
            &raw(404, "<html><body>Not Found</body></html>"),
            &CategoryVisibility::default(),
        );
        assert!(outcome.is_failure());
        assert!(outcome.map().is_none());
        match outcome {
            PipelineOutcome::Failed { error, diagnostics } => {
                assert!(matches!(error, WfsError::UpstreamStatus { status: 404 }));
                assert_eq!(diagnostics.status, Some(404));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn empty_body_is_warning() {
        let outcome = evaluate(
            BoundingBox::FALLBACK,
            &raw(200, ""),
            &CategoryVisibility::default(),
        );
        assert!(!outcome.is_failure());
        assert!(outcome.map().is_none());
        assert!(matches!(outcome, PipelineOutcome::Warning { .. }));
    }

    #[test]
    fn collection_without_members_warns_with_excerpt() {
        let body = r#"<wfs:FeatureCollection xmlns:wfs="http://www.opengis.net/wfs"/>"#;
        match evaluate(
            BoundingBox::FALLBACK,
            &raw(200, body),
            &CategoryVisibility::default(),
        ) {
            PipelineOutcome::Warning { excerpt, .. } => assert_eq!(excerpt, body),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn malformed_body_fails_without_panicking() {
        let outcome = evaluate(
            BoundingBox::FALLBACK,
            &raw(200, "<ServiceExceptionReport><ServiceException>"),
            &CategoryVisibility::default(),
        );
        assert!(outcome.is_failure());
        let response = outcome.into_response(false);
        assert!(matches!(
            response,
            ApiParcelsResponse::Error { ref kind, diagnostics: None, .. } if kind == "malformedXml"
        ));
    }

    #[test]
    fn diagnostics_list_parcels_when_enabled() {
        let outcome = evaluate(
            BoundingBox::FALLBACK,
            &raw(200, SALT_FIELD_RESPONSE),
            &CategoryVisibility::default(),
        );
        match outcome.into_response(true) {
            ApiParcelsResponse::Ok {
                diagnostics: Some(diagnostics),
                ..
            } => {
                assert_eq!(diagnostics.bbox, "126.45,36.782,126.455,36.785,EPSG:4326");
                assert_eq!(diagnostics.parcels, ["4421010100100010000 - 1-2염 (염)"]);
            }
            other => panic!("unexpected response: {other:?}"),
        }
    }
}

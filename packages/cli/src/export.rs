//! One-shot export of a rendered parcel map.
//!
//! Runs the same pipeline as the server for a single bounding box and
//! writes either a standalone Leaflet page or a `GeoJSON` feature
//! collection.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use dialoguer::{Input, MultiSelect, Select};
use parcel_map_parcel_models::{CategoryGroup, CategoryVisibility, ViewState};
use parcel_map_render::{MapView, html};
use parcel_map_server::pipeline::{self, PipelineOutcome};
use parcel_map_server_models::parse_viewport;
use parcel_map_wfs::{ServiceConfig, WfsClient};

/// Page title of exported HTML maps.
const PAGE_TITLE: &str = "Parcel Map";

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// Standalone Leaflet page.
    Html,
    /// `GeoJSON` feature collection.
    Geojson,
}

impl ExportFormat {
    const ALL: &[Self] = &[Self::Html, Self::Geojson];

    const fn label(self) -> &'static str {
        match self {
            Self::Html => "HTML map",
            Self::Geojson => "GeoJSON",
        }
    }

    const fn default_file_name(self) -> &'static str {
        match self {
            Self::Html => "parcels.html",
            Self::Geojson => "parcels.geojson",
        }
    }
}

/// Arguments of the `export` subcommand.
#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Bounding box as `west,south,east,north`. Uses the default area when
    /// omitted.
    #[arg(long)]
    pub bbox: Option<String>,

    /// Category groups to leave unfilled (comma-separated, e.g.
    /// `forest,fishFarm`).
    #[arg(long, value_delimiter = ',')]
    pub hide: Vec<CategoryGroup>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = ExportFormat::Html)]
    pub format: ExportFormat,

    /// Output file.
    #[arg(long, short)]
    pub output: PathBuf,
}

impl ExportArgs {
    /// Builds the render snapshot. An unparseable `bbox` falls back to the
    /// default area.
    fn view_state(&self) -> ViewState {
        let viewport = self.bbox.as_deref().and_then(|s| {
            let viewport = parse_viewport(s);
            if viewport.is_none() {
                log::warn!("Ignoring invalid bbox '{s}', using the default area");
            }
            viewport
        });

        ViewState {
            viewport,
            visibility: hidden_to_visibility(&self.hide),
        }
    }
}

fn hidden_to_visibility(hidden: &[CategoryGroup]) -> CategoryVisibility {
    hidden
        .iter()
        .fold(CategoryVisibility::default(), |visibility, group| {
            visibility.with(*group, false)
        })
}

/// Serializes `map` in `format`.
fn encode(map: &MapView, format: ExportFormat) -> Result<String, serde_json::Error> {
    match format {
        ExportFormat::Html => html::render_page(map, PAGE_TITLE),
        ExportFormat::Geojson => serde_json::to_string_pretty(&map.to_feature_collection()),
    }
}

/// Prompts for the export arguments.
///
/// # Errors
///
/// Returns an error if a prompt fails.
pub fn prompt() -> Result<ExportArgs, Box<dyn std::error::Error>> {
    let bbox: String = Input::new()
        .with_prompt("Bounding box (west,south,east,north, empty for default area)")
        .allow_empty(true)
        .interact_text()?;

    let group_labels: Vec<String> = CategoryGroup::TOGGLEABLE
        .iter()
        .map(|g| format!("{} {}", g.emoji(), g.label()))
        .collect();
    let defaults = vec![true; CategoryGroup::TOGGLEABLE.len()];

    let shown = MultiSelect::new()
        .with_prompt("Filled categories (space=toggle, a=all, enter=confirm)")
        .items(&group_labels)
        .defaults(&defaults)
        .interact()?;

    let hide = CategoryGroup::TOGGLEABLE
        .iter()
        .enumerate()
        .filter(|(i, _)| !shown.contains(i))
        .map(|(_, g)| *g)
        .collect();

    let format_labels: Vec<&str> = ExportFormat::ALL.iter().map(|f| f.label()).collect();
    let format_idx = Select::new()
        .with_prompt("Output format")
        .items(&format_labels)
        .default(0)
        .interact()?;
    let format = ExportFormat::ALL[format_idx];

    let output: String = Input::new()
        .with_prompt("Output file")
        .default(format.default_file_name().to_string())
        .interact_text()?;

    let bbox = bbox.trim();

    Ok(ExportArgs {
        bbox: (!bbox.is_empty()).then(|| bbox.to_string()),
        hide,
        format,
        output: PathBuf::from(output),
    })
}

/// Runs the pipeline once and writes the result to `args.output`.
///
/// An empty result is reported and leaves no file behind.
///
/// # Errors
///
/// Returns an error if the feature service request or response handling
/// fails, or if the output cannot be written.
pub async fn run(args: ExportArgs) -> Result<(), Box<dyn std::error::Error>> {
    let client = WfsClient::new(ServiceConfig::from_env())?;
    let state = args.view_state();

    match pipeline::run(&client, &state).await {
        PipelineOutcome::Rendered { map, diagnostics } => {
            if client.config().debug {
                for line in &diagnostics.parcels {
                    log::debug!("{line}");
                }
            }

            let contents = encode(&map, args.format)?;
            std::fs::write(&args.output, contents)?;

            println!(
                "Wrote {} parcels ({} filled) to {}",
                map.overlays.len(),
                map.filled_count(),
                args.output.display()
            );
        }
        PipelineOutcome::Warning {
            message, excerpt, ..
        } => {
            log::warn!("{message}");
            log::debug!("Response excerpt: {excerpt}");
            println!("{message}");
        }
        PipelineOutcome::Failed { error, .. } => return Err(error.into()),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use parcel_map_parcel_models::{BoundingBox, LatLng};
    use parcel_map_render::render;

    use super::*;

    fn args(bbox: Option<&str>, hide: Vec<CategoryGroup>) -> ExportArgs {
        ExportArgs {
            bbox: bbox.map(ToString::to_string),
            hide,
            format: ExportFormat::Geojson,
            output: PathBuf::from("parcels.geojson"),
        }
    }

    #[test]
    fn hidden_groups_are_turned_off() {
        let state = args(None, vec![CategoryGroup::Forest, CategoryGroup::FishFarm]).view_state();
        assert!(state.visibility.farmland);
        assert!(state.visibility.salt_field);
        assert!(!state.visibility.fish_farm);
        assert!(!state.visibility.forest);
    }

    #[test]
    fn bbox_becomes_viewport() {
        let state = args(Some("126.45,36.78,126.46,36.79"), Vec::new()).view_state();
        let viewport = state.viewport.unwrap();
        assert_eq!(viewport.south_west, LatLng::new(36.78, 126.45));
        assert_eq!(viewport.north_east, LatLng::new(36.79, 126.46));
    }

    #[test]
    fn invalid_bbox_uses_default_area() {
        let state = args(Some("not a bbox"), Vec::new()).view_state();
        assert!(state.viewport.is_none());
        assert_eq!(
            parcel_map_wfs::bbox::resolve(state.viewport.as_ref()),
            BoundingBox::FALLBACK
        );
    }

    #[test]
    fn encodes_empty_map_as_feature_collection() {
        let map = render(&[], &CategoryVisibility::default());
        let json: serde_json::Value =
            serde_json::from_str(&encode(&map, ExportFormat::Geojson).unwrap()).unwrap();
        assert_eq!(json["type"], "FeatureCollection");
        assert_eq!(json["features"].as_array().map(Vec::len), Some(0));
    }

    #[test]
    fn encodes_html_page() {
        let map = render(&[], &CategoryVisibility::default());
        let page = encode(&map, ExportFormat::Html).unwrap();
        assert!(page.contains("<title>Parcel Map</title>"));
    }
}

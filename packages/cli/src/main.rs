#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line entry point for the parcel map.
//!
//! `serve` starts the browser UI server; `export` runs the pipeline once
//! for a bounding box and writes the result as a standalone HTML map or a
//! `GeoJSON` file. Without a subcommand the user picks a tool
//! interactively.

mod export;

use clap::{Parser, Subcommand};
use dialoguer::Select;

use crate::export::ExportArgs;

#[derive(Parser)]
#[command(name = "parcel_map_cli", about = "Cadastral parcel map viewer")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the map server
    Serve,
    /// Fetch parcels for one bounding box and write them to a file
    Export(ExportArgs),
}

/// Tools offered by the interactive picker.
enum Tool {
    Server,
    Export,
}

impl Tool {
    const ALL: &[Self] = &[Self::Server, Self::Export];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Server => "Start server",
            Self::Export => "Export parcels to a file",
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve) => serve(false).await?,
        Some(Commands::Export(args)) => export::run(args).await?,
        None => {
            println!("Parcel Map");
            println!();

            let labels: Vec<&str> = Tool::ALL.iter().map(Tool::label).collect();

            let idx = Select::new()
                .with_prompt("What would you like to do?")
                .items(&labels)
                .default(0)
                .interact()?;

            match Tool::ALL[idx] {
                Tool::Server => serve(true).await?,
                Tool::Export => export::run(export::prompt()?).await?,
            }
        }
    }

    Ok(())
}

/// Runs the server on actix-web's own runtime.
async fn serve(interactive: bool) -> Result<(), Box<dyn std::error::Error>> {
    // The server uses actix-web's runtime, so it runs in a blocking task to
    // avoid nesting tokio runtimes.
    tokio::task::spawn_blocking(move || {
        actix_web::rt::System::new().block_on(async move {
            if interactive {
                parcel_map_server::interactive::run().await
            } else {
                parcel_map_server::run_server().await
            }
        })
    })
    .await??;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use parcel_map_parcel_models::CategoryGroup;

    use super::*;
    use crate::export::ExportFormat;

    #[test]
    fn parses_export_with_hidden_groups() {
        let cli = Cli::try_parse_from([
            "parcel_map_cli",
            "export",
            "--hide",
            "forest,fishFarm",
            "-o",
            "x",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Export(args)) => {
                assert_eq!(args.hide, [CategoryGroup::Forest, CategoryGroup::FishFarm]);
                assert_eq!(args.format, ExportFormat::Html);
                assert_eq!(args.output, PathBuf::from("x"));
                assert!(args.bbox.is_none());
            }
            _ => panic!("expected the export subcommand"),
        }
    }

    #[test]
    fn rejects_unknown_group() {
        assert!(
            Cli::try_parse_from(["parcel_map_cli", "export", "--hide", "desert", "-o", "x"])
                .is_err()
        );
    }

    #[test]
    fn no_subcommand_opens_picker() {
        let cli = Cli::try_parse_from(["parcel_map_cli"]).unwrap();
        assert!(cli.command.is_none());
        assert!(matches!(
            Cli::try_parse_from(["parcel_map_cli", "serve"]).unwrap().command,
            Some(Commands::Serve)
        ));
    }
}

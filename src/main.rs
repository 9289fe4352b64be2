pub mod config;
pub mod data;
pub mod error;
pub mod map;
pub mod names;
pub mod reconcile;
pub mod render;
pub mod simplify;
pub mod types;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the canonical state or district name for a label
    Match {
        /// `india`/`country` for states, `maharashtra`/`region` for districts
        #[arg(short, long)]
        domain: String,
        label: String,
    },
    /// Print the frame (bounds, extent, projection) of a supported map
    Frame {
        /// `india` or `maharashtra`
        name: String,
        #[arg(short, long, value_name = "DIR", default_value = "maps")]
        maps_dir: PathBuf,
    },
    /// Write one state's districts from the all-India shapefile
    ExtractState {
        #[arg(short, long, value_name = "FILE")]
        india: PathBuf,
        #[arg(short, long)]
        state: String,
        #[arg(short, long, value_name = "DIR", default_value = "maps")]
        out: PathBuf,
    },
    /// Build the choropleth layer described by a config file
    Build {
        #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
        config: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Match { domain, label } => {
            let name = names::closest_match_kind(label, domain)?;
            println!("{}", name);
        }
        Commands::Frame { name, maps_dir } => {
            if let Some(frame) = map::create_map(name, maps_dir)? {
                println!("{}", serde_json::to_string_pretty(&frame)?);
            }
        }
        Commands::ExtractState { india, state, out } => {
            let (path, written) = data::create_state_shapefile(india, state, out)?;
            println!("Wrote {} features to {:?}", written, path);
        }
        Commands::Build { config } => {
            let app_config = config::AppConfig::load_from_file(config)?;
            let domain = app_config.map.domain;
            info!(config = ?config, map = %domain, "building choropleth layer");

            // 1. Load geometry and measurements
            let features = data::load_features(&app_config.input.shapefile, domain)?;
            let table = data::load_data_table(
                &app_config.input.data_csv,
                &app_config.input.label_column,
                &app_config.input.value_column,
            )?;

            // 2. Match names, simplify, join
            let keep_ratio = app_config.simplify.keep_ratio;
            let mut layer = render::build_layer(domain, &features, &table, keep_ratio)?;
            let shapefile = app_config.input.shapefile.clone();
            layer.frame = map::feature_bounds(&features)
                .map(|bounds| map::MapFrame::new(domain, shapefile, bounds));

            // 3. Hand off to the renderer
            render::write_layer(&app_config.output.layer_json, &layer)?;

            println!("Build complete!");
        }
    }

    Ok(())
}

//! Waste Dashboard - Singapore Waste Management Analysis
//!
//! Interactive charts over Singapore's 2003-2017 waste statistics, with a
//! headless mode that exports every chart view to disk.

mod charts;
mod config;
mod content;
mod dashboard;
mod data;
mod export;
mod gui;
mod stats;

use anyhow::Context;
use clap::Parser;
use config::{Config, ConfigSource};
use dashboard::Selection;
use data::WasteLoader;
use eframe::egui;
use export::ReportExporter;
use gui::WasteDashboardApp;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "waste-dashboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Singapore waste management analysis dashboard")]
struct Args {
    /// CSV dataset (overrides the configured path)
    #[arg(long)]
    data: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write every chart view to DIR (default: the configured output_dir)
    /// as PNG and JSON, without opening a window
    #[arg(long, value_name = "DIR", num_args = 0..=1)]
    export: Option<Option<PathBuf>>,

    /// Waste type used by the line chart
    #[arg(long)]
    waste_type: Option<String>,

    /// Year used by the bar and stacked bar charts
    #[arg(long)]
    year: Option<i64>,

    /// Print a commented default configuration and exit
    #[arg(long)]
    print_default_config: bool,
}

fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("waste_dashboard={}", config.logging.level).into()
    });
    let json = config.logging.format.eq_ignore_ascii_case("json");

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .init();
}

fn run_headless(config: &Config, selection: Selection, dir: &Path) -> anyhow::Result<()> {
    let table = WasteLoader::load_csv(&config.data.csv_path)
        .with_context(|| format!("loading {}", config.data.csv_path.display()))?;
    let selection = selection.fill_unset(&table);

    let summary = ReportExporter::export_all(&table, &selection, dir, config.export.size())
        .with_context(|| format!("exporting to {}", dir.display()))?;

    tracing::info!(
        written = summary.written.len(),
        skipped = summary.skipped.len(),
        dir = %dir.display(),
        "export complete"
    );
    for path in &summary.written {
        println!("{}", path.display());
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_default_config {
        print!("{}", config::generate_default_config());
        return Ok(());
    }

    let (mut config, source) = Config::load_default(args.config.as_deref());
    if let Some(path) = args.data {
        config.data.csv_path = path;
    }

    init_logging(&config);
    tracing::info!("Starting Waste Dashboard v{}", env!("CARGO_PKG_VERSION"));
    match &source {
        ConfigSource::File(path) => tracing::info!(path = %path.display(), "loaded config"),
        ConfigSource::Defaults => tracing::info!("no config file found, using defaults"),
        ConfigSource::Fallback { path, error } => {
            tracing::warn!(path = %path.display(), %error, "invalid config, using defaults")
        }
    }

    let selection = Selection {
        waste_type: args.waste_type,
        year: args.year,
        ..Default::default()
    };

    if let Some(dir) = args.export {
        let dir = dir.unwrap_or_else(|| config.export.output_dir.clone());
        return run_headless(&config, selection, &dir);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window.width, config.window.height])
            .with_min_inner_size([1000.0, 650.0])
            .with_title("Waste Management Analysis"),
        ..Default::default()
    };

    eframe::run_native(
        "Waste Management Analysis",
        options,
        Box::new(move |cc| Ok(Box::new(WasteDashboardApp::new(cc, config, selection)))),
    )
    .map_err(|e| anyhow::anyhow!("window error: {}", e))
}

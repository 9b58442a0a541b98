mod app;
mod config;
mod idle;
mod scene;
mod util;

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use eframe::egui::Color32;

use config::{BackdropConfig, ConfigFile};
use idle::TaskPriority;
use util::parse_color;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON file with backdrop settings; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    node_count: Option<usize>,
    #[arg(long, value_parser = parse_color)]
    primary_color: Option<Color32>,
    #[arg(long, value_parser = parse_color)]
    secondary_color: Option<Color32>,
    #[arg(long, value_parser = parse_color)]
    connection_color: Option<Color32>,
    #[arg(long)]
    link_distance: Option<f32>,
    #[arg(long)]
    rain_columns: Option<usize>,
    #[arg(long)]
    max_fps: Option<f32>,
    #[arg(long)]
    show_fps: bool,
    /// Files to warm into the asset cache while idle
    #[arg(long, num_args = 1..)]
    preload: Vec<PathBuf>,
    #[arg(long, value_enum)]
    preload_priority: Option<TaskPriority>,
}

impl Args {
    fn into_config(self) -> Result<BackdropConfig> {
        let mut config = BackdropConfig::default();
        if let Some(path) = &self.config {
            ConfigFile::load(path)?.apply(&mut config);
            log::info!("loaded backdrop config from {}", path.display());
        }

        if let Some(value) = self.node_count {
            config.node_count = value;
        }
        if let Some(value) = self.primary_color {
            config.primary_color = value;
        }
        if let Some(value) = self.secondary_color {
            config.secondary_color = value;
        }
        if let Some(value) = self.connection_color {
            config.connection_color = value;
        }
        if let Some(value) = self.link_distance {
            config.link_distance = value;
        }
        if let Some(value) = self.rain_columns {
            config.rain_columns = value;
        }
        if self.max_fps.is_some() {
            config.max_fps = self.max_fps;
        }
        config.show_fps |= self.show_fps;
        config.preload.extend(self.preload);
        if let Some(value) = self.preload_priority {
            config.preload_priority = value;
        }

        config.validate().context("invalid backdrop configuration")?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Args::parse().into_config()?;
    log::info!(
        "starting backdrop with {} nodes and {} rain columns",
        config.node_count,
        config.rain_columns
    );

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "neural backdrop",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::BackdropApp::new(cc, config.clone())))
        }),
    )
    .map_err(|error| anyhow!("failed to run backdrop window: {error}"))
}

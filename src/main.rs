// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Guidebook - step-by-step illustrated guides
//!
//! A cross-platform desktop application for reading and editing guides made
//! of titled steps, bulleted instructions and marked-up images.

mod app;
mod config;
mod io;
mod models;
mod route;
mod ui;
mod util;

use anyhow::{Context, Result};
use app::GuideApp;
use route::Route;
use std::path::PathBuf;

const HELP: &str = "\
guidebook - view and edit illustrated guides

USAGE:
  guidebook [--config PATH] <SLUG> [edit]
  guidebook [--config PATH] <SLUG>/edit

OPTIONS:
  --config PATH   Settings file (default: platform config dir)
  --init-config   Write default settings to the settings file and exit
  -h, --help      Print help
";

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        print!("{HELP}");
        return Ok(());
    }
    let init_config = args.contains("--init-config");
    let config_path: Option<PathBuf> = args.opt_value_from_str("--config")?;
    let segments: Vec<String> = args
        .finish()
        .into_iter()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();
    let route = match segments.as_slice() {
        [single] => Route::parse(single),
        many => Route::from_segments(many),
    };

    if init_config {
        let path = config_path
            .or_else(config::default_config_path)
            .context("No config directory on this platform")?;
        config::save_to_path(&config::Config::default(), &path)?;
        println!("Wrote default settings to {}", path.display());
        return Ok(());
    }

    let config = config::load(config_path.as_deref()).context("Failed to load settings")?;
    log::info!("Opening route {:?} against {}", route.to_path(), config.api_origin);

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 800.0])
            .with_min_inner_size([640.0, 480.0])
            .with_title("Guidebook"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Guidebook",
        options,
        Box::new(move |cc| -> Result<Box<dyn eframe::App>, Box<dyn std::error::Error + Send + Sync>> {
            let app = GuideApp::new(&cc.egui_ctx, config, route)?;
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}

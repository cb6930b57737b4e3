pub mod config;
pub mod controller;
pub mod error;
pub mod ui;

use crate::config::QuicktestConfig;
use crate::controller::gilrs_backend::GilrsPlatform;
use crate::ui::QuicktestUI;
use color_eyre::{eyre::eyre, Result};
use eframe::egui;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    setup()?;

    let config = load_config()?;

    println!("Axis labels are only hints, they may not match your controller.");
    println!("Press F to fullscreen, ESC to close the program.");

    let platform = GilrsPlatform::create()
        .map_err(|e| eyre!("Failed to set up gamepad input: {}", e))?
        .initialize();

    info!("Starting monitor window");
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(config.window.title.clone())
            .with_inner_size([config.window.width, config.window.height])
            .with_resizable(true),
        ..Default::default()
    };

    let title = config.window.title.clone();
    eframe::run_native(
        &title,
        native_options,
        Box::new(move |cc| Ok(Box::new(QuicktestUI::new(cc, Box::new(platform), &config)))),
    )
    .map_err(|e| eyre!("Window error: {}", e))?;

    info!("Window closed, exiting");
    Ok(())
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    setup_logging_env();
    Ok(())
}

fn setup_logging_env() {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();
}

/// Reads the config file named by the first argument, or falls back to defaults.
fn load_config() -> Result<QuicktestConfig> {
    match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => Ok(QuicktestConfig::load(&path)?),
        None => {
            info!("No config file given, using defaults");
            Ok(QuicktestConfig::default())
        }
    }
}

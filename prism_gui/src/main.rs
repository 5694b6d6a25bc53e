mod app;
mod highlight_job;

use std::io;

use eframe::{egui, NativeOptions};
use prism_core::{EditorConfig, Launcher};
use prism_settings::AppPaths;
use tracing_subscriber::EnvFilter;

use crate::app::PrismApp;

const APP_TITLE: &str = "Prism Code Editor";

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("info"))
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> eframe::Result<()> {
    init_logging();

    let launcher = match AppPaths::current_dir()
        .map_err(|err| err.to_string())
        .and_then(|paths| {
            Launcher::load(&paths, EditorConfig::default()).map_err(|err| err.to_string())
        }) {
        Ok(launcher) => launcher,
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    };

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([360.0, 480.0])
            .with_title(APP_TITLE),
        ..Default::default()
    };
    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(move |_cc| Box::new(PrismApp::new(launcher))),
    )
}

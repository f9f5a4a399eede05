use std::path::PathBuf;

use quickimg_platform::{settings, startup};
use quickimg_ui::{AppConfig, QuickImgApp};

const DEFAULT_LOG_FILTER: &str =
    "quickimg=info,quickimg_ui=info,quickimg_core=info,quickimg_platform=info";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .init();

    let settings_path = parse_settings_arg().or_else(settings::default_path);
    let settings = match &settings_path {
        Some(path) => settings::load(path),
        None => {
            tracing::warn!("No config directory available, using default settings");
            Default::default()
        }
    };
    tracing::info!(
        hotkey = %settings.hotkey,
        min_scale = settings.min_scale,
        max_scale = settings.max_scale,
        run_at_startup = settings.run_at_startup,
        "settings loaded"
    );
    startup::apply(settings.run_at_startup);

    let config = AppConfig {
        settings,
        settings_path,
    };

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("QuickImgEditor")
            .with_inner_size([1000.0, 700.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "quickimg",
        native_options,
        Box::new(move |cc| Ok(Box::new(QuickImgApp::new(cc, config)))),
    ) {
        tracing::error!("Failed to start application: {e}");
    }
}

// --settings <path>
fn parse_settings_arg() -> Option<PathBuf> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--settings" {
            return args.next().map(PathBuf::from);
        }
    }
    None
}

//! Screenshot to PDF
//!
//! A desktop utility that captures the primary display on a global hotkey,
//! lets the user arrange the captures as thumbnails, and exports them two per
//! page into an A4 PDF.

// Hide console window on Windows in release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod capture;
mod collection;
mod export;
mod gui;
mod logging;
mod paths;
mod settings;

use anyhow::{anyhow, Context, Result};

use app::AppContext;
use capture::PrimaryMonitor;
use collection::ScreenshotCollection;
use settings::SettingsStore;

fn main() -> Result<()> {
    // Set up panic hook to log panics
    std::panic::set_hook(Box::new(|panic_info| {
        let msg = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        let location = panic_info
            .location()
            .map(|loc| format!(" at {}:{}:{}", loc.file(), loc.line(), loc.column()))
            .unwrap_or_default();
        log::error!("[PANIC]{} {}", location, msg);
    }));

    paths::ensure_directories().context("Failed to create log directory")?;
    logging::init(&paths::get_log_file());

    log::info!("Screenshot to PDF starting");
    log::info!("Executable directory: {}", paths::get_exe_dir().display());

    let settings = SettingsStore::load(&paths::get_settings_file());
    log::info!("Settings: {}", settings.path().display());
    let collection = ScreenshotCollection::new(paths::get_temp_screenshots_dir())
        .context("Failed to prepare the screenshot directory")?;
    log::info!("Screenshot directory: {}", collection.temp_dir().display());
    let context = AppContext::new(settings, collection, Box::new(PrimaryMonitor));

    match gui::run_gui(context) {
        Ok(()) => {
            log::info!("GUI application exited normally");
            Ok(())
        }
        Err(e) => {
            log::error!("GUI error: {}", e);
            Err(anyhow!("GUI error: {}", e))
        }
    }
}

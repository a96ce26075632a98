use std::path::PathBuf;
use std::sync::OnceLock;

static EXE_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Returns the directory containing the executable.
pub fn get_exe_dir() -> &'static PathBuf {
    EXE_DIR.get_or_init(|| {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
    })
}

/// Returns the logs directory: `<exe_dir>/logs/`
pub fn get_logs_dir() -> PathBuf {
    get_exe_dir().join("logs")
}

/// Returns the log file path: `<exe_dir>/logs/screenshot_to_pdf.log`
pub fn get_log_file() -> PathBuf {
    get_logs_dir().join("screenshot_to_pdf.log")
}

/// Returns the directory backing captured screenshots: `<exe_dir>/temp_screenshots/`
pub fn get_temp_screenshots_dir() -> PathBuf {
    get_exe_dir().join("temp_screenshots")
}

/// Returns the settings file path: `<exe_dir>/screenshot_settings.json`
pub fn get_settings_file() -> PathBuf {
    get_exe_dir().join("screenshot_settings.json")
}

/// Ensures the log directory exists. Call at startup, before logging is initialized.
///
/// The screenshot directory is owned by the collection, which creates it itself.
pub fn ensure_directories() -> std::io::Result<()> {
    std::fs::create_dir_all(get_logs_dir())
}

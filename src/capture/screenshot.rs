//! Full-display capture using `xcap`.

use image::RgbaImage;
use std::path::PathBuf;
use thiserror::Error;
use xcap::Monitor;

/// Something that can produce an image of the current display contents.
pub trait ScreenSource {
    fn grab(&self) -> Result<RgbaImage, CaptureError>;
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Failed to enumerate monitors: {0}")]
    MonitorEnumeration(String),

    #[error("No display available")]
    NoDisplay,

    #[error("Screen capture failed: {0}")]
    CaptureFailed(String),

    #[error("Failed to save screenshot to {path}: {source}")]
    Save {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// Captures the primary monitor, or the first monitor if none reports as primary.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrimaryMonitor;

impl ScreenSource for PrimaryMonitor {
    fn grab(&self) -> Result<RgbaImage, CaptureError> {
        let monitors =
            Monitor::all().map_err(|e| CaptureError::MonitorEnumeration(e.to_string()))?;
        log::debug!("Found {} monitor(s)", monitors.len());

        let mut fallback = None;
        let mut primary = None;
        for monitor in monitors {
            if monitor.is_primary().unwrap_or(false) {
                primary = Some(monitor);
                break;
            }
            if fallback.is_none() {
                fallback = Some(monitor);
            }
        }
        let monitor = primary.or(fallback).ok_or(CaptureError::NoDisplay)?;

        let image = monitor
            .capture_image()
            .map_err(|e| CaptureError::CaptureFailed(e.to_string()))?;
        log::debug!("Captured {}x{} display image", image.width(), image.height());

        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_error_display() {
        assert_eq!(CaptureError::NoDisplay.to_string(), "No display available");
        assert_eq!(
            CaptureError::CaptureFailed("denied".to_string()).to_string(),
            "Screen capture failed: denied"
        );

        let err = CaptureError::Save {
            path: PathBuf::from("shots/a.png"),
            source: image::ImageError::IoError(std::io::Error::other("disk full")),
        };
        assert!(err.to_string().starts_with("Failed to save screenshot to shots/a.png"));
    }
}

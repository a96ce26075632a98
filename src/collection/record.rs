//! Screenshot record types.

use chrono::{DateTime, Local};
use image::RgbaImage;
use std::path::{Path, PathBuf};

/// Thumbnails fit within a square of this many pixels.
pub const THUMBNAIL_SIZE: u32 = 150;

/// How a capture is written to disk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaptureOptions {
    /// Store as JPEG at `quality` instead of lossless PNG
    pub compress: bool,
    /// JPEG quality (1-100); ignored for PNG
    pub quality: u8,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            compress: false,
            quality: 95,
        }
    }
}

impl CaptureOptions {
    pub fn format(&self) -> StoredFormat {
        if self.compress {
            StoredFormat::Jpeg
        } else {
            StoredFormat::Png
        }
    }
}

/// File format of a record's backing file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoredFormat {
    Png,
    Jpeg,
}

impl StoredFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }
}

/// One captured screenshot.
///
/// The serial number travels with the record, so reordering can never
/// separate a screenshot from the number shown next to it.
#[derive(Debug)]
pub struct ScreenshotRecord {
    /// Unique for the life of the collection, unlike serial and path
    id: u64,
    storage_path: PathBuf,
    thumbnail: RgbaImage,
    captured_at: DateTime<Local>,
    serial: u32,
}

impl ScreenshotRecord {
    pub(crate) fn new(
        id: u64,
        storage_path: PathBuf,
        thumbnail: RgbaImage,
        captured_at: DateTime<Local>,
        serial: u32,
    ) -> Self {
        Self {
            id,
            storage_path,
            thumbnail,
            captured_at,
            serial,
        }
    }

    /// Identity that is never reused, even after `clear` restarts serials.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Full-resolution image on disk.
    pub fn storage_path(&self) -> &Path {
        &self.storage_path
    }

    pub fn thumbnail(&self) -> &RgbaImage {
        &self.thumbnail
    }

    pub fn captured_at(&self) -> DateTime<Local> {
        self.captured_at
    }

    pub fn serial(&self) -> u32 {
        self.serial
    }

    pub fn info(&self) -> ScreenshotInfo {
        ScreenshotInfo {
            path: self.storage_path.clone(),
            captured_at: self.captured_at,
            serial: self.serial,
        }
    }
}

/// Read-only view of a record, without the thumbnail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScreenshotInfo {
    pub path: PathBuf,
    pub captured_at: DateTime<Local>,
    pub serial: u32,
}

/// Size of the thumbnail for a `width`x`height` image.
///
/// Scales down to fit within `THUMBNAIL_SIZE` on both sides, keeping the
/// aspect ratio. Images that already fit are left at their own size.
pub fn thumbnail_dimensions(width: u32, height: u32) -> (u32, u32) {
    if width <= THUMBNAIL_SIZE && height <= THUMBNAIL_SIZE {
        return (width, height);
    }
    let scale = f64::min(
        THUMBNAIL_SIZE as f64 / width as f64,
        THUMBNAIL_SIZE as f64 / height as f64,
    );
    let scaled = |side: u32| ((side as f64 * scale).round() as u32).clamp(1, THUMBNAIL_SIZE);
    (scaled(width), scaled(height))
}

/// Renders the preview shown in the thumbnail grid.
pub fn make_thumbnail(image: &RgbaImage) -> RgbaImage {
    let (width, height) = thumbnail_dimensions(image.width(), image.height());
    if (width, height) == image.dimensions() {
        return image.clone();
    }
    image::imageops::thumbnail(image, width, height)
}

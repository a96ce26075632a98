//! Screenshot collection and backing-file lifecycle.
//!
//! Every record owns one file in the temporary screenshot directory. The file
//! is written on capture and deleted exactly once, when the record leaves the
//! collection through `remove`, `clear`, or when the collection is dropped.

use chrono::{Local, SubsecRound};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, RgbaImage};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::record::{make_thumbnail, CaptureOptions, ScreenshotInfo, ScreenshotRecord};
use crate::capture::{CaptureError, ScreenSource};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to create screenshot directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("Failed to delete {path}: {source}")]
    Delete { path: PathBuf, source: io::Error },
}

#[derive(Debug, Error)]
pub enum RemoveError {
    #[error("No screenshot at index {index} (collection has {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Ordered screenshots plus the next serial number to hand out.
#[derive(Debug)]
pub struct ScreenshotCollection {
    temp_dir: PathBuf,
    records: Vec<ScreenshotRecord>,
    next_serial: u32,
    /// Captures made so far; never reset
    captures: u64,
}

impl ScreenshotCollection {
    /// Opens the collection over `temp_dir`.
    ///
    /// The directory is created if missing. Files left over from a previous
    /// run are swept away.
    pub fn new(temp_dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let temp_dir = temp_dir.into();
        if temp_dir.is_dir() {
            sweep_dir(&temp_dir);
        } else {
            fs::create_dir_all(&temp_dir).map_err(|source| StorageError::CreateDir {
                path: temp_dir.clone(),
                source,
            })?;
        }

        Ok(Self {
            temp_dir,
            records: Vec::new(),
            next_serial: 1,
            captures: 0,
        })
    }

    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Serial number the next capture will receive.
    pub fn next_serial(&self) -> u32 {
        self.next_serial
    }

    /// Records in their current order.
    pub fn records(&self) -> &[ScreenshotRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScreenshotRecord> {
        self.records.iter()
    }

    /// Captures the display, stores it, and appends a new record.
    ///
    /// Returns the index of the new record. On failure nothing changes.
    pub fn capture(
        &mut self,
        source: &dyn ScreenSource,
        options: CaptureOptions,
    ) -> Result<usize, CaptureError> {
        let image = source.grab()?;
        let captured_at = Local::now().trunc_subsecs(0);
        let serial = self.next_serial;

        let filename = format!(
            "screenshot_{:04}_{}.{}",
            serial,
            captured_at.format("%Y%m%d_%H%M%S"),
            options.format().extension()
        );
        let path = self.temp_dir.join(filename);

        let thumbnail = make_thumbnail(&image);
        if let Err(source) = save_image(image, &path, options) {
            if path.exists() {
                let _ = fs::remove_file(&path);
            }
            return Err(CaptureError::Save { path, source });
        }

        log::info!("Screenshot #{} saved to {}", serial, path.display());
        self.captures += 1;
        self.records.push(ScreenshotRecord::new(
            self.captures,
            path,
            thumbnail,
            captured_at,
            serial,
        ));
        self.next_serial += 1;

        Ok(self.records.len() - 1)
    }

    /// Deletes the record at `index` and its backing file.
    ///
    /// An out-of-range index is an error and leaves the collection untouched,
    /// as does a failure to delete the file.
    pub fn remove(&mut self, index: usize) -> Result<(), RemoveError> {
        let len = self.records.len();
        let record = self
            .records
            .get(index)
            .ok_or(RemoveError::IndexOutOfRange { index, len })?;

        delete_backing_file(record.storage_path())?;
        let record = self.records.remove(index);
        log::info!("Removed screenshot #{}", record.serial());
        Ok(())
    }

    /// Deletes every record and resets serial numbering to 1.
    ///
    /// File deletion is best-effort: failures are logged and the remaining
    /// files are still deleted.
    pub fn clear(&mut self) {
        for record in self.records.drain(..) {
            if let Err(e) = delete_backing_file(record.storage_path()) {
                log::warn!("{}", e);
            }
        }
        self.next_serial = 1;
    }

    /// Moves the record at `old_index` to `new_index` with remove-then-insert
    /// semantics: when moving forward the record lands at `new_index - 1`.
    ///
    /// Requires `old_index < len` and `new_index <= len`; returns `false`
    /// without changing anything otherwise.
    pub fn reorder(&mut self, old_index: usize, new_index: usize) -> bool {
        let len = self.records.len();
        if old_index >= len || new_index > len {
            return false;
        }

        let insert_at = if new_index > old_index {
            new_index - 1
        } else {
            new_index
        };
        let record = self.records.remove(old_index);
        self.records.insert(insert_at, record);
        true
    }

    /// Moves the record at `from` so that it ends up at index `to`.
    pub fn move_to(&mut self, from: usize, to: usize) -> bool {
        if to >= self.records.len() {
            return false;
        }
        let new_index = if to > from { to + 1 } else { to };
        self.reorder(from, new_index)
    }

    pub fn get_info(&self, index: usize) -> Option<ScreenshotInfo> {
        self.records.get(index).map(ScreenshotRecord::info)
    }
}

impl Drop for ScreenshotCollection {
    fn drop(&mut self) {
        self.clear();
    }
}

fn save_image(
    image: RgbaImage,
    path: &Path,
    options: CaptureOptions,
) -> Result<(), image::ImageError> {
    if options.compress {
        let rgb = DynamicImage::ImageRgba8(image).to_rgb8();
        let mut bytes = Vec::new();
        JpegEncoder::new_with_quality(&mut bytes, options.quality).encode_image(&rgb)?;
        fs::write(path, bytes)?;
    } else {
        image.save_with_format(path, ImageFormat::Png)?;
    }
    Ok(())
}

/// Deletes `path`; a file that is already gone counts as deleted.
fn delete_backing_file(path: &Path) -> Result<(), StorageError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(StorageError::Delete {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Removes stray files from `dir`, logging anything that cannot be deleted.
fn sweep_dir(dir: &Path) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("Failed to read {}: {}", dir.display(), e);
            return;
        }
    };

    let mut swept = 0;
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        match fs::remove_file(&path) {
            Ok(()) => swept += 1,
            Err(e) => log::warn!("Failed to delete {}: {}", path.display(), e),
        }
    }
    if swept > 0 {
        log::info!("Swept {} stale file(s) from {}", swept, dir.display());
    }
}

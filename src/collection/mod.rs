//! The ordered collection of captured screenshots.
//!
//! This module provides:
//! - `ScreenshotRecord`, one captured image with its thumbnail, timestamp and serial
//! - `ScreenshotCollection`, which owns capture, removal, reordering and the
//!   backing files in the temporary screenshot directory

pub mod record;
pub mod store;

pub use record::{CaptureOptions, ScreenshotRecord, THUMBNAIL_SIZE};
pub use store::{RemoveError, ScreenshotCollection};

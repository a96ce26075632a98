//! Screen capture.
//!
//! This module provides:
//! - The `ScreenSource` trait the screenshot collection captures through
//! - `PrimaryMonitor`, the `xcap`-backed source used by the application
//! - `CaptureError`, shared by capture and by saving the captured file

pub mod screenshot;

pub use screenshot::{CaptureError, PrimaryMonitor, ScreenSource};

//! GUI state: status notices and thumbnail grid geometry.

use std::path::{Path, PathBuf};

/// Width of one grid cell: the thumbnail plus padding.
pub const CELL_WIDTH: f32 = 170.0;

/// Severity of a status line message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Warning,
    Error,
}

/// Message shown in the status line until the next one replaces it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

/// GUI-only state that is not part of the application context.
#[derive(Debug, Default)]
pub struct GuiState {
    /// Latest status message.
    pub notice: Option<Notice>,
    /// Set once the user confirmed quitting, so the next close goes through.
    pub exit_confirmed: bool,
}

impl GuiState {
    /// Replaces the status line, logging the message at a matching level.
    pub fn notify(&mut self, notice: Notice) {
        match notice.kind {
            NoticeKind::Info => log::info!("{}", notice.message),
            NoticeKind::Warning => log::warn!("{}", notice.message),
            NoticeKind::Error => log::error!("{}", notice.message),
        }
        self.notice = Some(notice);
    }
}

/// Number of thumbnails per row for a grid `width` pixels wide.
pub fn grid_columns(width: f32) -> usize {
    (((width - 20.0) / CELL_WIDTH).floor() as usize).max(1)
}

/// Appends `.pdf` unless the path already ends in it (any case).
pub fn with_pdf_extension(path: &Path) -> PathBuf {
    let has_pdf = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    if has_pdf {
        path.to_path_buf()
    } else {
        let mut name = path.as_os_str().to_owned();
        name.push(".pdf");
        PathBuf::from(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_columns() {
        assert_eq!(grid_columns(800.0), 4);
        assert_eq!(grid_columns(870.0), 5);
        assert_eq!(grid_columns(100.0), 1);
        assert_eq!(grid_columns(0.0), 1);
    }

    #[test]
    fn test_with_pdf_extension() {
        assert_eq!(
            with_pdf_extension(Path::new("/tmp/report")),
            PathBuf::from("/tmp/report.pdf")
        );
        assert_eq!(
            with_pdf_extension(Path::new("/tmp/report.PDF")),
            PathBuf::from("/tmp/report.PDF")
        );
        assert_eq!(
            with_pdf_extension(Path::new("/tmp/report.v2")),
            PathBuf::from("/tmp/report.v2.pdf")
        );
    }

    #[test]
    fn test_notify_replaces_notice() {
        let mut state = GuiState::default();
        state.notify(Notice::info("first"));
        state.notify(Notice::error("second"));
        assert_eq!(state.notice, Some(Notice::error("second")));
    }
}

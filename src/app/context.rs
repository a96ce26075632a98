//! Application context: the single owner of settings, screenshots and
//! selection.
//!
//! Constructed once at startup and owned by the GUI. Every user action,
//! whether it comes from a button, a key, a drag or a global hotkey, ends up
//! as a call on this type.

use std::path::Path;

use crate::capture::{CaptureError, ScreenSource};
use crate::collection::{CaptureOptions, RemoveError, ScreenshotCollection};
use crate::export::{export_pdf, ExportError, ExportSummary};
use crate::settings::{Settings, SettingsError, SettingsStore};

/// Direction for keyboard moves within the thumbnail grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveDirection {
    Left,
    Right,
    Up,
    Down,
}

pub struct AppContext {
    settings: SettingsStore,
    collection: ScreenshotCollection,
    source: Box<dyn ScreenSource>,
    selected: Option<usize>,
    /// Thumbnails per grid row, as last laid out by the GUI
    columns: usize,
}

impl AppContext {
    pub fn new(
        settings: SettingsStore,
        collection: ScreenshotCollection,
        source: Box<dyn ScreenSource>,
    ) -> Self {
        Self {
            settings,
            collection,
            source,
            selected: None,
            columns: 5,
        }
    }

    pub fn settings(&self) -> &Settings {
        self.settings.settings()
    }

    pub fn collection(&self) -> &ScreenshotCollection {
        &self.collection
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn set_columns(&mut self, columns: usize) {
        self.columns = columns.max(1);
    }

    /// Captures the display with the current compression settings.
    pub fn take_screenshot(&mut self) -> Result<usize, CaptureError> {
        let settings = self.settings.settings();
        let options = CaptureOptions {
            compress: settings.compress,
            quality: settings.quality,
        };
        self.collection.capture(self.source.as_ref(), options)
    }

    /// Exports the screenshots in their current order.
    pub fn save_pdf(&self, destination: &Path) -> Result<ExportSummary, ExportError> {
        export_pdf(self.collection.records(), destination)
    }

    pub fn set_compress(&mut self, compress: bool) -> Result<(), SettingsError> {
        self.settings.update(|s| s.compress = compress)
    }

    pub fn select(&mut self, index: usize) {
        if index < self.collection.len() {
            self.selected = Some(index);
        }
    }

    /// Removes the screenshot at `index`, keeping the selection on the same
    /// screenshot when it survives.
    pub fn remove(&mut self, index: usize) -> Result<(), RemoveError> {
        self.collection.remove(index)?;
        self.selected = match self.selected {
            Some(selected) if index < selected => Some(selected - 1),
            Some(selected) if index == selected => None,
            other => other,
        };
        Ok(())
    }

    /// Removes the selected screenshot. Returns `false` if nothing is selected.
    pub fn remove_selected(&mut self) -> Result<bool, RemoveError> {
        match self.selected {
            Some(index) => self.remove(index).map(|()| true),
            None => Ok(false),
        }
    }

    pub fn clear(&mut self) {
        self.collection.clear();
        self.selected = None;
    }

    /// Moves the selected thumbnail one cell in `direction`, where up and
    /// down jump a whole grid row. The selection follows the thumbnail.
    pub fn move_selected(&mut self, direction: MoveDirection) -> bool {
        let Some(from) = self.selected else {
            return false;
        };
        let len = self.collection.len();
        let target = match direction {
            MoveDirection::Left => from.checked_sub(1),
            MoveDirection::Right => Some(from + 1).filter(|&to| to < len),
            MoveDirection::Up => from.checked_sub(self.columns),
            MoveDirection::Down => Some(from + self.columns).filter(|&to| to < len),
        };

        match target {
            Some(to) if self.collection.move_to(from, to) => {
                self.selected = Some(to);
                true
            }
            _ => false,
        }
    }

    /// Handles a thumbnail dragged from `from` and dropped on grid slot
    /// `slot` (`slot == len` drops after the last thumbnail).
    pub fn drop_onto(&mut self, from: usize, slot: usize) -> bool {
        if from == slot || !self.collection.reorder(from, slot) {
            return false;
        }
        self.selected = Some(if slot > from { slot - 1 } else { slot });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::store::tests::SolidSource;
    use tempfile::{tempdir, TempDir};

    fn context_with(count: usize) -> (TempDir, AppContext) {
        let dir = tempdir().unwrap();
        let settings = SettingsStore::load(&dir.path().join("settings.json"));
        let collection = ScreenshotCollection::new(dir.path().join("shots")).unwrap();
        let source = Box::new(SolidSource {
            width: 64,
            height: 48,
        });
        let mut context = AppContext::new(settings, collection, source);
        for _ in 0..count {
            context.take_screenshot().unwrap();
        }
        (dir, context)
    }

    fn serials(context: &AppContext) -> Vec<u32> {
        context.collection().iter().map(|r| r.serial()).collect()
    }

    #[test]
    fn test_take_screenshot_uses_compress_setting() {
        let (_dir, mut context) = context_with(1);
        context.set_compress(true).unwrap();
        context.take_screenshot().unwrap();

        let records = context.collection().records();
        assert_eq!(records[0].storage_path().extension().unwrap(), "png");
        assert_eq!(records[1].storage_path().extension().unwrap(), "jpg");
        assert!(context.settings().compress);
    }

    #[test]
    fn test_select_ignores_out_of_range() {
        let (_dir, mut context) = context_with(2);
        context.select(5);
        assert_eq!(context.selected(), None);
        context.select(1);
        assert_eq!(context.selected(), Some(1));
    }

    #[test]
    fn test_remove_adjusts_selection() {
        let (_dir, mut context) = context_with(4);

        context.select(2);
        context.remove(0).unwrap();
        assert_eq!(context.selected(), Some(1));

        context.remove(2).unwrap();
        assert_eq!(context.selected(), Some(1));

        context.remove(1).unwrap();
        assert_eq!(context.selected(), None);
        assert_eq!(serials(&context), vec![2]);
    }

    #[test]
    fn test_remove_out_of_range_keeps_selection() {
        let (_dir, mut context) = context_with(3);
        context.select(1);

        assert!(context.remove(7).is_err());
        assert_eq!(context.selected(), Some(1));
        assert_eq!(serials(&context), vec![1, 2, 3]);
    }

    #[test]
    fn test_remove_selected() {
        let (_dir, mut context) = context_with(2);
        assert!(!context.remove_selected().unwrap());

        context.select(0);
        assert!(context.remove_selected().unwrap());
        assert_eq!(serials(&context), vec![2]);
        assert_eq!(context.selected(), None);
    }

    #[test]
    fn test_move_selected_left_and_right() {
        let (_dir, mut context) = context_with(3);
        context.select(0);

        assert!(!context.move_selected(MoveDirection::Left));
        assert!(context.move_selected(MoveDirection::Right));
        assert_eq!(serials(&context), vec![2, 1, 3]);
        assert_eq!(context.selected(), Some(1));

        assert!(context.move_selected(MoveDirection::Right));
        assert_eq!(serials(&context), vec![2, 3, 1]);
        assert!(!context.move_selected(MoveDirection::Right));

        assert!(context.move_selected(MoveDirection::Left));
        assert_eq!(serials(&context), vec![2, 1, 3]);
        assert_eq!(context.selected(), Some(1));
    }

    #[test]
    fn test_move_selected_by_rows() {
        let (_dir, mut context) = context_with(5);
        context.set_columns(2);
        context.select(0);

        assert!(!context.move_selected(MoveDirection::Up));
        assert!(context.move_selected(MoveDirection::Down));
        assert_eq!(serials(&context), vec![2, 3, 1, 4, 5]);
        assert_eq!(context.selected(), Some(2));

        assert!(context.move_selected(MoveDirection::Down));
        assert_eq!(serials(&context), vec![2, 3, 4, 5, 1]);
        assert!(!context.move_selected(MoveDirection::Down));

        assert!(context.move_selected(MoveDirection::Up));
        assert_eq!(serials(&context), vec![2, 3, 1, 4, 5]);
    }

    #[test]
    fn test_move_without_selection() {
        let (_dir, mut context) = context_with(3);
        assert!(!context.move_selected(MoveDirection::Right));
        assert_eq!(serials(&context), vec![1, 2, 3]);
    }

    #[test]
    fn test_drop_onto() {
        let (_dir, mut context) = context_with(4);

        // drop #1 onto the slot of #3: lands just before it
        assert!(context.drop_onto(0, 2));
        assert_eq!(serials(&context), vec![2, 1, 3, 4]);
        assert_eq!(context.selected(), Some(1));

        // drop after the last thumbnail
        assert!(context.drop_onto(0, 4));
        assert_eq!(serials(&context), vec![1, 3, 4, 2]);
        assert_eq!(context.selected(), Some(3));

        assert!(context.drop_onto(3, 0));
        assert_eq!(serials(&context), vec![2, 1, 3, 4]);
        assert_eq!(context.selected(), Some(0));

        assert!(!context.drop_onto(1, 1));
        assert!(!context.drop_onto(0, 9));
    }

    #[test]
    fn test_clear_resets_selection() {
        let (_dir, mut context) = context_with(3);
        context.select(2);

        context.clear();

        assert!(context.collection().is_empty());
        assert_eq!(context.selected(), None);
    }

    #[test]
    fn test_save_pdf() {
        let (dir, context) = context_with(3);
        let output = dir.path().join("shots.pdf");

        let summary = context.save_pdf(&output).unwrap();

        assert_eq!(summary, ExportSummary { pages: 2, images: 3 });
        assert!(output.exists());
    }
}

//! GUI rendering functions.
//!
//! Each panel draws itself and reports what the user clicked; the app acts on
//! the result after drawing.

use std::collections::HashMap;

use eframe::egui::{self, Color32, RichText, Sense, Stroke, TextureHandle, Vec2};

use super::state::{Notice, NoticeKind};
use crate::collection::{ScreenshotCollection, ScreenshotRecord, THUMBNAIL_SIZE};
use crate::settings::Settings;

/// Something the user did to a thumbnail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GridEvent {
    Select(usize),
    Remove(usize),
    /// A thumbnail was dragged from `from` and dropped on grid slot `slot`.
    Drop { from: usize, slot: usize },
}

/// Clicks in the bottom button row.
#[derive(Clone, Copy, Debug, Default)]
pub struct ActionClicks {
    pub take_screenshot: bool,
    pub save_pdf: bool,
    pub clear: bool,
}

/// Render the configured global shortcuts.
pub fn render_shortcuts(ui: &mut egui::Ui, settings: &Settings) {
    ui.group(|ui| {
        ui.label(RichText::new("Keyboard Shortcuts").strong());
        ui.horizontal(|ui| {
            let shortcuts = &settings.shortcuts;
            ui.label(format!("Take Screenshot: {}", shortcuts.take_screenshot));
            ui.add_space(10.0);
            ui.label(format!("Save PDF: {}", shortcuts.save_pdf));
            ui.add_space(10.0);
            ui.label(format!("Exit: {}", shortcuts.exit));
        });
    });
}

/// Render the options panel. Returns the new compress value if toggled.
pub fn render_options(ui: &mut egui::Ui, settings: &Settings) -> Option<bool> {
    let mut compress = settings.compress;
    let mut changed = false;

    ui.group(|ui| {
        ui.label(RichText::new("Options").strong());
        changed = ui
            .checkbox(&mut compress, "Compress Screenshots")
            .changed();
    });

    changed.then_some(compress)
}

/// Render the thumbnail grid.
///
/// Thumbnails can be clicked to select, dragged onto another thumbnail to
/// move in front of it, or dragged onto the trailing drop zone to move to
/// the end.
pub fn render_thumbnails(
    ui: &mut egui::Ui,
    records: &[ScreenshotRecord],
    textures: &HashMap<u64, TextureHandle>,
    selected: Option<usize>,
    columns: usize,
) -> Option<GridEvent> {
    let mut event = None;

    if records.is_empty() {
        ui.label(RichText::new("No screenshots yet").color(Color32::GRAY));
        return None;
    }

    egui::Grid::new("thumbnail_grid")
        .spacing([10.0, 10.0])
        .show(ui, |ui| {
            for (index, record) in records.iter().enumerate() {
                let id = egui::Id::new(("thumbnail", record.id()));
                let egui::InnerResponse { inner, response } =
                    ui.dnd_drag_source(id, index, |ui| {
                        render_cell(ui, record, textures, selected == Some(index))
                    });

                match inner {
                    Some(CellClick::Select) => event = Some(GridEvent::Select(index)),
                    Some(CellClick::Remove) => event = Some(GridEvent::Remove(index)),
                    None => {}
                }
                if let Some(from) = response.dnd_release_payload::<usize>() {
                    event = Some(GridEvent::Drop {
                        from: *from,
                        slot: index,
                    });
                }

                if (index + 1) % columns == 0 {
                    ui.end_row();
                }
            }

            let frame = egui::Frame::default().inner_margin(4.0);
            let (_, payload) = ui.dnd_drop_zone::<usize, ()>(frame, |ui| {
                ui.set_min_size(Vec2::splat(THUMBNAIL_SIZE as f32));
                ui.centered_and_justified(|ui| {
                    ui.label(RichText::new("Drop here to move to end").color(Color32::GRAY));
                });
            });
            if let Some(from) = payload {
                event = Some(GridEvent::Drop {
                    from: *from,
                    slot: records.len(),
                });
            }
        });

    event
}

#[derive(Clone, Copy, Debug)]
enum CellClick {
    Select,
    Remove,
}

/// Draws one thumbnail cell and reports a click on it, if any.
fn render_cell(
    ui: &mut egui::Ui,
    record: &ScreenshotRecord,
    textures: &HashMap<u64, TextureHandle>,
    is_selected: bool,
) -> Option<CellClick> {
    let stroke = if is_selected {
        Stroke::new(2.0, Color32::from_rgb(0, 120, 200))
    } else {
        Stroke::new(1.0, Color32::from_gray(160))
    };
    let size = Vec2::splat(THUMBNAIL_SIZE as f32);
    let mut click = None;

    egui::Frame::default()
        .stroke(stroke)
        .inner_margin(4.0)
        .show(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.label(format!("#{}", record.serial()));

                let image_response = match textures.get(&record.id()) {
                    Some(texture) => ui.add(
                        egui::Image::new(texture)
                            .max_size(size)
                            .sense(Sense::click()),
                    ),
                    None => {
                        let (rect, response) = ui.allocate_exact_size(size, Sense::click());
                        ui.painter().rect_filled(rect, 4.0, Color32::from_gray(200));
                        response
                    }
                };
                let image_response = image_response.on_hover_text(format!(
                    "Captured {}",
                    record.captured_at().format("%Y-%m-%d %H:%M:%S")
                ));
                if image_response.clicked() {
                    click = Some(CellClick::Select);
                }

                if ui.button("Remove").clicked() {
                    click = Some(CellClick::Remove);
                }
            });
        });

    click
}

/// Render the action buttons (Take Screenshot, Save PDF, Clear All).
pub fn render_actions(ui: &mut egui::Ui, has_screenshots: bool) -> ActionClicks {
    let mut clicks = ActionClicks::default();

    ui.horizontal(|ui| {
        if ui.button(RichText::new("Take Screenshot").size(16.0)).clicked() {
            clicks.take_screenshot = true;
        }

        ui.add_space(10.0);

        if ui.button(RichText::new("Save PDF").size(16.0)).clicked() {
            clicks.save_pdf = true;
        }

        ui.add_space(10.0);

        ui.add_enabled_ui(has_screenshots, |ui| {
            if ui.button(RichText::new("Clear All").size(16.0)).clicked() {
                clicks.clear = true;
            }
        });
    });

    clicks
}

/// Render the status line.
pub fn render_status(
    ui: &mut egui::Ui,
    notice: Option<&Notice>,
    collection: &ScreenshotCollection,
) {
    ui.horizontal(|ui| {
        ui.label(format!(
            "{} screenshot(s), next #{}",
            collection.len(),
            collection.next_serial()
        ));

        if let Some(notice) = notice {
            ui.separator();
            let color = match notice.kind {
                NoticeKind::Info => Color32::from_rgb(0, 150, 0),
                NoticeKind::Warning => Color32::from_rgb(200, 150, 0),
                NoticeKind::Error => Color32::from_rgb(200, 0, 0),
            };
            ui.label(RichText::new(&notice.message).color(color));
        }
    });
}

//! GUI module for the application.
//!
//! Provides the eframe window: shortcut and option panels, the thumbnail
//! grid, action buttons and a status line. Global hotkey actions arrive
//! through the task queue and are run here on the GUI thread.

pub mod render;
pub mod state;

use std::collections::HashMap;

use eframe::egui::{self, Key, TextureHandle, Vec2, ViewportCommand};
use rfd::{MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};

use crate::app::{
    create_task_queue, AppAction, AppContext, HotkeyListener, MoveDirection, TaskQueue,
    TASK_QUEUE_CAPACITY,
};

use render::GridEvent;
use state::{grid_columns, with_pdf_extension, GuiState, Notice};

/// Main GUI application struct.
pub struct ScreenshotApp {
    context: AppContext,
    state: GuiState,
    /// Actions queued by the hotkey listener.
    tasks: TaskQueue,
    /// Kept alive so the hotkeys stay registered.
    _hotkeys: Option<HotkeyListener>,
    /// Thumbnail textures keyed by record id.
    textures: HashMap<u64, TextureHandle>,
}

impl ScreenshotApp {
    /// Create a new GUI application instance and start listening for hotkeys.
    pub fn new(cc: &eframe::CreationContext<'_>, context: AppContext) -> Self {
        let mut state = GuiState::default();
        let (sender, tasks) = create_task_queue(TASK_QUEUE_CAPACITY);

        let egui_ctx = cc.egui_ctx.clone();
        let hotkeys = match HotkeyListener::start(
            &context.settings().shortcuts,
            sender,
            move || egui_ctx.request_repaint(),
        ) {
            Ok(listener) => {
                if listener.registered_count() == 0 {
                    state.notify(Notice::warning("No global hotkeys could be registered"));
                }
                Some(listener)
            }
            Err(e) => {
                state.notify(Notice::warning(format!("Global hotkeys disabled: {}", e)));
                None
            }
        };

        Self {
            context,
            state,
            tasks,
            _hotkeys: hotkeys,
            textures: HashMap::new(),
        }
    }

    /// Uploads thumbnails for new screenshots and drops textures of removed ones.
    fn sync_textures(&mut self, ctx: &egui::Context) {
        let collection = self.context.collection();
        self.textures
            .retain(|id, _| collection.iter().any(|r| r.id() == *id));

        for record in collection.iter() {
            if self.textures.contains_key(&record.id()) {
                continue;
            }
            let thumbnail = record.thumbnail();
            let size = [thumbnail.width() as usize, thumbnail.height() as usize];
            let color_image = egui::ColorImage::from_rgba_unmultiplied(size, thumbnail.as_raw());
            let texture = ctx.load_texture(
                format!("thumbnail_{}", record.id()),
                color_image,
                egui::TextureOptions::LINEAR,
            );
            self.textures.insert(record.id(), texture);
        }
    }

    /// Runs one queued hotkey action.
    fn handle_action(&mut self, ctx: &egui::Context, action: AppAction) {
        log::debug!("Running {:?}", action);
        match action {
            AppAction::TakeScreenshot => self.handle_take_screenshot(),
            AppAction::SavePdf => self.handle_save_pdf(),
            AppAction::Exit => self.handle_exit(ctx),
        }
    }

    /// Handle take screenshot button click or hotkey.
    fn handle_take_screenshot(&mut self) {
        match self.context.take_screenshot() {
            Ok(index) => {
                let serial = self.context.collection().records()[index].serial();
                self.state
                    .notify(Notice::info(format!("Captured screenshot #{}", serial)));
            }
            Err(e) => {
                self.state
                    .notify(Notice::error(format!("Failed to take screenshot: {}", e)));
            }
        }
    }

    /// Handle save PDF button click or hotkey.
    fn handle_save_pdf(&mut self) {
        if self.context.collection().is_empty() {
            self.state.notify(Notice::warning("No screenshots to save!"));
            return;
        }

        let mut dialog = rfd::FileDialog::new()
            .set_title("Save PDF")
            .add_filter("PDF files", &["pdf"])
            .set_file_name("screenshots.pdf");
        if let Some(documents) = dirs::document_dir() {
            dialog = dialog.set_directory(documents);
        }
        let Some(chosen) = dialog.save_file() else {
            log::debug!("Save PDF cancelled");
            return;
        };

        let destination = with_pdf_extension(&chosen);
        match self.context.save_pdf(&destination) {
            Ok(summary) => self.state.notify(Notice::info(format!(
                "PDF saved to {} ({} page(s), {} screenshot(s))",
                destination.display(),
                summary.pages,
                summary.images
            ))),
            Err(e) => self
                .state
                .notify(Notice::error(format!("Failed to save PDF: {}", e))),
        }
    }

    /// Handle clear all button click.
    fn handle_clear(&mut self) {
        if confirm("Confirm", "Are you sure you want to clear all screenshots?") {
            self.context.clear();
            self.textures.clear();
            self.state.notify(Notice::info("Cleared all screenshots"));
        }
    }

    /// Handle the exit hotkey: ask, then close the window.
    fn handle_exit(&mut self, ctx: &egui::Context) {
        if confirm("Quit", "Do you want to quit?") {
            self.state.exit_confirmed = true;
            ctx.send_viewport_cmd(ViewportCommand::Close);
        }
    }

    /// Handle the window's close button.
    fn handle_close_request(&mut self, ctx: &egui::Context) {
        if !ctx.input(|i| i.viewport().close_requested()) || self.state.exit_confirmed {
            return;
        }
        if confirm("Quit", "Do you want to quit?") {
            self.state.exit_confirmed = true;
        } else {
            ctx.send_viewport_cmd(ViewportCommand::CancelClose);
        }
    }

    /// Arrow keys move the selected thumbnail, Delete removes it.
    fn handle_keys(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }

        let (direction, delete) = ctx.input(|i| {
            let direction = if i.key_pressed(Key::ArrowLeft) {
                Some(MoveDirection::Left)
            } else if i.key_pressed(Key::ArrowRight) {
                Some(MoveDirection::Right)
            } else if i.key_pressed(Key::ArrowUp) {
                Some(MoveDirection::Up)
            } else if i.key_pressed(Key::ArrowDown) {
                Some(MoveDirection::Down)
            } else {
                None
            };
            (direction, i.key_pressed(Key::Delete))
        });

        if let Some(direction) = direction {
            self.context.move_selected(direction);
        }
        if delete {
            if let Err(e) = self.context.remove_selected() {
                self.state
                    .notify(Notice::error(format!("Failed to remove screenshot: {}", e)));
            }
        }
    }

    fn handle_grid_event(&mut self, event: GridEvent) {
        match event {
            GridEvent::Select(index) => {
                self.context.select(index);
                if let Some(info) = self.context.collection().get_info(index) {
                    log::debug!(
                        "Selected #{} captured {} ({})",
                        info.serial,
                        info.captured_at.format("%Y-%m-%d %H:%M:%S"),
                        info.path.display()
                    );
                }
            }
            GridEvent::Remove(index) => {
                if let Err(e) = self.context.remove(index) {
                    self.state
                        .notify(Notice::error(format!("Failed to remove screenshot: {}", e)));
                }
            }
            GridEvent::Drop { from, slot } => {
                if self.context.drop_onto(from, slot) {
                    log::debug!("Moved screenshot {} to slot {}", from, slot);
                }
            }
        }
    }

    fn handle_compress_toggle(&mut self, compress: bool) {
        if let Err(e) = self.context.set_compress(compress) {
            self.state
                .notify(Notice::error(format!("Failed to save settings: {}", e)));
        }
    }
}

impl eframe::App for ScreenshotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        for action in self.tasks.drain() {
            self.handle_action(ctx, action);
        }
        self.handle_close_request(ctx);
        self.handle_keys(ctx);
        self.sync_textures(ctx);

        let mut clicks = render::ActionClicks::default();
        egui::TopBottomPanel::bottom("actions").show(ctx, |ui| {
            ui.add_space(8.0);
            clicks = render::render_actions(ui, !self.context.collection().is_empty());
            ui.add_space(4.0);
            render::render_status(ui, self.state.notice.as_ref(), self.context.collection());
            ui.add_space(4.0);
        });

        let mut compress_change = None;
        let mut grid_event = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            render::render_shortcuts(ui, self.context.settings());
            ui.add_space(8.0);
            compress_change = render::render_options(ui, self.context.settings());
            ui.add_space(8.0);
            ui.separator();

            self.context.set_columns(grid_columns(ui.available_width()));
            egui::ScrollArea::vertical().show(ui, |ui| {
                grid_event = render::render_thumbnails(
                    ui,
                    self.context.collection().records(),
                    &self.textures,
                    self.context.selected(),
                    self.context.columns(),
                );
            });
        });

        if let Some(compress) = compress_change {
            self.handle_compress_toggle(compress);
        }
        if let Some(event) = grid_event {
            self.handle_grid_event(event);
        }
        if clicks.take_screenshot {
            self.handle_take_screenshot();
        }
        if clicks.save_pdf {
            self.handle_save_pdf();
        }
        if clicks.clear {
            self.handle_clear();
        }
    }
}

/// Shows a blocking yes/no dialog.
fn confirm(title: &str, description: &str) -> bool {
    let result = MessageDialog::new()
        .set_level(MessageLevel::Warning)
        .set_title(title)
        .set_description(description)
        .set_buttons(MessageButtons::YesNo)
        .show();
    result == MessageDialogResult::Yes
}

/// Run the GUI application.
/// This function blocks until the window is closed.
pub fn run_gui(context: AppContext) -> eframe::Result<()> {
    log::info!("GUI: Starting window");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(Vec2::new(800.0, 600.0))
            .with_min_inner_size(Vec2::new(400.0, 400.0))
            .with_title("Screenshot to PDF"),
        ..Default::default()
    };

    eframe::run_native(
        "Screenshot to PDF",
        options,
        Box::new(|cc| Ok(Box::new(ScreenshotApp::new(cc, context)))),
    )
}

//! Global hotkeys.
//!
//! Shortcut strings from the settings file are registered with
//! `global-hotkey`. A background thread watches hotkey events and turns
//! presses into `AppAction`s on the task queue. It never touches
//! application state itself.

use global_hotkey::hotkey::HotKey;
use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState};
use std::collections::HashMap;
use std::thread;
use thiserror::Error;

use super::tasks::{AppAction, SubmitError, TaskSender};
use crate::settings::Shortcuts;

#[derive(Debug, Error)]
pub enum HotkeyError {
    #[error("Empty shortcut")]
    Empty,

    #[error("Invalid shortcut \"{spec}\": {reason}")]
    Parse { spec: String, reason: String },

    #[error("Global hotkeys unavailable: {0}")]
    Manager(String),

    #[error("Failed to start hotkey listener: {0}")]
    Thread(#[from] std::io::Error),
}

/// Parses a shortcut such as `ctrl+s`, `esc` or `print_screen`.
///
/// Tokens are joined with `+` and are case-insensitive. Underscores and
/// spaces inside a token are ignored.
pub fn parse_shortcut(spec: &str) -> Result<HotKey, HotkeyError> {
    let normalized = normalize_shortcut(spec);
    if normalized.is_empty() {
        return Err(HotkeyError::Empty);
    }
    normalized
        .parse::<HotKey>()
        .map_err(|e| HotkeyError::Parse {
            spec: spec.to_string(),
            reason: e.to_string(),
        })
}

fn normalize_shortcut(spec: &str) -> String {
    let tokens: Vec<String> = spec
        .split('+')
        .map(|token| {
            let token: String = token
                .chars()
                .filter(|c| !c.is_whitespace() && *c != '_')
                .collect::<String>()
                .to_lowercase();
            match token.as_str() {
                "win" | "windows" | "meta" => "super".to_string(),
                _ => token,
            }
        })
        .collect();

    if tokens.iter().all(String::is_empty) {
        String::new()
    } else {
        tokens.join("+")
    }
}

/// Maps registered hotkey ids to the action they trigger.
#[derive(Clone, Debug, Default)]
pub struct HotkeyBindings {
    actions: HashMap<u32, AppAction>,
}

impl HotkeyBindings {
    pub fn insert(&mut self, hotkey: &HotKey, action: AppAction) {
        self.actions.insert(hotkey.id(), action);
    }

    pub fn action_for(&self, id: u32) -> Option<AppAction> {
        self.actions.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }
}

/// Forwards hotkey presses to the task queue until the queue closes.
///
/// `wake` is called after each queued action so the GUI can pick it up.
fn forward_presses(
    events: impl IntoIterator<Item = (u32, HotKeyState)>,
    bindings: &HotkeyBindings,
    tasks: &TaskSender,
    wake: &dyn Fn(),
) {
    for (id, state) in events {
        if state != HotKeyState::Pressed {
            continue;
        }
        let Some(action) = bindings.action_for(id) else {
            continue;
        };

        match tasks.submit(action) {
            Ok(()) => {
                log::debug!("Hotkey queued {:?}", action);
                wake();
            }
            Err(e @ SubmitError::Full(_)) => log::warn!("{}", e),
            Err(SubmitError::Closed) => {
                log::info!("Task queue closed, hotkey listener exiting");
                return;
            }
        }
    }
}

/// Registered global hotkeys plus the thread listening for them.
///
/// The hotkeys are unregistered on drop; the detached listener thread exits
/// on the next press once the task queue is gone.
pub struct HotkeyListener {
    manager: GlobalHotKeyManager,
    registered: Vec<HotKey>,
}

impl HotkeyListener {
    /// Registers `shortcuts` and starts the listener thread.
    ///
    /// Must be called on the main thread. Shortcuts that fail to parse or
    /// register are logged and skipped.
    pub fn start(
        shortcuts: &Shortcuts,
        tasks: TaskSender,
        wake: impl Fn() + Send + 'static,
    ) -> Result<Self, HotkeyError> {
        let manager =
            GlobalHotKeyManager::new().map_err(|e| HotkeyError::Manager(e.to_string()))?;

        let mut bindings = HotkeyBindings::default();
        let mut registered = Vec::new();
        let wanted = [
            (AppAction::TakeScreenshot, &shortcuts.take_screenshot),
            (AppAction::SavePdf, &shortcuts.save_pdf),
            (AppAction::Exit, &shortcuts.exit),
        ];
        for (action, spec) in wanted {
            let hotkey = match parse_shortcut(spec) {
                Ok(hotkey) => hotkey,
                Err(e) => {
                    log::warn!("Skipping {:?} hotkey: {}", action, e);
                    continue;
                }
            };
            match manager.register(hotkey) {
                Ok(()) => {
                    log::info!("Hotkey: {} ({:?})", spec, action);
                    bindings.insert(&hotkey, action);
                    registered.push(hotkey);
                }
                Err(e) => log::warn!("Failed to register hotkey {}: {}", spec, e),
            }
        }

        log::info!("Registered {} global hotkey(s)", bindings.len());
        thread::Builder::new()
            .name("hotkey-listener".to_string())
            .spawn(move || {
                let events = GlobalHotKeyEvent::receiver()
                    .iter()
                    .map(|event| (event.id, event.state));
                forward_presses(events, &bindings, &tasks, &wake);
            })?;

        Ok(Self {
            manager,
            registered,
        })
    }

    pub fn registered_count(&self) -> usize {
        self.registered.len()
    }
}

impl Drop for HotkeyListener {
    fn drop(&mut self) {
        if let Err(e) = self.manager.unregister_all(&self.registered) {
            log::warn!("Failed to unregister hotkeys: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tasks::create_task_queue;
    use global_hotkey::hotkey::{Code, Modifiers};
    use std::cell::Cell;

    #[test]
    fn test_parse_default_shortcuts() {
        let defaults = Shortcuts::default();

        assert_eq!(
            parse_shortcut(&defaults.save_pdf).unwrap(),
            HotKey::new(Some(Modifiers::CONTROL), Code::KeyS)
        );
        assert_eq!(
            parse_shortcut(&defaults.exit).unwrap(),
            HotKey::new(None, Code::Escape)
        );
        assert_eq!(
            parse_shortcut(&defaults.take_screenshot).unwrap(),
            HotKey::new(None, Code::PrintScreen)
        );
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(
            parse_shortcut("Ctrl + Shift + F5").unwrap(),
            HotKey::new(Some(Modifiers::CONTROL | Modifiers::SHIFT), Code::F5)
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(parse_shortcut(""), Err(HotkeyError::Empty)));
        assert!(matches!(parse_shortcut(" + "), Err(HotkeyError::Empty)));
        assert!(matches!(
            parse_shortcut("ctrl+notakey"),
            Err(HotkeyError::Parse { .. })
        ));
    }

    #[test]
    fn test_normalize_shortcut() {
        assert_eq!(normalize_shortcut("print_screen"), "printscreen");
        assert_eq!(normalize_shortcut("Win+E"), "super+e");
    }

    #[test]
    fn test_forward_presses_only() {
        let screenshot = HotKey::new(None, Code::PrintScreen);
        let save = HotKey::new(Some(Modifiers::CONTROL), Code::KeyS);
        let mut bindings = HotkeyBindings::default();
        bindings.insert(&screenshot, AppAction::TakeScreenshot);
        bindings.insert(&save, AppAction::SavePdf);
        assert_eq!(bindings.len(), 2);

        let (sender, queue) = create_task_queue(8);
        let wakes = Cell::new(0);
        let events = vec![
            (screenshot.id(), HotKeyState::Pressed),
            (screenshot.id(), HotKeyState::Released),
            (12345, HotKeyState::Pressed),
            (save.id(), HotKeyState::Pressed),
        ];

        forward_presses(events, &bindings, &sender, &|| wakes.set(wakes.get() + 1));

        assert_eq!(
            queue.drain(),
            vec![AppAction::TakeScreenshot, AppAction::SavePdf]
        );
        assert_eq!(wakes.get(), 2);
    }

    #[test]
    fn test_forward_stops_when_queue_closed() {
        let exit = HotKey::new(None, Code::Escape);
        let mut bindings = HotkeyBindings::default();
        bindings.insert(&exit, AppAction::Exit);

        let (sender, queue) = create_task_queue(8);
        drop(queue);
        let wakes = Cell::new(0);

        forward_presses(
            vec![(exit.id(), HotKeyState::Pressed); 3],
            &bindings,
            &sender,
            &|| wakes.set(wakes.get() + 1),
        );

        assert_eq!(wakes.get(), 0);
    }
}

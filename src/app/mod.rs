//! Application wiring: the context that owns all state, the task queue that
//! feeds it from other threads, and the global hotkey listener.

pub mod context;
pub mod hotkeys;
pub mod tasks;

pub use context::{AppContext, MoveDirection};
pub use hotkeys::HotkeyListener;
pub use tasks::{create_task_queue, AppAction, TaskQueue, TASK_QUEUE_CAPACITY};

//! Task queue for handing actions from the hotkey thread to the GUI thread.
//!
//! Uses a bounded std::sync::mpsc channel. The hotkey listener submits
//! actions without ever blocking, and the GUI drains the queue once per frame.

use std::sync::mpsc::{sync_channel, Receiver, SyncSender, TrySendError};
use thiserror::Error;

/// Number of pending actions the queue holds before new ones are dropped.
pub const TASK_QUEUE_CAPACITY: usize = 16;

/// A parameterless request to run one application action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AppAction {
    TakeScreenshot,
    SavePdf,
    Exit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("Task queue is full; dropped {0:?}")]
    Full(AppAction),

    #[error("Task queue is closed")]
    Closed,
}

/// Sending half, handed to the hotkey listener.
#[derive(Clone, Debug)]
pub struct TaskSender {
    sender: SyncSender<AppAction>,
}

impl TaskSender {
    /// Queues `action` without blocking.
    pub fn submit(&self, action: AppAction) -> Result<(), SubmitError> {
        self.sender.try_send(action).map_err(|e| match e {
            TrySendError::Full(action) => SubmitError::Full(action),
            TrySendError::Disconnected(_) => SubmitError::Closed,
        })
    }
}

/// Receiving half, owned by the GUI.
#[derive(Debug)]
pub struct TaskQueue {
    receiver: Receiver<AppAction>,
}

impl TaskQueue {
    /// Returns every action queued since the last drain, oldest first.
    pub fn drain(&self) -> Vec<AppAction> {
        self.receiver.try_iter().collect()
    }
}

/// Creates a new bounded task queue.
pub fn create_task_queue(capacity: usize) -> (TaskSender, TaskQueue) {
    let (sender, receiver) = sync_channel(capacity);
    (TaskSender { sender }, TaskQueue { receiver })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_submit_and_drain_in_order() {
        let (sender, queue) = create_task_queue(TASK_QUEUE_CAPACITY);

        sender.submit(AppAction::TakeScreenshot).unwrap();
        sender.submit(AppAction::SavePdf).unwrap();
        sender.submit(AppAction::Exit).unwrap();

        assert_eq!(
            queue.drain(),
            vec![AppAction::TakeScreenshot, AppAction::SavePdf, AppAction::Exit]
        );
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn test_full_queue_drops_without_blocking() {
        let (sender, queue) = create_task_queue(2);

        sender.submit(AppAction::TakeScreenshot).unwrap();
        sender.submit(AppAction::TakeScreenshot).unwrap();
        assert_eq!(
            sender.submit(AppAction::SavePdf),
            Err(SubmitError::Full(AppAction::SavePdf))
        );

        assert_eq!(queue.drain().len(), 2);
        sender.submit(AppAction::SavePdf).unwrap();
    }

    #[test]
    fn test_closed_when_queue_dropped() {
        let (sender, queue) = create_task_queue(TASK_QUEUE_CAPACITY);
        drop(queue);

        assert_eq!(sender.submit(AppAction::Exit), Err(SubmitError::Closed));
    }

    #[test]
    fn test_submit_from_another_thread() {
        let (sender, queue) = create_task_queue(TASK_QUEUE_CAPACITY);

        let handle = thread::spawn(move || {
            for _ in 0..3 {
                sender.submit(AppAction::TakeScreenshot).unwrap();
            }
        });
        handle.join().unwrap();

        assert_eq!(queue.drain(), vec![AppAction::TakeScreenshot; 3]);
    }
}

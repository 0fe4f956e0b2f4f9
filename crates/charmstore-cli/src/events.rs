use std::{sync::mpsc::Receiver, thread::JoinHandle};

use charmstore_events::{LogLevel, StoreEvent};
use tracing::{debug, error, info, trace, warn};

/// Handle to the event logging thread.
///
/// Call [`finish`](EventGuard::finish) after dropping the list context to join
/// the thread once every event has been logged.
pub struct EventGuard {
    handle: Option<JoinHandle<()>>,
}

impl EventGuard {
    /// The context holding the channel sender **must** be dropped first,
    /// otherwise this blocks forever.
    pub fn finish(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.join().ok();
        }
    }
}

pub fn spawn_event_handler(receiver: Receiver<StoreEvent>) -> EventGuard {
    let handle = std::thread::spawn(move || {
        while let Ok(event) = receiver.recv() {
            log_event(&event);
        }
    });

    EventGuard {
        handle: Some(handle),
    }
}

fn log_event(event: &StoreEvent) {
    match event {
        StoreEvent::ListStarted { .. } | StoreEvent::ListStage { .. } => trace!("{event}"),
        StoreEvent::MetadataFailure {
            op_id,
            entity_id,
            ..
        } => debug!(op_id, entity = %entity_id, "{event}"),
        StoreEvent::ListComplete {
            op_id,
            returned,
            dropped,
        } => {
            if *dropped > 0 {
                warn!(
                    op_id,
                    "{returned} entities listed, {dropped} dropped for missing metadata"
                );
            } else {
                debug!(op_id, returned, "{event}");
            }
        }
        StoreEvent::Log { level, message } => {
            match level {
                LogLevel::Debug => debug!("{message}"),
                LogLevel::Info => info!("{message}"),
                LogLevel::Warning => warn!("{message}"),
                LogLevel::Error => error!("{message}"),
            }
        }
    }
}

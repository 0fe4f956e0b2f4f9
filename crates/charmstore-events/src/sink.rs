use std::sync::{
    mpsc::{self, Receiver, Sender},
    Mutex, PoisonError,
};

use crate::StoreEvent;

/// Receiver of list pipeline events. Called from composition workers.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: StoreEvent);
}

/// Forwards events to an mpsc receiver. The CLI drains it on a logging thread.
pub struct ChannelSink {
    sender: Sender<StoreEvent>,
}

impl ChannelSink {
    pub fn new() -> (Self, Receiver<StoreEvent>) {
        let (sender, receiver) = mpsc::channel();
        (
            Self {
                sender,
            },
            receiver,
        )
    }
}

impl EventSink for ChannelSink {
    fn emit(&self, event: StoreEvent) {
        // A dropped receiver only means nobody is listening.
        let _ = self.sender.send(event);
    }
}

/// Discards every event.
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: StoreEvent) {}
}

/// Keeps every event in emission order.
#[derive(Default)]
pub struct CollectorSink {
    events: Mutex<Vec<StoreEvent>>,
}

impl CollectorSink {
    pub fn events(&self) -> Vec<StoreEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Failure records of dropped entities, as text.
    pub fn failures(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|event| matches!(event, StoreEvent::MetadataFailure { .. }))
            .map(|event| event.to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for CollectorSink {
    fn emit(&self, event: StoreEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

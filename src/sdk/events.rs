//! # Event Capability
//!
//! Fire-and-forget event emission. The engine consumes the bus, it does not
//! define delivery guarantees: `emit` never fails and never blocks on
//! consumers.

use std::collections::HashMap;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Mutex;

use serde_json::Value;

/// Event bus consumed by the emit capability
pub trait EventBus: Send + Sync + std::fmt::Debug {
    /// Emit an event. Fire-and-forget, no acknowledgement.
    fn emit(&self, event: &str, payload: Value);
}

/// In-process event bus delivering payloads over channels.
#[derive(Debug, Default)]
pub struct InProcessBus {
    subscribers: Mutex<HashMap<String, Vec<Sender<Value>>>>,
}

impl InProcessBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to an event name, receiving every future payload
    pub fn subscribe(&self, event: &str) -> Receiver<Value> {
        let (tx, rx) = channel();
        let mut subscribers = match self.subscribers.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        subscribers.entry(event.to_string()).or_default().push(tx);
        rx
    }
}

impl EventBus for InProcessBus {
    fn emit(&self, event: &str, payload: Value) {
        let mut subscribers = match self.subscribers.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(senders) = subscribers.get_mut(event) {
            // Dropped receivers are pruned on the way through.
            senders.retain(|tx| tx.send(payload.clone()).is_ok());
        }
    }
}

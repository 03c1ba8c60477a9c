use super::GoogleService;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use uuid::Uuid;

/// Payloads the consent popup posts back to its opener.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum OAuthMessage {
    #[serde(rename = "google-oauth-success")]
    Success { service: GoogleService },
    #[serde(rename = "google-oauth-error")]
    Error {
        #[serde(default)]
        error: String,
    },
}

impl OAuthMessage {
    /// `None` for anything that is not an OAuth message, including success
    /// messages naming a service outside the known set.
    pub fn parse(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

type Listeners = Arc<Mutex<HashMap<Uuid, UnboundedSender<Value>>>>;

/// Window-level `postMessage` stand-in shared by every in-flight handshake.
#[derive(Clone, Default)]
pub struct MessageBus {
    listeners: Listeners,
}

impl MessageBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = unbounded_channel();
        let id = Uuid::new_v4();
        self.listeners.lock().insert(id, tx);
        Subscription {
            id,
            listeners: self.listeners.clone(),
            rx,
        }
    }

    /// Deliver `message` to every live listener; returns how many received it.
    pub fn post(&self, message: Value) -> usize {
        let mut listeners = self.listeners.lock();
        listeners.retain(|_, tx| !tx.is_closed());
        listeners
            .values()
            .filter(|tx| tx.send(message.clone()).is_ok())
            .count()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }
}

/// One registered listener. Deregisters on drop.
pub struct Subscription {
    id: Uuid,
    listeners: Listeners,
    rx: UnboundedReceiver<Value>,
}

impl Subscription {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub async fn recv(&mut self) -> Option<Value> {
        self.rx.recv().await
    }

    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.listeners.lock().remove(&self.id);
    }
}

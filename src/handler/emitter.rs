use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// An event on its way back to extension scripts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionEvent {
    pub extension_id: String,
    pub event_name: String,
    pub payload: serde_json::Value,
}

/// Where emitted events go. Owned by the external dispatcher.
pub type EventSink = Arc<dyn Fn(ExtensionEvent) + Send + Sync>;

/// Event names of one extension API.
pub trait ApiEvent: Copy + fmt::Debug {
    /// Platform name of the event, e.g. `"onChanged"`.
    fn name(&self) -> &'static str;
}

/// Per-extension event channel shared by the API adapters.
///
/// Emitting is pure forwarding: nothing is buffered and nothing fails.
pub struct EventEmitter<E> {
    extension_id: String,
    sink: EventSink,
    _events: std::marker::PhantomData<fn(E)>,
}

impl<E> Clone for EventEmitter<E> {
    fn clone(&self) -> Self {
        Self {
            extension_id: self.extension_id.clone(),
            sink: self.sink.clone(),
            _events: std::marker::PhantomData,
        }
    }
}

impl<E> fmt::Debug for EventEmitter<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventEmitter")
            .field("extension_id", &self.extension_id)
            .finish_non_exhaustive()
    }
}

impl<E: ApiEvent> EventEmitter<E> {
    pub fn new(extension_id: impl Into<String>, sink: EventSink) -> Self {
        Self {
            extension_id: extension_id.into(),
            sink,
            _events: std::marker::PhantomData,
        }
    }

    pub fn extension_id(&self) -> &str {
        &self.extension_id
    }

    /// Serialize `payload` and forward it as `event`.
    ///
    /// A payload that cannot be serialized is logged and dropped.
    pub fn emit<P: Serialize>(&self, event: E, payload: &P) {
        match serde_json::to_value(payload) {
            Ok(payload) => self.emit_value(event, payload),
            Err(e) => {
                tracing::warn!(
                    extension = %self.extension_id,
                    event = event.name(),
                    error = %e,
                    "dropping event with unserializable payload"
                );
            }
        }
    }

    pub fn emit_value(&self, event: E, payload: serde_json::Value) {
        tracing::trace!(extension = %self.extension_id, event = event.name(), "emit");
        (self.sink)(ExtensionEvent {
            extension_id: self.extension_id.clone(),
            event_name: event.name().to_string(),
            payload,
        });
    }
}

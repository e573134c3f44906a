//! Shared plumbing for the API adapters.
//!
//! - [`EventEmitter`]: forwards adapter events to the external dispatcher
//! - [`ApiHandler`]: JSON entry point keyed by platform method name

mod dispatch;
mod emitter;

pub use dispatch::{ApiHandler, Args, Handling};
pub use emitter::{ApiEvent, EventEmitter, EventSink, ExtensionEvent};

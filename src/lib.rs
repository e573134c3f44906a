//! # crxshim
//!
//! Browser-extension API emulation on top of an embedding host.
//!
//! `crxshim` lets scripts written against the extension platform's `cookies`
//! and `windows` APIs run inside a host that only offers its own native
//! cookie jar and window objects. It reproduces the platform's documented
//! result shapes exactly: `null` on a cookie miss, `{}` on a window miss,
//! 800×600 default windows, the `"0"` store id, and the platform spelling of
//! cookie change causes.
//!
//! ## Features
//!
//! - **Cookies**: `get`, `getAll`, `set`, `remove`, and `onChanged` bridged
//!   from host change notifications
//! - **Windows**: `get`, `getCurrent`, `getLastFocused`, `getAll`, `create`,
//!   `update`, `remove`, with `onCreated`/`onRemoved`
//! - **Host seam**: two narrow traits an embedder implements once
//! - **In-memory host**: a complete cookie jar and window table for
//!   headless use and tests
//!
//! ## Quick Start
//!
//! ```rust
//! use crxshim::handler::{ApiHandler, EventSink, ExtensionEvent};
//! use crxshim::host::memory::MemoryHost;
//! use crxshim::windows::{CreateData, WindowsApi};
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let host = Arc::new(MemoryHost::new());
//! let sink: EventSink = Arc::new(|event: ExtensionEvent| println!("{} {}", event.event_name, event.payload));
//! let windows = WindowsApi::new("my-extension", sink, host);
//!
//! let window = windows.create(&CreateData { width: Some(100), ..Default::default() });
//! let reply = windows.handle("get", vec![window.id.into()]).await.unwrap();
//! assert_eq!(reply["id"], window.id);
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Errors, single-settle completions, configuration
//! - [`handler`] - Event emitter and JSON method routing shared by the APIs
//! - [`host`] - Host capability traits and the in-memory host
//! - [`cookies`] - The `cookies` API
//! - [`windows`] - The `windows` API
//!
//! ## Threading
//!
//! Adapters are `Send + Sync`, but the design assumes calls arrive from the
//! host's event loop one at a time. Concurrent calls on the same cookie are
//! not ordered.

pub mod base;
pub mod cookies;
pub mod handler;
pub mod host;
pub mod windows;

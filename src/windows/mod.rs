//! The `windows` extension API.
//!
//! Window ids are host content-surface ids. The adapter keeps a registry of
//! the windows an extension created; see [`WindowsApi`] for which calls
//! consult it.

mod api;
mod window;

pub use api::WindowsApi;
pub use window::{CreateData, EmptyObject, GetInfo, UpdateInfo, Window, WindowReply, WindowsEvent};

//! Capability interfaces onto the embedding host.
//!
//! The adapters never talk to a concrete host. They go through two narrow
//! traits that an embedder implements once against its real runtime:
//!
//! | Trait | Host concern |
//! |-------|--------------|
//! | [`CookieHost`] | Cookie jar queries, writes, deletes and change notifications |
//! | [`WindowHost`] | Window enumeration, focus, creation, geometry and close notifications |
//!
//! [`memory::MemoryHost`] implements both in process and backs the test suite.
//!
//! # Design Notes
//!
//! - Cookie calls are callback-style: the host settles a [`Completion`] once.
//! - Window calls are synchronous, matching native window objects.
//! - Listener registrations return a [`ListenerId`] that must be handed back
//!   to the matching `remove_*_listener` call on teardown.

mod cookie;
pub mod memory;
mod window;

pub use cookie::{CookieChange, CookieQuery, CookieWrite, HostChangeCause, HostCookie, HostSameSite};
pub use window::{Bounds, HostWindow, SurfaceId, WindowOptions};

use crate::base::completion::Completion;
use crate::base::shimerror::HostError;
use std::sync::Arc;
use url::Url;

/// Handle for a registered host listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Receives host cookie-change notifications.
pub type CookieChangeListener = Arc<dyn Fn(CookieChange) + Send + Sync>;

/// Receives the id of a window the host closed.
pub type WindowClosedListener = Arc<dyn Fn(SurfaceId) + Send + Sync>;

/// Host cookie-jar primitives.
pub trait CookieHost: Send + Sync {
    /// Look up cookies matching `query`.
    fn query_cookies(
        &self,
        query: CookieQuery,
        done: Completion<Result<Vec<HostCookie>, HostError>>,
    );

    /// Store a cookie, replacing any cookie with the same name, domain and path.
    fn write_cookie(&self, write: CookieWrite, done: Completion<Result<(), HostError>>);

    /// Delete the cookies named `name` that would be sent to `url`.
    fn delete_cookie(&self, url: Url, name: String, done: Completion<Result<(), HostError>>);

    /// Subscribe to cookie-change notifications.
    fn on_cookie_changed(&self, listener: CookieChangeListener) -> ListenerId;

    fn remove_cookie_listener(&self, id: ListenerId);
}

/// Host window primitives.
pub trait WindowHost: Send + Sync {
    /// All open windows in host enumeration order.
    fn list_windows(&self) -> Vec<HostWindow>;

    fn focused_window(&self) -> Option<HostWindow>;

    fn create_window(&self, options: WindowOptions) -> HostWindow;

    /// Navigate the window's content surface.
    fn load_url(&self, id: SurfaceId, url: &str);

    fn close_window(&self, id: SurfaceId);

    fn resize_window(&self, id: SurfaceId, width: u32, height: u32);

    fn move_window(&self, id: SurfaceId, x: i32, y: i32);

    /// Subscribe to the close of one window, whoever initiated it.
    fn on_window_closed(&self, id: SurfaceId, listener: WindowClosedListener) -> ListenerId;

    fn remove_window_listener(&self, id: ListenerId);

    fn find_window(&self, id: SurfaceId) -> Option<HostWindow> {
        self.list_windows().into_iter().find(|w| w.id == id)
    }
}

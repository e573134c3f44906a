//! In-process host.
//!
//! [`MemoryHost`] implements [`CookieHost`] and [`WindowHost`] without a
//! browser runtime: cookies live in a [`MemoryCookieJar`] and windows in a
//! plain table with a focus pointer. It settles every cookie call
//! immediately and fires listeners synchronously, from the calling thread.
//!
//! # Example
//!
//! ```rust
//! use crxshim::host::memory::MemoryHost;
//! use crxshim::host::{WindowHost, WindowOptions};
//!
//! let host = MemoryHost::new();
//! let window = host.create_window(WindowOptions { width: 800, height: 600, x: None, y: None });
//! assert!(window.focused);
//! ```

mod jar;
mod windows;

pub use jar::MemoryCookieJar;

use crate::base::completion::Completion;
use crate::base::shimerror::HostError;
use crate::host::{
    CookieChange, CookieChangeListener, CookieHost, CookieQuery, CookieWrite, HostCookie,
    HostWindow, ListenerId, SurfaceId, WindowClosedListener, WindowHost, WindowOptions,
};
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use url::Url;
use windows::WindowTable;

/// In-memory cookie jar and window table behind the host traits.
#[derive(Default)]
pub struct MemoryHost {
    jar: MemoryCookieJar,
    cookie_listeners: DashMap<ListenerId, CookieChangeListener>,
    windows: Mutex<WindowTable>,
    window_listeners: DashMap<ListenerId, (SurfaceId, WindowClosedListener)>,
    next_listener: AtomicU64,
    fail_cookie_writes: AtomicBool,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// The backing cookie jar. Mutating it directly bypasses change
    /// notifications.
    pub fn jar(&self) -> &MemoryCookieJar {
        &self.jar
    }

    /// Make every subsequent cookie write fail with `WriteRejected`.
    pub fn set_fail_cookie_writes(&self, fail: bool) {
        self.fail_cookie_writes.store(fail, Ordering::SeqCst);
    }

    /// Deliver a change notification to every cookie listener.
    pub fn notify_cookie_change(&self, change: CookieChange) {
        self.dispatch_cookie_changes(vec![change]);
    }

    /// Store a cookie as if a page had received `Set-Cookie: {line}` from `url`.
    pub fn seed_cookie(&self, url: &Url, line: &str) {
        let changes = self.jar.parse_and_save_cookie(url, line);
        self.dispatch_cookie_changes(changes);
    }

    /// Give focus to `id`. Returns false if the window is not open.
    pub fn focus_window(&self, id: SurfaceId) -> bool {
        self.table().focus(id)
    }

    /// Leave no window focused, as when another application is active.
    pub fn blur_all(&self) {
        self.table().blur();
    }

    /// The URL last loaded into `id`.
    pub fn window_url(&self, id: SurfaceId) -> Option<String> {
        self.table().url(id)
    }

    pub fn cookie_listener_count(&self) -> usize {
        self.cookie_listeners.len()
    }

    pub fn window_listener_count(&self) -> usize {
        self.window_listeners.len()
    }

    fn next_listener_id(&self) -> ListenerId {
        ListenerId(self.next_listener.fetch_add(1, Ordering::Relaxed))
    }

    fn table(&self) -> MutexGuard<'_, WindowTable> {
        self.windows.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn dispatch_cookie_changes(&self, changes: Vec<CookieChange>) {
        if changes.is_empty() {
            return;
        }
        // Clone listeners out so none of them runs under a map guard.
        let listeners: Vec<CookieChangeListener> = self
            .cookie_listeners
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        for change in changes {
            for listener in &listeners {
                listener(change.clone());
            }
        }
    }
}

impl CookieHost for MemoryHost {
    fn query_cookies(
        &self,
        query: CookieQuery,
        done: Completion<Result<Vec<HostCookie>, HostError>>,
    ) {
        let (cookies, purged) = self.jar.query(&query);
        self.dispatch_cookie_changes(purged);
        done.complete(Ok(cookies));
    }

    fn write_cookie(&self, write: CookieWrite, done: Completion<Result<(), HostError>>) {
        if self.fail_cookie_writes.load(Ordering::SeqCst) {
            done.complete(Err(HostError::write_rejected("writes disabled")));
            return;
        }
        match self.jar.write(write) {
            Ok(changes) => {
                self.dispatch_cookie_changes(changes);
                done.complete(Ok(()));
            }
            Err(e) => done.complete(Err(e)),
        }
    }

    fn delete_cookie(&self, url: Url, name: String, done: Completion<Result<(), HostError>>) {
        let changes = self.jar.delete(&url, &name);
        self.dispatch_cookie_changes(changes);
        done.complete(Ok(()));
    }

    fn on_cookie_changed(&self, listener: CookieChangeListener) -> ListenerId {
        let id = self.next_listener_id();
        self.cookie_listeners.insert(id, listener);
        id
    }

    fn remove_cookie_listener(&self, id: ListenerId) {
        self.cookie_listeners.remove(&id);
    }
}

impl WindowHost for MemoryHost {
    fn list_windows(&self) -> Vec<HostWindow> {
        self.table().list()
    }

    fn focused_window(&self) -> Option<HostWindow> {
        self.table().focused()
    }

    fn create_window(&self, options: WindowOptions) -> HostWindow {
        self.table().create(options)
    }

    fn load_url(&self, id: SurfaceId, url: &str) {
        self.table().load_url(id, url);
    }

    fn close_window(&self, id: SurfaceId) {
        let closed = self.table().close(id);
        if !closed {
            return;
        }

        let registrations: Vec<ListenerId> = self
            .window_listeners
            .iter()
            .filter(|entry| entry.value().0 == id)
            .map(|entry| *entry.key())
            .collect();
        let listeners: Vec<WindowClosedListener> = registrations
            .into_iter()
            .filter_map(|lid| self.window_listeners.remove(&lid))
            .map(|(_, (_, listener))| listener)
            .collect();

        tracing::trace!(window = %id, listeners = listeners.len(), "window closed");
        for listener in listeners {
            listener(id);
        }
    }

    fn resize_window(&self, id: SurfaceId, width: u32, height: u32) {
        self.table().resize(id, width, height);
    }

    fn move_window(&self, id: SurfaceId, x: i32, y: i32) {
        self.table().move_to(id, x, y);
    }

    fn on_window_closed(&self, id: SurfaceId, listener: WindowClosedListener) -> ListenerId {
        let lid = self.next_listener_id();
        self.window_listeners.insert(lid, (id, listener));
        lid
    }

    fn remove_window_listener(&self, id: ListenerId) {
        self.window_listeners.remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::completion::pending;
    use crate::host::HostChangeCause;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_write_notifies_listeners() {
        let host = MemoryHost::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        host.on_cookie_changed(Arc::new(move |change: CookieChange| {
            sink.lock().unwrap().push(change.cause);
        }));

        let (done, waiting) = pending();
        let url = Url::parse("https://a.com/").unwrap();
        host.write_cookie(CookieWrite::new(url, "x", "1"), done);
        assert_eq!(waiting.await, Ok(Ok(())));
        assert_eq!(*seen.lock().unwrap(), vec![HostChangeCause::Explicit]);
    }

    #[tokio::test]
    async fn test_fail_cookie_writes() {
        let host = MemoryHost::new();
        host.set_fail_cookie_writes(true);

        let (done, waiting) = pending();
        let url = Url::parse("https://a.com/").unwrap();
        host.write_cookie(CookieWrite::new(url, "x", "1"), done);
        assert!(matches!(
            waiting.await,
            Ok(Err(HostError::WriteRejected { .. }))
        ));
        assert_eq!(host.jar().total_cookie_count(), 0);
    }

    #[test]
    fn test_close_fires_listener_once() {
        let host = MemoryHost::new();
        let window = host.create_window(WindowOptions {
            width: 100,
            height: 100,
            x: None,
            y: None,
        });

        let count = Arc::new(AtomicU64::new(0));
        let counter = count.clone();
        host.on_window_closed(
            window.id,
            Arc::new(move |_: SurfaceId| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        host.close_window(window.id);
        host.close_window(window.id);
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(host.window_listener_count(), 0);
    }

    #[test]
    fn test_listener_removal() {
        let host = MemoryHost::new();
        let id = host.on_cookie_changed(Arc::new(|_: CookieChange| {}));
        assert_eq!(host.cookie_listener_count(), 1);
        host.remove_cookie_listener(id);
        assert_eq!(host.cookie_listener_count(), 0);
    }
}

use crate::base::config::ShimConfig;
use crate::base::shimerror::ShimError;
use crate::handler::{ApiHandler, Args, EventEmitter, EventSink, Handling};
use crate::host::{ListenerId, SurfaceId, WindowHost, WindowOptions};
use crate::windows::window::{
    CreateData, GetInfo, UpdateInfo, Window, WindowReply, WindowsEvent,
};
use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;

/// Windows created through this adapter, with their host close listeners.
type Registry = Arc<DashMap<SurfaceId, ListenerId>>;

/// The `windows` API of one extension.
///
/// Lookups see every host window. Only windows created through
/// [`create`](Self::create) are tracked, and only tracked windows may be
/// updated or removed. A tracked window leaves the registry exactly once,
/// either through [`remove`](Self::remove) or when the host closes it, and
/// `onRemoved` is emitted on that transition only.
pub struct WindowsApi {
    host: Arc<dyn WindowHost>,
    emitter: EventEmitter<WindowsEvent>,
    config: ShimConfig,
    tracked: Registry,
}

impl WindowsApi {
    pub fn new(
        extension_id: impl Into<String>,
        sink: EventSink,
        host: Arc<dyn WindowHost>,
    ) -> Self {
        Self::with_config(extension_id, sink, host, ShimConfig::default())
    }

    pub fn with_config(
        extension_id: impl Into<String>,
        sink: EventSink,
        host: Arc<dyn WindowHost>,
        config: ShimConfig,
    ) -> Self {
        Self {
            host,
            emitter: EventEmitter::new(extension_id, sink),
            config,
            tracked: Arc::new(DashMap::new()),
        }
    }

    pub fn extension_id(&self) -> &str {
        self.emitter.extension_id()
    }

    /// Ids of the windows currently tracked, in no particular order.
    pub fn tracked_ids(&self) -> Vec<i64> {
        self.tracked.iter().map(|e| e.key().as_i64()).collect()
    }

    pub fn is_tracked(&self, id: i64) -> bool {
        self.tracked.contains_key(&SurfaceId(id))
    }

    /// `windows.get`: any host window, tracked or not.
    pub fn get(&self, id: i64, _info: &GetInfo) -> WindowReply {
        self.host
            .find_window(SurfaceId(id))
            .map(|w| Window::from_host(&w))
            .into()
    }

    /// `windows.getCurrent`: the focused host window.
    pub fn get_current(&self, _info: &GetInfo) -> WindowReply {
        self.host
            .focused_window()
            .map(|w| Window::from_host(&w))
            .into()
    }

    /// `windows.getLastFocused`. Without focus history this is the
    /// currently focused window, same as [`get_current`](Self::get_current).
    pub fn get_last_focused(&self, info: &GetInfo) -> WindowReply {
        self.get_current(info)
    }

    /// `windows.getAll`: tracked windows plus the focused one, in host order.
    pub fn get_all(&self, _info: &GetInfo) -> Vec<Window> {
        let focused = self.host.focused_window().map(|w| w.id);
        self.host
            .list_windows()
            .into_iter()
            .filter(|w| focused == Some(w.id) || self.tracked.contains_key(&w.id))
            .map(|w| Window::from_host(&w))
            .collect()
    }

    /// `windows.create`: open, track and announce a new window.
    pub fn create(&self, data: &CreateData) -> Window {
        let window = self.host.create_window(WindowOptions {
            width: data.width.unwrap_or(self.config.default_window_width),
            height: data.height.unwrap_or(self.config.default_window_height),
            x: data.left,
            y: data.top,
        });

        if let Some(url) = &data.url {
            self.host.load_url(window.id, url);
        }

        let listener = self.host.on_window_closed(window.id, self.close_listener());
        self.tracked.insert(window.id, listener);

        tracing::debug!(
            extension = %self.extension_id(),
            window = %window.id,
            width = window.bounds.width,
            height = window.bounds.height,
            "window created"
        );

        let snapshot = Window::from_host(&window);
        self.emitter.emit(WindowsEvent::OnCreated, &snapshot);
        snapshot
    }

    /// Handles a host-initiated close of a tracked window.
    fn close_listener(&self) -> Arc<dyn Fn(SurfaceId) + Send + Sync> {
        let tracked = self.tracked.clone();
        let emitter = self.emitter.clone();
        Arc::new(move |id: SurfaceId| {
            if tracked.remove(&id).is_some() {
                tracing::debug!(window = %id, "tracked window closed by host");
                emitter.emit(WindowsEvent::OnRemoved, &id.as_i64());
            }
        })
    }

    /// `windows.update`: resize and/or move a tracked window.
    ///
    /// Returns `{}` for untracked or vanished windows. For each of size and
    /// position, specified fields replace the current value and omitted ones
    /// keep it; the result is applied in a single host call.
    pub fn update(&self, id: i64, info: &UpdateInfo) -> WindowReply {
        let id = SurfaceId(id);
        if !self.tracked.contains_key(&id) {
            return WindowReply::empty();
        }
        let Some(window) = self.host.find_window(id) else {
            return WindowReply::empty();
        };

        let current = window.bounds;
        if info.width.is_some() || info.height.is_some() {
            self.host.resize_window(
                id,
                info.width.unwrap_or(current.width),
                info.height.unwrap_or(current.height),
            );
        }
        if info.left.is_some() || info.top.is_some() {
            self.host.move_window(
                id,
                info.left.unwrap_or(current.x),
                info.top.unwrap_or(current.y),
            );
        }

        self.host
            .find_window(id)
            .map(|w| Window::from_host(&w))
            .into()
    }

    /// `windows.remove`: close a tracked window. No-op otherwise.
    pub fn remove(&self, id: i64) {
        let id = SurfaceId(id);
        // Claiming the entry decides who emits onRemoved.
        let Some((_, listener)) = self.tracked.remove(&id) else {
            return;
        };
        self.host.remove_window_listener(listener);
        self.host.close_window(id);

        tracing::debug!(extension = %self.extension_id(), window = %id, "window removed");
        self.emitter.emit(WindowsEvent::OnRemoved, &id.as_i64());
    }
}

impl Drop for WindowsApi {
    fn drop(&mut self) {
        let listeners: Vec<ListenerId> = self.tracked.iter().map(|e| *e.value()).collect();
        for listener in listeners {
            self.host.remove_window_listener(listener);
        }
    }
}

impl ApiHandler for WindowsApi {
    fn api_name(&self) -> &'static str {
        "windows"
    }

    fn handle<'a>(&'a self, method: &'a str, args: Vec<Value>) -> Handling<'a> {
        Box::pin(async move {
            let args = Args::new(method, args);
            let reply = match method {
                "get" => serde_json::to_value(self.get(args.required(0)?, &args.optional(1)?))?,
                "getCurrent" => serde_json::to_value(self.get_current(&args.optional(0)?))?,
                "getLastFocused" => {
                    serde_json::to_value(self.get_last_focused(&args.optional(0)?))?
                }
                "getAll" => serde_json::to_value(self.get_all(&args.optional(0)?))?,
                "create" => serde_json::to_value(self.create(&args.optional(0)?))?,
                "update" => {
                    serde_json::to_value(self.update(args.required(0)?, &args.optional(1)?))?
                }
                "remove" => {
                    self.remove(args.required(0)?);
                    Value::Null
                }
                _ => return Err(ShimError::unknown_method("windows", method)),
            };
            Ok(reply)
        })
    }
}

use crate::handler::ApiEvent;
use crate::host::HostWindow;
use serde::{Deserialize, Serialize};

/// A window as extension scripts see it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Window {
    /// The host content-surface id.
    pub id: i64,
    pub focused: bool,
    pub incognito: bool,
    pub always_on_top: bool,
}

impl Window {
    pub fn from_host(window: &HostWindow) -> Self {
        Self {
            id: window.id.as_i64(),
            focused: window.focused,
            incognito: false,
            always_on_top: false,
        }
    }
}

/// Serializes as `{}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct EmptyObject {}

/// Reply of the window lookups that answer `{}` on a miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum WindowReply {
    Window(Window),
    Empty(EmptyObject),
}

impl WindowReply {
    pub fn empty() -> Self {
        WindowReply::Empty(EmptyObject {})
    }

    pub fn window(&self) -> Option<&Window> {
        match self {
            WindowReply::Window(w) => Some(w),
            WindowReply::Empty(_) => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, WindowReply::Empty(_))
    }
}

impl From<Option<Window>> for WindowReply {
    fn from(window: Option<Window>) -> Self {
        window.map_or_else(WindowReply::empty, WindowReply::Window)
    }
}

/// Argument of `windows.create`.
///
/// Fields left out (or `null`) are unspecified; any present number,
/// including `0`, is used as given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateData {
    pub url: Option<String>,
    pub left: Option<i32>,
    pub top: Option<i32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Argument of `windows.update`. Same presence rules as [`CreateData`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateInfo {
    pub left: Option<i32>,
    pub top: Option<i32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Optional argument of the window getters. Accepted and ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetInfo {
    pub populate: Option<bool>,
    pub window_types: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowsEvent {
    OnCreated,
    OnRemoved,
}

impl ApiEvent for WindowsEvent {
    fn name(&self) -> &'static str {
        match self {
            WindowsEvent::OnCreated => "onCreated",
            WindowsEvent::OnRemoved => "onRemoved",
        }
    }
}

use crate::host::{Bounds, HostWindow, SurfaceId, WindowOptions};

#[derive(Debug, Clone)]
struct MemoryWindow {
    id: SurfaceId,
    bounds: Bounds,
    url: Option<String>,
}

/// Open windows in creation order plus the focus pointer.
#[derive(Debug)]
pub(crate) struct WindowTable {
    windows: Vec<MemoryWindow>,
    focused: Option<SurfaceId>,
    next_id: i64,
}

impl Default for WindowTable {
    fn default() -> Self {
        Self {
            windows: Vec::new(),
            focused: None,
            next_id: 1,
        }
    }
}

impl WindowTable {
    fn snapshot(&self, window: &MemoryWindow) -> HostWindow {
        HostWindow {
            id: window.id,
            focused: self.focused == Some(window.id),
            bounds: window.bounds,
        }
    }

    fn find_mut(&mut self, id: SurfaceId) -> Option<&mut MemoryWindow> {
        self.windows.iter_mut().find(|w| w.id == id)
    }

    pub(crate) fn list(&self) -> Vec<HostWindow> {
        self.windows.iter().map(|w| self.snapshot(w)).collect()
    }

    pub(crate) fn focused(&self) -> Option<HostWindow> {
        let id = self.focused?;
        self.windows
            .iter()
            .find(|w| w.id == id)
            .map(|w| self.snapshot(w))
    }

    /// New windows are shown and take focus.
    pub(crate) fn create(&mut self, options: WindowOptions) -> HostWindow {
        let id = SurfaceId(self.next_id);
        self.next_id += 1;

        let window = MemoryWindow {
            id,
            bounds: Bounds {
                x: options.x.unwrap_or(0),
                y: options.y.unwrap_or(0),
                width: options.width,
                height: options.height,
            },
            url: None,
        };
        self.windows.push(window);
        self.focused = Some(id);

        HostWindow {
            id,
            focused: true,
            bounds: self.windows[self.windows.len() - 1].bounds,
        }
    }

    /// Returns false if no such window was open.
    pub(crate) fn close(&mut self, id: SurfaceId) -> bool {
        let before = self.windows.len();
        self.windows.retain(|w| w.id != id);
        if self.focused == Some(id) {
            self.focused = None;
        }
        self.windows.len() != before
    }

    pub(crate) fn focus(&mut self, id: SurfaceId) -> bool {
        if self.windows.iter().any(|w| w.id == id) {
            self.focused = Some(id);
            true
        } else {
            false
        }
    }

    pub(crate) fn blur(&mut self) {
        self.focused = None;
    }

    pub(crate) fn load_url(&mut self, id: SurfaceId, url: &str) {
        if let Some(window) = self.find_mut(id) {
            window.url = Some(url.to_string());
        }
    }

    pub(crate) fn url(&self, id: SurfaceId) -> Option<String> {
        self.windows
            .iter()
            .find(|w| w.id == id)
            .and_then(|w| w.url.clone())
    }

    pub(crate) fn resize(&mut self, id: SurfaceId, width: u32, height: u32) {
        if let Some(window) = self.find_mut(id) {
            window.bounds.width = width;
            window.bounds.height = height;
        }
    }

    pub(crate) fn move_to(&mut self, id: SurfaceId, x: i32, y: i32) {
        if let Some(window) = self.find_mut(id) {
            window.bounds.x = x;
            window.bounds.y = y;
        }
    }
}

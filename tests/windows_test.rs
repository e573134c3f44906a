//! Windows API Tests
//!
//! Covers:
//! - Lookups over all host windows vs. the tracked registry
//! - create defaults, update fallback rules, remove idempotence
//! - Host-initiated close and listener teardown

use crxshim::base::config::ShimConfig;
use crxshim::handler::{EventSink, ExtensionEvent};
use crxshim::host::memory::MemoryHost;
use crxshim::host::{Bounds, SurfaceId, WindowHost, WindowOptions};
use crxshim::windows::{CreateData, GetInfo, UpdateInfo, WindowReply, WindowsApi};
use serde_json::json;
use std::sync::{Arc, Mutex};

fn recorder() -> (EventSink, Arc<Mutex<Vec<ExtensionEvent>>>) {
    let events: Arc<Mutex<Vec<ExtensionEvent>>> = Arc::default();
    let store = events.clone();
    let sink: EventSink = Arc::new(move |event: ExtensionEvent| store.lock().unwrap().push(event));
    (sink, events)
}

fn setup() -> (Arc<MemoryHost>, WindowsApi, Arc<Mutex<Vec<ExtensionEvent>>>) {
    let host = Arc::new(MemoryHost::new());
    let (sink, events) = recorder();
    let api = WindowsApi::new("ext-windows", sink, host.clone());
    (host, api, events)
}

fn bounds(host: &MemoryHost, id: i64) -> Bounds {
    host.find_window(SurfaceId(id)).unwrap().bounds
}

fn removed_events(events: &Mutex<Vec<ExtensionEvent>>, id: i64) -> usize {
    events
        .lock()
        .unwrap()
        .iter()
        .filter(|e| e.event_name == "onRemoved" && e.payload == json!(id))
        .count()
}

/// A window the extension did not create.
fn foreign_window(host: &MemoryHost) -> i64 {
    host.create_window(WindowOptions {
        width: 300,
        height: 200,
        x: Some(10),
        y: Some(10),
    })
    .id
    .as_i64()
}

#[test]
fn test_create_defaults_height() {
    let (host, api, _events) = setup();
    let window = api.create(&CreateData {
        width: Some(100),
        ..Default::default()
    });

    let b = bounds(&host, window.id);
    assert_eq!(b.width, 100);
    assert_eq!(b.height, 600);
    assert!(!window.incognito);
    assert!(!window.always_on_top);

    let all = api.get_all(&GetInfo::default());
    assert!(all.iter().any(|w| w.id == window.id));
}

#[test]
fn test_create_uses_config_defaults_position_and_url() {
    let host = Arc::new(MemoryHost::new());
    let (sink, events) = recorder();
    let config = ShimConfig::new().default_window_width(1024);
    let api = WindowsApi::with_config("ext", sink, host.clone(), config);

    let window = api.create(&CreateData {
        url: Some("https://example.com/".to_string()),
        left: Some(40),
        top: Some(0),
        ..Default::default()
    });

    assert_eq!(
        bounds(&host, window.id),
        Bounds {
            x: 40,
            y: 0,
            width: 1024,
            height: 600
        }
    );
    assert_eq!(
        host.window_url(SurfaceId(window.id)).as_deref(),
        Some("https://example.com/")
    );

    let events = events.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_name, "onCreated");
    assert_eq!(events[0].payload["id"], json!(window.id));
}

#[test]
fn test_get_sees_untracked_windows() {
    let (host, api, _events) = setup();
    let id = foreign_window(&host);

    let reply = api.get(id, &GetInfo::default());
    assert_eq!(reply.window().map(|w| w.id), Some(id));
    assert!(api.get(999, &GetInfo::default()).is_empty());
}

#[test]
fn test_get_current_and_last_focused() {
    let (host, api, _events) = setup();
    assert!(api.get_current(&GetInfo::default()).is_empty());
    assert!(api.get_last_focused(&GetInfo::default()).is_empty());

    let id = foreign_window(&host);
    let current = api.get_current(&GetInfo::default());
    assert_eq!(current.window().map(|w| (w.id, w.focused)), Some((id, true)));
    assert_eq!(api.get_last_focused(&GetInfo::default()), current);

    host.blur_all();
    assert_eq!(api.get_current(&GetInfo::default()), WindowReply::empty());
}

#[test]
fn test_get_all_is_tracked_plus_focused_in_host_order() {
    let (host, api, _events) = setup();
    let foreign_a = foreign_window(&host);
    let mine = api.create(&CreateData::default()).id;
    let foreign_b = foreign_window(&host);

    // foreign_b holds focus
    let ids: Vec<i64> = api.get_all(&GetInfo::default()).iter().map(|w| w.id).collect();
    assert_eq!(ids, vec![mine, foreign_b]);

    host.focus_window(SurfaceId(foreign_a));
    let ids: Vec<i64> = api.get_all(&GetInfo::default()).iter().map(|w| w.id).collect();
    assert_eq!(ids, vec![foreign_a, mine]);

    host.blur_all();
    let ids: Vec<i64> = api.get_all(&GetInfo::default()).iter().map(|w| w.id).collect();
    assert_eq!(ids, vec![mine]);
}

#[test]
fn test_update_untracked_is_noop() {
    let (host, api, _events) = setup();
    let id = foreign_window(&host);

    let reply = api.update(
        id,
        &UpdateInfo {
            width: Some(50),
            ..Default::default()
        },
    );
    assert_eq!(reply, WindowReply::empty());
    assert_eq!(bounds(&host, id).width, 300);
}

#[test]
fn test_update_falls_back_to_current_values() {
    let (host, api, _events) = setup();
    let id = api
        .create(&CreateData {
            left: Some(5),
            top: Some(6),
            width: Some(200),
            height: Some(100),
            ..Default::default()
        })
        .id;

    let reply = api.update(
        id,
        &UpdateInfo {
            width: Some(50),
            top: Some(60),
            ..Default::default()
        },
    );
    assert_eq!(reply.window().map(|w| w.id), Some(id));
    assert_eq!(
        bounds(&host, id),
        Bounds {
            x: 5,
            y: 60,
            width: 50,
            height: 100
        }
    );
}

#[test]
fn test_update_zero_is_specified() {
    let (host, api, _events) = setup();
    let id = api
        .create(&CreateData {
            left: Some(30),
            top: Some(40),
            ..Default::default()
        })
        .id;

    api.update(
        id,
        &UpdateInfo {
            left: Some(0),
            ..Default::default()
        },
    );
    let b = bounds(&host, id);
    assert_eq!((b.x, b.y), (0, 40));
}

#[test]
fn test_remove_tracked_window() {
    let (host, api, events) = setup();
    let id = api.create(&CreateData::default()).id;

    api.remove(id);
    assert!(host.find_window(SurfaceId(id)).is_none());
    assert!(!api.get_all(&GetInfo::default()).iter().any(|w| w.id == id));
    assert_eq!(removed_events(&events, id), 1);

    api.remove(id);
    assert_eq!(removed_events(&events, id), 1);
    assert!(api
        .update(
            id,
            &UpdateInfo {
                width: Some(10),
                ..Default::default()
            }
        )
        .is_empty());
}

#[test]
fn test_remove_untracked_is_noop() {
    let (host, api, events) = setup();
    let id = foreign_window(&host);

    api.remove(id);
    assert!(host.find_window(SurfaceId(id)).is_some());
    assert_eq!(removed_events(&events, id), 0);
}

#[test]
fn test_host_close_untracks_and_emits_once() {
    let (host, api, events) = setup();
    let id = api.create(&CreateData::default()).id;
    assert!(api.is_tracked(id));

    host.close_window(SurfaceId(id));
    assert!(!api.is_tracked(id));
    assert_eq!(removed_events(&events, id), 1);

    // Already gone: the adapter path must not emit again.
    api.remove(id);
    assert_eq!(removed_events(&events, id), 1);
    assert_eq!(host.window_listener_count(), 0);
}

#[test]
fn test_tracked_ids_follow_create_remove_and_host_close() {
    let (host, api, _events) = setup();
    let foreign = foreign_window(&host);
    assert!(api.tracked_ids().is_empty());

    let first = api.create(&CreateData::default()).id;
    let second = api.create(&CreateData::default()).id;
    let mut ids = api.tracked_ids();
    ids.sort_unstable();
    assert_eq!(ids, vec![first, second]);
    assert!(!ids.contains(&foreign));

    api.remove(first);
    assert_eq!(api.tracked_ids(), vec![second]);

    host.close_window(SurfaceId(second));
    assert!(api.tracked_ids().is_empty());
}

#[test]
fn test_drop_unregisters_close_listeners() {
    let host = Arc::new(MemoryHost::new());
    let (sink, events) = recorder();
    let id = {
        let api = WindowsApi::new("ext", sink, host.clone());
        let id = api.create(&CreateData::default()).id;
        assert_eq!(host.window_listener_count(), 1);
        id
    };
    assert_eq!(host.window_listener_count(), 0);

    host.close_window(SurfaceId(id));
    assert_eq!(removed_events(&events, id), 0);
}

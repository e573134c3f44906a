//! The `cookies` extension API.
//!
//! Translates between the host cookie jar and the platform's cookie model:
//!
//! | Platform | Host | Notes |
//! |----------|------|-------|
//! | [`Cookie`] | [`HostCookie`](crate::host::HostCookie) | `sameSite` fixed to `no_restriction`, `storeId` fixed to `"0"` |
//! | [`ChangeCause`] | [`HostChangeCause`](crate::host::HostChangeCause) | `expired-overwrite` becomes `expired_overwrite` |
//! | `onChanged` | `CookieHost::on_cookie_changed` | subscribed once per adapter |
//!
//! # Example
//!
//! ```rust
//! use crxshim::cookies::{CookieDetails, CookiesApi};
//! use crxshim::handler::{EventSink, ExtensionEvent};
//! use crxshim::host::memory::MemoryHost;
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let sink: EventSink = Arc::new(|event: ExtensionEvent| println!("{}", event.event_name));
//! let cookies = CookiesApi::new("my-extension", sink, Arc::new(MemoryHost::new()));
//!
//! let details = CookieDetails::new("https://example.com/").name("sid").value("1");
//! cookies.set(&details).await;
//! let cookie = cookies.get(&details).await.unwrap();
//! assert_eq!(cookie.store_id.as_str(), "0");
//! # }
//! ```

mod api;
mod cookie;

pub use api::CookiesApi;
pub use cookie::{
    ChangeCause, Cookie, CookieChangeInfo, CookieDetails, CookiesEvent, GetAllDetails,
    RemovedCookie, SameSiteStatus, SetCookieResult, StoreId,
};

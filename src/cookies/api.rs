use crate::base::completion;
use crate::base::shimerror::{ShimError, ShimResult};
use crate::cookies::cookie::{
    from_epoch_seconds, Cookie, CookieChangeInfo, CookieDetails, CookiesEvent, GetAllDetails,
    RemovedCookie, SetCookieResult, StoreId,
};
use crate::handler::{ApiHandler, Args, EventEmitter, EventSink, Handling};
use crate::host::{CookieChange, CookieHost, CookieQuery, CookieWrite, HostCookie, ListenerId};
use serde_json::Value;
use std::sync::Arc;
use url::Url;

/// The `cookies` API of one extension, backed by the host cookie jar.
///
/// Every platform-shaped method resolves exactly once and never fails; a
/// miss or a host error becomes the platform's documented empty result.
/// The `try_*` variants expose the underlying error instead.
pub struct CookiesApi {
    host: Arc<dyn CookieHost>,
    emitter: EventEmitter<CookiesEvent>,
    listener: ListenerId,
}

impl CookiesApi {
    /// Create the adapter and subscribe to host cookie changes.
    ///
    /// The subscription lives as long as the adapter.
    pub fn new(
        extension_id: impl Into<String>,
        sink: EventSink,
        host: Arc<dyn CookieHost>,
    ) -> Self {
        let emitter = EventEmitter::new(extension_id, sink);
        let forward = emitter.clone();
        let listener = host.on_cookie_changed(Arc::new(move |change: CookieChange| {
            let info = CookieChangeInfo {
                cookie: Cookie::from_host(&change.cookie),
                cause: change.cause.into(),
                removed: change.removed,
            };
            forward.emit(CookiesEvent::OnChanged, &info);
        }));

        Self {
            host,
            emitter,
            listener,
        }
    }

    pub fn extension_id(&self) -> &str {
        self.emitter.extension_id()
    }

    /// `cookies.get`: the first cookie for `url` (and `name`, if given), or
    /// `None` when there is no match.
    pub async fn get(&self, details: &CookieDetails) -> Option<Cookie> {
        let url = match parse_url(&details.url) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!(error = %e, "cookies.get: treating as miss");
                return None;
            }
        };

        let query = CookieQuery {
            name: details.name.clone(),
            ..CookieQuery::for_url(url)
        };

        match self.query(query).await {
            Ok(cookies) => cookies.first().map(Cookie::from_host),
            Err(e) => {
                tracing::debug!(error = %e, "cookies.get: host query failed");
                None
            }
        }
    }

    /// `cookies.getAll`, reporting host errors.
    pub async fn try_get_all(&self, details: &GetAllDetails) -> ShimResult<Vec<Cookie>> {
        let url = details.url.as_deref().map(parse_url).transpose()?;
        let query = CookieQuery {
            url,
            name: details.name.clone(),
            domain: details.domain.clone(),
            path: details.path.clone(),
            secure: details.secure,
            session: details.session,
        };

        let cookies = self.query(query).await?;
        Ok(cookies.iter().map(Cookie::from_host).collect())
    }

    /// `cookies.getAll`: every matching cookie, empty on error.
    pub async fn get_all(&self, details: &GetAllDetails) -> Vec<Cookie> {
        self.try_get_all(details).await.unwrap_or_else(|e| {
            tracing::debug!(error = %e, "cookies.getAll: returning no cookies");
            Vec::new()
        })
    }

    /// `cookies.set`, reporting host errors.
    pub async fn try_set(&self, details: &CookieDetails) -> ShimResult<SetCookieResult> {
        let url = parse_url(&details.url)?;
        let expiration_time = match details.expiration_date {
            Some(seconds) => Some(from_epoch_seconds(seconds).ok_or_else(|| {
                ShimError::invalid_arguments("set", format!("expirationDate {} out of range", seconds))
            })?),
            None => None,
        };

        let write = CookieWrite {
            url,
            name: details.name.clone().unwrap_or_default(),
            value: details.value.clone().unwrap_or_default(),
            domain: details.domain.clone(),
            path: details.path.clone(),
            secure: details.secure.unwrap_or(false),
            http_only: details.http_only.unwrap_or(false),
            expiration_time,
        };

        let (done, pending) = completion::pending();
        self.host.write_cookie(write, done);
        pending.await??;

        Ok(SetCookieResult {
            name: details.name.clone(),
            value: details.value.clone(),
            domain: details.domain.clone(),
            path: details.path.clone(),
            secure: details.secure,
            http_only: details.http_only,
            expiration_date: details.expiration_date,
            store_id: StoreId::DEFAULT,
        })
    }

    /// `cookies.set`: the written details, or `None` if the host refused
    /// the write.
    pub async fn set(&self, details: &CookieDetails) -> Option<SetCookieResult> {
        match self.try_set(details).await {
            Ok(result) => Some(result),
            Err(e) => {
                tracing::debug!(error = %e, "cookies.set: write failed");
                None
            }
        }
    }

    /// `cookies.remove`, reporting host errors.
    pub async fn try_remove(&self, details: &CookieDetails) -> ShimResult<RemovedCookie> {
        let reply = removed_reply(details);
        let url = parse_url(&details.url)?;
        let name = details.name.clone().unwrap_or_default();

        let (done, pending) = completion::pending();
        self.host.delete_cookie(url, name, done);
        pending.await??;

        Ok(reply)
    }

    /// `cookies.remove`: always echoes `{url, name, storeId}`, whether or
    /// not a cookie was deleted.
    pub async fn remove(&self, details: &CookieDetails) -> RemovedCookie {
        if let Err(e) = self.try_remove(details).await {
            tracing::debug!(error = %e, "cookies.remove: ignoring host error");
        }
        removed_reply(details)
    }

    /// `cookies.getAllCookieStores`: not supported, only one implicit
    /// store exists.
    pub fn get_all_cookie_stores(&self) {}

    async fn query(&self, query: CookieQuery) -> ShimResult<Vec<HostCookie>> {
        let (done, pending) = completion::pending();
        self.host.query_cookies(query, done);
        Ok(pending.await??)
    }
}

impl Drop for CookiesApi {
    fn drop(&mut self) {
        self.host.remove_cookie_listener(self.listener);
    }
}

impl ApiHandler for CookiesApi {
    fn api_name(&self) -> &'static str {
        "cookies"
    }

    fn handle<'a>(&'a self, method: &'a str, args: Vec<Value>) -> Handling<'a> {
        Box::pin(async move {
            let args = Args::new(method, args);
            let reply = match method {
                "get" => serde_json::to_value(self.get(&args.required(0)?).await)?,
                "getAll" => serde_json::to_value(self.get_all(&args.optional(0)?).await)?,
                "set" => serde_json::to_value(self.set(&args.required(0)?).await)?,
                "remove" => serde_json::to_value(self.remove(&args.required(0)?).await)?,
                "getAllCookieStores" => {
                    self.get_all_cookie_stores();
                    Value::Null
                }
                _ => return Err(ShimError::unknown_method("cookies", method)),
            };
            Ok(reply)
        })
    }
}

fn parse_url(url: &str) -> ShimResult<Url> {
    Url::parse(url).map_err(|e| ShimError::invalid_url(url, e))
}

fn removed_reply(details: &CookieDetails) -> RemovedCookie {
    RemovedCookie {
        url: details.url.clone(),
        name: details.name.clone(),
        store_id: StoreId::DEFAULT,
    }
}

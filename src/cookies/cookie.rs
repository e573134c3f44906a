use crate::handler::ApiEvent;
use crate::host::{HostChangeCause, HostCookie};
use serde::{Deserialize, Serialize, Serializer};
use time::{Duration, OffsetDateTime};

/// Identifier of a cookie store.
///
/// Only one implicit store is exposed, so every cookie and every reply
/// carries [`StoreId::DEFAULT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StoreId(&'static str);

impl StoreId {
    pub const DEFAULT: StoreId = StoreId("0");

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl Default for StoreId {
    fn default() -> Self {
        StoreId::DEFAULT
    }
}

impl Serialize for StoreId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SameSiteStatus {
    NoRestriction,
    Lax,
    Strict,
    Unspecified,
}

/// A cookie as extension scripts see it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub host_only: bool,
    pub path: String,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSiteStatus,
    pub session: bool,
    /// Seconds since the UNIX epoch. Absent for session cookies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<f64>,
    pub store_id: StoreId,
}

impl Cookie {
    /// Translate a host cookie.
    ///
    /// The host does not report SameSite in a form the platform can use, so
    /// it is always `no_restriction`.
    pub fn from_host(cookie: &HostCookie) -> Self {
        Self {
            name: cookie.name.clone(),
            value: cookie.value.clone(),
            domain: cookie.domain.clone(),
            host_only: cookie.host_only,
            path: cookie.path.clone(),
            secure: cookie.secure,
            http_only: cookie.http_only,
            same_site: SameSiteStatus::NoRestriction,
            session: cookie.is_session(),
            expiration_date: cookie.expiration_time.map(to_epoch_seconds),
            store_id: StoreId::DEFAULT,
        }
    }
}

pub(crate) fn to_epoch_seconds(time: OffsetDateTime) -> f64 {
    time.unix_timestamp() as f64 + f64::from(time.nanosecond()) / 1_000_000_000.0
}

/// `None` for values that are not a representable instant.
pub(crate) fn from_epoch_seconds(seconds: f64) -> Option<OffsetDateTime> {
    if !seconds.is_finite() {
        return None;
    }
    // Whole seconds and the fraction convert separately so that a value
    // read back through `to_epoch_seconds` is bit-identical.
    let whole = seconds.floor();
    let nanos = ((seconds - whole) * 1_000_000_000.0).round() as i64;
    OffsetDateTime::from_unix_timestamp(whole as i64)
        .ok()?
        .checked_add(Duration::nanoseconds(nanos))
}

/// Why a cookie changed, in the platform's taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeCause {
    Explicit,
    Overwrite,
    Expired,
    Evicted,
    ExpiredOverwrite,
}

impl From<HostChangeCause> for ChangeCause {
    fn from(cause: HostChangeCause) -> Self {
        match cause {
            HostChangeCause::Explicit => ChangeCause::Explicit,
            HostChangeCause::Overwrite => ChangeCause::Overwrite,
            HostChangeCause::Expired => ChangeCause::Expired,
            HostChangeCause::Evicted => ChangeCause::Evicted,
            HostChangeCause::ExpiredOverwrite => ChangeCause::ExpiredOverwrite,
        }
    }
}

/// Payload of `cookies.onChanged`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CookieChangeInfo {
    pub cookie: Cookie,
    pub cause: ChangeCause,
    pub removed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookiesEvent {
    OnChanged,
}

impl ApiEvent for CookiesEvent {
    fn name(&self) -> &'static str {
        match self {
            CookiesEvent::OnChanged => "onChanged",
        }
    }
}

/// Argument of `cookies.get`, `cookies.set` and `cookies.remove`.
///
/// `sameSite` and `storeId` are accepted but ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CookieDetails {
    pub url: String,
    pub name: Option<String>,
    pub value: Option<String>,
    pub domain: Option<String>,
    pub path: Option<String>,
    pub secure: Option<bool>,
    pub http_only: Option<bool>,
    pub expiration_date: Option<f64>,
    pub same_site: Option<SameSiteStatus>,
    pub store_id: Option<String>,
}

impl CookieDetails {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

/// Argument of `cookies.getAll`. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetAllDetails {
    pub url: Option<String>,
    pub name: Option<String>,
    pub domain: Option<String>,
    pub path: Option<String>,
    pub secure: Option<bool>,
    pub session: Option<bool>,
    pub store_id: Option<String>,
}

/// Reply of a successful `cookies.set`: the written fields, echoed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetCookieResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secure: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<f64>,
    pub store_id: StoreId,
}

/// Reply of `cookies.remove`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovedCookie {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub store_id: StoreId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::datetime;

    #[test]
    fn test_cause_remap_table() {
        let pairs = [
            (HostChangeCause::Explicit, "explicit"),
            (HostChangeCause::Overwrite, "overwrite"),
            (HostChangeCause::Expired, "expired"),
            (HostChangeCause::Evicted, "evicted"),
            (HostChangeCause::ExpiredOverwrite, "expired_overwrite"),
        ];
        for (host, platform) in pairs {
            let cause = ChangeCause::from(host);
            assert_eq!(serde_json::to_value(cause).unwrap(), json!(platform));
        }
    }

    #[test]
    fn test_from_host_wire_shape() {
        let mut host = HostCookie::new("sid", "abc", ".example.com", "/");
        host.host_only = false;
        host.secure = true;
        host.expiration_time = Some(datetime!(2030-01-01 0:00 UTC));

        let cookie = Cookie::from_host(&host);
        assert_eq!(
            serde_json::to_value(&cookie).unwrap(),
            json!({
                "name": "sid",
                "value": "abc",
                "domain": ".example.com",
                "hostOnly": false,
                "path": "/",
                "secure": true,
                "httpOnly": false,
                "sameSite": "no_restriction",
                "session": false,
                "expirationDate": 1893456000.0,
                "storeId": "0"
            })
        );
    }

    #[test]
    fn test_session_cookie_omits_expiration() {
        let host = HostCookie::new("a", "b", "example.com", "/");
        let value = serde_json::to_value(Cookie::from_host(&host)).unwrap();
        assert_eq!(value["session"], json!(true));
        assert!(value.get("expirationDate").is_none());
    }

    #[test]
    fn test_epoch_seconds_conversion() {
        let t = from_epoch_seconds(1893456000.5).unwrap();
        assert_eq!(t.unix_timestamp(), 1893456000);
        assert!((to_epoch_seconds(t) - 1893456000.5).abs() < 1e-3);
        assert!(from_epoch_seconds(f64::NAN).is_none());
        assert!(from_epoch_seconds(1e300).is_none());
    }

    #[test]
    fn test_epoch_seconds_round_trip_is_exact() {
        for i in 0..1000 {
            let seconds = 1_893_456_000.0001 + i as f64 * 0.001;
            let back = to_epoch_seconds(from_epoch_seconds(seconds).unwrap());
            assert_eq!(back, seconds, "drift at {}", seconds);
        }
        let before_epoch = -12.25;
        assert_eq!(
            to_epoch_seconds(from_epoch_seconds(before_epoch).unwrap()),
            before_epoch
        );
    }

    #[test]
    fn test_details_accept_platform_fields() {
        let details: CookieDetails = serde_json::from_value(json!({
            "url": "https://a.com/",
            "name": "x",
            "httpOnly": true,
            "sameSite": "lax",
            "storeId": "7"
        }))
        .unwrap();
        assert_eq!(details.http_only, Some(true));
        assert_eq!(details.same_site, Some(SameSiteStatus::Lax));
        assert_eq!(details.store_id.as_deref(), Some("7"));
    }
}

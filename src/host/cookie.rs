use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use url::Url;

/// A cookie as the embedding host stores it.
/// Modeled after Chromium's `net::CanonicalCookie`.
///
/// `domain` carries a leading dot for domain cookies and is bare for
/// host-only cookies, which is how Chromium-based hosts report it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostCookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    pub creation_time: OffsetDateTime,
    pub expiration_time: Option<OffsetDateTime>,
    pub secure: bool,
    pub http_only: bool,
    pub host_only: bool,
    pub same_site: HostSameSite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostSameSite {
    Unspecified,
    NoRestriction,
    Lax,
    Strict,
}

impl HostCookie {
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        domain: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: domain.into(),
            path: path.into(),
            creation_time: OffsetDateTime::now_utc(),
            expiration_time: None,
            secure: false,
            http_only: false,
            host_only: true,
            same_site: HostSameSite::Unspecified,
        }
    }

    /// Session cookies have no expiration time.
    pub fn is_session(&self) -> bool {
        self.expiration_time.is_none()
    }

    pub fn is_expired(&self, current_time: OffsetDateTime) -> bool {
        self.expiration_time
            .is_some_and(|expiry| expiry <= current_time)
    }

    /// Domain without the leading dot, used as the storage key.
    pub fn bare_domain(&self) -> &str {
        self.domain.trim_start_matches('.')
    }
}

/// Why the host's cookie store changed, in the host's own taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HostChangeCause {
    Explicit,
    Overwrite,
    Expired,
    Evicted,
    ExpiredOverwrite,
}

impl HostChangeCause {
    /// The host's spelling of this cause.
    pub fn as_str(&self) -> &'static str {
        match self {
            HostChangeCause::Explicit => "explicit",
            HostChangeCause::Overwrite => "overwrite",
            HostChangeCause::Expired => "expired",
            HostChangeCause::Evicted => "evicted",
            HostChangeCause::ExpiredOverwrite => "expired-overwrite",
        }
    }
}

/// A single host cookie-change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieChange {
    pub cookie: HostCookie,
    pub cause: HostChangeCause,
    pub removed: bool,
}

impl CookieChange {
    pub fn added(cookie: HostCookie) -> Self {
        Self {
            cookie,
            cause: HostChangeCause::Explicit,
            removed: false,
        }
    }

    pub fn removed(cookie: HostCookie, cause: HostChangeCause) -> Self {
        Self {
            cookie,
            cause,
            removed: true,
        }
    }
}

/// Filter for a host cookie query. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieQuery {
    /// Only cookies that would be sent to this URL.
    pub url: Option<Url>,
    pub name: Option<String>,
    /// Cookies whose domain equals or is a subdomain of this one.
    pub domain: Option<String>,
    pub path: Option<String>,
    pub secure: Option<bool>,
    pub session: Option<bool>,
}

impl CookieQuery {
    pub fn for_url(url: Url) -> Self {
        Self {
            url: Some(url),
            ..Default::default()
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A cookie write request handed to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieWrite {
    pub url: Url,
    pub name: String,
    pub value: String,
    /// Explicit domain; `None` makes a host-only cookie for the URL's host.
    pub domain: Option<String>,
    /// Explicit path; `None` derives the default path from the URL.
    pub path: Option<String>,
    pub secure: bool,
    pub http_only: bool,
    /// `None` makes a session cookie.
    pub expiration_time: Option<OffsetDateTime>,
}

impl CookieWrite {
    pub fn new(url: Url, name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            url,
            name: name.into(),
            value: value.into(),
            domain: None,
            path: None,
            secure: false,
            http_only: false,
            expiration_time: None,
        }
    }
}

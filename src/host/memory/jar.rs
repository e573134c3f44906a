use crate::base::shimerror::HostError;
use crate::host::{CookieChange, CookieQuery, CookieWrite, HostChangeCause, HostCookie, HostSameSite};
use dashmap::DashMap;
use std::sync::Arc;
use time::OffsetDateTime;
use url::Url;

/// Maximum cookies per domain (Chromium default).
const MAX_COOKIES_PER_DOMAIN: usize = 50;

/// Maximum total cookies.
/// Chromium uses 3300, but we use a slightly lower limit to keep memory usage predictable.
const MAX_COOKIES_TOTAL: usize = 3000;

/// In-memory cookie jar with Chromium-style change reporting.
///
/// Every mutating call returns the change notifications it produced, in
/// order, so the owner can forward them after all map guards are released.
#[derive(Clone, Default)]
pub struct MemoryCookieJar {
    // Map<bare domain, cookies>
    store: Arc<DashMap<String, Vec<HostCookie>>>,
}

impl MemoryCookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a write request the way a browser cookie store would.
    pub fn write(&self, write: CookieWrite) -> Result<Vec<CookieChange>, HostError> {
        let cookie = Self::cookie_from_write(write)?;
        Ok(self.set_host_cookie(cookie, OffsetDateTime::now_utc()))
    }

    fn cookie_from_write(write: CookieWrite) -> Result<HostCookie, HostError> {
        let host = write
            .url
            .host_str()
            .ok_or_else(|| HostError::InvalidUrl {
                url: write.url.to_string(),
            })?
            .to_lowercase();

        if write.name.contains(';') || write.name.contains('=') {
            return Err(HostError::write_rejected("invalid cookie name"));
        }

        if write.secure && write.url.scheme() != "https" {
            return Err(HostError::write_rejected(
                "secure cookie from an insecure URL",
            ));
        }

        let (domain, host_only) = match write.domain.as_deref() {
            Some(d) if !d.is_empty() => {
                let bare = d.trim_start_matches('.').to_lowercase();
                if !domain_covers_host(&bare, &host) {
                    return Err(HostError::write_rejected(format!(
                        "domain '{}' is not valid for host '{}'",
                        bare, host
                    )));
                }
                (format!(".{}", bare), false)
            }
            _ => (host, true),
        };

        let path = match write.path {
            Some(p) if p.starts_with('/') => p,
            _ => default_path(&write.url),
        };

        Ok(HostCookie {
            name: write.name,
            value: write.value,
            domain,
            path,
            creation_time: OffsetDateTime::now_utc(),
            expiration_time: write.expiration_time,
            secure: write.secure,
            http_only: write.http_only,
            host_only,
            same_site: HostSameSite::Unspecified,
        })
    }

    /// Insert a cookie, reporting what it displaced.
    pub fn set_host_cookie(&self, cookie: HostCookie, now: OffsetDateTime) -> Vec<CookieChange> {
        let mut changes = Vec::new();
        let key = cookie.bare_domain().to_string();
        let mut entry = self.store.entry(key).or_default();

        let existing = entry
            .iter()
            .position(|c| c.name == cookie.name && c.path == cookie.path && c.domain == cookie.domain)
            .map(|idx| entry.remove(idx));

        if cookie.is_expired(now) {
            // An already-expired write only deletes what it would have replaced.
            if let Some(old) = existing {
                changes.push(CookieChange::removed(old, HostChangeCause::ExpiredOverwrite));
            }
            return changes;
        }

        if let Some(old) = existing {
            changes.push(CookieChange::removed(old, HostChangeCause::Overwrite));
        }

        // Enforce per-domain limit, evicting oldest-first
        while entry.len() >= MAX_COOKIES_PER_DOMAIN {
            if let Some(oldest_idx) = entry
                .iter()
                .enumerate()
                .min_by_key(|(_, c)| c.creation_time)
                .map(|(i, _)| i)
            {
                let evicted = entry.remove(oldest_idx);
                changes.push(CookieChange::removed(evicted, HostChangeCause::Evicted));
            } else {
                break;
            }
        }

        entry.push(cookie.clone());
        drop(entry); // Release lock before checking global count
        changes.push(CookieChange::added(cookie));

        changes.extend(self.enforce_global_limit());
        changes
    }

    /// Enforce the global cookie limit by evicting oldest cookies.
    fn enforce_global_limit(&self) -> Vec<CookieChange> {
        let mut changes = Vec::new();
        while self.total_cookie_count() > MAX_COOKIES_TOTAL {
            let mut oldest: Option<(String, usize, OffsetDateTime)> = None;

            for entry in self.store.iter() {
                for (idx, cookie) in entry.value().iter().enumerate() {
                    let older = oldest
                        .as_ref()
                        .map_or(true, |(_, _, t)| cookie.creation_time < *t);
                    if older {
                        oldest = Some((entry.key().clone(), idx, cookie.creation_time));
                    }
                }
            }

            let Some((domain, idx, _)) = oldest else {
                break;
            };
            if let Some(mut entry) = self.store.get_mut(&domain) {
                if idx < entry.len() {
                    let evicted = entry.remove(idx);
                    changes.push(CookieChange::removed(evicted, HostChangeCause::Evicted));
                }
            }
        }
        changes
    }

    /// Run a query. Expired cookies are purged first and reported.
    pub fn query(&self, query: &CookieQuery) -> (Vec<HostCookie>, Vec<CookieChange>) {
        let now = OffsetDateTime::now_utc();
        let changes = self.purge_expired(now);
        let mut result = Vec::new();

        for entry in self.store.iter() {
            for cookie in entry.value() {
                if Self::query_matches(query, cookie) {
                    result.push(cookie.clone());
                }
            }
        }

        // Sort by path length (longest first) then creation time
        result.sort_by(|a, b| {
            b.path
                .len()
                .cmp(&a.path.len())
                .then_with(|| a.creation_time.cmp(&b.creation_time))
        });

        (result, changes)
    }

    fn query_matches(query: &CookieQuery, cookie: &HostCookie) -> bool {
        if let Some(url) = &query.url {
            if !Self::matches_url(cookie, url) {
                return false;
            }
        }
        if query.name.as_ref().is_some_and(|n| n != &cookie.name) {
            return false;
        }
        if let Some(domain) = &query.domain {
            let filter = domain.trim_start_matches('.');
            let bare = cookie.bare_domain();
            let within = bare.eq_ignore_ascii_case(filter)
                || bare
                    .to_lowercase()
                    .ends_with(&format!(".{}", filter.to_lowercase()));
            if !within {
                return false;
            }
        }
        if query.path.as_ref().is_some_and(|p| p != &cookie.path) {
            return false;
        }
        if query.secure.is_some_and(|s| s != cookie.secure) {
            return false;
        }
        if query.session.is_some_and(|s| s != cookie.is_session()) {
            return false;
        }
        true
    }

    /// Whether `cookie` would be sent with a request to `url`.
    fn matches_url(cookie: &HostCookie, url: &Url) -> bool {
        let host = url.host_str().unwrap_or("");
        Self::domain_matches(cookie.bare_domain(), host, cookie.host_only)
            && Self::path_matches(&cookie.path, url.path())
            && (!cookie.secure || url.scheme() == "https")
    }

    /// Delete cookies named `name` that match `url`.
    pub fn delete(&self, url: &Url, name: &str) -> Vec<CookieChange> {
        let mut changes = Vec::new();
        for mut entry in self.store.iter_mut() {
            let mut kept = Vec::with_capacity(entry.len());
            for cookie in entry.value_mut().drain(..) {
                if cookie.name == name && Self::matches_url(&cookie, url) {
                    changes.push(CookieChange::removed(cookie, HostChangeCause::Explicit));
                } else {
                    kept.push(cookie);
                }
            }
            *entry.value_mut() = kept;
        }
        changes
    }

    fn purge_expired(&self, now: OffsetDateTime) -> Vec<CookieChange> {
        let mut changes = Vec::new();
        for mut entry in self.store.iter_mut() {
            if !entry.value().iter().any(|c| c.is_expired(now)) {
                continue;
            }
            let (expired, live): (Vec<_>, Vec<_>) =
                entry.value_mut().drain(..).partition(|c| c.is_expired(now));
            *entry.value_mut() = live;
            changes.extend(
                expired
                    .into_iter()
                    .map(|c| CookieChange::removed(c, HostChangeCause::Expired)),
            );
        }
        changes
    }

    /// Check if cookie domain matches request host.
    /// Implements RFC 6265 domain matching.
    fn domain_matches(cookie_domain: &str, request_host: &str, host_only: bool) -> bool {
        if host_only {
            return cookie_domain.eq_ignore_ascii_case(request_host);
        }

        if request_host.eq_ignore_ascii_case(cookie_domain) {
            return true;
        }

        // Check if request_host ends with .cookie_domain
        if request_host.len() > cookie_domain.len() {
            let split = request_host.len() - cookie_domain.len();
            let suffix = &request_host[split..];
            if suffix.eq_ignore_ascii_case(cookie_domain) {
                return request_host.as_bytes()[split - 1] == b'.';
            }
        }

        false
    }

    /// Check if request path matches cookie path.
    /// Implements RFC 6265 path matching.
    fn path_matches(cookie_path: &str, request_path: &str) -> bool {
        if request_path == cookie_path {
            return true;
        }

        if let Some(rest) = request_path.strip_prefix(cookie_path) {
            return cookie_path.ends_with('/') || rest.starts_with('/');
        }

        false
    }

    /// Parse a `Set-Cookie` line and store it, as if `url` had sent it.
    pub fn parse_and_save_cookie(&self, url: &Url, cookie_line: &str) -> Vec<CookieChange> {
        let parsed = match cookie::Cookie::parse(cookie_line) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::debug!(line = %cookie_line, error = %e, "failed to parse cookie");
                return Vec::new();
            }
        };

        let same_site = match parsed.same_site() {
            Some(cookie::SameSite::Lax) => HostSameSite::Lax,
            Some(cookie::SameSite::Strict) => HostSameSite::Strict,
            Some(cookie::SameSite::None) => HostSameSite::NoRestriction,
            None => HostSameSite::Unspecified,
        };

        let write = CookieWrite {
            url: url.clone(),
            name: parsed.name().to_string(),
            value: parsed.value().to_string(),
            domain: parsed.domain().map(str::to_string),
            path: parsed.path().map(str::to_string),
            secure: parsed.secure().unwrap_or(false),
            http_only: parsed.http_only().unwrap_or(false),
            // Max-Age wins over Expires (RFC 6265 5.3)
            expiration_time: parsed
                .max_age()
                .map(|age| OffsetDateTime::now_utc() + age)
                .or_else(|| parsed.expires().and_then(|e| e.datetime())),
        };

        match Self::cookie_from_write(write) {
            Ok(mut cookie) => {
                cookie.same_site = same_site;
                self.set_host_cookie(cookie, OffsetDateTime::now_utc())
            }
            Err(e) => {
                tracing::debug!(line = %cookie_line, error = %e, "cookie rejected");
                Vec::new()
            }
        }
    }

    /// Get total cookie count.
    pub fn total_cookie_count(&self) -> usize {
        self.store.iter().map(|e| e.value().len()).sum()
    }

}

/// Whether an explicit cookie `domain` may be set from `host`.
///
/// Both arguments are lowercase and dot-free at the front. A domain with no
/// registrable part (`com`, `co.uk`, `github.io`) is a public suffix.
fn domain_covers_host(domain: &str, host: &str) -> bool {
    if psl::domain_str(domain).is_none() {
        return false;
    }
    host.strip_suffix(domain)
        .is_some_and(|rest| rest.is_empty() || rest.ends_with('.'))
}

/// RFC 6265 default-path: the URL path up to, not including, its last '/'.
fn default_path(url: &Url) -> String {
    let path = url.path();
    match path.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(idx) => path[..idx].to_string(),
    }
}

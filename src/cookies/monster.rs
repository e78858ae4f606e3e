use crate::base::clock::{Clock, SystemClock};
use crate::base::error::CookieError;
use crate::cookies::canonical_cookie::{CanonicalCookie, MAX_COOKIE_LIFETIME};
use crate::cookies::psl;
use cookie::Cookie;
use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;
use time::OffsetDateTime;
use url::Url;

/// Maximum cookies per domain bucket before the oldest is evicted.
const MAX_COOKIES_PER_DOMAIN: usize = 50;

/// In-memory cookie jar with RFC 6265 scoping.
/// Modeled after Chromium's `net::CookieMonster`.
///
/// Cloning yields another handle onto the same jar, the way every tab of a
/// browser profile shares one cookie store.
#[derive(Clone)]
pub struct CookieMonster {
    // Map<Domain, List<Cookie>>
    store: Arc<DashMap<String, Vec<CanonicalCookie>>>,
    clock: Arc<dyn Clock>,
}

impl Default for CookieMonster {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CookieMonster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CookieMonster")
            .field("cookies", &self.total_cookie_count())
            .finish()
    }
}

impl CookieMonster {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Jar that evaluates expiry against `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            store: Arc::new(DashMap::new()),
            clock,
        }
    }

    /// Insert or replace a cookie. A cookie that is already expired deletes
    /// the stored cookie with the same identity instead.
    pub fn set_canonical_cookie(&self, mut cookie: CanonicalCookie) {
        let now = self.clock.now();
        let mut entry = self
            .store
            .entry(cookie.domain.to_ascii_lowercase())
            .or_default();

        if let Some(existing) = entry.iter().find(|c| c.same_identity(&cookie)) {
            // Overwrites keep their original creation time.
            cookie.creation_time = existing.creation_time;
        }
        entry.retain(|c| !c.same_identity(&cookie) && !c.is_expired(now));

        if cookie.is_expired(now) {
            tracing::trace!(name = %cookie.name, domain = %cookie.domain, "cookie deleted");
            return;
        }

        while entry.len() >= MAX_COOKIES_PER_DOMAIN {
            let Some(oldest_idx) = entry
                .iter()
                .enumerate()
                .min_by_key(|(_, c)| c.creation_time)
                .map(|(i, _)| i)
            else {
                break;
            };
            let evicted = entry.remove(oldest_idx);
            tracing::debug!(name = %evicted.name, domain = %evicted.domain, "evicted oldest cookie");
        }

        tracing::trace!(name = %cookie.name, domain = %cookie.domain, path = %cookie.path, "cookie stored");
        entry.push(cookie);
    }

    /// Apply one `document.cookie = line` assignment made by a page at `url`.
    pub fn parse_and_save_cookie(&self, url: &Url, cookie_line: &str) -> Result<(), CookieError> {
        let parsed = Cookie::parse_encoded(cookie_line.to_owned())?;
        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| CookieError::InvalidUrl {
                reason: format!("{url} has no host"),
            })?
            .to_ascii_lowercase();
        let now = self.clock.now();

        let (domain, host_only) = match parsed.domain().filter(|d| !d.is_empty()) {
            Some(d) => {
                let d = d.trim_start_matches('.').to_ascii_lowercase();
                if psl::is_public_suffix(&d) {
                    return Err(CookieError::PublicSuffix { domain: d });
                }
                if !psl::is_valid_cookie_domain(&d, &host) {
                    return Err(CookieError::domain_mismatch(d, host));
                }
                (d, false)
            }
            None => (host, true),
        };

        let path = parsed
            .path()
            .filter(|p| p.starts_with('/'))
            .map(str::to_string)
            .unwrap_or_else(|| default_path(url.path()));

        // Max-Age wins over Expires. Both are capped at MAX_COOKIE_LIFETIME.
        let cap = now + MAX_COOKIE_LIFETIME;
        let expiration_time = match parsed.max_age() {
            Some(max_age) => Some(
                now.checked_add(max_age.min(MAX_COOKIE_LIFETIME))
                    .unwrap_or(OffsetDateTime::UNIX_EPOCH),
            ),
            None => parsed.expires().and_then(|e| e.datetime()).map(|t| t.min(cap)),
        };

        let secure = parsed.secure().unwrap_or(false);
        if secure && url.scheme() != "https" {
            return Err(CookieError::malformed("Secure cookie set from an insecure page"));
        }

        self.set_canonical_cookie(CanonicalCookie {
            name: parsed.name().to_string(),
            value: parsed.value().to_string(),
            domain,
            path,
            creation_time: now,
            expiration_time,
            secure,
            http_only: parsed.http_only().unwrap_or(false),
            host_only,
        });
        Ok(())
    }

    /// Cookies a request to `url` would carry, longest path first, then oldest first.
    pub fn get_cookies_for_url(&self, url: &Url) -> Vec<CanonicalCookie> {
        let host = url.host_str().unwrap_or("").to_ascii_lowercase();
        let now = self.clock.now();
        let mut result = Vec::new();

        for domain in Self::get_matching_domains(&host) {
            let Some(entry) = self.store.get(&domain) else {
                continue;
            };
            result.extend(
                entry
                    .iter()
                    .filter(|c| Self::domain_matches(&c.domain, &host, c.host_only))
                    .filter(|c| Self::path_matches(&c.path, url.path()))
                    .filter(|c| !c.secure || url.scheme() == "https")
                    .filter(|c| !c.is_expired(now))
                    .cloned(),
            );
        }

        result.sort_by(|a, b| {
            b.path
                .len()
                .cmp(&a.path.len())
                .then_with(|| a.creation_time.cmp(&b.creation_time))
        });
        result
    }

    /// The string a script at `url` reads from `document.cookie`.
    /// HttpOnly cookies are hidden from scripts.
    pub fn cookie_header(&self, url: &Url) -> String {
        self.get_cookies_for_url(url)
            .iter()
            .filter(|c| !c.http_only)
            .map(|c| Cookie::new(c.name.as_str(), c.value.as_str()).encoded().to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// First cookie named `name` visible at `url`.
    pub fn find(&self, url: &Url, name: &str) -> Option<CanonicalCookie> {
        self.get_cookies_for_url(url)
            .into_iter()
            .find(|c| c.name == name)
    }

    /// The live cookie a page at `url` addresses with this name, path and
    /// `Domain` attribute (`None` for host-only).
    pub fn lookup(
        &self,
        url: &Url,
        name: &str,
        path: &str,
        domain: Option<&str>,
    ) -> Option<CanonicalCookie> {
        let host = url.host_str()?.to_ascii_lowercase();
        let (domain, host_only) = match domain.filter(|d| !d.is_empty()) {
            Some(d) => (d.trim_start_matches('.').to_ascii_lowercase(), false),
            None => (host, true),
        };
        let now = self.clock.now();
        let entry = self.store.get(&domain)?;
        entry
            .iter()
            .find(|c| {
                c.name == name && c.path == path && c.host_only == host_only && !c.is_expired(now)
            })
            .cloned()
    }

    /// RFC 6265 domain matching.
    fn domain_matches(cookie_domain: &str, request_host: &str, host_only: bool) -> bool {
        if host_only {
            return cookie_domain.eq_ignore_ascii_case(request_host);
        }
        if request_host.eq_ignore_ascii_case(cookie_domain) {
            return true;
        }
        request_host
            .len()
            .checked_sub(cookie_domain.len() + 1)
            .is_some_and(|dot| {
                request_host.as_bytes()[dot] == b'.'
                    && request_host[dot + 1..].eq_ignore_ascii_case(cookie_domain)
            })
    }

    /// RFC 6265 path matching.
    fn path_matches(cookie_path: &str, request_path: &str) -> bool {
        if request_path == cookie_path {
            return true;
        }
        match request_path.strip_prefix(cookie_path) {
            Some(rest) => cookie_path.ends_with('/') || rest.starts_with('/'),
            None => false,
        }
    }

    /// The host itself plus every parent domain short of the TLD.
    fn get_matching_domains(host: &str) -> Vec<String> {
        let parts: Vec<&str> = host.split('.').collect();
        let mut domains = vec![host.to_string()];
        for i in 1..parts.len().saturating_sub(1) {
            domains.push(parts[i..].join("."));
        }
        domains
    }

    pub fn total_cookie_count(&self) -> usize {
        self.store.iter().map(|e| e.value().len()).sum()
    }

    pub fn clear(&self) {
        self.store.clear();
    }
}

/// RFC 6265 §5.1.4 default-path of a request path.
fn default_path(request_path: &str) -> String {
    if !request_path.starts_with('/') {
        return "/".to_string();
    }
    match request_path.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(idx) => request_path[..idx].to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::clock::FixedClock;
    use time::Duration;

    fn jar_at(secs: i64) -> (CookieMonster, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::at_unix(secs));
        (CookieMonster::with_clock(clock.clone()), clock)
    }

    #[test]
    fn test_default_path() {
        assert_eq!(default_path(""), "/");
        assert_eq!(default_path("/"), "/");
        assert_eq!(default_path("/landing"), "/");
        assert_eq!(default_path("/promo/landing"), "/promo");
    }

    #[test]
    fn test_path_matches() {
        assert!(CookieMonster::path_matches("/", "/anything"));
        assert!(CookieMonster::path_matches("/promo", "/promo/a"));
        assert!(!CookieMonster::path_matches("/promo", "/promotions"));
    }

    #[test]
    fn test_domain_matches() {
        assert!(CookieMonster::domain_matches("example.com", "www.example.com", false));
        assert!(!CookieMonster::domain_matches("example.com", "www.example.com", true));
        assert!(!CookieMonster::domain_matches("ample.com", "example.com", false));
    }

    #[test]
    fn test_overwrite_keeps_single_cookie() {
        let (jar, _) = jar_at(1_700_000_000);
        let url = Url::parse("https://example.com/").unwrap();
        jar.parse_and_save_cookie(&url, "utm_source=a; Path=/").unwrap();
        jar.parse_and_save_cookie(&url, "utm_source=b; Path=/").unwrap();

        assert_eq!(jar.total_cookie_count(), 1);
        assert_eq!(jar.find(&url, "utm_source").unwrap().value, "b");
    }

    #[test]
    fn test_epoch_expiry_deletes() {
        let (jar, _) = jar_at(1_700_000_000);
        let url = Url::parse("https://example.com/").unwrap();
        jar.parse_and_save_cookie(&url, "utm_source=a; Path=/").unwrap();
        jar.parse_and_save_cookie(&url, "utm_source=; Path=/; Expires=Thu, 01 Jan 1970 00:00:00 GMT")
            .unwrap();

        assert_eq!(jar.total_cookie_count(), 0);
        assert_eq!(jar.cookie_header(&url), "");
    }

    #[test]
    fn test_max_age_uses_clock() {
        let (jar, clock) = jar_at(1_700_000_000);
        let url = Url::parse("https://example.com/").unwrap();
        jar.parse_and_save_cookie(&url, "a=1; Max-Age=60").unwrap();

        let stored = jar.find(&url, "a").unwrap();
        assert_eq!(
            stored.expiration_time,
            Some(OffsetDateTime::from_unix_timestamp(1_700_000_060).unwrap())
        );

        clock.advance(Duration::seconds(61));
        assert!(jar.find(&url, "a").is_none());
    }

    #[test]
    fn test_huge_max_age_is_capped() {
        let (jar, clock) = jar_at(1_700_000_000);
        let url = Url::parse("https://example.com/").unwrap();
        jar.parse_and_save_cookie(&url, "utm_source=news; Max-Age=99999999999999")
            .unwrap();

        let stored = jar.find(&url, "utm_source").unwrap();
        assert_eq!(stored.expiration_time, Some(clock.now() + MAX_COOKIE_LIFETIME));
    }

    #[test]
    fn test_far_future_expires_is_capped() {
        let (jar, clock) = jar_at(1_700_000_000);
        let url = Url::parse("https://example.com/").unwrap();
        jar.parse_and_save_cookie(&url, "a=1; Expires=Fri, 31 Dec 9999 23:59:59 GMT")
            .unwrap();

        let stored = jar.find(&url, "a").unwrap();
        assert_eq!(stored.expiration_time, Some(clock.now() + MAX_COOKIE_LIFETIME));
    }

    #[test]
    fn test_lookup_is_scope_exact() {
        let jar = CookieMonster::new();
        let url = Url::parse("https://www.example.com/promo/a").unwrap();
        jar.parse_and_save_cookie(&url, "utm_source=root; Path=/").unwrap();
        jar.parse_and_save_cookie(&url, "utm_source=promo; Path=/promo").unwrap();
        jar.parse_and_save_cookie(&url, "utm_source=wide; Path=/; Domain=example.com")
            .unwrap();

        let value = |path: &str, domain: Option<&str>| {
            jar.lookup(&url, "utm_source", path, domain).map(|c| c.value)
        };
        assert_eq!(value("/", None).as_deref(), Some("root"));
        assert_eq!(value("/promo", None).as_deref(), Some("promo"));
        assert_eq!(value("/", Some("example.com")).as_deref(), Some("wide"));
        assert_eq!(value("/other", None), None);
    }

    #[test]
    fn test_clear_empties_jar() {
        let jar = CookieMonster::new();
        let url = Url::parse("https://example.com/").unwrap();
        jar.parse_and_save_cookie(&url, "a=1").unwrap();
        jar.parse_and_save_cookie(&url, "b=2").unwrap();

        jar.clear();
        assert_eq!(jar.total_cookie_count(), 0);
        assert_eq!(jar.cookie_header(&url), "");
    }

    #[test]
    fn test_public_suffix_domain_rejected() {
        let jar = CookieMonster::new();
        let url = Url::parse("https://shop.example.co.uk/").unwrap();
        let err = jar
            .parse_and_save_cookie(&url, "a=1; Domain=co.uk")
            .unwrap_err();
        assert!(matches!(err, CookieError::PublicSuffix { .. }));
        assert_eq!(jar.total_cookie_count(), 0);
    }

    #[test]
    fn test_value_round_trips_through_header_encoding() {
        let jar = CookieMonster::new();
        let url = Url::parse("https://example.com/").unwrap();
        jar.parse_and_save_cookie(&url, "utm_term=spring%20sale; Path=/").unwrap();

        assert_eq!(jar.find(&url, "utm_term").unwrap().value, "spring sale");
        assert_eq!(jar.cookie_header(&url), "utm_term=spring%20sale");
    }

    #[test]
    fn test_http_only_hidden_from_header() {
        let jar = CookieMonster::new();
        let url = Url::parse("https://example.com/").unwrap();
        jar.parse_and_save_cookie(&url, "sid=1; HttpOnly").unwrap();
        jar.parse_and_save_cookie(&url, "utm_source=x").unwrap();

        assert_eq!(jar.cookie_header(&url), "utm_source=x");
    }

    #[test]
    fn test_per_domain_eviction() {
        let (jar, clock) = jar_at(1_700_000_000);
        let url = Url::parse("https://example.com/").unwrap();
        for i in 0..=MAX_COOKIES_PER_DOMAIN {
            jar.parse_and_save_cookie(&url, &format!("c{i}=v")).unwrap();
            clock.advance(Duration::seconds(1));
        }

        assert_eq!(jar.total_cookie_count(), MAX_COOKIES_PER_DOMAIN);
        assert!(jar.find(&url, "c0").is_none());
    }
}

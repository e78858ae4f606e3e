use time::{Duration, OffsetDateTime};

/// Longest lifetime a browser honours for a cookie (RFC 6265bis: 400 days).
pub const MAX_COOKIE_LIFETIME: Duration = Duration::days(400);

/// A stored cookie.
/// Modeled after Chromium's `net::CanonicalCookie`, reduced to what a page
/// script can observe or set through `document.cookie`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalCookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    pub creation_time: OffsetDateTime,
    pub expiration_time: Option<OffsetDateTime>,
    pub secure: bool,
    pub http_only: bool,
    pub host_only: bool,
}

impl CanonicalCookie {
    /// Host-only, non-secure cookie.
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        domain: impl Into<String>,
        path: impl Into<String>,
        creation_time: OffsetDateTime,
        expiration_time: Option<OffsetDateTime>,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: domain.into(),
            path: path.into(),
            creation_time,
            expiration_time,
            secure: false,
            http_only: false,
            host_only: true,
        }
    }

    /// A cookie whose expiry is at or before `now` is gone.
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.expiration_time.is_some_and(|expiry| expiry <= now)
    }

    /// Session cookies have no expiry and live until the browser closes.
    pub fn is_session(&self) -> bool {
        self.expiration_time.is_none()
    }

    /// Same identity as `other` under RFC 6265 (name, domain, path).
    pub fn same_identity(&self, other: &CanonicalCookie) -> bool {
        self.name == other.name
            && self.path == other.path
            && self.domain.eq_ignore_ascii_case(&other.domain)
            && self.host_only == other.host_only
    }
}

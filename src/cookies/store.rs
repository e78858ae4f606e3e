//! Name/value cookie access on top of a [`DocumentCookie`].

use crate::base::error::CookieError;
use crate::cookies::document::DocumentCookie;
use cookie::Cookie;
use time::OffsetDateTime;

/// Attributes written alongside every managed cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieAttributes {
    pub path: String,
    /// `None` scopes the cookie to the current host only.
    pub domain: Option<String>,
    /// `None` writes a session cookie.
    pub expires: Option<OffsetDateTime>,
}

impl Default for CookieAttributes {
    fn default() -> Self {
        Self {
            path: "/".to_string(),
            domain: None,
            expires: None,
        }
    }
}

impl CookieAttributes {
    pub fn expires_at(&self, expires: Option<OffsetDateTime>) -> Self {
        Self {
            expires,
            ..self.clone()
        }
    }
}

/// Cookie read/write capability used by the campaign tracker.
pub trait CookieStore {
    fn set(&self, name: &str, value: &str, attrs: &CookieAttributes) -> Result<(), CookieError>;

    /// Current value of `name`, or an empty string when there is none.
    fn get(&self, name: &str) -> String;

    /// Value of `name` stored under exactly `attrs`' path and domain.
    /// Stores that cannot address a single scope fall back to [`get`](Self::get),
    /// which returns the most specific visible cookie.
    fn get_scoped(&self, name: &str, _attrs: &CookieAttributes) -> String {
        self.get(name)
    }

    /// Delete `name` by writing it empty with an epoch-zero expiry.
    fn expire(&self, name: &str, attrs: &CookieAttributes) -> Result<(), CookieError> {
        self.set(name, "", &attrs.expires_at(Some(OffsetDateTime::UNIX_EPOCH)))
    }
}

/// RFC 6265 `token` check for cookie names.
fn is_token(name: &str) -> bool {
    !name.is_empty()
        && name.bytes().all(|b| {
            b.is_ascii_graphic()
                && !matches!(
                    b,
                    b'(' | b')' | b'<' | b'>' | b'@' | b',' | b';' | b':' | b'\\' | b'"'
                        | b'/' | b'[' | b']' | b'?' | b'=' | b'{' | b'}'
                )
        })
}

/// Serialize one cookie assignment, e.g.
/// `utm_source=news; Path=/; Domain=example.com; Expires=Tue, 14 Nov 2023 22:43:20 GMT`.
///
/// The value is percent-encoded.
pub fn serialize(name: &str, value: &str, attrs: &CookieAttributes) -> Result<String, CookieError> {
    if !is_token(name) {
        return Err(CookieError::invalid_name(name));
    }

    let mut builder = Cookie::build((name, value)).path(attrs.path.as_str());
    if let Some(domain) = attrs.domain.as_deref().filter(|d| !d.is_empty()) {
        builder = builder.domain(domain);
    }
    if let Some(expires) = attrs.expires {
        builder = builder.expires(expires);
    }

    Ok(builder.build().encoded().to_string())
}

/// [`CookieStore`] that goes through `document.cookie` the way page script does.
#[derive(Debug, Clone)]
pub struct DocumentCookieStore<D> {
    document: D,
}

impl<D: DocumentCookie> DocumentCookieStore<D> {
    pub fn new(document: D) -> Self {
        Self { document }
    }

    pub fn document(&self) -> &D {
        &self.document
    }
}

impl<D: DocumentCookie> CookieStore for DocumentCookieStore<D> {
    fn set(&self, name: &str, value: &str, attrs: &CookieAttributes) -> Result<(), CookieError> {
        let line = serialize(name, value, attrs)?;
        tracing::trace!(cookie = %line, "writing cookie");
        self.document.set_cookie_line(&line)
    }

    fn get(&self, name: &str) -> String {
        Cookie::split_parse_encoded(self.document.cookie_header())
            .filter_map(Result::ok)
            .find(|c| c.name() == name)
            .map(|c| c.value().to_string())
            .unwrap_or_default()
    }

    fn get_scoped(&self, name: &str, attrs: &CookieAttributes) -> String {
        self.document
            .scoped_value(name, &attrs.path, attrs.domain.as_deref())
            .unwrap_or_else(|| self.get(name))
    }
}

//! The `document.cookie` surface of one open page.

use crate::base::error::CookieError;
use crate::campaign::query::QueryStringReader;
use crate::cookies::monster::CookieMonster;
use url::Url;

/// Setter and getter of a page's `document.cookie`.
///
/// Hosts embedding the tracker in a real browser implement this over the
/// DOM; [`Document`] implements it over a [`CookieMonster`].
pub trait DocumentCookie {
    /// Assign one serialized cookie (`name=value; Path=/; ...`).
    fn set_cookie_line(&self, line: &str) -> Result<(), CookieError>;

    /// Read every cookie visible to the page as `a=1; b=2`.
    fn cookie_header(&self) -> String;

    /// Value of the cookie stored under exactly this name, path and domain
    /// (`Some("")` when there is none). `None` means the host cannot tell
    /// same-named cookies apart by scope, which is the case for a plain
    /// `document.cookie`.
    fn scoped_value(&self, _name: &str, _path: &str, _domain: Option<&str>) -> Option<String> {
        None
    }
}

/// A page loaded at `url`, sharing a cookie jar with every other page opened
/// on the same jar.
#[derive(Debug, Clone)]
pub struct Document {
    jar: CookieMonster,
    url: Url,
}

impl Document {
    pub fn open(jar: &CookieMonster, url: &str) -> Result<Self, CookieError> {
        Ok(Self {
            jar: jar.clone(),
            url: Url::parse(url)?,
        })
    }

    /// Follow a link. Relative URLs resolve against the current page.
    pub fn navigate(&self, url: &str) -> Result<Self, CookieError> {
        Ok(Self {
            jar: self.jar.clone(),
            url: self.url.join(url)?,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn jar(&self) -> &CookieMonster {
        &self.jar
    }
}

impl DocumentCookie for Document {
    fn set_cookie_line(&self, line: &str) -> Result<(), CookieError> {
        self.jar.parse_and_save_cookie(&self.url, line)
    }

    fn cookie_header(&self) -> String {
        self.jar.cookie_header(&self.url)
    }

    fn scoped_value(&self, name: &str, path: &str, domain: Option<&str>) -> Option<String> {
        Some(
            self.jar
                .lookup(&self.url, name, path, domain)
                .map(|c| c.value)
                .unwrap_or_default(),
        )
    }
}

impl QueryStringReader for Document {
    fn query_string(&self) -> String {
        self.url.query_string()
    }
}

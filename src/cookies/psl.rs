//! Public Suffix List checks for the `Domain` cookie attribute.
//!
//! A page on `shop.example.co.uk` may scope a cookie to `example.co.uk` but
//! never to `co.uk`.

use psl::{List, Psl};

/// True when `domain` is itself a listed public suffix ("com", "co.uk").
///
/// Hosts under an unlisted TLD (e.g. a bare intranet name) are not treated as
/// public suffixes.
pub fn is_public_suffix(domain: &str) -> bool {
    let domain = domain.trim_start_matches('.').to_ascii_lowercase();
    match List.suffix(domain.as_bytes()) {
        Some(suffix) => suffix.is_known() && suffix.as_bytes() == domain.as_bytes(),
        None => false,
    }
}

/// Whether a page on `host` may set a cookie with `Domain=cookie_domain`.
pub fn is_valid_cookie_domain(cookie_domain: &str, host: &str) -> bool {
    let cookie_domain = cookie_domain.trim_start_matches('.').to_ascii_lowercase();
    let host = host.to_ascii_lowercase();

    if cookie_domain.is_empty() || is_public_suffix(&cookie_domain) {
        return false;
    }

    host == cookie_domain || host.ends_with(&format!(".{cookie_domain}"))
}

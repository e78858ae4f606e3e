//! Cookie storage and the `document.cookie` surface.
//!
//! | Piece | Type | Responsibility |
//! |-------|------|----------------|
//! | Stored cookie | [`CanonicalCookie`](canonical_cookie::CanonicalCookie) | Name, value, scope, expiry |
//! | Jar | [`CookieMonster`](monster::CookieMonster) | RFC 6265 domain/path scoping, expiry, eviction |
//! | Page | [`Document`](document::Document) | One URL's view of the jar |
//! | Name/value access | [`CookieStore`](store::CookieStore) | Serialize, read back, expire |
//!
//! # Scoping
//!
//! ```rust
//! use lastcampaign::cookies::document::Document;
//! use lastcampaign::cookies::monster::CookieMonster;
//! use lastcampaign::cookies::store::{CookieAttributes, CookieStore, DocumentCookieStore};
//!
//! let jar = CookieMonster::new();
//! let promo = DocumentCookieStore::new(Document::open(&jar, "https://example.com/promo/a")?);
//! let attrs = CookieAttributes { path: "/promo".into(), ..Default::default() };
//! promo.set("utm_source", "news", &attrs)?;
//!
//! let home = DocumentCookieStore::new(Document::open(&jar, "https://example.com/")?);
//! assert_eq!(promo.get("utm_source"), "news");
//! assert_eq!(home.get("utm_source"), "");
//! # Ok::<(), lastcampaign::base::error::CookieError>(())
//! ```

pub mod canonical_cookie;
pub mod document;
pub mod monster;
pub mod psl;
pub mod store;

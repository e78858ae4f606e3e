//! # lastcampaign
//!
//! Capture marketing campaign attribution (UTM parameters) from a page's
//! query string and keep it in cookies with a bounded lifetime, so a
//! marketing-automation integration can read it later.
//!
//! ## Quick Start
//!
//! ```rust
//! use lastcampaign::campaign::options::CampaignOptions;
//! use lastcampaign::campaign::tracker::CampaignTracker;
//! use lastcampaign::cookies::document::Document;
//! use lastcampaign::cookies::monster::CookieMonster;
//!
//! let jar = CookieMonster::new();
//! let page = Document::open(&jar, "https://example.com/?utm_campaign=spring&utm_source=news")?;
//!
//! CampaignTracker::for_document(page.clone())
//!     .save(&CampaignOptions::new().timeout(30.0).data("landing", "spring-promo"));
//!
//! let next = page.navigate("/pricing")?;
//! assert!(jar.cookie_header(next.url()).contains("utm_campaign=spring"));
//! # Ok::<(), lastcampaign::base::error::CookieError>(())
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error type and injectable clock
//! - [`cookies`] - Scoped cookie jar, `document.cookie` abstraction, `CookieStore`
//! - [`campaign`] - Options, query string parsing and the `CampaignTracker`
//!
//! Browser hosts plug in their own [`DocumentCookie`](cookies::document::DocumentCookie)
//! and [`QueryStringReader`](campaign::query::QueryStringReader); the in-memory
//! [`CookieMonster`](cookies::monster::CookieMonster) jar stands in for the
//! browser everywhere else.

pub mod base;
pub mod campaign;
pub mod cookies;

pub use campaign::options::{CampaignConfig, CampaignOptions, DEFAULT_PARAMS};
pub use campaign::save_last_campaign;
pub use campaign::tracker::CampaignTracker;

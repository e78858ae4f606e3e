//! Campaign attribution capture.
//!
//! [`CampaignTracker`](tracker::CampaignTracker) reads the page query string,
//! resolves [`CampaignOptions`](options::CampaignOptions) over the defaults,
//! and keeps one cookie per tracked parameter in sync:
//!
//! 1. No query string: nothing is written.
//! 2. With a `timeout`, cookies that already hold a value get their expiry
//!    pushed to `now + timeout`.
//! 3. If any tracked parameter has a value, every tracked parameter is
//!    written (present) or expired (absent).
//! 4. `data` entries are written only when their cookie is still empty.
//!
//! ```rust
//! use lastcampaign::campaign::{options::CampaignOptions, save_last_campaign};
//! use lastcampaign::cookies::{document::Document, monster::CookieMonster};
//!
//! let jar = CookieMonster::new();
//! let page = Document::open(&jar, "https://example.com/?utm_source=news&utm_medium=email")?;
//! save_last_campaign(&page, &CampaignOptions::new().prefix("_"));
//!
//! assert_eq!(jar.cookie_header(page.url()), "_utm_source=news; _utm_medium=email");
//! # Ok::<(), lastcampaign::base::error::CookieError>(())
//! ```

pub mod options;
pub mod query;
pub mod tracker;

use crate::cookies::document::Document;
use options::CampaignOptions;
use tracker::CampaignTracker;

/// Save the campaign parameters of `document` with the system clock.
pub fn save_last_campaign(document: &Document, options: &CampaignOptions) {
    CampaignTracker::for_document(document.clone()).save(options);
}

use crate::base::clock::{Clock, SystemClock};
use crate::campaign::options::{CampaignConfig, CampaignOptions};
use crate::campaign::query::{QueryParams, QueryStringReader};
use crate::cookies::document::Document;
use crate::cookies::store::{CookieAttributes, CookieStore, DocumentCookieStore};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;

/// Mirrors campaign query parameters of the current page into cookies.
///
/// One tracker wraps one page: a [`CookieStore`] to write through and a
/// [`QueryStringReader`] for the page's query string. Call [`save`](Self::save)
/// once per page load.
pub struct CampaignTracker<S, Q> {
    store: S,
    location: Q,
    clock: Arc<dyn Clock>,
}

#[derive(Debug, Default)]
struct SyncSummary {
    refreshed: usize,
    written: usize,
    expired: usize,
    persisted: usize,
}

impl CampaignTracker<DocumentCookieStore<Document>, Document> {
    /// Tracker reading and writing `document`'s cookies.
    pub fn for_document(document: Document) -> Self {
        Self::new(DocumentCookieStore::new(document.clone()), document)
    }
}

impl<S: CookieStore, Q: QueryStringReader> CampaignTracker<S, Q> {
    pub fn new(store: S, location: Q) -> Self {
        Self {
            store,
            location,
            clock: Arc::new(SystemClock),
        }
    }

    /// Use `clock` for expiration timestamps.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn save_default(&self) {
        self.save(&CampaignOptions::default());
    }

    /// [`save`](Self::save) with options taken leniently from JSON.
    pub fn save_json(&self, options: &Value) {
        self.save(&CampaignOptions::from_json(options));
    }

    /// Synchronize campaign cookies with the current query string.
    ///
    /// Never fails: a cookie that cannot be written is logged and skipped.
    pub fn save(&self, options: &CampaignOptions) {
        let config = CampaignConfig::resolve(options);
        let summary = self.sync(&config);
        tracing::debug!(
            refreshed = summary.refreshed,
            written = summary.written,
            expired = summary.expired,
            persisted = summary.persisted,
            "campaign cookies saved"
        );
    }

    fn sync(&self, config: &CampaignConfig) -> SyncSummary {
        let mut summary = SyncSummary::default();

        let query = self.location.query_string();
        let query = query.trim_start_matches('?');
        if query.is_empty() {
            tracing::debug!("page has no query string");
            return summary;
        }
        let query = QueryParams::parse(query);
        let attrs = config.attributes(self.clock.now());

        // Slide the expiry of attribution that survived earlier page views.
        if config.timeout.is_some() {
            let mut seen = HashSet::new();
            let keys = config
                .params
                .iter()
                .chain(config.data.iter().map(|(key, _)| key));
            for key in keys.filter(|key| seen.insert(key.as_str())) {
                let name = config.cookie_name(key);
                let current = self.store.get_scoped(&name, &attrs);
                if !current.is_empty() && self.write(&name, &current, &attrs) {
                    summary.refreshed += 1;
                }
            }
        }

        // A new campaign replaces the whole previous attribution set.
        if config.params.iter().any(|p| query.value(p).is_some()) {
            for key in &config.params {
                let name = config.cookie_name(key);
                match query.value(key) {
                    Some(value) => {
                        if self.write(&name, value, &attrs) {
                            summary.written += 1;
                        }
                    }
                    None => match self.store.expire(&name, &attrs) {
                        Ok(()) => summary.expired += 1,
                        Err(e) => {
                            tracing::debug!(name = %name, error = %e, "failed to expire campaign cookie")
                        }
                    },
                }
            }
        } else {
            tracing::debug!("no tracked parameters in query string");
        }

        // First touch wins.
        for (key, value) in &config.data {
            let name = config.cookie_name(key);
            if !self.store.get(&name).is_empty() {
                tracing::trace!(name = %name, "keeping existing data cookie");
                continue;
            }
            if self.write(&name, value, &attrs) {
                summary.persisted += 1;
            }
        }

        summary
    }

    fn write(&self, name: &str, value: &str, attrs: &CookieAttributes) -> bool {
        match self.store.set(name, value, attrs) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(name = %name, error = %e, "failed to write campaign cookie");
                false
            }
        }
    }
}

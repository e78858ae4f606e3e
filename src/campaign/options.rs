//! Tracker configuration and the merge of caller options over the defaults.

use crate::cookies::canonical_cookie::MAX_COOKIE_LIFETIME;
use crate::cookies::store::CookieAttributes;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::{Duration, OffsetDateTime};

/// Query parameters tracked unless `defaults` is turned off.
pub const DEFAULT_PARAMS: [&str; 5] = [
    "utm_campaign",
    "utm_source",
    "utm_medium",
    "utm_term",
    "utm_content",
];

/// Options supplied by the host page. Every field is optional; unset fields
/// fall back to the defaults when resolved into a [`CampaignConfig`].
///
/// # Example
///
/// ```rust
/// use lastcampaign::campaign::options::CampaignOptions;
///
/// let options = CampaignOptions::new()
///     .prefix("_")
///     .param("gclid")
///     .data("landing", "spring")
///     .timeout(30.0);
/// assert_eq!(options.prefix.as_deref(), Some("_"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignOptions {
    /// Include [`DEFAULT_PARAMS`] (default: true).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaults: Option<bool>,
    /// Prepended to every managed cookie name (default: empty).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    /// Extra query parameters to track.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Vec<String>>,
    /// Literal values persisted once per visitor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
    /// Cookie path (default: `/`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Cookie domain (default: current host only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Cookie lifetime in minutes (default: session cookie).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<f64>,
}

impl CampaignOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read options from an arbitrary JSON value.
    ///
    /// Anything other than an object yields the defaults. Fields of the wrong
    /// type are dropped one by one; the remaining fields still apply.
    pub fn from_json(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            tracing::debug!("campaign options are not an object; using defaults");
            return Self::default();
        };

        Self {
            defaults: field(obj, "defaults", Value::as_bool),
            prefix: field(obj, "prefix", as_string),
            params: field(obj, "params", |v| {
                v.as_array()
                    .map(|names| names.iter().filter_map(as_string).collect())
            }),
            data: field(obj, "data", |v| v.as_object().cloned()),
            path: field(obj, "path", as_string),
            domain: field(obj, "domain", as_string),
            timeout: field(obj, "timeout", Value::as_f64),
        }
    }

    pub fn defaults(mut self, defaults: bool) -> Self {
        self.defaults = Some(defaults);
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Replace the caller parameter list.
    pub fn params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params = Some(params.into_iter().map(Into::into).collect());
        self
    }

    /// Append one parameter to the caller list.
    pub fn param(mut self, name: impl Into<String>) -> Self {
        self.params.get_or_insert_with(Vec::new).push(name.into());
        self
    }

    pub fn data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Lifetime in minutes.
    pub fn timeout(mut self, minutes: f64) -> Self {
        self.timeout = Some(minutes);
        self
    }
}

fn as_string(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

/// `null` counts as unset; any other mismatch is logged and dropped.
fn field<T>(obj: &Map<String, Value>, key: &str, extract: impl FnOnce(&Value) -> Option<T>) -> Option<T> {
    match obj.get(key) {
        None | Some(Value::Null) => None,
        Some(value) => {
            let out = extract(value);
            if out.is_none() {
                tracing::debug!(option = key, value = %value, "ignoring campaign option of unexpected type");
            }
            out
        }
    }
}

/// Fully resolved configuration for one save pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignConfig {
    pub prefix: String,
    /// Effective parameter list, in order, without duplicates.
    pub params: Vec<String>,
    /// Persistable `data` entries, already stringified.
    pub data: Vec<(String, String)>,
    pub path: String,
    pub domain: Option<String>,
    /// `None` means session cookies.
    pub timeout: Option<Duration>,
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self::resolve(&CampaignOptions::default())
    }
}

impl CampaignConfig {
    /// Merge `options` over the defaults.
    ///
    /// Scalars replace the default. `params` extends the built-in list
    /// (emptied first when `defaults` is `false`). `data` keeps only
    /// primitive values other than `null` and `""`.
    pub fn resolve(options: &CampaignOptions) -> Self {
        let mut params: Vec<String> = if options.defaults == Some(false) {
            Vec::new()
        } else {
            DEFAULT_PARAMS.iter().map(|p| p.to_string()).collect()
        };
        for name in options.params.iter().flatten() {
            if !name.is_empty() && !params.contains(name) {
                params.push(name.clone());
            }
        }

        let data = options
            .data
            .iter()
            .flatten()
            .filter_map(|(key, value)| data_value(key, value).map(|v| (key.clone(), v)))
            .collect();

        Self {
            prefix: options.prefix.clone().unwrap_or_default(),
            params,
            data,
            path: options
                .path
                .clone()
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| "/".to_string()),
            domain: options.domain.clone().filter(|d| !d.is_empty()),
            timeout: options.timeout.and_then(timeout_duration),
        }
    }

    /// Cookie name for a parameter or data key.
    pub fn cookie_name(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    /// Attributes for a cookie written at `now`.
    pub fn attributes(&self, now: OffsetDateTime) -> CookieAttributes {
        CookieAttributes {
            path: self.path.clone(),
            domain: self.domain.clone(),
            expires: self.timeout.map(|timeout| now + timeout),
        }
    }
}

fn timeout_duration(minutes: f64) -> Option<Duration> {
    if !minutes.is_finite() || minutes <= 0.0 {
        return None;
    }
    let max_minutes = MAX_COOKIE_LIFETIME.whole_minutes() as f64;
    Some(Duration::seconds_f64(minutes.min(max_minutes) * 60.0))
}

/// String form of a `data` value, or `None` when there is nothing to store.
fn data_value(key: &str, value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(_) | Value::Object(_) => {
            tracing::debug!(key, "skipping non-primitive campaign data value");
            None
        }
    }
}

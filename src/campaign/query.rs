//! Page query string access and parsing.

use std::collections::HashMap;
use url::{form_urlencoded, Url};

/// Source of the current page's query string, without the leading `?`.
pub trait QueryStringReader {
    /// Empty when the page has no query string.
    fn query_string(&self) -> String;
}

impl QueryStringReader for Url {
    fn query_string(&self) -> String {
        self.query().unwrap_or_default().to_string()
    }
}

/// Fixed query string, for hosts that already extracted it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticQuery(pub String);

impl StaticQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self(query.into())
    }
}

impl QueryStringReader for StaticQuery {
    fn query_string(&self) -> String {
        self.0.trim_start_matches('?').to_string()
    }
}

/// Decoded `application/x-www-form-urlencoded` parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    values: HashMap<String, String>,
}

impl QueryParams {
    /// Parse `a=1&b=2`. A repeated key keeps all its values joined by `,`.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut values: HashMap<String, String> = HashMap::new();

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            values
                .entry(key.into_owned())
                .and_modify(|existing| {
                    existing.push(',');
                    existing.push_str(&value);
                })
                .or_insert_with(|| value.into_owned());
        }

        Self { values }
    }

    /// Value of `name` if present and non-empty.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

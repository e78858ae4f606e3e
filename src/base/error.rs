use thiserror::Error;

/// Errors raised while writing a cookie.
///
/// These never cross [`CampaignTracker::save`](crate::campaign::tracker::CampaignTracker::save);
/// the tracker logs them and moves on to the next cookie.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum CookieError {
    #[error("Invalid cookie name: {name:?}")]
    InvalidName { name: String },
    #[error("Malformed cookie string: {reason}")]
    Malformed { reason: String },
    #[error("Cookie domain {domain:?} is a public suffix")]
    PublicSuffix { domain: String },
    #[error("Cookie domain {domain:?} does not match host {host:?}")]
    DomainMismatch { domain: String, host: String },
    #[error("Invalid page URL: {reason}")]
    InvalidUrl { reason: String },
}

impl CookieError {
    pub fn invalid_name(name: impl Into<String>) -> Self {
        Self::InvalidName { name: name.into() }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed {
            reason: reason.into(),
        }
    }

    pub fn domain_mismatch(domain: impl Into<String>, host: impl Into<String>) -> Self {
        Self::DomainMismatch {
            domain: domain.into(),
            host: host.into(),
        }
    }
}

impl From<cookie::ParseError> for CookieError {
    fn from(err: cookie::ParseError) -> Self {
        CookieError::malformed(err.to_string())
    }
}

impl From<url::ParseError> for CookieError {
    fn from(err: url::ParseError) -> Self {
        CookieError::InvalidUrl {
            reason: err.to_string(),
        }
    }
}

//! Affiliate request errors.

use crate::error::TripcastError;

/// Errors raised while preparing or sending an affiliate request.
///
/// The precondition variants point at missing or malformed configuration;
/// retrying the same call cannot succeed.
#[derive(Debug, thiserror::Error)]
pub enum AffiliateError {
    #[error("affiliate token is not configured")]
    MissingToken,

    #[error("affiliate real host is not configured")]
    MissingRealHost,

    #[error("value for header '{header}' is not a valid HTTP header value")]
    InvalidHeaderValue { header: &'static str },

    #[error("invalid affiliate base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error(transparent)]
    Upstream(#[from] TripcastError),
}

impl AffiliateError {
    /// Whether this is a configuration/caller defect rather than an upstream failure.
    #[must_use]
    pub fn is_precondition(&self) -> bool {
        !matches!(self, Self::Upstream(_))
    }
}

impl From<reqwest::Error> for AffiliateError {
    fn from(err: reqwest::Error) -> Self {
        Self::Upstream(err.into())
    }
}

impl From<AffiliateError> for TripcastError {
    fn from(err: AffiliateError) -> Self {
        match err {
            AffiliateError::Upstream(inner) => inner,
            other => TripcastError::Configuration(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            AffiliateError::MissingToken.to_string(),
            "affiliate token is not configured"
        );
        assert_eq!(
            AffiliateError::InvalidHeaderValue { header: "x-real-host" }.to_string(),
            "value for header 'x-real-host' is not a valid HTTP header value"
        );
    }

    #[test]
    fn test_preconditions_map_to_configuration_errors() {
        assert!(AffiliateError::MissingRealHost.is_precondition());

        let err: TripcastError = AffiliateError::MissingRealHost.into();
        assert!(matches!(err, TripcastError::Configuration(_)));
    }

    #[test]
    fn test_upstream_passes_through() {
        let err = AffiliateError::Upstream(TripcastError::RequestTimeout);
        assert!(!err.is_precondition());

        let err: TripcastError = err.into();
        assert!(matches!(err, TripcastError::RequestTimeout));
    }
}

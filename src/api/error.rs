//! Error type for calls against the inventory backend.

use std::fmt;

/// Errors that can occur when talking to the inventory API.
#[derive(Debug, Clone)]
pub enum ApiError {
    /// 401 - token missing, invalid or expired
    Unauthorized,
    /// 403 - token lacks the required role
    Forbidden,
    /// 404 - record or endpoint does not exist
    NotFound { resource: String },
    /// 400/422 - server rejected the submitted fields
    Validation { message: String },
    /// 429
    RateLimited { retry_after_secs: Option<u64> },
    /// Connection, DNS or timeout failure before any response
    Network { message: String },
    /// Any other non-success status
    Http { status: u16, message: String },
    /// No base URL configured yet
    NotConfigured,
}

impl ApiError {
    /// Check if this is an authentication error (401 or 403)
    pub fn is_auth_error(&self) -> bool {
        matches!(self, ApiError::Unauthorized | ApiError::Forbidden)
    }

    /// Check if a retry could plausibly succeed. Auth, validation and
    /// not-found failures are deterministic and never retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Network { .. } | ApiError::RateLimited { .. } => true,
            ApiError::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Get retry-after seconds if rate limited
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            ApiError::RateLimited { retry_after_secs } => *retry_after_secs,
            _ => None,
        }
    }

    /// Create a not-found error for a resource path
    pub fn not_found(resource: impl Into<String>) -> Self {
        ApiError::NotFound {
            resource: resource.into(),
        }
    }

    /// Create a validation error from a server message
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
        }
    }

    /// Create a rate limited error
    pub fn rate_limited(retry_after: Option<u64>) -> Self {
        ApiError::RateLimited {
            retry_after_secs: retry_after,
        }
    }

    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        ApiError::Network {
            message: message.into(),
        }
    }

    /// Create an HTTP error for any other status
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        ApiError::Http {
            status,
            message: message.into(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Unauthorized => {
                write!(f, "Unauthorized (401): check ASSETDESK_API_TOKEN")
            }
            ApiError::Forbidden => {
                write!(f, "Forbidden (403): insufficient permissions")
            }
            ApiError::NotFound { resource } => {
                write!(f, "Not found: {resource}")
            }
            ApiError::Validation { message } => {
                write!(f, "Validation failed: {message}")
            }
            ApiError::RateLimited { retry_after_secs } => {
                if let Some(secs) = retry_after_secs {
                    write!(f, "Rate limited: retry after {secs}s")
                } else {
                    write!(f, "Rate limited")
                }
            }
            ApiError::Network { message } => {
                write!(f, "Network error: {message}")
            }
            ApiError::Http { status, message } => {
                write!(f, "HTTP {status}: {message}")
            }
            ApiError::NotConfigured => {
                write!(f, "No server configured: set server.base_url")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::network(format!("request timed out: {err}"))
        } else {
            ApiError::network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_auth_error() {
        assert!(ApiError::Unauthorized.is_auth_error());
        assert!(ApiError::Forbidden.is_auth_error());
        assert!(!ApiError::rate_limited(None).is_auth_error());
        assert!(!ApiError::network("timeout").is_auth_error());
    }

    #[test]
    fn test_retryable_classification() {
        assert!(ApiError::network("reset").is_retryable());
        assert!(ApiError::rate_limited(Some(3)).is_retryable());
        assert!(ApiError::http(503, "unavailable").is_retryable());
        assert!(!ApiError::http(418, "teapot").is_retryable());
        assert!(!ApiError::Unauthorized.is_retryable());
        assert!(!ApiError::validation("name required").is_retryable());
        assert!(!ApiError::not_found("products/9").is_retryable());
    }

    #[test]
    fn test_retry_after() {
        assert_eq!(ApiError::rate_limited(Some(30)).retry_after(), Some(30));
        assert_eq!(ApiError::rate_limited(None).retry_after(), None);
        assert_eq!(ApiError::Forbidden.retry_after(), None);
    }

    #[test]
    fn test_display() {
        let err = ApiError::rate_limited(Some(30));
        assert_eq!(err.to_string(), "Rate limited: retry after 30s");

        let err = ApiError::not_found("components/41");
        assert_eq!(err.to_string(), "Not found: components/41");

        let err = ApiError::http(502, "bad gateway");
        assert_eq!(err.to_string(), "HTTP 502: bad gateway");
    }
}

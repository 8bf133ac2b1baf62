//! Error types for signing, caching and API calls.

use thiserror::Error;

/// Errors that can occur while signing or executing an API call.
#[derive(Debug, Error)]
pub enum FinanceError {
    /// Configuration is invalid (detected at construction time).
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Application secret is empty; no signature can be derived.
    #[error("Application secret is empty")]
    MissingSecret,

    /// Signature cache backend failed to read or write.
    #[error("Signature cache error: {0}")]
    CacheIO(String),

    /// Network failure or a non-2xx response without a decodable envelope.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Request or response body could not be (de)serialized.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Remote API answered with a non-success head.
    #[error("Remote API error {code}: {msg} ({description})")]
    Domain {
        /// Remote error code, verbatim.
        code: String,
        /// Remote message, verbatim.
        msg: String,
        /// Remote description, verbatim.
        description: String,
    },
}

impl FinanceError {
    /// True for failures where no response head was available to classify.
    pub fn is_transport(&self) -> bool {
        matches!(self, FinanceError::Transport(_) | FinanceError::Decode(_))
    }

    /// True when the remote API decoded fine but reported failure.
    pub fn is_domain(&self) -> bool {
        matches!(self, FinanceError::Domain { .. })
    }

    /// Remote error code, if this is a domain error.
    pub fn domain_code(&self) -> Option<&str> {
        match self {
            FinanceError::Domain { code, .. } => Some(code),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FinanceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FinanceError::Transport(format!("Request timed out: {}", err))
        } else if err.is_decode() {
            FinanceError::Decode(err.to_string())
        } else {
            FinanceError::Transport(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_classification() {
        let err = FinanceError::Domain {
            code: "40001".to_string(),
            msg: "bad request".to_string(),
            description: "customerId missing".to_string(),
        };
        assert!(err.is_domain());
        assert!(!err.is_transport());
        assert_eq!(err.domain_code(), Some("40001"));
    }

    #[test]
    fn test_transport_classification() {
        assert!(FinanceError::Transport("refused".to_string()).is_transport());
        assert!(FinanceError::Decode("eof".to_string()).is_transport());
        assert!(!FinanceError::CacheIO("disk".to_string()).is_transport());
        assert_eq!(FinanceError::MissingSecret.domain_code(), None);
    }

    #[test]
    fn test_domain_display_is_verbatim() {
        let err = FinanceError::Domain {
            code: "E100".to_string(),
            msg: "账期未结账".to_string(),
            description: "period open".to_string(),
        };
        assert_eq!(err.to_string(), "Remote API error E100: 账期未结账 (period open)");
    }
}

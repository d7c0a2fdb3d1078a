use thiserror::Error;

/// Failure of a single call to a translation provider.
///
/// These never reach callers of the public translation API; they drive the
/// retry and circuit breaker decisions inside the provider clients.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Abuse detection kicked in (429) or access was refused (403).
    #[error("rate limited by provider ({status})")]
    RateLimited { status: u16 },

    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected response shape: {0}")]
    UnexpectedShape(String),
}

impl ProviderError {
    /// Classify a non-success HTTP status.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            403 | 429 => ProviderError::RateLimited { status },
            _ => ProviderError::Status { status, body },
        }
    }

    /// Whether this failure should open the breaker for the long cooldown.
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, ProviderError::RateLimited { .. })
    }
}

use thiserror::Error;

/// Problems with the page-embedded `SiteConfig` JSON.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Failure to obtain any HTTP response for a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The request went out (or was attempted) but nothing came back.
    #[error("no response from server: {0}")]
    NoResponse(String),
    /// The request could not be built or read locally.
    #[error("{0}")]
    Request(String),
}

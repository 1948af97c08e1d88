//! Error types for the Sendy API client.
//!
//! # Design
//! Configuration problems are reported once, at construction, through
//! `ConfigError`. Everything that can go wrong while talking to the service
//! lands in `ApiError`. A numeric body that fails to parse gets its own
//! `Parse` variant so callers can tell it apart from a transport failure.

use std::num::ParseIntError;

use thiserror::Error;

/// Boxed cause of a transport failure.
pub type TransportError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Invalid client configuration, raised before any request is sent.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("base url must not be empty")]
    EmptyUrl,

    #[error("request timeout must be greater than zero")]
    InvalidTimeout,

    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),

    #[error("environment variable {var} has invalid value {value:?}")]
    InvalidEnv { var: &'static str, value: String },

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Errors returned by `SendyClient` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, timeout, ...).
    #[error("transport error: {0}")]
    Transport(#[source] TransportError),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The body was rejected by the response guard. Displays the body as-is.
    #[error("{0}")]
    Remote(String),

    /// A count endpoint returned something that is not an integer.
    #[error("expected a number, got {body:?}")]
    Parse {
        body: String,
        #[source]
        source: ParseIntError,
    },
}

impl ApiError {
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, ApiError::Parse { .. })
    }

    /// The raw response text carried by this error, if any.
    pub fn body(&self) -> Option<&str> {
        match self {
            ApiError::Transport(_) => None,
            ApiError::HttpStatus { body, .. } | ApiError::Parse { body, .. } => Some(body),
            ApiError::Remote(body) => Some(body),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_error_displays_original_body() {
        let err = ApiError::Remote("Error: API key not passed".to_string());
        assert_eq!(err.to_string(), "Error: API key not passed");
        assert_eq!(err.body(), Some("Error: API key not passed"));
    }

    #[test]
    fn parse_error_is_distinguishable_from_transport() {
        let source = "abc".parse::<u64>().unwrap_err();
        let err = ApiError::Parse {
            body: "abc".to_string(),
            source,
        };
        assert!(err.is_parse());
        assert!(!err.is_transport());

        let err = ApiError::Transport("connection refused".into());
        assert!(err.is_transport());
        assert!(err.body().is_none());
    }
}

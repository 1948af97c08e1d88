//! Response classification.
//!
//! Every body first passes the client's `ResponseGuard`, then the rule of
//! the operation that issued the request.

use crate::error::ApiError;

/// Universal check applied to every successful transport response.
pub trait ResponseGuard: Send + Sync {
    fn check(&self, body: &str) -> Result<(), ApiError>;
}

/// Rejects any body whose lower-cased form contains `needle`.
///
/// With the default needle `"error"` this also rejects legitimate echoes
/// such as a subscriber named "Errol".
#[derive(Debug, Clone)]
pub struct ErrorSubstringGuard {
    needle: String,
}

impl ErrorSubstringGuard {
    pub fn new(needle: &str) -> Self {
        Self {
            needle: needle.to_lowercase(),
        }
    }
}

impl Default for ErrorSubstringGuard {
    fn default() -> Self {
        Self::new("error")
    }
}

impl ResponseGuard for ErrorSubstringGuard {
    fn check(&self, body: &str) -> Result<(), ApiError> {
        if body.to_lowercase().contains(&self.needle) {
            return Err(ApiError::Remote(body.to_string()));
        }
        Ok(())
    }
}

/// Accepts every body. Operation rules still apply.
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissiveGuard;

impl ResponseGuard for PermissiveGuard {
    fn check(&self, _body: &str) -> Result<(), ApiError> {
        Ok(())
    }
}

/// Success rule for operations that report a boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expect {
    Exact(&'static str),
    Contains(&'static str),
}

impl Expect {
    pub fn matches(self, body: &str) -> bool {
        match self {
            Expect::Exact(expected) => body == expected,
            Expect::Contains(needle) => body.contains(needle),
        }
    }
}

/// Parses a count endpoint body.
pub fn parse_count(body: &str) -> Result<u64, ApiError> {
    body.trim().parse().map_err(|source| ApiError::Parse {
        body: body.to_string(),
        source,
    })
}

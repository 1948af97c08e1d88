//! Request/response observation.
//!
//! Observers are notified around every round-trip. They cannot fail, and a
//! panic inside one is caught by the executor, so logging never changes the
//! outcome of a call.

use tracing::debug;

use crate::endpoint::Endpoint;
use crate::params::{FormParams, API_KEY};

/// Receives structured events from the request executor.
pub trait RequestObserver: Send + Sync {
    fn on_request(&self, endpoint: Endpoint, params: &FormParams);

    fn on_response(&self, endpoint: Endpoint, status: u16, body: &str);
}

impl<O: RequestObserver + ?Sized> RequestObserver for std::sync::Arc<O> {
    fn on_request(&self, endpoint: Endpoint, params: &FormParams) {
        (**self).on_request(endpoint, params)
    }

    fn on_response(&self, endpoint: Endpoint, status: u16, body: &str) {
        (**self).on_response(endpoint, status, body)
    }
}

/// Default observer: `debug` level `tracing` events with the API key masked.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl RequestObserver for TracingObserver {
    fn on_request(&self, endpoint: Endpoint, params: &FormParams) {
        let params = redact(params);
        debug!(endpoint = %endpoint, path = endpoint.path(), params = ?params, "sendy request");
    }

    fn on_response(&self, endpoint: Endpoint, status: u16, body: &str) {
        debug!(endpoint = %endpoint, status, body, "sendy response");
    }
}

/// Observer that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl RequestObserver for NoopObserver {
    fn on_request(&self, _endpoint: Endpoint, _params: &FormParams) {}

    fn on_response(&self, _endpoint: Endpoint, _status: u16, _body: &str) {}
}

/// Copy of `params` with the API key reduced to its first and last four characters.
pub fn redact(params: &FormParams) -> FormParams {
    params
        .iter()
        .map(|(k, v)| {
            if k == API_KEY {
                (k.to_string(), mask(v))
            } else {
                (k.to_string(), v.to_string())
            }
        })
        .collect()
}

pub(crate) fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

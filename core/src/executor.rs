//! The single path every operation takes to the network.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{error, warn};

use crate::classify::ResponseGuard;
use crate::endpoint::Endpoint;
use crate::error::ApiError;
use crate::http::{HttpRequest, Transport, FORM_CONTENT_TYPE};
use crate::observer::RequestObserver;
use crate::params::{FormParams, API_KEY};

/// Sends form POSTs and applies the universal response checks.
///
/// Steps for each call: attach the API key, resolve the endpoint path, notify
/// the observer, send, notify again, reject non-2xx statuses, run the
/// response guard. The body is returned unchanged when all of that passes.
#[derive(Clone)]
pub struct RequestExecutor<T> {
    base_url: String,
    api_key: String,
    transport: T,
    observer: Arc<dyn RequestObserver>,
    guard: Arc<dyn ResponseGuard>,
}

impl<T: Transport> RequestExecutor<T> {
    /// `base_url` must already end with `/`.
    pub fn new(
        base_url: String,
        api_key: String,
        transport: T,
        observer: Arc<dyn RequestObserver>,
        guard: Arc<dyn ResponseGuard>,
    ) -> Self {
        Self {
            base_url,
            api_key,
            transport,
            observer,
            guard,
        }
    }

    pub fn set_observer(&mut self, observer: Arc<dyn RequestObserver>) {
        self.observer = observer;
    }

    pub fn set_guard(&mut self, guard: Arc<dyn ResponseGuard>) {
        self.guard = guard;
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn url_for(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    /// Adds the API key to `params`, replacing any caller-supplied value.
    pub fn authorize(&self, params: &mut FormParams) {
        params.set(API_KEY, self.api_key.as_str());
    }

    /// Builds the wire request. `params` must already carry the API key.
    pub fn build_request(&self, endpoint: Endpoint, params: &FormParams) -> HttpRequest {
        HttpRequest {
            url: self.url_for(endpoint),
            headers: vec![("content-type".to_string(), FORM_CONTENT_TYPE.to_string())],
            body: params.encode(),
        }
    }

    pub fn execute(&self, endpoint: Endpoint, mut params: FormParams) -> Result<String, ApiError> {
        self.authorize(&mut params);
        let request = self.build_request(endpoint, &params);

        self.notify(|observer| observer.on_request(endpoint, &params));

        let response = self.transport.send(&request).map_err(|e| {
            error!(endpoint = %endpoint, error = %e, "sendy request failed");
            ApiError::Transport(e)
        })?;

        self.notify(|observer| observer.on_response(endpoint, response.status, &response.body));

        if !response.is_success() {
            return Err(ApiError::HttpStatus {
                status: response.status,
                body: response.body,
            });
        }

        self.guard.check(&response.body)?;
        Ok(response.body)
    }

    fn notify(&self, f: impl FnOnce(&dyn RequestObserver)) {
        let observer = self.observer.as_ref();
        if catch_unwind(AssertUnwindSafe(|| f(observer))).is_err() {
            warn!("request observer panicked; continuing");
        }
    }
}

//! Blocking `Transport` backed by `ureq`.

use std::time::Duration;

use tracing::trace;
use ureq::Agent;

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse, Transport, FORM_CONTENT_TYPE};

/// Default transport: one `ureq::Agent` with a global per-request timeout.
///
/// Status codes are returned as data so the executor decides what a 4xx or
/// 5xx means.
#[derive(Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self.agent.post(&request.url);
        let mut has_content_type = false;
        for (name, value) in &request.headers {
            if name.eq_ignore_ascii_case("content-type") {
                has_content_type = true;
            }
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !has_content_type {
            builder = builder.content_type(FORM_CONTENT_TYPE);
        }

        let mut response = builder.send(request.body.as_bytes())?;
        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string()?;
        trace!(url = %request.url, status, "ureq round-trip finished");

        Ok(HttpResponse { status, body })
    }
}

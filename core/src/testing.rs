//! In-memory transport for tests.
//!
//! `MockTransport` replays queued responses in order and records every
//! request it receives, so tests can assert on the exact form that went out.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use url::form_urlencoded;

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::params::FormParams;

enum Queued {
    Response(HttpResponse),
    Failure(String),
}

#[derive(Default)]
pub struct MockTransport {
    queue: Mutex<VecDeque<Queued>>,
    requests: Mutex<Vec<HttpRequest>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a 200 response with `body`.
    pub fn respond(&self, body: &str) -> &Self {
        self.respond_with(HttpResponse::ok(body))
    }

    pub fn respond_with(&self, response: HttpResponse) -> &Self {
        lock(&self.queue).push_back(Queued::Response(response));
        self
    }

    /// Queues a transport failure, as if the connection had dropped.
    pub fn fail(&self, message: &str) -> &Self {
        lock(&self.queue).push_back(Queued::Failure(message.to_string()));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        lock(&self.requests).clone()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        lock(&self.requests).last().cloned()
    }

    /// Decoded form of the most recent request body.
    pub fn last_params(&self) -> Option<FormParams> {
        self.last_request().map(|req| decode_form(&req.body))
    }
}

pub fn decode_form(body: &str) -> FormParams {
    form_urlencoded::parse(body.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

impl Transport for MockTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        lock(&self.requests).push(request.clone());
        match lock(&self.queue).pop_front() {
            Some(Queued::Response(response)) => Ok(response),
            Some(Queued::Failure(message)) => Err(message.into()),
            None => Err("no response queued".into()),
        }
    }
}

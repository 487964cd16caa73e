//! Canned transport for exercising the gateway without a network.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::{HttpResponse, HttpTransport, TransportError};

/// A recorded request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    /// Target URL
    pub url: String,
    /// JSON body
    pub body: String,
}

/// Transport that replays queued replies and records every request.
///
/// When the queue runs dry, requests fail as unreachable.
#[derive(Debug, Default)]
pub struct CannedTransport {
    replies: Mutex<VecDeque<Result<HttpResponse, String>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl CannedTransport {
    /// Create a transport with nothing queued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport answering once with `status` and `body`.
    pub fn replying(status: u16, body: impl Into<String>) -> Self {
        let transport = Self::new();
        transport.push_response(status, body);
        transport
    }

    /// Queue a response.
    pub fn push_response(&self, status: u16, body: impl Into<String>) {
        self.replies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(Ok(HttpResponse::new(status, body)));
    }

    /// Queue a transport failure.
    pub fn push_failure(&self, reason: impl Into<String>) {
        self.replies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(Err(reason.into()));
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl HttpTransport for CannedTransport {
    async fn post_json(&self, url: &str, body: String) -> Result<HttpResponse, TransportError> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(RecordedRequest {
                url: url.to_string(),
                body,
            });

        let reply = self
            .replies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or_else(|| Err("no reply queued".to_string()));
        reply.map_err(|reason| TransportError::Request {
            url: url.to_string(),
            reason,
        })
    }
}

//! Mock transport for testing.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, PoisonError};

use super::{OutboundRequest, RawResponse, Transport, TransportFailure};

type Reply = Result<RawResponse, TransportFailure>;

/// Mock transport for testing.
///
/// Replies are served in the order they were queued; every request is
/// recorded. An empty queue answers with a connection failure.
#[derive(Debug, Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<OutboundRequest>>,
    call_count: AtomicU32,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON reply.
    pub fn with_json(self, status: u16, body: Value) -> Self {
        self.push(Ok(RawResponse::json(status, &body)));
        self
    }

    /// Queue a raw reply.
    pub fn with_body(self, status: u16, body: impl Into<Vec<u8>>) -> Self {
        self.push(Ok(RawResponse::new(status, body)));
        self
    }

    /// Queue a reply with `code: 200` and the given data.
    pub fn with_success(self, data: Value) -> Self {
        self.with_json(
            200,
            serde_json::json!({"code": 200, "message": "success", "data": data}),
        )
    }

    /// Queue a transport failure.
    pub fn with_failure(self, failure: TransportFailure) -> Self {
        self.push(Err(failure));
        self
    }

    pub fn push(&self, reply: Reply) {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(reply);
    }

    /// Number of times send was called.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::SeqCst)
    }

    /// All requests sent so far.
    pub fn requests(&self) -> Vec<OutboundRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The most recent request.
    pub fn last_request(&self) -> Option<OutboundRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: OutboundRequest) -> Result<RawResponse, TransportFailure> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);

        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| Err(TransportFailure::Connect("no mock reply queued".to_string())))
    }
}

//! Test double for [`Transport`].

use std::collections::VecDeque;

use parking_lot::Mutex;
use shared::types::Envelope;

use crate::error::ApiError;
use crate::transport::{ApiRequest, Transport};

/// Replays queued outcomes in order and records every request it sees.
/// Once the queue runs dry each call fails with a network error.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    requests: Mutex<Vec<ApiRequest>>,
    replies: Mutex<VecDeque<Result<Envelope, ApiError>>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reply(&self, envelope: Envelope) {
        self.replies.lock().push_back(Ok(envelope));
    }

    pub(crate) fn fail(&self, error: ApiError) {
        self.replies.lock().push_back(Err(error));
    }

    pub(crate) fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().clone()
    }
}

impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<Envelope, ApiError> {
        self.requests.lock().push(request);
        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Network("network error".to_string())))
    }
}

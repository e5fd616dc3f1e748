use std::cell::RefCell;
use std::collections::VecDeque;

use super::transport::{ApiRequest, Transport};
use super::SyncError;

/// Scripted transport: answers with queued responses in order and records
/// every request it was given.
#[derive(Default)]
pub struct FakeTransport {
    responses: RefCell<VecDeque<Result<String, SyncError>>>,
    requests: RefCell<Vec<ApiRequest>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_ok(&self, body: impl Into<String>) {
        self.responses.borrow_mut().push_back(Ok(body.into()));
    }

    pub fn push_err(&self, err: SyncError) {
        self.responses.borrow_mut().push_back(Err(err));
    }

    pub fn push_status(&self, status: &str, body: &str) {
        self.push_err(SyncError::Status {
            status: status.to_string(),
            body: body.to_string(),
        });
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.borrow().clone()
    }

    pub fn pending(&self) -> usize {
        self.responses.borrow().len()
    }
}

impl Transport for FakeTransport {
    async fn send(&self, request: ApiRequest) -> Result<String, SyncError> {
        self.requests.borrow_mut().push(request);
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(SyncError::Connection("no scripted response".to_string())))
    }
}

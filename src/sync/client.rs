use reqwest::Method;
use serde::de::DeserializeOwned;

use super::transport::{Api, ApiRequest, Transport};
use super::SyncError;

/// Typed operations over both API surfaces. Entity operations live in
/// `tasks.rs` and `resources.rs`.
pub struct TodoistClient<T> {
    transport: T,
}

impl<T: Transport> TodoistClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send a request whose response body is not needed.
    pub(crate) async fn call(&self, request: ApiRequest) -> Result<(), SyncError> {
        self.transport.send(request).await.map(|_| ())
    }

    /// Send a request and decode its JSON body.
    pub(crate) async fn fetch<D: DeserializeOwned>(&self, request: ApiRequest) -> Result<D, SyncError> {
        let body = self.transport.send(request).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Whether the account may use native query filters. One sync-API round
    /// trip; cache the answer, the task store does.
    pub async fn is_premium(&self) -> Result<bool, SyncError> {
        let request = ApiRequest::new(Method::POST, Api::Sync, "sync").form([
            ("sync_token", "*"),
            ("resource_types", "[\"user\"]"),
        ]);
        let out: serde_json::Value = self.fetch(request).await?;
        Ok(out["user"]["is_premium"].as_bool().unwrap_or(false))
    }
}

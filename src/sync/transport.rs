use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::{Client, Method};
use uuid::Uuid;

use super::SyncError;

pub const REST_API: &str = "https://api.todoist.com/rest/v1";
pub const SYNC_API: &str = "https://api.todoist.com/sync/v8";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Query parameters, URL-encoded by the transport.
pub type Params = BTreeMap<String, String>;

/// Which of the two API surfaces a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Api {
    Rest,
    Sync,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Json(serde_json::Value),
    Form(Vec<(String, String)>),
}

/// One HTTP call, independent of how it is sent.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub api: Api,
    /// Path relative to the API base, e.g. `tasks/42/close`.
    pub path: String,
    pub params: Params,
    pub headers: Vec<(String, String)>,
    pub body: Option<Body>,
}

impl ApiRequest {
    pub fn new(method: Method, api: Api, path: impl Into<String>) -> Self {
        Self {
            method,
            api,
            path: path.into(),
            params: Params::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.insert(key.into(), value.to_string());
        self
    }

    pub fn params(mut self, params: &Params) -> Self {
        self.params
            .extend(params.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// JSON body. Every JSON write carries a fresh `X-Request-Id`.
    pub fn json(self, value: serde_json::Value) -> Self {
        let mut req = self.header("X-Request-Id", Uuid::new_v4().to_string());
        req.body = Some(Body::Json(value));
        req
    }

    pub fn form<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.body = Some(Body::Form(
            pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        ));
        self
    }

    pub fn header_value(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

/// Sends requests and classifies the outcome. Implementations return the
/// response body for 2xx statuses and a `SyncError` for everything else.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn send(&self, request: ApiRequest) -> Result<String, SyncError>;
}

/// Bearer-token HTTP transport against the REST and sync endpoints.
#[derive(Clone)]
pub struct HttpTransport {
    token: String,
    rest_base: String,
    sync_base: String,
    http: Client,
}

impl HttpTransport {
    pub fn new(token: &str) -> Result<Self, SyncError> {
        Self::with_base_urls(token, REST_API, SYNC_API)
    }

    pub fn with_base_urls(token: &str, rest_base: &str, sync_base: &str) -> Result<Self, SyncError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SyncError::Connection(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            token: token.to_string(),
            rest_base: rest_base.trim_end_matches('/').to_string(),
            sync_base: sync_base.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn url(&self, api: Api, path: &str) -> String {
        let base = match api {
            Api::Rest => &self.rest_base,
            Api::Sync => &self.sync_base,
        };
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<String, SyncError> {
        let url = self.url(request.api, &request.path);
        log::debug!("{} {}", request.method, url);

        let mut req = self
            .http
            .request(request.method.clone(), &url)
            .bearer_auth(&self.token);
        if !request.params.is_empty() {
            req = req.query(&request.params);
        }
        for (key, value) in &request.headers {
            req = req.header(key.as_str(), value.as_str());
        }
        req = match &request.body {
            Some(Body::Json(value)) => req.json(value),
            Some(Body::Form(pairs)) => req.form(pairs),
            None => req,
        };

        let resp = req
            .send()
            .await
            .map_err(|e| SyncError::Connection(format!("{} {} failed: {}", request.method, url, e)))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| SyncError::Connection(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            log::warn!("{} {} returned {}", request.method, url, status);
            return Err(SyncError::Status {
                status: status.to_string(),
                body: text,
            });
        }

        Ok(text)
    }
}

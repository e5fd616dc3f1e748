use reqwest::Method;
use serde::Serialize;
use serde_json::{Map, Value};

use super::client::TodoistClient;
use super::command::make_command;
use super::transport::{Api, ApiRequest, Params, Transport};
use super::SyncError;
use crate::core::task::{Priority, Task};

/// Fields for creating or updating a task. Unset fields are left out of the
/// request body.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskArgs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_string: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_ids: Option<Vec<u64>>,
}

impl TaskArgs {
    pub fn content(text: impl Into<String>) -> Self {
        Self {
            content: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn due_string(text: impl Into<String>) -> Self {
        Self {
            due_string: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn priority(priority: Priority) -> Self {
        Self {
            priority: Some(priority),
            ..Default::default()
        }
    }
}

impl<T: Transport> TodoistClient<T> {
    pub async fn list_tasks(&self, filter: &Params) -> Result<Vec<Task>, SyncError> {
        let request = ApiRequest::new(Method::GET, Api::Rest, "tasks").params(filter);
        self.fetch(request).await
    }

    pub async fn get_task(&self, id: u64) -> Result<Task, SyncError> {
        let request = ApiRequest::new(Method::GET, Api::Rest, format!("tasks/{}", id));
        self.fetch(request).await
    }

    pub async fn add_task(&self, args: &TaskArgs) -> Result<Task, SyncError> {
        let request = ApiRequest::new(Method::POST, Api::Rest, "tasks").json(serde_json::to_value(args)?);
        self.fetch(request).await
    }

    pub async fn update_task(&self, id: u64, args: &TaskArgs) -> Result<(), SyncError> {
        let request = ApiRequest::new(Method::POST, Api::Rest, format!("tasks/{}", id))
            .json(serde_json::to_value(args)?);
        self.call(request).await
    }

    pub async fn delete_task(&self, id: u64) -> Result<(), SyncError> {
        self.call(ApiRequest::new(Method::DELETE, Api::Rest, format!("tasks/{}", id)))
            .await
    }

    pub async fn close_task(&self, id: u64) -> Result<(), SyncError> {
        self.call(ApiRequest::new(Method::POST, Api::Rest, format!("tasks/{}/close", id)))
            .await
    }

    pub async fn reopen_task(&self, id: u64) -> Result<(), SyncError> {
        self.call(ApiRequest::new(Method::POST, Api::Rest, format!("tasks/{}/reopen", id)))
            .await
    }

    /// Move a task through the sync API (`item_move`); REST cannot change a
    /// task's project. `id` is merged into the caller's args and wins over
    /// any `id` already present.
    pub async fn move_task(&self, id: u64, args: Map<String, Value>) -> Result<(), SyncError> {
        let mut command_args = args;
        command_args.insert("id".to_string(), Value::from(id));

        let commands = make_command("item_move", &command_args);
        if commands.is_empty() {
            return Err(SyncError::Validation(format!("Could not encode move of task {}", id)));
        }

        let request = ApiRequest::new(Method::POST, Api::Sync, "sync").form([("commands", commands)]);
        self.call(request).await
    }

    /// Free-text quick add; the server parses dates, projects and labels
    /// out of `text`.
    pub async fn quick_add(&self, text: &str, args: &Params) -> Result<(), SyncError> {
        let mut form = vec![("text".to_string(), text.to_string())];
        form.extend(args.iter().map(|(k, v)| (k.clone(), v.clone())));

        let request = ApiRequest::new(Method::POST, Api::Sync, "quick/add").form(form);
        self.call(request).await
    }
}

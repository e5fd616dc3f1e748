use reqwest::Method;

use super::client::TodoistClient;
use super::transport::{Api, ApiRequest, Transport};
use super::SyncError;
use crate::core::catalog::Catalog;
use crate::core::comment::Comment;
use crate::core::label::Label;
use crate::core::project::Project;

impl<T: Transport> TodoistClient<T> {
    pub async fn list_labels(&self) -> Result<Vec<Label>, SyncError> {
        self.fetch(ApiRequest::new(Method::GET, Api::Rest, "labels")).await
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>, SyncError> {
        self.fetch(ApiRequest::new(Method::GET, Api::Rest, "projects")).await
    }

    /// Comments of one task, fetched fresh on every call.
    pub async fn list_comments(&self, task_id: u64) -> Result<Vec<Comment>, SyncError> {
        let request = ApiRequest::new(Method::GET, Api::Rest, "comments").param("task_id", task_id);
        self.fetch(request).await
    }

    /// Labels and projects as a display-name snapshot.
    pub async fn load_catalog(&self) -> Result<Catalog, SyncError> {
        let labels = self.list_labels().await?;
        let projects = self.list_projects().await?;
        log::info!("Loaded {} labels, {} projects", labels.len(), projects.len());
        Ok(Catalog::new(&labels, &projects))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::fake::FakeTransport;

    #[tokio::test]
    async fn catalog_from_labels_and_projects() {
        let fake = FakeTransport::new();
        fake.push_ok(r#"[{"id": 10, "name": "home", "order": 1}]"#);
        fake.push_ok(r#"[{"id": 1, "name": "Inbox", "order": 0, "indent": 1, "comment_count": 0},
                         {"id": 2, "name": "Work", "order": 1, "indent": 1, "comment_count": 3}]"#);
        let client = TodoistClient::new(fake);

        let catalog = client.load_catalog().await.unwrap();
        assert_eq!(catalog.label_names(&[10]), vec!["@home"]);
        assert_eq!(catalog.project_name(2), "#Work");

        let paths: Vec<String> = client.transport().requests().into_iter().map(|r| r.path).collect();
        assert_eq!(paths, vec!["labels", "projects"]);
    }

    #[tokio::test]
    async fn comments_are_queried_by_task() {
        let fake = FakeTransport::new();
        fake.push_ok(
            r#"[{"id": 5, "task_id": 42, "posted": "2016-09-22T07:00:00Z", "content": "See [notes](https://example.com)"}]"#,
        );
        let client = TodoistClient::new(fake);

        let comments = client.list_comments(42).await.unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].posted, "2016-09-22T07:00:00Z");

        let req = &client.transport().requests()[0];
        assert_eq!(req.path, "comments");
        assert_eq!(req.params.get("task_id").map(String::as_str), Some("42"));
    }
}

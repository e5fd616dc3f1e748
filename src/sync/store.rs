use serde_json::{Map, Value};

use super::client::TodoistClient;
use super::filter::{effective_filter, resolve_filter};
use super::tasks::TaskArgs;
use super::transport::{Params, Transport};
use super::SyncError;
use crate::core::catalog::Catalog;
use crate::core::row::{task_cells, Cell};
use crate::core::task::{Priority, Task};

/// Where the store sends row updates. Rows are 0-based and line up with
/// the store's task order.
pub trait RowSink {
    /// Drop every row before a full render.
    fn clear(&mut self);
    fn render_row(&mut self, row: usize, cells: Vec<Cell>);
    fn remove_row(&mut self, row: usize);
}

/// A single-task write.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    SetContent(String),
    SetDueString(String),
    MoveToProject(u64),
    SetPriority(Priority),
    Close,
    Delete,
    Reopen,
}

impl Mutation {
    /// Whether success takes the task out of the current list.
    pub fn removes_row(&self) -> bool {
        matches!(self, Self::Close | Self::Delete)
    }
}

/// Ordered in-memory mirror of the current task list.
///
/// The mirror is only changed after the server accepted a write, and then
/// only from data read back from the server: a full list on reload, a
/// fresh `GET` of the one task after a field write. Row indices are valid
/// until the next reload.
pub struct TaskStore<T> {
    client: TodoistClient<T>,
    tasks: Vec<Task>,
    filter: String,
    premium: Option<bool>,
}

impl<T: Transport> TaskStore<T> {
    pub fn new(client: TodoistClient<T>) -> Self {
        Self {
            client,
            tasks: Vec::new(),
            filter: String::new(),
            premium: None,
        }
    }

    pub fn client(&self) -> &TodoistClient<T> {
        &self.client
    }

    /// Swap the transport, e.g. after a token change. Drops the cached tier.
    pub fn set_transport(&mut self, transport: T) {
        self.client = TodoistClient::new(transport);
        self.premium = None;
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, row: usize) -> Option<&Task> {
        self.tasks.get(row)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Filter text of the last successful reload.
    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Account tier, looked up once per session.
    pub async fn is_premium(&mut self) -> Result<bool, SyncError> {
        if let Some(premium) = self.premium {
            return Ok(premium);
        }
        let premium = self.client.is_premium().await?;
        log::info!("Account tier: {}", if premium { "premium" } else { "free" });
        self.premium = Some(premium);
        Ok(premium)
    }

    /// Replace the whole mirror with the tasks matching `filter_text` and
    /// render every row. On failure the previous mirror stays as it was.
    pub async fn reload(
        &mut self,
        filter_text: &str,
        catalog: &Catalog,
        sink: &mut impl RowSink,
    ) -> Result<(), SyncError> {
        let filter = effective_filter(filter_text).to_string();
        let premium = self.is_premium().await?;
        let params = resolve_filter(&filter, premium, catalog.projects())?;
        let tasks = self.client.list_tasks(&params).await?;

        log::info!("Loaded {} tasks for filter {}", tasks.len(), filter);
        self.tasks = tasks;
        self.filter = filter;

        sink.clear();
        for (row, task) in self.tasks.iter().enumerate() {
            sink.render_row(row, task_cells(task, catalog));
        }
        Ok(())
    }

    /// Reload with the current filter.
    pub async fn refresh(&mut self, catalog: &Catalog, sink: &mut impl RowSink) -> Result<(), SyncError> {
        let filter = self.filter.clone();
        self.reload(&filter, catalog, sink).await
    }

    /// Apply one write to the task at `row`, then bring the mirror in line:
    /// close/delete remove the row, every other write re-reads the task.
    pub async fn apply_mutation(
        &mut self,
        row: usize,
        mutation: Mutation,
        catalog: &Catalog,
        sink: &mut impl RowSink,
    ) -> Result<(), SyncError> {
        let id = self
            .tasks
            .get(row)
            .map(|t| t.id)
            .ok_or_else(|| SyncError::Validation(format!("No task at row {}", row)))?;

        let removes = mutation.removes_row();
        self.write(id, mutation).await?;

        if removes {
            self.tasks.remove(row);
            sink.remove_row(row);
            log::info!("Task {} removed from row {}", id, row);
        } else {
            let task = self.client.get_task(id).await?;
            sink.render_row(row, task_cells(&task, catalog));
            self.tasks[row] = task;
            log::info!("Task {} refreshed at row {}", id, row);
        }
        Ok(())
    }

    /// Move the task at `row` to the project named `name`.
    pub async fn move_to_project(
        &mut self,
        row: usize,
        name: &str,
        catalog: &Catalog,
        sink: &mut impl RowSink,
    ) -> Result<(), SyncError> {
        let project_id = catalog
            .find_project(name)
            .ok_or_else(|| SyncError::Validation(format!("Invalid project name: {}", name)))?;
        self.apply_mutation(row, Mutation::MoveToProject(project_id), catalog, sink)
            .await
    }

    /// Quick add, then reload: the new task's row is not known up front.
    pub async fn quick_add(&mut self, text: &str, catalog: &Catalog, sink: &mut impl RowSink) -> Result<(), SyncError> {
        self.client.quick_add(text, &Params::new()).await?;
        self.refresh(catalog, sink).await
    }

    async fn write(&self, id: u64, mutation: Mutation) -> Result<(), SyncError> {
        match mutation {
            Mutation::SetContent(text) => self.client.update_task(id, &TaskArgs::content(text)).await,
            Mutation::SetDueString(text) => self.client.update_task(id, &TaskArgs::due_string(text)).await,
            Mutation::SetPriority(priority) => self.client.update_task(id, &TaskArgs::priority(priority)).await,
            Mutation::MoveToProject(project_id) => {
                let mut args = Map::new();
                args.insert("project_id".to_string(), Value::from(project_id));
                self.client.move_task(id, args).await
            }
            Mutation::Close => self.client.close_task(id).await,
            Mutation::Delete => self.client.delete_task(id).await,
            Mutation::Reopen => self.client.reopen_task(id).await,
        }
    }
}

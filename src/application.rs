use crate::config::Config;
use crate::core::catalog::Catalog;
use crate::core::comment::Comment;
use crate::core::link;
use crate::core::task::Task;
use crate::message::Message;
use crate::status::StatusLine;
use crate::sync::{Mutation, RowSink, SyncError, TaskStore, TodoistClient, Transport};

pub const HELP: &str = "\
       q  quit
       ?  help

       f  filter list
       r  refresh list

       a  quick add
       v  task detail
   enter  task detail

 shift+c  close task
 shift+d  delete task
       u  reopen last closed task

       e  edit text
       p  move project
       d  set due date
     1-4  set priority P1 to P4";

/// What the UI should do after a message was handled.
#[derive(Debug)]
pub enum Outcome {
    None,
    Popup {
        title: String,
        body: String,
    },
    /// Ask for a line of text, then send `submit(text)`.
    Input {
        title: &'static str,
        initial: String,
        submit: fn(String) -> Message,
    },
    /// Ask for confirmation, then send `confirm` if the first button was chosen.
    Confirm {
        message: String,
        buttons: [&'static str; 2],
        confirm: Message,
    },
    Quit,
}

/// Ties the task mirror to the catalog snapshot, the persisted config and
/// the status line. Errors never escape `update`; they become transient
/// status messages.
pub struct Application<T> {
    config: Config,
    store: TaskStore<T>,
    catalog: Catalog,
    status: StatusLine,
}

impl<T: Transport> Application<T> {
    pub fn new(config: Config, transport: T) -> Self {
        Self {
            config,
            store: TaskStore::new(TodoistClient::new(transport)),
            catalog: Catalog::default(),
            status: StatusLine::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &TaskStore<T> {
        &self.store
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn status(&self) -> &StatusLine {
        &self.status
    }

    /// Load labels, projects and the tasks of the saved filter.
    pub async fn init(&mut self, sink: &mut impl RowSink) -> Result<(), SyncError> {
        self.catalog = self.store.client().load_catalog().await?;
        let filter = self.config.filter.clone();
        self.reload(&filter, sink).await
    }

    /// Use a new API token. The account tier is looked up again on the next reload.
    pub fn set_transport(&mut self, token: &str, transport: T) {
        self.config.token = token.to_string();
        self.store.set_transport(transport);
        self.save_config();
    }

    pub async fn update(&mut self, message: Message, selected: Option<usize>, sink: &mut impl RowSink) -> Outcome {
        match self.handle(message, selected, sink).await {
            Ok(outcome) => outcome,
            Err(e) => {
                self.status.error(&e);
                Outcome::None
            }
        }
    }

    async fn handle(
        &mut self,
        message: Message,
        selected: Option<usize>,
        sink: &mut impl RowSink,
    ) -> Result<Outcome, SyncError> {
        match message {
            Message::ShowHelp => Ok(Outcome::Popup {
                title: "Help".to_string(),
                body: HELP.to_string(),
            }),
            Message::ShowDetail => {
                let (_, task) = self.selection(selected)?;
                let comments = match self.store.client().list_comments(task.id).await {
                    Ok(comments) => comments,
                    Err(e) => {
                        self.status.error(&e);
                        Vec::new()
                    }
                };
                Ok(Outcome::Popup {
                    title: "Detail".to_string(),
                    body: detail_text(task, &self.catalog, &comments),
                })
            }
            Message::Refresh => {
                self.init(sink).await?;
                Ok(Outcome::None)
            }
            Message::Quit => Ok(Outcome::Quit),

            Message::PromptQuickAdd => Ok(Outcome::Input {
                title: "Quick add",
                initial: String::new(),
                submit: Message::QuickAdd,
            }),
            Message::PromptFilter => Ok(Outcome::Input {
                title: "Quick filter",
                initial: self.config.filter.clone(),
                submit: Message::SetFilter,
            }),
            Message::PromptContent => {
                let (_, task) = self.selection(selected)?;
                Ok(Outcome::Input {
                    title: "Edit text",
                    initial: task.content.clone(),
                    submit: Message::EditContent,
                })
            }
            Message::PromptDue => {
                let (_, task) = self.selection(selected)?;
                Ok(Outcome::Input {
                    title: "Edit due date",
                    initial: task.due.input_string().to_string(),
                    submit: Message::EditDue,
                })
            }
            Message::PromptProject => {
                let (_, task) = self.selection(selected)?;
                Ok(Outcome::Input {
                    title: "Move project",
                    initial: self.catalog.project_name(task.project_id).to_string(),
                    submit: Message::MoveProject,
                })
            }
            Message::ConfirmDelete => {
                let (_, task) = self.selection(selected)?;
                Ok(Outcome::Confirm {
                    message: format!("Are you sure you want to delete `{}`?", task.content),
                    buttons: ["Delete", "Cancel"],
                    confirm: Message::Delete,
                })
            }

            Message::QuickAdd(text) => {
                self.store.quick_add(&text, &self.catalog, sink).await?;
                Ok(Outcome::None)
            }
            Message::SetFilter(text) => {
                self.reload(&text, sink).await?;
                Ok(Outcome::None)
            }
            Message::EditContent(text) => self.mutate(selected, Mutation::SetContent(text), sink).await,
            Message::EditDue(text) => self.mutate(selected, Mutation::SetDueString(text), sink).await,
            Message::SetPriority(priority) => self.mutate(selected, Mutation::SetPriority(priority), sink).await,
            Message::MoveProject(name) => {
                let (row, _) = self.selection(selected)?;
                self.store.move_to_project(row, &name, &self.catalog, sink).await?;
                Ok(Outcome::None)
            }
            Message::Complete => {
                let (row, task) = self.selection(selected)?;
                let id = task.id;
                self.store.apply_mutation(row, Mutation::Close, &self.catalog, sink).await?;
                self.config.closed = id;
                self.save_config();
                Ok(Outcome::None)
            }
            Message::Delete => self.mutate(selected, Mutation::Delete, sink).await,
            Message::ReopenLast => {
                let id = self.config.closed;
                if id == 0 {
                    return Err(SyncError::Validation("No recently closed task".to_string()));
                }
                self.store.client().reopen_task(id).await?;
                // The task is open again even if the reload below fails
                self.config.closed = 0;
                self.save_config();
                self.store.refresh(&self.catalog, sink).await?;
                Ok(Outcome::None)
            }
        }
    }

    async fn reload(&mut self, filter: &str, sink: &mut impl RowSink) -> Result<(), SyncError> {
        self.store.reload(filter, &self.catalog, sink).await?;
        self.config.filter = self.store.filter().to_string();
        self.save_config();
        self.status.set_filter(self.store.filter());
        Ok(())
    }

    async fn mutate(
        &mut self,
        selected: Option<usize>,
        mutation: Mutation,
        sink: &mut impl RowSink,
    ) -> Result<Outcome, SyncError> {
        let (row, _) = self.selection(selected)?;
        self.store.apply_mutation(row, mutation, &self.catalog, sink).await?;
        Ok(Outcome::None)
    }

    /// The selected row and its task. The row must come from the current
    /// UI state; indices from before a reload are meaningless.
    pub fn selection(&self, selected: Option<usize>) -> Result<(usize, &Task), SyncError> {
        selected
            .and_then(|row| self.store.get(row).map(|task| (row, task)))
            .ok_or_else(|| SyncError::Validation("No task selected".to_string()))
    }

    fn save_config(&self) {
        if let Err(e) = self.config.save() {
            log::error!("Failed to save config: {}", e);
        }
    }
}

/// Detail view of one task: fields, content with visible URLs, comments.
pub fn detail_text(task: &Task, catalog: &Catalog, comments: &[Comment]) -> String {
    let mut b = String::new();
    b.push_str(&format!("Project:  {}\n", catalog.project_name(task.project_id)));
    b.push_str(&format!("DueDate:  {}\n", task.due.display()));
    b.push_str(&format!("Labels:   {}\n", catalog.label_names(&task.label_ids).join(",")));
    b.push_str(&format!("Priority: {}\n", task.priority));
    b.push_str(&format!("URL: {}\n", task.url));
    b.push_str(&format!("\n\n{}", link::annotate(&task.content)));

    if !comments.is_empty() {
        b.push_str("\n\n--\n");
        for comment in comments {
            b.push_str(&format!("{}\n{}\n", comment.posted, link::annotate(&comment.content)));
        }
    }
    b
}

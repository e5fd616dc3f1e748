use serde::{Deserialize, Serialize};

/// A comment on a task. `posted` is kept as the server sent it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    #[serde(default)]
    pub task_id: u64,
    #[serde(default)]
    pub posted: String,
    #[serde(default)]
    pub content: String,
}

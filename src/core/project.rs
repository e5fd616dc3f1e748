use serde::{Deserialize, Serialize};

/// A project. Ordering and nesting fields are display-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub indent: u32,
    #[serde(default)]
    pub comment_count: u32,
}

impl Project {
    /// Name as shown in the UI: `#name`.
    pub fn display_name(&self) -> String {
        format!("#{}", self.name)
    }
}

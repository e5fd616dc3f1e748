use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub order: i64,
}

impl Label {
    /// Name as shown in the UI: `@name`.
    pub fn display_name(&self) -> String {
        format!("@{}", self.name)
    }
}

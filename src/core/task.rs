use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::due::Due;

/// Task priority as stored by the service: 1 is lowest, 4 is highest.
///
/// The UI shows the inverse, so stored `Urgent` (4) is displayed as `P1`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Priority {
    #[default]
    Normal = 1,
    Medium = 2,
    High = 3,
    Urgent = 4,
}

impl Priority {
    pub fn stored(self) -> u8 {
        self as u8
    }

    /// Displayed level: `5 - stored`.
    pub fn displayed(self) -> u8 {
        5 - self.stored()
    }

    pub fn from_stored(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Normal),
            2 => Some(Self::Medium),
            3 => Some(Self::High),
            4 => Some(Self::Urgent),
            _ => None,
        }
    }

    /// Parse a displayed level (`1` = P1 = highest).
    pub fn from_displayed(n: u8) -> Option<Self> {
        if (1..=4).contains(&n) {
            Self::from_stored(5 - n)
        } else {
            None
        }
    }
}

impl TryFrom<u8> for Priority {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        Self::from_stored(n).ok_or_else(|| format!("invalid priority: {}", n))
    }
}

impl From<Priority> for u8 {
    fn from(p: Priority) -> Self {
        p.stored()
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.displayed())
    }
}

/// A task as returned by the REST API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub content: String,
    #[serde(default)]
    pub project_id: u64,
    #[serde(default)]
    pub label_ids: Vec<u64>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub comment_count: u32,
    #[serde(default)]
    pub order: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub due: Due,
    #[serde(default)]
    pub url: String,
}

impl Task {
    pub fn has_label(&self, label_id: u64) -> bool {
        self.label_ids.contains(&label_id)
    }
}

/// The API sends `"due": null` for tasks without a due date.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_rest_task() {
        let json = r#"{
            "id": 2995104339,
            "project_id": 2203306141,
            "content": "Buy Milk",
            "completed": false,
            "label_ids": [2156154810, 2156154820],
            "order": 1,
            "priority": 4,
            "comment_count": 0,
            "due": {
                "recurring": false,
                "string": "2016-09-01 12:00",
                "date": "2016-09-01",
                "datetime": "2016-09-01T09:00:00Z",
                "timezone": "Europe/Moscow"
            },
            "url": "https://todoist.com/showTask?id=2995104339"
        }"#;

        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.id, 2995104339);
        assert_eq!(task.project_id, 2203306141);
        assert_eq!(task.priority, Priority::Urgent);
        assert!(task.has_label(2156154820));
        assert_eq!(task.due.datetime.as_deref(), Some("2016-09-01T09:00:00Z"));
        assert_eq!(task.due.timezone.as_deref(), Some("Europe/Moscow"));
    }

    #[test]
    fn null_due_is_empty_record() {
        let json = r#"{"id": 1, "content": "x", "priority": 1, "due": null}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.due, Due::default());

        let json = r#"{"id": 1, "content": "x"}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.due, Due::default());
        assert_eq!(task.priority, Priority::Normal);
    }

    #[test]
    fn priority_display_is_inverted() {
        assert_eq!(Priority::Urgent.to_string(), "P1");
        assert_eq!(Priority::High.to_string(), "P2");
        assert_eq!(Priority::Medium.to_string(), "P3");
        assert_eq!(Priority::Normal.to_string(), "P4");

        for displayed in 1..=4u8 {
            let p = Priority::from_displayed(displayed).unwrap();
            assert_eq!(p.displayed(), displayed);
            assert_eq!(p.stored(), 5 - displayed);
        }
        assert_eq!(Priority::from_displayed(0), None);
        assert_eq!(Priority::from_displayed(5), None);
    }

    #[test]
    fn out_of_range_priority_is_rejected() {
        let json = r#"{"id": 1, "content": "x", "priority": 7}"#;
        assert!(serde_json::from_str::<Task>(json).is_err());
    }
}

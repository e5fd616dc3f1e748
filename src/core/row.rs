use chrono::{DateTime, Utc};

use super::catalog::Catalog;
use super::link;
use super::task::{Priority, Task};

pub const HEADERS: [&str; 5] = ["ID", "DueDate", "Pri", "Project", "Content"];

/// Presentation hint for a cell; the UI decides the actual colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Overdue,
    DueToday,
    Priority(Priority),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub tone: Tone,
    /// Truncate to this many columns when set.
    pub max_width: Option<usize>,
}

impl Cell {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: Tone::Plain,
            max_width: None,
        }
    }
}

/// Cells for one table row: id, due, priority, project, content.
pub fn task_cells(task: &Task, catalog: &Catalog) -> Vec<Cell> {
    task_cells_at(task, catalog, Utc::now())
}

pub fn task_cells_at(task: &Task, catalog: &Catalog, now: DateTime<Utc>) -> Vec<Cell> {
    let due_tone = if task.due.is_overdue_at(now) {
        Tone::Overdue
    } else if task.due.is_due_today_at(now) {
        Tone::DueToday
    } else {
        Tone::Plain
    };

    // Only P1-P3 are highlighted
    let priority_tone = match task.priority {
        Priority::Normal => Tone::Plain,
        p => Tone::Priority(p),
    };

    vec![
        Cell::plain(task.id.to_string()),
        Cell {
            tone: due_tone,
            ..Cell::plain(task.due.display())
        },
        Cell {
            tone: priority_tone,
            ..Cell::plain(task.priority.to_string())
        },
        Cell {
            max_width: Some(16),
            ..Cell::plain(catalog.project_name(task.project_id))
        },
        Cell::plain(link::sanitize(&task.content)),
    ]
}

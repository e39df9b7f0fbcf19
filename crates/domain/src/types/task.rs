//! Task payloads and the kanban column model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::impl_domain_status_conversions;

/// Kanban column a task sits in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Blocked,
    InReview,
    Done,
}

impl TaskStatus {
    /// Columns in board order.
    pub const ALL: [Self; 5] =
        [Self::Todo, Self::InProgress, Self::Blocked, Self::InReview, Self::Done];
}

impl_domain_status_conversions!(TaskStatus {
    Todo => "todo",
    InProgress => "in_progress",
    Blocked => "blocked",
    InReview => "in_review",
    Done => "done",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    High,
    Medium,
    Low,
}

impl_domain_status_conversions!(TaskPriority {
    High => "high",
    Medium => "medium",
    Low => "low",
});

/// Task as returned by list/detail/create/update endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub task_id: Uuid,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "dueDate")]
    pub due_date: Option<NaiveDate>,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    #[serde(default)]
    pub assignees: Vec<Uuid>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Task creation request
#[derive(Debug, Clone, Serialize)]
pub struct NewTask {
    #[serde(rename = "workspaceId")]
    pub workspace_id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(rename = "dueDate")]
    pub due_date: NaiveDate,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub assignees: Vec<Uuid>,
    pub tags: Vec<String>,
}

/// Partial task update; only populated fields are sent
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskUpdate {
    pub task_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "dueDate", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignees: Option<Vec<Uuid>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl TaskUpdate {
    /// Move a task to another column.
    #[must_use]
    pub fn move_to(task_id: Uuid, status: TaskStatus) -> Self {
        Self { task_id, status: Some(status), ..Self::default() }
    }
}

/// Payload of `get_all_tasks`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskList {
    #[serde(default)]
    pub tasks: Vec<Task>,
}

/// Tasks grouped into kanban columns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskBoard {
    columns: Vec<(TaskStatus, Vec<Task>)>,
}

impl TaskBoard {
    /// Group tasks by status, keeping their relative order inside a column.
    #[must_use]
    pub fn from_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        let mut columns: Vec<(TaskStatus, Vec<Task>)> =
            TaskStatus::ALL.iter().map(|status| (*status, Vec::new())).collect();
        for task in tasks {
            if let Some((_, column)) = columns.iter_mut().find(|(status, _)| *status == task.status)
            {
                column.push(task);
            }
        }
        Self { columns }
    }

    #[must_use]
    pub fn column(&self, status: TaskStatus) -> &[Task] {
        self.columns
            .iter()
            .find(|(s, _)| *s == status)
            .map(|(_, tasks)| tasks.as_slice())
            .unwrap_or_default()
    }

    pub fn columns(&self) -> impl Iterator<Item = (TaskStatus, &[Task])> + '_ {
        self.columns.iter().map(|(status, tasks)| (*status, tasks.as_slice()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.iter().map(|(_, tasks)| tasks.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::Pagination;

/// Input structure for creating a task.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    /// The title of the task.
    /// Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    /// An optional description for the task.
    /// Maximum length of 1000 characters if provided.
    #[validate(length(max = 1000))]
    pub description: Option<String>,

    /// Completion flag; `false` when omitted.
    #[serde(default)]
    pub completed: bool,

    /// The project the task belongs to. Must exist.
    pub project_id: i32,
}

/// Full replacement of a task's mutable fields.
///
/// There is no partial update: an omitted `description` clears it and an
/// omitted `completed` resets it to `false`.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskUpdate {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(max = 1000))]
    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub completed: bool,
}

/// Represents a task entity as stored in the database and returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
pub struct Task {
    /// Unique identifier for the task.
    pub id: i32,
    /// The title of the task.
    pub title: String,
    /// An optional description for the task.
    pub description: Option<String>,
    /// Whether the task is done.
    pub completed: bool,
    /// Identifier of the project the task belongs to.
    pub project_id: i32,
    /// Identifier of the user who created the task.
    pub owner_id: i32,
}

/// Query parameters accepted by `GET /tasks/`.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct TaskQuery {
    /// Only tasks of this project.
    pub project_id: Option<i32>,
    /// Only tasks with this completion flag.
    pub completed: Option<bool>,
    /// Only tasks created by this user.
    pub owner_id: Option<i32>,
    #[validate(range(min = 0))]
    pub skip: Option<i64>,
    #[validate(range(min = 0))]
    pub limit: Option<i64>,
}

/// Conjunctive filter over the task table. `None` fields do not constrain.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TaskFilter {
    pub project_id: Option<i32>,
    pub completed: Option<bool>,
    pub owner_id: Option<i32>,
}

impl TaskFilter {
    pub fn by_owner(owner_id: i32) -> Self {
        Self {
            owner_id: Some(owner_id),
            ..Self::default()
        }
    }
}

impl TaskQuery {
    pub fn filter(&self) -> TaskFilter {
        TaskFilter {
            project_id: self.project_id,
            completed: self.completed,
            owner_id: self.owner_id,
        }
    }

    pub fn pagination(&self) -> Pagination {
        Pagination {
            skip: self.skip,
            limit: self.limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_input_defaults() {
        let input: TaskInput =
            serde_json::from_str(r#"{"title": "Write docs", "project_id": 3}"#).unwrap();
        assert_eq!(input.title, "Write docs");
        assert!(input.description.is_none());
        assert!(!input.completed);
        assert_eq!(input.project_id, 3);
    }

    #[test]
    fn test_task_input_requires_project() {
        let result: Result<TaskInput, _> = serde_json::from_str(r#"{"title": "Orphan"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_task_update_omitted_fields_reset() {
        let update: TaskUpdate = serde_json::from_str(r#"{"title": "Renamed"}"#).unwrap();
        assert_eq!(update.title, "Renamed");
        assert_eq!(update.description, None);
        assert!(!update.completed);
    }

    #[test]
    fn test_task_validation() {
        let valid_input = TaskInput {
            title: "Valid Task".to_string(),
            description: Some("Valid Description".to_string()),
            completed: false,
            project_id: 1,
        };
        assert!(valid_input.validate().is_ok());

        let empty_title = TaskInput {
            title: "".to_string(),
            description: None,
            completed: false,
            project_id: 1,
        };
        assert!(empty_title.validate().is_err());

        let long_description = TaskUpdate {
            title: "Valid title".to_string(),
            description: Some("b".repeat(1001)),
            completed: true,
        };
        assert!(long_description.validate().is_err());
    }

    #[test]
    fn test_task_query_split() {
        let query = TaskQuery {
            project_id: Some(2),
            completed: Some(true),
            owner_id: None,
            skip: Some(4),
            limit: None,
        };
        assert_eq!(
            query.filter(),
            TaskFilter {
                project_id: Some(2),
                completed: Some(true),
                owner_id: None,
            }
        );
        assert_eq!(query.pagination().offset(), 4);
        assert_eq!(query.pagination().limit(), 10);
        assert_eq!(TaskFilter::by_owner(9).owner_id, Some(9));
    }
}

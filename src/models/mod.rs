pub mod project;
pub mod task;
pub mod user;

pub use project::{Project, ProjectInput, ProjectRow};
pub use task::{Task, TaskFilter, TaskInput, TaskQuery, TaskUpdate};
pub use user::{User, UserCredentials};

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Number of rows returned by list endpoints when the caller gives no `limit`.
pub const DEFAULT_PAGE_LIMIT: i64 = 10;

/// Offset/limit pagination accepted by every list endpoint.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, Validate)]
pub struct Pagination {
    /// Number of rows to skip.
    #[validate(range(min = 0))]
    pub skip: Option<i64>,
    /// Maximum number of rows to return. Defaults to [`DEFAULT_PAGE_LIMIT`].
    #[validate(range(min = 0))]
    pub limit: Option<i64>,
}

impl Pagination {
    pub fn offset(&self) -> i64 {
        self.skip.unwrap_or(0)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_PAGE_LIMIT)
    }
}

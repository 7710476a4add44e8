use sqlx::PgConnection;

use super::is_foreign_key_violation;
use crate::error::AppError;
use crate::models::{Pagination, Task, TaskFilter, TaskInput, TaskUpdate};

const TASK_COLUMNS: &str = "id, title, description, completed, project_id, owner_id";

/// Inserts a task owned by `owner_id` into an existing project.
pub async fn create(
    conn: &mut PgConnection,
    input: &TaskInput,
    owner_id: i32,
) -> Result<Task, AppError> {
    let project_exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM projects WHERE id = $1)")
            .bind(input.project_id)
            .fetch_one(&mut *conn)
            .await?;
    if !project_exists {
        return Err(AppError::NotFound("Project not found".into()));
    }

    sqlx::query_as::<_, Task>(&format!(
        "INSERT INTO tasks (title, description, completed, project_id, owner_id)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING {}",
        TASK_COLUMNS
    ))
    .bind(&input.title)
    .bind(&input.description)
    .bind(input.completed)
    .bind(input.project_id)
    .bind(owner_id)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| {
        // The project can disappear between the check and the insert.
        if is_foreign_key_violation(&e) {
            AppError::NotFound("Project not found".into())
        } else {
            e.into()
        }
    })
}

pub async fn get(conn: &mut PgConnection, task_id: i32) -> Result<Option<Task>, AppError> {
    let task = sqlx::query_as::<_, Task>(&format!(
        "SELECT {} FROM tasks WHERE id = $1",
        TASK_COLUMNS
    ))
    .bind(task_id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(task)
}

/// Lists tasks matching every set field of `filter`, ordered by id.
pub async fn list(
    conn: &mut PgConnection,
    filter: TaskFilter,
    page: Pagination,
) -> Result<Vec<Task>, AppError> {
    let sql = list_sql(&filter);
    let mut query_builder = sqlx::query_as::<_, Task>(&sql);

    if let Some(project_id) = filter.project_id {
        query_builder = query_builder.bind(project_id);
    }
    if let Some(completed) = filter.completed {
        query_builder = query_builder.bind(completed);
    }
    if let Some(owner_id) = filter.owner_id {
        query_builder = query_builder.bind(owner_id);
    }

    let tasks = query_builder
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&mut *conn)
        .await?;
    Ok(tasks)
}

/// Loads the tasks of all given projects in one query.
pub async fn list_for_projects(
    conn: &mut PgConnection,
    project_ids: &[i32],
) -> Result<Vec<Task>, AppError> {
    if project_ids.is_empty() {
        return Ok(Vec::new());
    }
    let tasks = sqlx::query_as::<_, Task>(&format!(
        "SELECT {} FROM tasks WHERE project_id = ANY($1) ORDER BY id",
        TASK_COLUMNS
    ))
    .bind(project_ids)
    .fetch_all(&mut *conn)
    .await?;
    Ok(tasks)
}

/// Replaces title, description and completion of a task.
///
/// Returns `None` when no task has `task_id`.
pub async fn update(
    conn: &mut PgConnection,
    task_id: i32,
    update: &TaskUpdate,
) -> Result<Option<Task>, AppError> {
    let task = sqlx::query_as::<_, Task>(&format!(
        "UPDATE tasks
         SET title = $1, description = $2, completed = $3
         WHERE id = $4
         RETURNING {}",
        TASK_COLUMNS
    ))
    .bind(&update.title)
    .bind(&update.description)
    .bind(update.completed)
    .bind(task_id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(task)
}

/// Deletes a task. Returns whether a row was removed.
pub async fn delete(conn: &mut PgConnection, task_id: i32) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
        .bind(task_id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Builds the `SELECT` for [`list`]. Placeholders are numbered in the order
/// project_id, completed, owner_id (each only when set), then limit, offset.
fn list_sql(filter: &TaskFilter) -> String {
    let mut sql = format!("SELECT {} FROM tasks", TASK_COLUMNS);
    let mut param_count = 1;

    let mut conditions: Vec<String> = Vec::new();

    if filter.project_id.is_some() {
        conditions.push(format!("project_id = ${}", param_count));
        param_count += 1;
    }
    if filter.completed.is_some() {
        conditions.push(format!("completed = ${}", param_count));
        param_count += 1;
    }
    if filter.owner_id.is_some() {
        conditions.push(format!("owner_id = ${}", param_count));
        param_count += 1;
    }

    if !conditions.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" AND "));
    }

    sql.push_str(&format!(
        " ORDER BY id LIMIT ${} OFFSET ${}",
        param_count,
        param_count + 1
    ));
    sql
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_list_sql_without_filters() {
        assert_eq!(
            list_sql(&TaskFilter::default()),
            "SELECT id, title, description, completed, project_id, owner_id FROM tasks \
             ORDER BY id LIMIT $1 OFFSET $2"
        );
    }

    #[test]
    fn test_list_sql_combines_filters_conjunctively() {
        let filter = TaskFilter {
            project_id: Some(1),
            completed: Some(true),
            owner_id: Some(2),
        };
        assert_eq!(
            list_sql(&filter),
            "SELECT id, title, description, completed, project_id, owner_id FROM tasks \
             WHERE project_id = $1 AND completed = $2 AND owner_id = $3 \
             ORDER BY id LIMIT $4 OFFSET $5"
        );
    }

    #[test]
    fn test_list_sql_numbers_placeholders_for_sparse_filters() {
        let filter = TaskFilter {
            project_id: None,
            completed: Some(false),
            owner_id: None,
        };
        assert_eq!(
            list_sql(&filter),
            "SELECT id, title, description, completed, project_id, owner_id FROM tasks \
             WHERE completed = $1 ORDER BY id LIMIT $2 OFFSET $3"
        );
    }
}

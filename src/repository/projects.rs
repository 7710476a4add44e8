use std::collections::HashMap;

use sqlx::PgConnection;

use super::{tasks, unique_violation};
use crate::error::AppError;
use crate::models::{Pagination, Project, ProjectInput, ProjectRow, Task};

/// Inserts a project owned by `owner_id`. Project names are unique.
pub async fn create(
    conn: &mut PgConnection,
    input: &ProjectInput,
    owner_id: i32,
) -> Result<Project, AppError> {
    let row = sqlx::query_as::<_, ProjectRow>(
        "INSERT INTO projects (name, description, owner_id)
         VALUES ($1, $2, $3)
         RETURNING id, name, description, owner_id",
    )
    .bind(&input.name)
    .bind(&input.description)
    .bind(owner_id)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| match unique_violation(&e) {
        Some(_) => AppError::BadRequest("Project name already exists".into()),
        None => e.into(),
    })?;

    Ok(Project::from_row(row, Vec::new()))
}

/// Fetches one project together with its tasks.
pub async fn get(conn: &mut PgConnection, project_id: i32) -> Result<Option<Project>, AppError> {
    let row = sqlx::query_as::<_, ProjectRow>(
        "SELECT id, name, description, owner_id FROM projects WHERE id = $1",
    )
    .bind(project_id)
    .fetch_optional(&mut *conn)
    .await?;

    match row {
        Some(row) => {
            let tasks = tasks::list_for_projects(conn, &[row.id]).await?;
            Ok(Some(Project::from_row(row, tasks)))
        }
        None => Ok(None),
    }
}

/// Lists a page of projects, each with its tasks.
pub async fn list(conn: &mut PgConnection, page: Pagination) -> Result<Vec<Project>, AppError> {
    let rows = sqlx::query_as::<_, ProjectRow>(
        "SELECT id, name, description, owner_id FROM projects
         ORDER BY id LIMIT $1 OFFSET $2",
    )
    .bind(page.limit())
    .bind(page.offset())
    .fetch_all(&mut *conn)
    .await?;

    with_tasks(conn, rows).await
}

/// Lists a page of the projects owned by `owner_id`, each with its tasks.
pub async fn list_by_owner(
    conn: &mut PgConnection,
    owner_id: i32,
    page: Pagination,
) -> Result<Vec<Project>, AppError> {
    let rows = sqlx::query_as::<_, ProjectRow>(
        "SELECT id, name, description, owner_id FROM projects
         WHERE owner_id = $1
         ORDER BY id LIMIT $2 OFFSET $3",
    )
    .bind(owner_id)
    .bind(page.limit())
    .bind(page.offset())
    .fetch_all(&mut *conn)
    .await?;

    with_tasks(conn, rows).await
}

/// Deletes a project; its tasks go with it through `ON DELETE CASCADE`.
/// Returns whether a row was removed.
pub async fn delete(conn: &mut PgConnection, project_id: i32) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM projects WHERE id = $1")
        .bind(project_id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

async fn with_tasks(
    conn: &mut PgConnection,
    rows: Vec<ProjectRow>,
) -> Result<Vec<Project>, AppError> {
    let ids: Vec<i32> = rows.iter().map(|row| row.id).collect();
    let tasks = tasks::list_for_projects(conn, &ids).await?;
    Ok(attach_tasks(rows, tasks))
}

/// Distributes `tasks` onto their projects, keeping both orders.
fn attach_tasks(rows: Vec<ProjectRow>, tasks: Vec<Task>) -> Vec<Project> {
    let mut by_project: HashMap<i32, Vec<Task>> = HashMap::new();
    for task in tasks {
        by_project.entry(task.project_id).or_default().push(task);
    }

    rows.into_iter()
        .map(|row| {
            let tasks = by_project.remove(&row.id).unwrap_or_default();
            Project::from_row(row, tasks)
        })
        .collect()
}

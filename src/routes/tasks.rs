use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{TaskInput, TaskQuery, TaskUpdate},
    repository::tasks,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

/// Retrieves a list of tasks.
///
/// Filters combine with AND; unset filters do not constrain.
///
/// ## Query Parameters:
/// - `project_id` (optional): only tasks of this project.
/// - `completed` (optional): only tasks with this completion flag.
/// - `owner_id` (optional): only tasks created by this user.
/// - `skip` / `limit` (optional): pagination, defaults 0 and 10.
///
/// ## Responses:
/// - `200 OK`: a JSON array of `Task` objects ordered by id.
/// - `422 Unprocessable Entity`: negative `skip` or `limit`.
#[get("")]
pub async fn get_tasks(
    pool: web::Data<PgPool>,
    query_params: web::Query<TaskQuery>,
) -> Result<impl Responder, AppError> {
    query_params.validate()?;
    let mut conn = pool.acquire().await?;
    let tasks = tasks::list(&mut conn, query_params.filter(), query_params.pagination()).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a new task for the authenticated user.
///
/// The `owner_id` of the task is set to the caller; `project_id` must name an
/// existing project.
///
/// ## Responses:
/// - `201 Created`: the new `Task`.
/// - `401 Unauthorized`: missing or invalid access token.
/// - `404 Not Found`: the project does not exist.
/// - `422 Unprocessable Entity`: the body failed validation.
#[post("")]
pub async fn create_task(
    user: AuthenticatedUser,
    pool: web::Data<PgPool>,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let mut tx = pool.begin().await?;
    let task = tasks::create(&mut tx, &task_data, user.id()).await?;
    tx.commit().await?;

    Ok(HttpResponse::Created().json(task))
}

/// Retrieves a specific task by its ID.
///
/// ## Responses:
/// - `200 OK`: the `Task`.
/// - `404 Not Found`: no task has this id.
#[get("/{id}")]
pub async fn get_task(
    pool: web::Data<PgPool>,
    task_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let mut conn = pool.acquire().await?;
    match tasks::get(&mut conn, task_id.into_inner()).await? {
        Some(task) => Ok(HttpResponse::Ok().json(task)),
        None => Err(AppError::NotFound("Task not found".into())),
    }
}

/// Replaces a task's title, description and completion flag.
///
/// Fields omitted from the body are reset (`description` to null, `completed`
/// to false). Ownership is not checked.
///
/// ## Responses:
/// - `200 OK`: the updated `Task`.
/// - `404 Not Found`: no task has this id.
/// - `422 Unprocessable Entity`: the body failed validation.
#[put("/{id}")]
pub async fn update_task(
    pool: web::Data<PgPool>,
    task_id: web::Path<i32>,
    task_data: web::Json<TaskUpdate>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let mut tx = pool.begin().await?;
    let task = tasks::update(&mut tx, task_id.into_inner(), &task_data)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;
    tx.commit().await?;

    Ok(HttpResponse::Ok().json(task))
}

/// Deletes a task by its ID. Ownership is not checked.
///
/// ## Responses:
/// - `200 OK`: `{"message": "Task deleted successfully"}`.
/// - `404 Not Found`: no task has this id.
#[delete("/{id}")]
pub async fn delete_task(
    pool: web::Data<PgPool>,
    task_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let mut tx = pool.begin().await?;
    let deleted = tasks::delete(&mut tx, task_id.into_inner()).await?;
    if !deleted {
        return Err(AppError::NotFound("Task not found".into()));
    }
    tx.commit().await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Task deleted successfully" })))
}

use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{Pagination, ProjectInput},
    repository::projects,
};
use actix_web::{delete, get, post, web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

/// Lists projects, each with its tasks.
///
/// ## Query Parameters:
/// - `skip` (optional): number of projects to skip, default 0.
/// - `limit` (optional): maximum number of projects, default 10.
///
/// ## Responses:
/// - `200 OK`: a JSON array of `Project` objects ordered by id.
/// - `422 Unprocessable Entity`: negative `skip` or `limit`.
#[get("")]
pub async fn list_projects(
    pool: web::Data<PgPool>,
    page: web::Query<Pagination>,
) -> Result<impl Responder, AppError> {
    page.validate()?;
    let mut conn = pool.acquire().await?;
    let projects = projects::list(&mut conn, *page).await?;
    Ok(HttpResponse::Ok().json(projects))
}

/// Creates a project owned by the authenticated user.
///
/// ## Responses:
/// - `201 Created`: the new `Project` (with an empty task list).
/// - `400 Bad Request`: a project with this name already exists.
/// - `401 Unauthorized`: missing or invalid access token.
/// - `422 Unprocessable Entity`: the body failed validation.
#[post("")]
pub async fn create_project(
    user: AuthenticatedUser,
    pool: web::Data<PgPool>,
    project_data: web::Json<ProjectInput>,
) -> Result<impl Responder, AppError> {
    project_data.validate()?;

    let mut tx = pool.begin().await?;
    let project = projects::create(&mut tx, &project_data, user.id()).await?;
    tx.commit().await?;

    Ok(HttpResponse::Created().json(project))
}

/// Retrieves a project and its tasks.
///
/// ## Responses:
/// - `200 OK`: the `Project`.
/// - `404 Not Found`: no project has this id.
#[get("/{id}")]
pub async fn get_project(
    pool: web::Data<PgPool>,
    project_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let mut conn = pool.acquire().await?;
    match projects::get(&mut conn, project_id.into_inner()).await? {
        Some(project) => Ok(HttpResponse::Ok().json(project)),
        None => Err(AppError::NotFound("Project not found".into())),
    }
}

/// Deletes a project and, through the cascade, all of its tasks.
///
/// Ownership is not checked.
///
/// ## Responses:
/// - `200 OK`: `{"message": "Project deleted successfully"}`.
/// - `404 Not Found`: no project has this id.
#[delete("/{id}")]
pub async fn delete_project(
    pool: web::Data<PgPool>,
    project_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let mut tx = pool.begin().await?;
    let deleted = projects::delete(&mut tx, project_id.into_inner()).await?;
    if !deleted {
        return Err(AppError::NotFound("Project not found".into()));
    }
    tx.commit().await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Project deleted successfully" })))
}

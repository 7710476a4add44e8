use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{Pagination, TaskFilter},
    repository::{projects, tasks},
};
use actix_web::{get, web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

/// Returns the user record of the caller.
#[get("/me")]
pub async fn me(user: AuthenticatedUser) -> impl Responder {
    HttpResponse::Ok().json(user.0)
}

/// Lists the projects owned by a user, each with its tasks.
///
/// An unknown user id yields an empty list.
#[get("/{user_id}/projects")]
pub async fn list_user_projects(
    pool: web::Data<PgPool>,
    user_id: web::Path<i32>,
    page: web::Query<Pagination>,
) -> Result<impl Responder, AppError> {
    page.validate()?;
    let mut conn = pool.acquire().await?;
    let projects = projects::list_by_owner(&mut conn, user_id.into_inner(), *page).await?;
    Ok(HttpResponse::Ok().json(projects))
}

/// Lists the tasks created by a user.
#[get("/{user_id}/tasks")]
pub async fn list_user_tasks(
    pool: web::Data<PgPool>,
    user_id: web::Path<i32>,
    page: web::Query<Pagination>,
) -> Result<impl Responder, AppError> {
    page.validate()?;
    let mut conn = pool.acquire().await?;
    let tasks = tasks::list(&mut conn, TaskFilter::by_owner(user_id.into_inner()), *page).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

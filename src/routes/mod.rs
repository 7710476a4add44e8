pub mod auth;
pub mod health;
pub mod projects;
pub mod tasks;
pub mod users;

use actix_web::web;

use crate::error::AppError;

/// Registers every route of the service.
///
/// Paths are declared without trailing slashes; wrap the app in
/// `NormalizePath::trim()` so `/projects/` and `/projects` both resolve.
pub fn config(cfg: &mut web::ServiceConfig) {
    // Undeserializable bodies and query strings get the same JSON error shape as domain errors.
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(err.to_string()).into()
    }))
    .app_data(web::FormConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(err.to_string()).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(err.to_string()).into()
    }))
    .service(health::health)
    .service(auth::register)
    .service(auth::login)
    .service(auth::refresh_token)
    .service(
        web::scope("/users")
            .service(users::me)
            .service(users::list_user_projects)
            .service(users::list_user_tasks),
    )
    .service(
        web::scope("/projects")
            .service(projects::list_projects)
            .service(projects::create_project)
            .service(projects::get_project)
            .service(projects::delete_project),
    )
    .service(
        web::scope("/tasks")
            .service(tasks::get_tasks)
            .service(tasks::create_task)
            .service(tasks::get_task)
            .service(tasks::update_task)
            .service(tasks::delete_task),
    );
}

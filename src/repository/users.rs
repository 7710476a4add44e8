use sqlx::PgConnection;

use super::unique_violation;
use crate::error::AppError;
use crate::models::{User, UserCredentials};

/// Fields of a user row about to be inserted.
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub full_name: Option<&'a str>,
}

pub async fn find_by_username(
    conn: &mut PgConnection,
    username: &str,
) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, email, full_name FROM users WHERE username = $1",
    )
    .bind(username)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(user)
}

pub async fn find_credentials_by_username(
    conn: &mut PgConnection,
    username: &str,
) -> Result<Option<UserCredentials>, AppError> {
    let credentials = sqlx::query_as::<_, UserCredentials>(
        "SELECT id, username, password_hash FROM users WHERE username = $1",
    )
    .bind(username)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(credentials)
}

pub async fn username_exists(conn: &mut PgConnection, username: &str) -> Result<bool, AppError> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
        .bind(username)
        .fetch_one(&mut *conn)
        .await?;
    Ok(exists)
}

pub async fn email_exists(conn: &mut PgConnection, email: &str) -> Result<bool, AppError> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
        .bind(email)
        .fetch_one(&mut *conn)
        .await?;
    Ok(exists)
}

/// Inserts a user.
///
/// A concurrent registration can slip past the existence checks; the unique
/// constraints still reject it and the violation is reported as a 400.
pub async fn create(conn: &mut PgConnection, new_user: NewUser<'_>) -> Result<User, AppError> {
    sqlx::query_as::<_, User>(
        "INSERT INTO users (username, email, password_hash, full_name)
         VALUES ($1, $2, $3, $4)
         RETURNING id, username, email, full_name",
    )
    .bind(new_user.username)
    .bind(new_user.email)
    .bind(new_user.password_hash)
    .bind(new_user.full_name)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| match unique_violation(&e).as_deref() {
        Some("users_email_key") => AppError::BadRequest("Email already registered".into()),
        Some(_) => AppError::BadRequest("Username already registered".into()),
        None => e.into(),
    })
}

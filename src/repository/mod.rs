//! Explicit data access for users, projects and tasks.
//!
//! Every function takes `&mut PgConnection`, so callers decide the scope:
//! a pooled connection acquired for a read, or a transaction for a mutation.
//! Related rows are loaded only where a function says so; see
//! [`projects::get`] and [`tasks::list_for_projects`].

pub mod projects;
pub mod tasks;
pub mod users;

/// Name of the constraint a database error violated, if it is a unique violation.
pub(crate) fn unique_violation(error: &sqlx::Error) -> Option<String> {
    match error {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            Some(db_err.constraint().unwrap_or_default().to_string())
        }
        _ => None,
    }
}

/// Whether a database error is a foreign key violation.
pub(crate) fn is_foreign_key_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation())
}

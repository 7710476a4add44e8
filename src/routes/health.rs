use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;
use sqlx::PgPool;
use std::time::Duration;

const DATABASE_PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Health check endpoint
///
/// Reports the API status, whether the database answers, and the current time.
/// Responds `503 Service Unavailable` when the database cannot be reached.
#[get("/health")]
pub async fn health(pool: web::Data<PgPool>) -> impl Responder {
    let probe = sqlx::query("SELECT 1").execute(pool.get_ref());
    match tokio::time::timeout(DATABASE_PROBE_TIMEOUT, probe).await {
        Ok(Ok(_)) => HttpResponse::Ok().json(json!({
            "status": "ok",
            "database": "ok",
            "timestamp": Utc::now()
        })),
        outcome => {
            match outcome {
                Ok(Err(e)) => log::warn!("health check could not reach the database: {}", e),
                _ => log::warn!("health check timed out waiting for the database"),
            }
            HttpResponse::ServiceUnavailable().json(json!({
                "status": "degraded",
                "database": "unavailable",
                "timestamp": Utc::now()
            }))
        }
    }
}

use crate::AppState;
use actix_web::{web, HttpResponse};

/// Readiness: 200 when the store answers `SELECT 1`, 503 otherwise
pub async fn health_summary(state: web::Data<AppState>) -> HttpResponse {
    match sqlx::query("SELECT 1")
        .execute(state.executor().pool())
        .await
    {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": crate::config::SERVICE_NAME,
            "version": env!("CARGO_PKG_VERSION")
        })),
        Err(e) => {
            tracing::debug!(error = %e, "health check query failed");
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "status": "unhealthy",
                "service": crate::config::SERVICE_NAME
            }))
        }
    }
}

pub async fn liveness_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"alive": true}))
}

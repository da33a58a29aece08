use actix_web::{get, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;

/// Liveness probe. Sits outside the auth gate and reports the service
/// name, status, and current server time.
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "service": "taskhub",
        "status": "ok",
        "timestamp": Utc::now()
    }))
}

use crate::models::HealthResponse;
use crate::SERVICE_NAME;
use actix_web::HttpResponse;

/// Liveness endpoint; never touches the provider
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: SERVICE_NAME,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn test_health_body() {
        let response = health_check().await;
        assert_eq!(response.status(), actix_web::http::StatusCode::OK);

        let body = actix_web::body::to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "ok": true, "service": "p_prueba_api" }));
    }
}

use axum::{extract::Extension, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::server::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Liveness probe against the durable store.
///
/// Round-trips the database with a bounded timeout and reports the
/// store's clock on success.
pub async fn health_handler(
    Extension(state): Extension<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let probe = tokio::time::timeout(
        std::time::Duration::from_secs(5),
        sqlx::query_scalar::<_, DateTime<Utc>>("SELECT now()").fetch_one(&state.db_pool),
    )
    .await;

    match probe {
        Ok(Ok(now)) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok".to_string(),
                time: Some(now.to_rfc3339()),
                error: None,
            }),
        ),
        Ok(Err(e)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(HealthResponse {
                status: "error".to_string(),
                time: None,
                error: Some(format!("Database query failed: {}", e)),
            }),
        ),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(HealthResponse {
                status: "error".to_string(),
                time: None,
                error: Some("Database query timeout (>5s)".to_string()),
            }),
        ),
    }
}

use axum::{
    extract::Extension,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

use orgbook_core::{DomainError, TenantId};

use crate::app::errors::ErrorResponse;
use crate::app::extract::ApiPath;
use crate::app::AppState;
use crate::context::TenantContext;

pub async fn health(Extension(state): Extension<AppState>) -> impl IntoResponse {
    if state.is_draining() {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "draining" })),
        )
    } else {
        (StatusCode::OK, Json(json!({ "status": "ok" })))
    }
}

/// Prometheus text exposition of the state's registry.
pub async fn metrics(Extension(state): Extension<AppState>) -> Response {
    match orgbook_observability::metrics::encode_text(&state.registry) {
        Ok((content_type, body)) => ([(header::CONTENT_TYPE, content_type)], body).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "failed to encode metrics");
            ErrorResponse::plain(StatusCode::INTERNAL_SERVER_ERROR, "failed to encode metrics")
                .into_response()
        }
    }
}

pub async fn tenant(Extension(tenant): Extension<TenantContext>) -> impl IntoResponse {
    Json(json!({ "tenant_id": tenant.tenant_id().to_string() }))
}

/// Resolve a tenant by id; only the configured tenant exists.
pub async fn tenant_by_id(
    Extension(tenant): Extension<TenantContext>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<serde_json::Value>, ErrorResponse> {
    let requested = TenantId::from_uuid(id);
    if requested != tenant.tenant_id() {
        tracing::debug!(%requested, "unknown tenant requested");
        return Err(DomainError::not_found("tenant").into());
    }
    Ok(Json(json!({ "tenant_id": requested.to_string() })))
}

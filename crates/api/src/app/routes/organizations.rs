//! Organization and contact routes.
//!
//! The group is mounted but has no handlers yet: every method under
//! `/organizations` answers 501 so clients can tell "not built" from
//! "no such route".

use axum::{
    extract::{Extension, OriginalUri},
    http::{Method, StatusCode},
    routing::any,
    Router,
};

use crate::app::errors::ErrorResponse;
use crate::context::TenantContext;

pub fn router() -> Router {
    Router::new()
        .route("/", any(not_implemented))
        .route("/*rest", any(not_implemented))
}

async fn not_implemented(
    Extension(tenant): Extension<TenantContext>,
    method: Method,
    OriginalUri(uri): OriginalUri,
) -> ErrorResponse {
    tracing::info!(
        tenant_id = %tenant.tenant_id(),
        %method,
        path = %uri.path(),
        "organizations endpoint not implemented"
    );
    ErrorResponse::plain(
        StatusCode::NOT_IMPLEMENTED,
        "organizations API is not implemented yet",
    )
}

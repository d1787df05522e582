use axum::{routing::get, Router};

pub mod organizations;
pub mod system;

/// Router for all tenant-scoped endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/tenant", get(system::tenant))
        .route("/tenants/:id", get(system::tenant_by_id))
        .nest("/organizations", organizations::router())
}

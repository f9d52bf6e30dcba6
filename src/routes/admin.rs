use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::admin::DashboardStats,
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    routes::{categories, content, inquiries, products},
    services::admin_service,
    state::AppState,
};

/// Every route below requires an admin bearer token.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(dashboard_stats))
        .merge(categories::admin_router())
        .nest("/products", products::admin_router())
        .nest("/inquiries", inquiries::admin_router())
        .nest("/content", content::admin_router())
}

#[utoipa::path(
    get,
    path = "/api/admin/stats",
    responses(
        (status = 200, description = "Catalog and inquiry counters", body = ApiResponse<DashboardStats>),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn dashboard_stats(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<DashboardStats>>> {
    let resp = admin_service::dashboard_stats(&state, &user).await?;
    Ok(Json(resp))
}

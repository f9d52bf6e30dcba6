use axum::{
    Json, Router,
    extract::State,
    routing::get,
};

use crate::{
    dto::content::{ContentList, UpsertContentRequest},
    error::AppResult,
    extract::{AppJson, AppPath},
    middleware::auth::AuthUser,
    models::Content,
    response::ApiResponse,
    services::content_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/{page_key}", get(get_page_content))
}

pub fn admin_router() -> Router<AppState> {
    Router::new().route("/", get(list_content)).route(
        "/{page_key}",
        get(get_content).put(upsert_content).delete(delete_content),
    )
}

#[utoipa::path(
    get,
    path = "/api/content/{page_key}",
    params(("page_key" = String, Path, description = "Page key, e.g. home-hero")),
    responses(
        (status = 200, description = "Published content block", body = ApiResponse<Content>),
        (status = 404, description = "Missing or unpublished")
    ),
    tag = "Content"
)]
pub async fn get_page_content(
    State(state): State<AppState>,
    AppPath(page_key): AppPath<String>,
) -> AppResult<Json<ApiResponse<Content>>> {
    let resp = content_service::get_published(&state, &page_key).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/content",
    responses(
        (status = 200, description = "All content blocks", body = ApiResponse<ContentList>),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_content(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<ContentList>>> {
    let resp = content_service::list_content(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/content/{page_key}",
    params(("page_key" = String, Path, description = "Page key")),
    responses(
        (status = 200, description = "Content block, published or not", body = ApiResponse<Content>),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn get_content(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(page_key): AppPath<String>,
) -> AppResult<Json<ApiResponse<Content>>> {
    let resp = content_service::get_content(&state, &user, &page_key).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/content/{page_key}",
    params(("page_key" = String, Path, description = "Page key")),
    request_body = UpsertContentRequest,
    responses(
        (status = 200, description = "Content block created or replaced", body = ApiResponse<Content>),
        (status = 400, description = "Invalid page key or payload")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn upsert_content(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(page_key): AppPath<String>,
    AppJson(payload): AppJson<UpsertContentRequest>,
) -> AppResult<Json<ApiResponse<Content>>> {
    let resp = content_service::upsert_content(&state, &user, &page_key, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/content/{page_key}",
    params(("page_key" = String, Path, description = "Page key")),
    responses(
        (status = 200, description = "Content block deleted"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_content(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(page_key): AppPath<String>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = content_service::delete_content(&state, &user, &page_key).await?;
    Ok(Json(resp))
}

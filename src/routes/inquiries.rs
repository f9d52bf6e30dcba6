use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, patch, post},
};
use uuid::Uuid;

use crate::{
    dto::inquiries::{
        CreateInquiryRequest, InquiryList, RespondInquiryRequest, UpdateInquiryStatusRequest,
    },
    error::AppResult,
    extract::{AppJson, AppPath, AppQuery},
    middleware::auth::AuthUser,
    models::Inquiry,
    response::ApiResponse,
    routes::params::InquiryListQuery,
    services::inquiry_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(create_inquiry))
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_inquiries))
        .route("/{id}", get(get_inquiry).delete(delete_inquiry))
        .route("/{id}/status", patch(update_inquiry_status))
        .route("/{id}/respond", post(respond_inquiry))
}

#[utoipa::path(
    post,
    path = "/api/inquiries",
    request_body = CreateInquiryRequest,
    responses(
        (status = 201, description = "Inquiry submitted", body = ApiResponse<Inquiry>),
        (status = 400, description = "Validation failed or unknown product")
    ),
    tag = "Inquiries"
)]
pub async fn create_inquiry(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateInquiryRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Inquiry>>)> {
    let resp = inquiry_service::create_inquiry(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/admin/inquiries",
    params(InquiryListQuery),
    responses(
        (status = 200, description = "Inquiries, newest first", body = ApiResponse<InquiryList>),
        (status = 400, description = "Invalid status filter"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_inquiries(
    State(state): State<AppState>,
    user: AuthUser,
    AppQuery(query): AppQuery<InquiryListQuery>,
) -> AppResult<Json<ApiResponse<InquiryList>>> {
    let resp = inquiry_service::list_inquiries(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/inquiries/{id}",
    params(("id" = Uuid, Path, description = "Inquiry ID")),
    responses(
        (status = 200, description = "Inquiry", body = ApiResponse<Inquiry>),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn get_inquiry(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<Inquiry>>> {
    let resp = inquiry_service::get_inquiry(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/inquiries/{id}/status",
    params(("id" = Uuid, Path, description = "Inquiry ID")),
    request_body = UpdateInquiryStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<Inquiry>),
        (status = 400, description = "Invalid status"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_inquiry_status(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateInquiryStatusRequest>,
) -> AppResult<Json<ApiResponse<Inquiry>>> {
    let resp = inquiry_service::update_status(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/inquiries/{id}/respond",
    params(("id" = Uuid, Path, description = "Inquiry ID")),
    request_body = RespondInquiryRequest,
    responses(
        (status = 200, description = "Response recorded", body = ApiResponse<Inquiry>),
        (status = 400, description = "Empty response or closed inquiry"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn respond_inquiry(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<RespondInquiryRequest>,
) -> AppResult<Json<ApiResponse<Inquiry>>> {
    let resp = inquiry_service::respond(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/inquiries/{id}",
    params(("id" = Uuid, Path, description = "Inquiry ID")),
    responses(
        (status = 200, description = "Inquiry deleted"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_inquiry(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = inquiry_service::delete_inquiry(&state, &user, id).await?;
    Ok(Json(resp))
}

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::categories::{
        CategoryList, CategoryNode, CategoryTree, CreateCategoryRequest,
        CreateSubSubcategoryRequest, CreateSubcategoryRequest, SubSubcategoryList,
        SubcategoryList, UpdateCategoryRequest, UpdateSubSubcategoryRequest,
        UpdateSubcategoryRequest,
    },
    error::AppResult,
    extract::{AppJson, AppPath, AppQuery},
    middleware::auth::AuthUser,
    models::{Category, SubSubcategory, Subcategory},
    response::ApiResponse,
    routes::params::{SubSubcategoryFilter, SubcategoryFilter},
    services::category_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(category_tree))
        .route("/{slug}", get(get_category_by_slug))
}

/// Mounted under `/api/admin`.
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/{id}",
            get(get_category).put(update_category).delete(delete_category),
        )
        .route(
            "/subcategories",
            get(list_subcategories).post(create_subcategory),
        )
        .route(
            "/subcategories/{id}",
            get(get_subcategory)
                .put(update_subcategory)
                .delete(delete_subcategory),
        )
        .route(
            "/sub-subcategories",
            get(list_sub_subcategories).post(create_sub_subcategory),
        )
        .route(
            "/sub-subcategories/{id}",
            get(get_sub_subcategory)
                .put(update_sub_subcategory)
                .delete(delete_sub_subcategory),
        )
}

#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "Active category tree", body = ApiResponse<CategoryTree>)
    ),
    tag = "Categories"
)]
pub async fn category_tree(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<CategoryTree>>> {
    let resp = category_service::category_tree(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/categories/{slug}",
    params(
        ("slug" = String, Path, description = "Category slug")
    ),
    responses(
        (status = 200, description = "Category with subtree", body = ApiResponse<CategoryNode>),
        (status = 404, description = "Category not found")
    ),
    tag = "Categories"
)]
pub async fn get_category_by_slug(
    State(state): State<AppState>,
    AppPath(slug): AppPath<String>,
) -> AppResult<Json<ApiResponse<CategoryNode>>> {
    let resp = category_service::get_category_by_slug(&state, &slug).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/categories",
    responses(
        (status = 200, description = "All categories", body = ApiResponse<CategoryList>),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_categories(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<CategoryList>>> {
    let resp = category_service::list_categories(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/categories/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category", body = ApiResponse<Category>),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn get_category(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let resp = category_service::get_category(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<Category>),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Slug already used")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_category(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<CreateCategoryRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Category>>)> {
    let resp = category_service::create_category(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/admin/categories/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = ApiResponse<Category>),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Slug already used")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_category(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateCategoryRequest>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let resp = category_service::update_category(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/categories/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category and its subtree deleted"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_category(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = category_service::delete_category(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/subcategories",
    params(SubcategoryFilter),
    responses(
        (status = 200, description = "Subcategories", body = ApiResponse<SubcategoryList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_subcategories(
    State(state): State<AppState>,
    user: AuthUser,
    AppQuery(filter): AppQuery<SubcategoryFilter>,
) -> AppResult<Json<ApiResponse<SubcategoryList>>> {
    let resp = category_service::list_subcategories(&state, &user, filter).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/subcategories/{id}",
    params(("id" = Uuid, Path, description = "Subcategory ID")),
    responses(
        (status = 200, description = "Subcategory", body = ApiResponse<Subcategory>),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn get_subcategory(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<Subcategory>>> {
    let resp = category_service::get_subcategory(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/subcategories",
    request_body = CreateSubcategoryRequest,
    responses(
        (status = 201, description = "Subcategory created", body = ApiResponse<Subcategory>),
        (status = 400, description = "Validation failed or unknown category")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_subcategory(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<CreateSubcategoryRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Subcategory>>)> {
    let resp = category_service::create_subcategory(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/admin/subcategories/{id}",
    params(("id" = Uuid, Path, description = "Subcategory ID")),
    request_body = UpdateSubcategoryRequest,
    responses(
        (status = 200, description = "Subcategory updated", body = ApiResponse<Subcategory>),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_subcategory(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateSubcategoryRequest>,
) -> AppResult<Json<ApiResponse<Subcategory>>> {
    let resp = category_service::update_subcategory(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/subcategories/{id}",
    params(("id" = Uuid, Path, description = "Subcategory ID")),
    responses(
        (status = 200, description = "Subcategory and its children deleted"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_subcategory(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = category_service::delete_subcategory(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/sub-subcategories",
    params(SubSubcategoryFilter),
    responses(
        (status = 200, description = "Sub-subcategories", body = ApiResponse<SubSubcategoryList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_sub_subcategories(
    State(state): State<AppState>,
    user: AuthUser,
    AppQuery(filter): AppQuery<SubSubcategoryFilter>,
) -> AppResult<Json<ApiResponse<SubSubcategoryList>>> {
    let resp = category_service::list_sub_subcategories(&state, &user, filter).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/sub-subcategories/{id}",
    params(("id" = Uuid, Path, description = "Sub-subcategory ID")),
    responses(
        (status = 200, description = "Sub-subcategory", body = ApiResponse<SubSubcategory>),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn get_sub_subcategory(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<SubSubcategory>>> {
    let resp = category_service::get_sub_subcategory(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/sub-subcategories",
    request_body = CreateSubSubcategoryRequest,
    responses(
        (status = 201, description = "Sub-subcategory created", body = ApiResponse<SubSubcategory>),
        (status = 400, description = "Validation failed or unknown subcategory")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_sub_subcategory(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<CreateSubSubcategoryRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<SubSubcategory>>)> {
    let resp = category_service::create_sub_subcategory(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/admin/sub-subcategories/{id}",
    params(("id" = Uuid, Path, description = "Sub-subcategory ID")),
    request_body = UpdateSubSubcategoryRequest,
    responses(
        (status = 200, description = "Sub-subcategory updated", body = ApiResponse<SubSubcategory>),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_sub_subcategory(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateSubSubcategoryRequest>,
) -> AppResult<Json<ApiResponse<SubSubcategory>>> {
    let resp = category_service::update_sub_subcategory(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/sub-subcategories/{id}",
    params(("id" = Uuid, Path, description = "Sub-subcategory ID")),
    responses(
        (status = 200, description = "Sub-subcategory deleted"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_sub_subcategory(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = category_service::delete_sub_subcategory(&state, &user, id).await?;
    Ok(Json(resp))
}

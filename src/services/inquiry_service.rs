use chrono::Utc;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit,
    dto::inquiries::{
        CreateInquiryRequest, InquiryList, RespondInquiryRequest, UpdateInquiryStatusRequest,
    },
    entity::{
        inquiries::{ActiveModel, Column, Entity as Inquiries},
        products::Entity as Products,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Inquiry, InquiryStatus},
    response::{ApiResponse, Meta},
    routes::params::{InquiryListQuery, SortOrder, paginate},
    state::AppState,
};

pub fn parse_status(status: &str) -> AppResult<InquiryStatus> {
    status
        .trim()
        .to_ascii_lowercase()
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid inquiry status".into()))
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Public contact form submission.
pub async fn create_inquiry(
    state: &AppState,
    payload: CreateInquiryRequest,
) -> AppResult<ApiResponse<Inquiry>> {
    payload.validate()?;
    if payload.name.trim().is_empty() || payload.message.trim().is_empty() {
        return Err(AppError::Validation("name and message must not be blank".into()));
    }

    if let Some(product_id) = payload.product_id {
        if Products::find_by_id(product_id).one(&state.orm).await?.is_none() {
            return Err(AppError::BadRequest("Product not found".into()));
        }
    }

    let inquiry = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name.trim().to_string()),
        email: Set(payload.email.trim().to_lowercase()),
        phone: Set(blank_to_none(payload.phone)),
        company: Set(blank_to_none(payload.company)),
        subject: Set(blank_to_none(payload.subject)),
        message: Set(payload.message.trim().to_string()),
        product_id: Set(payload.product_id),
        status: Set(InquiryStatus::New.as_str().to_string()),
        response: Set(None),
        responded_by: Set(None),
        responded_at: Set(None),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(inquiry_id = %inquiry.id, "inquiry received");

    Ok(ApiResponse::success(
        "Inquiry submitted",
        inquiry.into(),
        Some(Meta::empty()),
    ))
}

pub async fn list_inquiries(
    state: &AppState,
    user: &AuthUser,
    query: InquiryListQuery,
) -> AppResult<ApiResponse<InquiryList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = paginate(query.page, query.per_page);

    let mut condition = Condition::all();
    if let Some(status) = query.status.as_deref().filter(|s| !s.is_empty()) {
        let status = parse_status(status)?;
        condition = condition.add(Column::Status.eq(status.as_str()));
    }

    let mut finder = Inquiries::find().filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(Column::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(Column::CreatedAt),
    };
    finder = finder.order_by_asc(Column::Id);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Inquiry::from)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Inquiries", InquiryList { items }, Some(meta)))
}

pub async fn get_inquiry(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Inquiry>> {
    ensure_admin(user)?;
    let inquiry = Inquiries::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Inquiry", inquiry.into(), None))
}

pub async fn update_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateInquiryStatusRequest,
) -> AppResult<ApiResponse<Inquiry>> {
    ensure_admin(user)?;
    let status = parse_status(&payload.status)?;

    let existing = Inquiries::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.into();
    active.status = Set(status.as_str().to_string());
    active.updated_at = Set(Utc::now().into());
    let inquiry = active.update(&state.orm).await?;

    audit::record(
        state,
        user.user_id,
        "inquiry_status_update",
        "inquiries",
        serde_json::json!({ "inquiry_id": inquiry.id, "status": inquiry.status }),
    )
    .await;

    Ok(ApiResponse::success(
        "Inquiry updated",
        inquiry.into(),
        Some(Meta::empty()),
    ))
}

pub async fn respond(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: RespondInquiryRequest,
) -> AppResult<ApiResponse<Inquiry>> {
    ensure_admin(user)?;
    payload.validate()?;
    let response = payload.response.trim().to_string();
    if response.is_empty() {
        return Err(AppError::Validation("response must not be blank".into()));
    }

    let existing = Inquiries::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    if existing.status == InquiryStatus::Closed.as_str() {
        return Err(AppError::BadRequest("Inquiry is closed".into()));
    }

    let now = Utc::now();
    let mut active: ActiveModel = existing.into();
    active.response = Set(Some(response));
    active.responded_by = Set(Some(user.user_id));
    active.responded_at = Set(Some(now.into()));
    active.status = Set(InquiryStatus::Responded.as_str().to_string());
    active.updated_at = Set(now.into());
    let inquiry = active.update(&state.orm).await?;

    audit::record(
        state,
        user.user_id,
        "inquiry_respond",
        "inquiries",
        serde_json::json!({ "inquiry_id": inquiry.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Response recorded",
        inquiry.into(),
        Some(Meta::empty()),
    ))
}

pub async fn delete_inquiry(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = Inquiries::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        state,
        user.user_id,
        "inquiry_delete",
        "inquiries",
        serde_json::json!({ "inquiry_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

use chrono::Utc;
use lazy_static::lazy_static;
use regex::Regex;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit,
    dto::content::{ContentList, UpsertContentRequest},
    entity::contents::{ActiveModel, Column, Entity as Contents, Model as ContentModel},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Content,
    response::{ApiResponse, Meta},
    state::AppState,
};

lazy_static! {
    /// Page keys: lowercase alphanumeric words joined by single `-` or `_`.
    /// - Valid: "home", "home-hero", "about_us", "blue-monday-2024"
    /// - Invalid: "Home", "-home", "home--hero", "home hero"
    pub static ref PAGE_KEY_REGEX: Regex =
        Regex::new(r"^[a-z0-9]+(?:[-_][a-z0-9]+)*$").expect("page key regex");
}

pub fn validate_page_key(page_key: &str) -> AppResult<()> {
    if page_key.len() > 100 || !PAGE_KEY_REGEX.is_match(page_key) {
        return Err(AppError::Validation(format!("invalid page key '{page_key}'")));
    }
    Ok(())
}

async fn find_by_key(state: &AppState, page_key: &str) -> AppResult<Option<ContentModel>> {
    Ok(Contents::find()
        .filter(Column::PageKey.eq(page_key))
        .one(&state.orm)
        .await?)
}

/// Storefront read: unpublished blocks are reported as missing.
pub async fn get_published(state: &AppState, page_key: &str) -> AppResult<ApiResponse<Content>> {
    validate_page_key(page_key)?;
    let content = find_by_key(state, page_key)
        .await?
        .filter(|c| c.is_published)
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Content", content.into(), None))
}

pub async fn list_content(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<ContentList>> {
    ensure_admin(user)?;
    let items = Contents::find()
        .order_by_asc(Column::PageKey)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Content::from)
        .collect();
    Ok(ApiResponse::success(
        "Content",
        ContentList { items },
        Some(Meta::empty()),
    ))
}

pub async fn get_content(
    state: &AppState,
    user: &AuthUser,
    page_key: &str,
) -> AppResult<ApiResponse<Content>> {
    ensure_admin(user)?;
    validate_page_key(page_key)?;
    let content = find_by_key(state, page_key)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Content", content.into(), None))
}

/// Create or replace the block stored under `page_key`.
pub async fn upsert_content(
    state: &AppState,
    user: &AuthUser,
    page_key: &str,
    payload: UpsertContentRequest,
) -> AppResult<ApiResponse<Content>> {
    ensure_admin(user)?;
    validate_page_key(page_key)?;
    payload.validate()?;

    let metadata = payload
        .metadata
        .unwrap_or_else(|| serde_json::json!({}));
    if !metadata.is_object() {
        return Err(AppError::Validation("metadata must be a JSON object".into()));
    }
    let mut items = payload.items;
    items.sort_by_key(|item| item.order);
    let items = serde_json::to_value(items).map_err(anyhow::Error::from)?;

    let existing = find_by_key(state, page_key).await?;
    let created = existing.is_none();
    let mut active: ActiveModel = match existing {
        Some(model) => model.into(),
        None => ActiveModel {
            id: Set(Uuid::new_v4()),
            page_key: Set(page_key.to_string()),
            created_at: NotSet,
            updated_at: NotSet,
            ..Default::default()
        },
    };
    active.title = Set(payload.title);
    active.subtitle = Set(payload.subtitle);
    active.content = Set(payload.content);
    active.button_text = Set(payload.button_text);
    active.button_link = Set(payload.button_link);
    active.image = Set(payload.image);
    active.background_image = Set(payload.background_image);
    active.video_url = Set(payload.video_url);
    active.items = Set(items);
    active.metadata = Set(metadata);
    active.is_published = Set(payload.is_published.unwrap_or(true));

    let content = if created {
        active.insert(&state.orm).await?
    } else {
        active.updated_at = Set(Utc::now().into());
        active.update(&state.orm).await?
    };

    audit::record(
        state,
        user.user_id,
        if created { "content_create" } else { "content_update" },
        "contents",
        serde_json::json!({ "page_key": content.page_key }),
    )
    .await;

    Ok(ApiResponse::success(
        if created { "Content created" } else { "Updated" },
        content.into(),
        Some(Meta::empty()),
    ))
}

pub async fn delete_content(
    state: &AppState,
    user: &AuthUser,
    page_key: &str,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    validate_page_key(page_key)?;
    let result = Contents::delete_many()
        .filter(Column::PageKey.eq(page_key))
        .exec(&state.orm)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        state,
        user.user_id,
        "content_delete",
        "contents",
        serde_json::json!({ "page_key": page_key }),
    )
    .await;

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_key_accepts_lowercase_words() {
        for key in ["home", "home-hero", "about_us", "blue-monday-2024"] {
            assert!(validate_page_key(key).is_ok(), "{key} should be valid");
        }
    }

    #[test]
    fn page_key_rejects_malformed_values() {
        for key in ["Home", "-home", "home--hero", "home hero", ""] {
            assert!(validate_page_key(key).is_err(), "{key} should be invalid");
        }
    }
}

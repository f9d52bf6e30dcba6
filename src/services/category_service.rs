use chrono::Utc;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit,
    dto::categories::{
        CategoryList, CategoryNode, CategoryTree, CreateCategoryRequest,
        CreateSubSubcategoryRequest, CreateSubcategoryRequest, SubSubcategoryList,
        SubcategoryList, UpdateCategoryRequest, UpdateSubSubcategoryRequest,
        UpdateSubcategoryRequest,
    },
    entity::{
        categories::{ActiveModel as CategoryActive, Column as CatCol, Entity as Categories},
        sub_subcategories::{
            ActiveModel as SubSubActive, Column as SubSubCol, Entity as SubSubcategories,
        },
        subcategories::{ActiveModel as SubActive, Column as SubCol, Entity as Subcategories},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Category, SubSubcategory, Subcategory},
    response::{ApiResponse, Meta},
    routes::params::{SubSubcategoryFilter, SubcategoryFilter},
    slug::{resolve_slug, unique_slug},
    state::AppState,
};

pub async fn category_tree(state: &AppState) -> AppResult<ApiResponse<CategoryTree>> {
    let categories = Categories::find()
        .filter(CatCol::IsActive.eq(true))
        .order_by_asc(CatCol::Name)
        .all(&state.orm)
        .await?;
    let category_ids: Vec<Uuid> = categories.iter().map(|c| c.id).collect();
    let (subcategories, sub_subcategories) = load_children(&state.orm, category_ids).await?;

    let tree = CategoryTree::build(
        categories.into_iter().map(Category::from).collect(),
        subcategories,
        sub_subcategories,
    );
    Ok(ApiResponse::success("Categories", tree, Some(Meta::empty())))
}

pub async fn get_category_by_slug(
    state: &AppState,
    slug: &str,
) -> AppResult<ApiResponse<CategoryNode>> {
    let category = Categories::find()
        .filter(CatCol::Slug.eq(slug))
        .filter(CatCol::IsActive.eq(true))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let (subcategories, sub_subcategories) = load_children(&state.orm, vec![category.id]).await?;

    let node = CategoryTree::build(
        vec![Category::from(category)],
        subcategories,
        sub_subcategories,
    )
    .items
    .pop()
    .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Category", node, None))
}

async fn load_children(
    db: &DatabaseConnection,
    category_ids: Vec<Uuid>,
) -> AppResult<(Vec<Subcategory>, Vec<SubSubcategory>)> {
    if category_ids.is_empty() {
        return Ok((Vec::new(), Vec::new()));
    }
    let subcategories: Vec<Subcategory> = Subcategories::find()
        .filter(SubCol::CategoryId.is_in(category_ids))
        .filter(SubCol::IsActive.eq(true))
        .order_by_asc(SubCol::Name)
        .all(db)
        .await?
        .into_iter()
        .map(Subcategory::from)
        .collect();

    let subcategory_ids: Vec<Uuid> = subcategories.iter().map(|s| s.id).collect();
    if subcategory_ids.is_empty() {
        return Ok((subcategories, Vec::new()));
    }
    let sub_subcategories = SubSubcategories::find()
        .filter(SubSubCol::SubcategoryId.is_in(subcategory_ids))
        .filter(SubSubCol::IsActive.eq(true))
        .order_by_asc(SubSubCol::SortOrder)
        .order_by_asc(SubSubCol::Name)
        .all(db)
        .await?
        .into_iter()
        .map(SubSubcategory::from)
        .collect();

    Ok((subcategories, sub_subcategories))
}

pub async fn list_categories(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<CategoryList>> {
    ensure_admin(user)?;
    let items = Categories::find()
        .order_by_asc(CatCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Category::from)
        .collect();
    Ok(ApiResponse::success(
        "Categories",
        CategoryList { items },
        Some(Meta::empty()),
    ))
}

pub async fn get_category(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Category>> {
    ensure_admin(user)?;
    let category = Categories::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Category", category.into(), None))
}

pub async fn create_category(
    state: &AppState,
    user: &AuthUser,
    payload: CreateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    ensure_admin(user)?;
    payload.validate()?;

    let slug = match payload.slug.as_deref() {
        Some(explicit) => {
            let slug = resolve_slug(Some(explicit), &payload.name)?;
            if category_slug_taken(&state.orm, slug.clone(), None).await? {
                return Err(AppError::Conflict(format!("slug '{slug}' is already used")));
            }
            slug
        }
        None => {
            let base = resolve_slug(None, &payload.name)?;
            unique_slug(&base, |c| category_slug_taken(&state.orm, c, None)).await?
        }
    };

    let category = CategoryActive {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name.trim().to_string()),
        slug: Set(slug),
        description: Set(payload.description),
        image: Set(payload.image),
        is_active: Set(payload.is_active.unwrap_or(true)),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        state,
        user.user_id,
        "category_create",
        "categories",
        serde_json::json!({ "category_id": category.id, "slug": category.slug }),
    )
    .await;

    Ok(ApiResponse::success(
        "Category created",
        category.into(),
        Some(Meta::empty()),
    ))
}

pub async fn update_category(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    ensure_admin(user)?;
    payload.validate()?;

    let existing = Categories::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: CategoryActive = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(explicit) = payload.slug.as_deref() {
        let slug = resolve_slug(Some(explicit), explicit)?;
        if category_slug_taken(&state.orm, slug.clone(), Some(id)).await? {
            return Err(AppError::Conflict(format!("slug '{slug}' is already used")));
        }
        active.slug = Set(slug);
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(image) = payload.image {
        active.image = Set(Some(image));
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }
    active.updated_at = Set(Utc::now().into());

    let category = active.update(&state.orm).await?;

    audit::record(
        state,
        user.user_id,
        "category_update",
        "categories",
        serde_json::json!({ "category_id": category.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Updated",
        category.into(),
        Some(Meta::empty()),
    ))
}

/// Deletes the category together with its subcategories and their
/// sub-subcategories in one transaction.
pub async fn delete_category(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;

    let txn = state.orm.begin().await?;
    let subcategory_ids: Vec<Uuid> = Subcategories::find()
        .filter(SubCol::CategoryId.eq(id))
        .all(&txn)
        .await?
        .into_iter()
        .map(|s| s.id)
        .collect();

    let mut removed_leaves = 0;
    if !subcategory_ids.is_empty() {
        removed_leaves = SubSubcategories::delete_many()
            .filter(SubSubCol::SubcategoryId.is_in(subcategory_ids.clone()))
            .exec(&txn)
            .await?
            .rows_affected;
        Subcategories::delete_many()
            .filter(SubCol::CategoryId.eq(id))
            .exec(&txn)
            .await?;
    }

    let result = Categories::delete_by_id(id).exec(&txn).await?;
    if result.rows_affected == 0 {
        txn.rollback().await?;
        return Err(AppError::NotFound);
    }
    txn.commit().await?;

    tracing::debug!(
        category_id = %id,
        subcategories = subcategory_ids.len(),
        sub_subcategories = removed_leaves,
        "category deleted"
    );
    audit::record(
        state,
        user.user_id,
        "category_delete",
        "categories",
        serde_json::json!({
            "category_id": id,
            "subcategories": subcategory_ids.len(),
            "sub_subcategories": removed_leaves,
        }),
    )
    .await;

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

async fn category_slug_taken(
    db: &DatabaseConnection,
    slug: String,
    exclude: Option<Uuid>,
) -> AppResult<bool> {
    let mut finder = Categories::find().filter(CatCol::Slug.eq(slug));
    if let Some(id) = exclude {
        finder = finder.filter(CatCol::Id.ne(id));
    }
    Ok(finder.count(db).await? > 0)
}

pub async fn list_subcategories(
    state: &AppState,
    user: &AuthUser,
    filter: SubcategoryFilter,
) -> AppResult<ApiResponse<SubcategoryList>> {
    ensure_admin(user)?;
    let mut finder = Subcategories::find();
    if let Some(category_id) = filter.category_id {
        finder = finder.filter(SubCol::CategoryId.eq(category_id));
    }
    let items = finder
        .order_by_asc(SubCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Subcategory::from)
        .collect();
    Ok(ApiResponse::success(
        "Subcategories",
        SubcategoryList { items },
        Some(Meta::empty()),
    ))
}

pub async fn get_subcategory(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Subcategory>> {
    ensure_admin(user)?;
    let subcategory = Subcategories::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Subcategory", subcategory.into(), None))
}

pub async fn create_subcategory(
    state: &AppState,
    user: &AuthUser,
    payload: CreateSubcategoryRequest,
) -> AppResult<ApiResponse<Subcategory>> {
    ensure_admin(user)?;
    payload.validate()?;

    let category_id = payload.category_id;
    ensure_category_exists(&state.orm, category_id).await?;

    let slug = match payload.slug.as_deref() {
        Some(explicit) => {
            let slug = resolve_slug(Some(explicit), &payload.name)?;
            if subcategory_slug_taken(&state.orm, category_id, slug.clone(), None).await? {
                return Err(AppError::Conflict(format!("slug '{slug}' is already used")));
            }
            slug
        }
        None => {
            let base = resolve_slug(None, &payload.name)?;
            unique_slug(&base, |c| {
                subcategory_slug_taken(&state.orm, category_id, c, None)
            })
            .await?
        }
    };

    let subcategory = SubActive {
        id: Set(Uuid::new_v4()),
        category_id: Set(category_id),
        name: Set(payload.name.trim().to_string()),
        slug: Set(slug),
        description: Set(payload.description),
        is_active: Set(payload.is_active.unwrap_or(true)),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        state,
        user.user_id,
        "subcategory_create",
        "subcategories",
        serde_json::json!({ "subcategory_id": subcategory.id, "category_id": category_id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Subcategory created",
        subcategory.into(),
        Some(Meta::empty()),
    ))
}

pub async fn update_subcategory(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateSubcategoryRequest,
) -> AppResult<ApiResponse<Subcategory>> {
    ensure_admin(user)?;
    payload.validate()?;

    let existing = Subcategories::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let category_id = payload.category_id.unwrap_or(existing.category_id);
    if category_id != existing.category_id {
        ensure_category_exists(&state.orm, category_id).await?;
    }
    let slug = match payload.slug.as_deref() {
        Some(explicit) => resolve_slug(Some(explicit), explicit)?,
        None => existing.slug.clone(),
    };
    if (slug != existing.slug || category_id != existing.category_id)
        && subcategory_slug_taken(&state.orm, category_id, slug.clone(), Some(id)).await?
    {
        return Err(AppError::Conflict(format!("slug '{slug}' is already used")));
    }

    let mut active: SubActive = existing.into();
    active.category_id = Set(category_id);
    active.slug = Set(slug);
    if let Some(name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }
    active.updated_at = Set(Utc::now().into());

    let subcategory = active.update(&state.orm).await?;

    audit::record(
        state,
        user.user_id,
        "subcategory_update",
        "subcategories",
        serde_json::json!({ "subcategory_id": subcategory.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Updated",
        subcategory.into(),
        Some(Meta::empty()),
    ))
}

pub async fn delete_subcategory(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;

    let txn = state.orm.begin().await?;
    let removed_leaves = SubSubcategories::delete_many()
        .filter(SubSubCol::SubcategoryId.eq(id))
        .exec(&txn)
        .await?
        .rows_affected;
    let result = Subcategories::delete_by_id(id).exec(&txn).await?;
    if result.rows_affected == 0 {
        txn.rollback().await?;
        return Err(AppError::NotFound);
    }
    txn.commit().await?;

    audit::record(
        state,
        user.user_id,
        "subcategory_delete",
        "subcategories",
        serde_json::json!({ "subcategory_id": id, "sub_subcategories": removed_leaves }),
    )
    .await;

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

async fn ensure_category_exists(db: &DatabaseConnection, id: Uuid) -> AppResult<()> {
    if Categories::find_by_id(id).one(db).await?.is_none() {
        return Err(AppError::BadRequest("Category not found".into()));
    }
    Ok(())
}

async fn subcategory_slug_taken(
    db: &DatabaseConnection,
    category_id: Uuid,
    slug: String,
    exclude: Option<Uuid>,
) -> AppResult<bool> {
    let mut finder = Subcategories::find()
        .filter(SubCol::CategoryId.eq(category_id))
        .filter(SubCol::Slug.eq(slug));
    if let Some(id) = exclude {
        finder = finder.filter(SubCol::Id.ne(id));
    }
    Ok(finder.count(db).await? > 0)
}

pub async fn list_sub_subcategories(
    state: &AppState,
    user: &AuthUser,
    filter: SubSubcategoryFilter,
) -> AppResult<ApiResponse<SubSubcategoryList>> {
    ensure_admin(user)?;
    let mut finder = SubSubcategories::find();
    if let Some(subcategory_id) = filter.subcategory_id {
        finder = finder.filter(SubSubCol::SubcategoryId.eq(subcategory_id));
    }
    let items = finder
        .order_by_asc(SubSubCol::SortOrder)
        .order_by_asc(SubSubCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(SubSubcategory::from)
        .collect();
    Ok(ApiResponse::success(
        "Sub-subcategories",
        SubSubcategoryList { items },
        Some(Meta::empty()),
    ))
}

pub async fn get_sub_subcategory(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<SubSubcategory>> {
    ensure_admin(user)?;
    let leaf = SubSubcategories::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Sub-subcategory", leaf.into(), None))
}

pub async fn create_sub_subcategory(
    state: &AppState,
    user: &AuthUser,
    payload: CreateSubSubcategoryRequest,
) -> AppResult<ApiResponse<SubSubcategory>> {
    ensure_admin(user)?;
    payload.validate()?;

    let subcategory_id = payload.subcategory_id;
    ensure_subcategory_exists(&state.orm, subcategory_id).await?;

    let slug = match payload.slug.as_deref() {
        Some(explicit) => {
            let slug = resolve_slug(Some(explicit), &payload.name)?;
            if sub_subcategory_slug_taken(&state.orm, subcategory_id, slug.clone(), None).await? {
                return Err(AppError::Conflict(format!("slug '{slug}' is already used")));
            }
            slug
        }
        None => {
            let base = resolve_slug(None, &payload.name)?;
            unique_slug(&base, |c| {
                sub_subcategory_slug_taken(&state.orm, subcategory_id, c, None)
            })
            .await?
        }
    };

    let leaf = SubSubActive {
        id: Set(Uuid::new_v4()),
        subcategory_id: Set(subcategory_id),
        name: Set(payload.name.trim().to_string()),
        slug: Set(slug),
        description: Set(payload.description),
        sort_order: Set(payload.sort_order.unwrap_or(0)),
        is_active: Set(payload.is_active.unwrap_or(true)),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        state,
        user.user_id,
        "sub_subcategory_create",
        "sub_subcategories",
        serde_json::json!({ "sub_subcategory_id": leaf.id, "subcategory_id": subcategory_id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Sub-subcategory created",
        leaf.into(),
        Some(Meta::empty()),
    ))
}

pub async fn update_sub_subcategory(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateSubSubcategoryRequest,
) -> AppResult<ApiResponse<SubSubcategory>> {
    ensure_admin(user)?;
    payload.validate()?;

    let existing = SubSubcategories::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let subcategory_id = payload.subcategory_id.unwrap_or(existing.subcategory_id);
    if subcategory_id != existing.subcategory_id {
        ensure_subcategory_exists(&state.orm, subcategory_id).await?;
    }
    let slug = match payload.slug.as_deref() {
        Some(explicit) => resolve_slug(Some(explicit), explicit)?,
        None => existing.slug.clone(),
    };
    if (slug != existing.slug || subcategory_id != existing.subcategory_id)
        && sub_subcategory_slug_taken(&state.orm, subcategory_id, slug.clone(), Some(id)).await?
    {
        return Err(AppError::Conflict(format!("slug '{slug}' is already used")));
    }

    let mut active: SubSubActive = existing.into();
    active.subcategory_id = Set(subcategory_id);
    active.slug = Set(slug);
    if let Some(name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(sort_order) = payload.sort_order {
        active.sort_order = Set(sort_order);
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }
    active.updated_at = Set(Utc::now().into());

    let leaf = active.update(&state.orm).await?;

    audit::record(
        state,
        user.user_id,
        "sub_subcategory_update",
        "sub_subcategories",
        serde_json::json!({ "sub_subcategory_id": leaf.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Updated",
        leaf.into(),
        Some(Meta::empty()),
    ))
}

pub async fn delete_sub_subcategory(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = SubSubcategories::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        state,
        user.user_id,
        "sub_subcategory_delete",
        "sub_subcategories",
        serde_json::json!({ "sub_subcategory_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

async fn ensure_subcategory_exists(db: &DatabaseConnection, id: Uuid) -> AppResult<()> {
    if Subcategories::find_by_id(id).one(db).await?.is_none() {
        return Err(AppError::BadRequest("Subcategory not found".into()));
    }
    Ok(())
}

async fn sub_subcategory_slug_taken(
    db: &DatabaseConnection,
    subcategory_id: Uuid,
    slug: String,
    exclude: Option<Uuid>,
) -> AppResult<bool> {
    let mut finder = SubSubcategories::find()
        .filter(SubSubCol::SubcategoryId.eq(subcategory_id))
        .filter(SubSubCol::Slug.eq(slug));
    if let Some(id) = exclude {
        finder = finder.filter(SubSubCol::Id.ne(id));
    }
    Ok(finder.count(db).await? > 0)
}

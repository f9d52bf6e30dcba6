use chrono::Utc;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit,
    dto::products::{CreateProductRequest, ProductList, UpdateProductRequest},
    entity::products::{ActiveModel, Column, Entity as Products},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Product,
    response::{ApiResponse, Meta},
    routes::params::{ProductQuery, ProductSortBy, SortOrder, paginate},
    slug::{resolve_slug, slugify, unique_slug},
    state::AppState,
};

/// Prices after defaulting: `(price, old_price, final_price)`.
type Pricing = (i64, Option<i64>, i64);

/// `final_price` falls back to `price`; a struck-through `old_price` must not
/// be below what the customer pays.
pub fn resolve_pricing(
    price: i64,
    old_price: Option<i64>,
    final_price: Option<i64>,
) -> AppResult<Pricing> {
    let final_price = final_price.unwrap_or(price);
    if let Some(old) = old_price {
        if old < final_price {
            return Err(AppError::Validation(
                "oldPrice must not be lower than finalPrice".into(),
            ));
        }
    }
    Ok((price, old_price, final_price))
}

/// Category references are stored as slugs so storefront filters match.
fn category_ref(value: Option<String>) -> Option<String> {
    value.map(|v| slugify(&v)).filter(|v| !v.is_empty())
}

/// `%term%` for ILIKE, with the term's own wildcards matched literally
/// (backslash is the default escape character in Postgres).
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn filtered_query(query: &ProductQuery, only_active: bool) -> Select<Products> {
    let mut condition = Condition::all();
    if only_active {
        condition = condition.add(Column::IsActive.eq(true));
    }

    if let Some(search) = query.q.as_ref().map(|s| s.trim()).filter(|s| !s.is_empty()) {
        let pattern = like_pattern(search);
        condition = condition.add(
            Condition::any()
                .add(Expr::col(Column::Name).ilike(pattern.clone()))
                .add(Expr::col(Column::Description).ilike(pattern)),
        );
    }
    if let Some(category) = category_ref(query.category.clone()) {
        condition = condition.add(Column::Category.eq(category));
    }
    if let Some(subcategory) = category_ref(query.subcategory.clone()) {
        condition = condition.add(Column::Subcategory.eq(subcategory));
    }
    if let Some(is_new) = query.is_new {
        condition = condition.add(Column::IsNew.eq(is_new));
    }
    if let Some(limited) = query.is_limited_edition {
        condition = condition.add(Column::IsLimitedEdition.eq(limited));
    }
    if let Some(sale) = query.is_blue_monday_sale {
        condition = condition.add(Column::IsBlueMondaySale.eq(sale));
    }
    if let Some(min_price) = query.min_price {
        condition = condition.add(Column::FinalPrice.gte(min_price));
    }
    if let Some(max_price) = query.max_price {
        condition = condition.add(Column::FinalPrice.lte(max_price));
    }

    let sort_col = match query.sort_by.unwrap_or(ProductSortBy::CreatedAt) {
        ProductSortBy::CreatedAt => Column::CreatedAt,
        ProductSortBy::Price => Column::FinalPrice,
        ProductSortBy::Name => Column::Name,
        ProductSortBy::Rating => Column::Rating,
    };

    let finder = Products::find().filter(condition);
    let finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(sort_col),
        SortOrder::Desc => finder.order_by_desc(sort_col),
    };
    finder.order_by_asc(Column::Id)
}

async fn list_with(
    state: &AppState,
    query: ProductQuery,
    only_active: bool,
) -> AppResult<ApiResponse<ProductList>> {
    if let (Some(min), Some(max)) = (query.min_price, query.max_price) {
        if min > max {
            return Err(AppError::BadRequest("minPrice must not exceed maxPrice".into()));
        }
    }
    let (page, limit, offset) = paginate(query.page, query.per_page);
    let finder = filtered_query(&query, only_active);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Product::from)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Products", ProductList { items }, Some(meta)))
}

pub async fn list_products(
    state: &AppState,
    query: ProductQuery,
) -> AppResult<ApiResponse<ProductList>> {
    list_with(state, query, true).await
}

pub async fn list_products_admin(
    state: &AppState,
    user: &AuthUser,
    query: ProductQuery,
) -> AppResult<ApiResponse<ProductList>> {
    ensure_admin(user)?;
    list_with(state, query, false).await
}

/// Storefront lookup by UUID or slug. Inactive products are hidden.
pub async fn get_product(state: &AppState, id_or_slug: &str) -> AppResult<ApiResponse<Product>> {
    let finder = match Uuid::parse_str(id_or_slug) {
        Ok(id) => Products::find_by_id(id),
        Err(_) => Products::find().filter(Column::Slug.eq(id_or_slug)),
    };
    let product = finder
        .filter(Column::IsActive.eq(true))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Product", product.into(), None))
}

pub async fn get_product_admin(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    let product = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Product", product.into(), None))
}

pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    payload.validate()?;
    let (price, old_price, final_price) =
        resolve_pricing(payload.price, payload.old_price, payload.final_price)?;

    let slug = match payload.slug.as_deref() {
        Some(explicit) => {
            let slug = resolve_slug(Some(explicit), &payload.name)?;
            if slug_taken(&state.orm, slug.clone(), None).await? {
                return Err(AppError::Conflict(format!("slug '{slug}' is already used")));
            }
            slug
        }
        None => {
            let base = resolve_slug(None, &payload.name)?;
            unique_slug(&base, |c| slug_taken(&state.orm, c, None)).await?
        }
    };

    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name.trim().to_string()),
        slug: Set(slug),
        description: Set(payload.description),
        price: Set(price),
        old_price: Set(old_price),
        final_price: Set(final_price),
        category: Set(category_ref(payload.category)),
        subcategory: Set(category_ref(payload.subcategory)),
        images: Set(serde_json::json!(payload.images)),
        stock: Set(payload.stock),
        rating: Set(payload.rating),
        reviews: Set(payload.reviews),
        is_new: Set(payload.is_new),
        is_limited_edition: Set(payload.is_limited_edition),
        is_blue_monday_sale: Set(payload.is_blue_monday_sale),
        is_active: Set(payload.is_active),
        created_at: NotSet,
        updated_at: NotSet,
    };
    let product = active.insert(&state.orm).await?;

    audit::record(
        state,
        user.user_id,
        "product_create",
        "products",
        serde_json::json!({ "product_id": product.id, "slug": product.slug }),
    )
    .await;

    Ok(ApiResponse::success(
        "Product created",
        product.into(),
        Some(Meta::empty()),
    ))
}

pub async fn update_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    payload.validate()?;

    let existing = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    // A new base price without an explicit final price moves both together
    // when they were equal before.
    let price = payload.price.unwrap_or(existing.price);
    let final_price = match payload.final_price {
        Some(fp) => Some(fp),
        None if existing.final_price == existing.price => Some(price),
        None => Some(existing.final_price),
    };
    let old_price = payload.old_price.or(existing.old_price);
    let (price, old_price, final_price) = resolve_pricing(price, old_price, final_price)?;

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(explicit) = payload.slug.as_deref() {
        let slug = resolve_slug(Some(explicit), explicit)?;
        if slug_taken(&state.orm, slug.clone(), Some(id)).await? {
            return Err(AppError::Conflict(format!("slug '{slug}' is already used")));
        }
        active.slug = Set(slug);
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    active.price = Set(price);
    active.old_price = Set(old_price);
    active.final_price = Set(final_price);
    if payload.category.is_some() {
        active.category = Set(category_ref(payload.category));
    }
    if payload.subcategory.is_some() {
        active.subcategory = Set(category_ref(payload.subcategory));
    }
    if let Some(images) = payload.images {
        active.images = Set(serde_json::json!(images));
    }
    if let Some(stock) = payload.stock {
        active.stock = Set(stock);
    }
    if let Some(rating) = payload.rating {
        active.rating = Set(rating);
    }
    if let Some(reviews) = payload.reviews {
        active.reviews = Set(reviews);
    }
    if let Some(is_new) = payload.is_new {
        active.is_new = Set(is_new);
    }
    if let Some(limited) = payload.is_limited_edition {
        active.is_limited_edition = Set(limited);
    }
    if let Some(sale) = payload.is_blue_monday_sale {
        active.is_blue_monday_sale = Set(sale);
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }
    active.updated_at = Set(Utc::now().into());

    let product = active.update(&state.orm).await?;

    audit::record(
        state,
        user.user_id,
        "product_update",
        "products",
        serde_json::json!({ "product_id": product.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Updated",
        product.into(),
        Some(Meta::empty()),
    ))
}

pub async fn delete_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = Products::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        state,
        user.user_id,
        "product_delete",
        "products",
        serde_json::json!({ "product_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

async fn slug_taken(db: &DatabaseConnection, slug: String, exclude: Option<Uuid>) -> AppResult<bool> {
    let mut finder = Products::find().filter(Column::Slug.eq(slug));
    if let Some(id) = exclude {
        finder = finder.filter(Column::Id.ne(id));
    }
    Ok(finder.count(db).await? > 0)
}

#[cfg(test)]
mod tests {
    use sea_orm::{DbBackend, QueryTrait};

    use super::*;

    #[test]
    fn final_price_defaults_to_price() {
        assert_eq!(resolve_pricing(5000, None, None).unwrap(), (5000, None, 5000));
    }

    #[test]
    fn sale_price_keeps_old_price() {
        assert_eq!(
            resolve_pricing(5000, Some(7000), Some(3500)).unwrap(),
            (5000, Some(7000), 3500)
        );
    }

    #[test]
    fn old_price_below_final_price_is_rejected() {
        let err = resolve_pricing(5000, Some(4000), None).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn category_refs_are_slugified() {
        assert_eq!(category_ref(Some("Men's Wear".into())), Some("men-s-wear".into()));
        assert_eq!(category_ref(Some("  ".into())), None);
        assert_eq!(category_ref(None), None);
    }

    #[test]
    fn search_wildcards_match_literally() {
        assert_eq!(like_pattern("jacket"), "%jacket%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn listing_breaks_ties_by_id() {
        let query = ProductQuery {
            sort_by: Some(ProductSortBy::Price),
            sort_order: Some(SortOrder::Asc),
            ..Default::default()
        };
        let sql = filtered_query(&query, true)
            .build(DbBackend::Postgres)
            .to_string();
        assert!(sql.ends_with(r#"ORDER BY "products"."final_price" ASC, "products"."id" ASC"#));
    }
}

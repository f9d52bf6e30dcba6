use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

use crate::{
    dto::admin::{DashboardStats, InquiryCounts},
    entity::{
        Categories, Inquiries, Products, SubSubcategories, Subcategories, inquiries,
        products,
    },
    error::AppResult,
    middleware::auth::{AuthUser, ensure_admin},
    models::InquiryStatus,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn dashboard_stats(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<DashboardStats>> {
    ensure_admin(user)?;
    let db = &state.orm;

    let products = Products::find().count(db).await?;
    let active_products = Products::find()
        .filter(products::Column::IsActive.eq(true))
        .count(db)
        .await?;
    let categories = Categories::find().count(db).await?;
    let subcategories = Subcategories::find().count(db).await?;
    let sub_subcategories = SubSubcategories::find().count(db).await?;

    let mut counts = [0u64; 4];
    for (slot, status) in counts.iter_mut().zip(InquiryStatus::ALL) {
        *slot = Inquiries::find()
            .filter(inquiries::Column::Status.eq(status.as_str()))
            .count(db)
            .await?;
    }
    let [new, read, responded, closed] = counts;

    let stats = DashboardStats {
        products,
        active_products,
        categories,
        subcategories,
        sub_subcategories,
        inquiries: InquiryCounts {
            new,
            read,
            responded,
            closed,
        },
    };
    Ok(ApiResponse::success("Dashboard", stats, Some(Meta::empty())))
}

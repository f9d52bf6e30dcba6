use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Normalize optional page/per-page query values into `(page, per_page, offset)`.
pub fn paginate(page: Option<i64>, per_page: Option<i64>) -> (i64, i64, i64) {
    let page = page.unwrap_or(1).max(1);
    let per_page = per_page.unwrap_or(20).clamp(1, 100);
    let offset = (page - 1).saturating_mul(per_page);
    (page, per_page, offset)
}

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProductSortBy {
    CreatedAt,
    Price,
    Name,
    Rating,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProductQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    /// Case-insensitive match on name or description
    pub q: Option<String>,
    /// Category slug
    pub category: Option<String>,
    /// Subcategory slug
    pub subcategory: Option<String>,
    pub is_new: Option<bool>,
    pub is_limited_edition: Option<bool>,
    pub is_blue_monday_sale: Option<bool>,
    /// Lower bound on final price
    pub min_price: Option<i64>,
    /// Upper bound on final price
    pub max_price: Option<i64>,
    pub sort_by: Option<ProductSortBy>,
    pub sort_order: Option<SortOrder>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct InquiryListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    /// Filter by status: new, read, responded, closed
    pub status: Option<String>,
    pub sort_order: Option<SortOrder>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SubcategoryFilter {
    pub category_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SubSubcategoryFilter {
    pub subcategory_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults_and_clamps() {
        assert_eq!(paginate(None, None), (1, 20, 0));
        assert_eq!(paginate(Some(3), Some(10)), (3, 10, 20));
        assert_eq!(paginate(Some(0), Some(1000)), (1, 100, 0));
        assert_eq!(paginate(Some(-4), Some(0)), (1, 1, 0));
        assert_eq!(paginate(Some(i64::MAX), Some(100)), (i64::MAX, 100, i64::MAX));
        assert_eq!(paginate(Some(i64::MAX), None), (i64::MAX, 20, i64::MAX));
    }

    #[test]
    fn product_query_reads_camel_case_keys() {
        let query: ProductQuery = serde_json::from_value(serde_json::json!({
            "isBlueMondaySale": true,
            "minPrice": 100,
            "sortBy": "price",
            "sortOrder": "asc",
            "perPage": 5
        }))
        .unwrap();
        assert_eq!(query.is_blue_monday_sale, Some(true));
        assert_eq!(query.min_price, Some(100));
        assert!(matches!(query.sort_by, Some(ProductSortBy::Price)));
        assert!(matches!(query.sort_order, Some(SortOrder::Asc)));
        assert_eq!(query.per_page, Some(5));
    }
}

use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InquiryCounts {
    pub new: u64,
    pub read: u64,
    pub responded: u64,
    pub closed: u64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub products: u64,
    pub active_products: u64,
    pub categories: u64,
    pub subcategories: u64,
    pub sub_subcategories: u64,
    pub inquiries: InquiryCounts,
}

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::Product;

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    #[validate(
        length(min = 1, max = 255, message = "Name must be 1-255 characters"),
        custom(function = "crate::dto::not_blank")
    )]
    pub name: String,
    #[validate(length(max = 255))]
    pub slug: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0, message = "Price must not be negative"))]
    pub price: i64,
    #[validate(range(min = 0))]
    pub old_price: Option<i64>,
    #[validate(range(min = 0))]
    pub final_price: Option<i64>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    #[validate(range(min = 0, message = "Stock must not be negative"))]
    pub stock: i32,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 5.0, message = "Rating must be between 0 and 5"))]
    pub rating: f64,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub reviews: i32,
    #[serde(default)]
    pub is_new: bool,
    #[serde(default)]
    pub is_limited_edition: bool,
    #[serde(default)]
    pub is_blue_monday_sale: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    #[validate(
        length(min = 1, max = 255, message = "Name must be 1-255 characters"),
        custom(function = "crate::dto::not_blank")
    )]
    pub name: Option<String>,
    #[validate(length(max = 255))]
    pub slug: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0, message = "Price must not be negative"))]
    pub price: Option<i64>,
    #[validate(range(min = 0))]
    pub old_price: Option<i64>,
    #[validate(range(min = 0))]
    pub final_price: Option<i64>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub images: Option<Vec<String>>,
    #[validate(range(min = 0, message = "Stock must not be negative"))]
    pub stock: Option<i32>,
    #[validate(range(min = 0.0, max = 5.0, message = "Rating must be between 0 and 5"))]
    pub rating: Option<f64>,
    #[validate(range(min = 0))]
    pub reviews: Option<i32>,
    pub is_new: Option<bool>,
    pub is_limited_edition: Option<bool>,
    pub is_blue_monday_sale: Option<bool>,
    pub is_active: Option<bool>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<Product>)]
    pub items: Vec<Product>,
}

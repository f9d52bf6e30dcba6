pub mod admin_service;
pub mod auth_service;
pub mod category_service;
pub mod content_service;
pub mod inquiry_service;
pub mod product_service;

use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        admin::{DashboardStats, InquiryCounts},
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        categories::{
            CategoryList, CategoryNode, CategoryTree, CreateCategoryRequest,
            CreateSubSubcategoryRequest, CreateSubcategoryRequest, SubSubcategoryList,
            SubcategoryList, SubcategoryNode, UpdateCategoryRequest,
            UpdateSubSubcategoryRequest, UpdateSubcategoryRequest,
        },
        content::{ContentList, UpsertContentRequest},
        inquiries::{
            CreateInquiryRequest, InquiryList, RespondInquiryRequest,
            UpdateInquiryStatusRequest,
        },
        products::{CreateProductRequest, ProductList, UpdateProductRequest},
    },
    models::{
        Category, Content, ContentItem, Inquiry, InquiryStatus, Product, SubSubcategory,
        Subcategory, User,
    },
    response::{ApiResponse, Meta},
    routes::{admin, auth, categories, content, health, inquiries, params, products},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::me,
        products::list_products,
        products::get_product,
        products::admin_list_products,
        products::admin_get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
        categories::category_tree,
        categories::get_category_by_slug,
        categories::list_categories,
        categories::get_category,
        categories::create_category,
        categories::update_category,
        categories::delete_category,
        categories::list_subcategories,
        categories::get_subcategory,
        categories::create_subcategory,
        categories::update_subcategory,
        categories::delete_subcategory,
        categories::list_sub_subcategories,
        categories::get_sub_subcategory,
        categories::create_sub_subcategory,
        categories::update_sub_subcategory,
        categories::delete_sub_subcategory,
        inquiries::create_inquiry,
        inquiries::list_inquiries,
        inquiries::get_inquiry,
        inquiries::update_inquiry_status,
        inquiries::respond_inquiry,
        inquiries::delete_inquiry,
        content::get_page_content,
        content::list_content,
        content::get_content,
        content::upsert_content,
        content::delete_content,
        admin::dashboard_stats
    ),
    components(
        schemas(
            User,
            Category,
            Subcategory,
            SubSubcategory,
            Product,
            Inquiry,
            InquiryStatus,
            Content,
            ContentItem,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            CreateCategoryRequest,
            UpdateCategoryRequest,
            CreateSubcategoryRequest,
            UpdateSubcategoryRequest,
            CreateSubSubcategoryRequest,
            UpdateSubSubcategoryRequest,
            CategoryList,
            SubcategoryList,
            SubSubcategoryList,
            CategoryNode,
            SubcategoryNode,
            CategoryTree,
            CreateProductRequest,
            UpdateProductRequest,
            ProductList,
            CreateInquiryRequest,
            UpdateInquiryStatusRequest,
            RespondInquiryRequest,
            InquiryList,
            UpsertContentRequest,
            ContentList,
            DashboardStats,
            InquiryCounts,
            params::ProductQuery,
            params::InquiryListQuery,
            params::ProductSortBy,
            params::SortOrder,
            health::HealthData,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<CategoryTree>,
            ApiResponse<InquiryList>,
            ApiResponse<Content>,
            ApiResponse<DashboardStats>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Products", description = "Storefront product catalog"),
        (name = "Categories", description = "Storefront category tree"),
        (name = "Inquiries", description = "Customer contact form"),
        (name = "Content", description = "Editable page content"),
        (name = "Admin", description = "Admin panel endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_admin_and_public_paths() {
        let spec = ApiDoc::openapi();
        let paths = &spec.paths.paths;
        assert!(paths.contains_key("/api/categories"));
        assert!(paths.contains_key("/api/admin/sub-subcategories/{id}"));
        assert!(paths.contains_key("/api/admin/inquiries/{id}/respond"));
        assert!(paths.contains_key("/api/content/{page_key}"));
    }
}

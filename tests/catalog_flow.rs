use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, Set, Statement};
use storefront_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    dto::{
        categories::{
            CreateCategoryRequest, CreateSubSubcategoryRequest, CreateSubcategoryRequest,
            UpdateCategoryRequest,
        },
        content::UpsertContentRequest,
        inquiries::{CreateInquiryRequest, RespondInquiryRequest},
        products::{CreateProductRequest, UpdateProductRequest},
    },
    entity::{SubSubcategories, Subcategories, users::ActiveModel as UserActive},
    error::AppError,
    middleware::auth::AuthUser,
    models::{Category, ContentItem, InquiryStatus, Product},
    routes::params::{InquiryListQuery, ProductQuery},
    services::{
        admin_service, category_service, content_service, inquiry_service, product_service,
    },
    state::AppState,
};
use uuid::Uuid;

// Integration flow: admin builds a three-level tree and a product, the storefront reads
// them, a customer sends an inquiry, the admin answers it, and the category is removed.
#[tokio::test]
async fn catalog_inquiry_and_cascade_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;
    let admin = AuthUser {
        user_id: create_user(&state, "admin", "admin@example.com").await?,
        role: "admin".into(),
    };

    // Category tree
    let category = category_service::create_category(
        &state,
        &admin,
        CreateCategoryRequest {
            name: "Men's Wear".into(),
            slug: None,
            description: None,
            image: None,
            is_active: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(category.slug, "men-s-wear");

    let duplicate = category_service::create_category(
        &state,
        &admin,
        CreateCategoryRequest {
            name: "Men's  Wear".into(),
            slug: None,
            description: None,
            image: None,
            is_active: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(duplicate.slug, "men-s-wear-2");

    let explicit_clash = category_service::create_category(
        &state,
        &admin,
        CreateCategoryRequest {
            name: "Other".into(),
            slug: Some("men-s-wear".into()),
            description: None,
            image: None,
            is_active: None,
        },
    )
    .await;
    assert!(matches!(explicit_clash, Err(AppError::Conflict(_))));

    let subcategory = category_service::create_subcategory(
        &state,
        &admin,
        CreateSubcategoryRequest {
            category_id: category.id,
            name: "Clothing".into(),
            slug: None,
            description: None,
            is_active: None,
        },
    )
    .await?
    .data
    .unwrap();

    for (name, order) in [("Jackets", 2), ("T-Shirts", 1)] {
        category_service::create_sub_subcategory(
            &state,
            &admin,
            CreateSubSubcategoryRequest {
                subcategory_id: subcategory.id,
                name: name.into(),
                slug: None,
                description: None,
                sort_order: Some(order),
                is_active: None,
            },
        )
        .await?;
    }

    let orphan = category_service::create_subcategory(
        &state,
        &admin,
        CreateSubcategoryRequest {
            category_id: Uuid::new_v4(),
            name: "Nowhere".into(),
            slug: None,
            description: None,
            is_active: None,
        },
    )
    .await;
    assert!(matches!(orphan, Err(AppError::BadRequest(_))));

    let node = category_service::get_category_by_slug(&state, "men-s-wear")
        .await?
        .data
        .unwrap();
    assert_eq!(node.subcategories.len(), 1);
    let leaves: Vec<_> = node.subcategories[0]
        .sub_subcategories
        .iter()
        .map(|s| s.slug.as_str())
        .collect();
    assert_eq!(leaves, vec!["t-shirts", "jackets"]);

    // Products
    let product = product_service::create_product(
        &state,
        &admin,
        CreateProductRequest {
            name: "Rain Jacket".into(),
            slug: None,
            description: Some("Keeps you dry".into()),
            price: 12000,
            old_price: Some(15000),
            final_price: None,
            category: Some("Men's Wear".into()),
            subcategory: Some("clothing".into()),
            images: vec!["https://cdn.example.com/jacket.jpg".into()],
            stock: 4,
            rating: 4.5,
            reviews: 12,
            is_new: true,
            is_limited_edition: false,
            is_blue_monday_sale: true,
            is_active: true,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(product.final_price, 12000);
    assert_eq!(product.category.as_deref(), Some("men-s-wear"));

    let by_slug = product_service::get_product(&state, "rain-jacket")
        .await?
        .data
        .unwrap();
    assert_eq!(by_slug.id, product.id);

    let listed = product_service::list_products(
        &state,
        ProductQuery {
            category: Some("men-s-wear".into()),
            is_blue_monday_sale: Some(true),
            q: Some("jacket".into()),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(listed.meta.unwrap().total, Some(1));

    // Inquiry
    let inquiry = inquiry_service::create_inquiry(
        &state,
        CreateInquiryRequest {
            name: "Jane Doe".into(),
            email: "Jane@Example.com".into(),
            phone: Some("  ".into()),
            company: None,
            subject: Some("Sizing".into()),
            message: "Does the jacket run large?".into(),
            product_id: Some(product.id),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(inquiry.status, InquiryStatus::New);
    assert_eq!(inquiry.email, "jane@example.com");
    assert_eq!(inquiry.phone, None);

    let answered = inquiry_service::respond(
        &state,
        &admin,
        inquiry.id,
        RespondInquiryRequest {
            response: "It runs true to size.".into(),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(answered.status, InquiryStatus::Responded);
    assert_eq!(answered.responded_by, Some(admin.user_id));
    assert!(answered.responded_at.is_some());

    let responded = inquiry_service::list_inquiries(
        &state,
        &admin,
        InquiryListQuery {
            status: Some("responded".into()),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(responded.data.unwrap().items.len(), 1);

    // Content
    content_service::upsert_content(
        &state,
        &admin,
        "home-hero",
        UpsertContentRequest {
            title: Some("Hello".into()),
            items: vec![ContentItem {
                title: Some("Only".into()),
                description: None,
                image: None,
                link: None,
                order: 1,
            }],
            is_published: Some(false),
            ..Default::default()
        },
    )
    .await?;
    let hidden = content_service::get_published(&state, "home-hero").await;
    assert!(matches!(hidden, Err(AppError::NotFound)));

    check_slug_scopes_and_updates(&state, &admin, &category, &duplicate, &product).await?;
    check_inactive_records_are_hidden(&state, &admin).await?;
    check_subcategory_delete_cascades(&state, &admin, category.id).await?;

    let stats = admin_service::dashboard_stats(&state, &admin)
        .await?
        .data
        .unwrap();
    assert_eq!(stats.products, 2);
    assert_eq!(stats.active_products, 1);
    assert_eq!(stats.inquiries.responded, 1);

    // Cascading delete
    category_service::delete_category(&state, &admin, category.id).await?;
    assert!(Subcategories::find_by_id(subcategory.id).one(&state.orm).await?.is_none());
    assert!(SubSubcategories::find().all(&state.orm).await?.is_empty());
    let tree = category_service::category_tree(&state).await?.data.unwrap();
    assert_eq!(tree.items.len(), 1);

    Ok(())
}

async fn check_slug_scopes_and_updates(
    state: &AppState,
    admin: &AuthUser,
    category: &Category,
    other_category: &Category,
    product: &Product,
) -> anyhow::Result<()> {
    // Subcategory slugs only need to be unique within their category.
    let sibling = category_service::create_subcategory(
        state,
        admin,
        CreateSubcategoryRequest {
            category_id: other_category.id,
            name: "Clothing".into(),
            slug: Some("clothing".into()),
            description: None,
            is_active: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(sibling.slug, "clothing");

    let same_parent = category_service::create_subcategory(
        state,
        admin,
        CreateSubcategoryRequest {
            category_id: category.id,
            name: "Clothes".into(),
            slug: Some("clothing".into()),
            description: None,
            is_active: None,
        },
    )
    .await;
    assert!(matches!(same_parent, Err(AppError::Conflict(_))));

    let renamed = category_service::update_category(
        state,
        admin,
        other_category.id,
        UpdateCategoryRequest {
            name: None,
            slug: Some(category.slug.clone()),
            description: None,
            image: None,
            is_active: None,
        },
    )
    .await;
    assert!(matches!(renamed, Err(AppError::Conflict(_))));

    let blank = category_service::update_category(
        state,
        admin,
        other_category.id,
        UpdateCategoryRequest {
            name: Some("   ".into()),
            slug: None,
            description: None,
            image: None,
            is_active: None,
        },
    )
    .await;
    assert!(matches!(blank, Err(AppError::Validation(_))));

    // finalPrice followed price before, so it keeps following it.
    let repriced = product_service::update_product(
        state,
        admin,
        product.id,
        UpdateProductRequest {
            price: Some(14000),
            ..Default::default()
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(repriced.price, 14000);
    assert_eq!(repriced.final_price, 14000);
    assert_eq!(repriced.old_price, Some(15000));

    let inverted = product_service::update_product(
        state,
        admin,
        product.id,
        UpdateProductRequest {
            price: Some(16000),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(inverted, Err(AppError::Validation(_))));

    Ok(())
}

async fn check_inactive_records_are_hidden(
    state: &AppState,
    admin: &AuthUser,
) -> anyhow::Result<()> {
    category_service::create_category(
        state,
        admin,
        CreateCategoryRequest {
            name: "Archive".into(),
            slug: None,
            description: None,
            image: None,
            is_active: Some(false),
        },
    )
    .await?;
    let hidden = category_service::get_category_by_slug(state, "archive").await;
    assert!(matches!(hidden, Err(AppError::NotFound)));
    let tree = category_service::category_tree(state).await?.data.unwrap();
    assert!(tree.items.iter().all(|node| node.category.slug != "archive"));

    let retired = product_service::create_product(
        state,
        admin,
        CreateProductRequest {
            name: "Old Stock".into(),
            slug: None,
            description: None,
            price: 500,
            old_price: None,
            final_price: None,
            category: None,
            subcategory: None,
            images: Vec::new(),
            stock: 0,
            rating: 0.0,
            reviews: 0,
            is_new: false,
            is_limited_edition: false,
            is_blue_monday_sale: false,
            is_active: false,
        },
    )
    .await?
    .data
    .unwrap();
    let by_slug = product_service::get_product(state, "old-stock").await;
    assert!(matches!(by_slug, Err(AppError::NotFound)));
    let by_id = product_service::get_product(state, &retired.id.to_string()).await;
    assert!(matches!(by_id, Err(AppError::NotFound)));

    let public = product_service::list_products(state, ProductQuery::default()).await?;
    let items = public.data.unwrap().items;
    assert!(items.iter().all(|p| p.id != retired.id));
    let admin_view = product_service::list_products_admin(state, admin, ProductQuery::default())
        .await?
        .data
        .unwrap()
        .items;
    assert!(admin_view.iter().any(|p| p.id == retired.id));

    Ok(())
}

async fn check_subcategory_delete_cascades(
    state: &AppState,
    admin: &AuthUser,
    category_id: Uuid,
) -> anyhow::Result<()> {
    let accessories = category_service::create_subcategory(
        state,
        admin,
        CreateSubcategoryRequest {
            category_id,
            name: "Accessories".into(),
            slug: None,
            description: None,
            is_active: None,
        },
    )
    .await?
    .data
    .unwrap();
    let belts = category_service::create_sub_subcategory(
        state,
        admin,
        CreateSubSubcategoryRequest {
            subcategory_id: accessories.id,
            name: "Belts".into(),
            slug: None,
            description: None,
            sort_order: None,
            is_active: None,
        },
    )
    .await?
    .data
    .unwrap();

    category_service::delete_subcategory(state, admin, accessories.id).await?;
    assert!(SubSubcategories::find_by_id(belts.id).one(&state.orm).await?.is_none());
    assert!(Subcategories::find_by_id(accessories.id).one(&state.orm).await?.is_none());

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;

    // Clean tables between runs
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE audit_logs, inquiries, contents, products, sub_subcategories, subcategories, categories, users RESTART IDENTITY CASCADE",
    ))
    .await?;

    let config = AppConfig {
        database_url: database_url.to_string(),
        host: "127.0.0.1".into(),
        port: 0,
        jwt_secret: "integration-secret".into(),
        jwt_ttl_hours: 1,
        cors_origins: Vec::new(),
    };
    Ok(AppState::new(orm, config))
}

async fn create_user(state: &AppState, role: &str, email: &str) -> anyhow::Result<Uuid> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        password_hash: Set("dummy".into()),
        role: Set(role.into()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(user.id)
}

use sqlx::PgPool;
use storefront_api::{
    db::{create_orm_conn, run_migrations},
    services::auth_service::hash_password,
    slug::slugify,
};
use uuid::Uuid;

/// (category, [(subcategory, [sub-subcategory])])
const CATALOG: &[(&str, &[(&str, &[&str])])] = &[
    (
        "Men",
        &[
            ("Clothing", &["T-Shirts", "Hoodies", "Jackets"]),
            ("Accessories", &["Caps", "Bags"]),
        ],
    ),
    (
        "Women",
        &[
            ("Clothing", &["Dresses", "Tops"]),
            ("Shoes", &["Sneakers", "Boots"]),
        ],
    ),
    ("Home", &[("Kitchen", &["Mugs", "Cutlery"])]),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL")?;
    let orm = create_orm_conn(&database_url).await?;
    // Ensure migrations are applied.
    run_migrations(&orm).await?;
    let pool = orm.get_postgres_connection_pool();

    let email = std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@example.com".into());
    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin12345".into());
    let admin_id = ensure_admin(pool, &email, &password).await?;
    seed_categories(pool).await?;
    seed_products(pool).await?;
    seed_content(pool).await?;

    println!("Seed completed. Admin ID: {admin_id}");
    Ok(())
}

async fn ensure_admin(pool: &PgPool, email: &str, password: &str) -> anyhow::Result<Uuid> {
    let password_hash = hash_password(password)?;

    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash, role)
        VALUES ($1, $2, $3, 'admin')
        ON CONFLICT (email) DO UPDATE SET role = 'admin'
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .fetch_one(pool)
    .await?;

    println!("Ensured admin {email}");
    Ok(id)
}

async fn seed_categories(pool: &PgPool) -> anyhow::Result<()> {
    for (category, subcategories) in CATALOG {
        let (category_id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO categories (id, name, slug)
            VALUES ($1, $2, $3)
            ON CONFLICT (slug) DO UPDATE SET name = EXCLUDED.name
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(*category)
        .bind(slugify(category))
        .fetch_one(pool)
        .await?;

        for (subcategory, leaves) in subcategories.iter() {
            let (subcategory_id,): (Uuid,) = sqlx::query_as(
                r#"
                INSERT INTO subcategories (id, category_id, name, slug)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (category_id, slug) DO UPDATE SET name = EXCLUDED.name
                RETURNING id
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(category_id)
            .bind(*subcategory)
            .bind(slugify(subcategory))
            .fetch_one(pool)
            .await?;

            for (order, leaf) in leaves.iter().enumerate() {
                sqlx::query(
                    r#"
                    INSERT INTO sub_subcategories (id, subcategory_id, name, slug, sort_order)
                    VALUES ($1, $2, $3, $4, $5)
                    ON CONFLICT (subcategory_id, slug) DO NOTHING
                    "#,
                )
                .bind(Uuid::new_v4())
                .bind(subcategory_id)
                .bind(*leaf)
                .bind(slugify(leaf))
                .bind(order as i32)
                .execute(pool)
                .await?;
            }
        }
    }

    println!("Seeded categories");
    Ok(())
}

async fn seed_products(pool: &PgPool) -> anyhow::Result<()> {
    // (name, category, subcategory, price, final price, is_new, blue monday)
    let products = [
        ("Classic Logo Tee", "men", "clothing", 2900, 2900, true, false),
        ("Heavyweight Hoodie", "men", "clothing", 6900, 4900, false, true),
        ("Canvas Tote Bag", "men", "accessories", 1900, 1900, false, false),
        ("Linen Summer Dress", "women", "clothing", 8900, 8900, true, false),
        ("Leather Ankle Boots", "women", "shoes", 14900, 9900, false, true),
        ("Stoneware Mug", "home", "kitchen", 1500, 1500, false, false),
    ];

    for (name, category, subcategory, price, final_price, is_new, sale) in products {
        let old_price = (final_price < price).then_some(price);
        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, slug, description, price, old_price, final_price,
                category, subcategory, stock, is_new, is_blue_monday_sale
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (slug) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(slugify(name))
        .bind(format!("{name} from the seed catalog"))
        .bind(price as i64)
        .bind(old_price.map(|p| p as i64))
        .bind(final_price as i64)
        .bind(category)
        .bind(subcategory)
        .bind(25_i32)
        .bind(is_new)
        .bind(sale)
        .execute(pool)
        .await?;
    }

    println!("Seeded products");
    Ok(())
}

async fn seed_content(pool: &PgPool) -> anyhow::Result<()> {
    let items = serde_json::json!([
        { "title": "Free shipping", "description": "On orders over 50", "order": 1 },
        { "title": "30-day returns", "description": "No questions asked", "order": 2 }
    ]);

    sqlx::query(
        r#"
        INSERT INTO contents (id, page_key, title, subtitle, button_text, button_link, items)
        VALUES ($1, 'home-hero', $2, $3, $4, $5, $6)
        ON CONFLICT (page_key) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind("New season, new staples")
    .bind("Discover the latest arrivals")
    .bind("Shop now")
    .bind("/products?isNew=true")
    .bind(items)
    .execute(pool)
    .await?;

    println!("Seeded content");
    Ok(())
}

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub description: Option<String>,
    pub price: i64,
    pub old_price: Option<i64>,
    pub final_price: i64,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    /// JSON array of image URLs, in display order.
    pub images: Json,
    pub stock: i32,
    #[sea_orm(column_type = "Double")]
    pub rating: f64,
    pub reviews: i32,
    pub is_new: bool,
    pub is_limited_edition: bool,
    pub is_blue_monday_sale: bool,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::inquiries::Entity")]
    Inquiries,
}

impl Related<super::inquiries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Inquiries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

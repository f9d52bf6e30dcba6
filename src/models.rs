use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<entity::users::Model> for User {
    fn from(m: entity::users::Model) -> Self {
        Self {
            id: m.id,
            email: m.email,
            role: m.role,
            created_at: m.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<entity::categories::Model> for Category {
    fn from(m: entity::categories::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            slug: m.slug,
            description: m.description,
            image: m.image,
            is_active: m.is_active,
            created_at: m.created_at.with_timezone(&Utc),
            updated_at: m.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Subcategory {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<entity::subcategories::Model> for Subcategory {
    fn from(m: entity::subcategories::Model) -> Self {
        Self {
            id: m.id,
            category_id: m.category_id,
            name: m.name,
            slug: m.slug,
            description: m.description,
            is_active: m.is_active,
            created_at: m.created_at.with_timezone(&Utc),
            updated_at: m.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubSubcategory {
    pub id: Uuid,
    pub subcategory_id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<entity::sub_subcategories::Model> for SubSubcategory {
    fn from(m: entity::sub_subcategories::Model) -> Self {
        Self {
            id: m.id,
            subcategory_id: m.subcategory_id,
            name: m.name,
            slug: m.slug,
            description: m.description,
            sort_order: m.sort_order,
            is_active: m.is_active,
            created_at: m.created_at.with_timezone(&Utc),
            updated_at: m.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub price: i64,
    pub old_price: Option<i64>,
    pub final_price: i64,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub images: Vec<String>,
    pub stock: i32,
    pub rating: f64,
    pub reviews: i32,
    pub is_new: bool,
    pub is_limited_edition: bool,
    pub is_blue_monday_sale: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<entity::products::Model> for Product {
    fn from(m: entity::products::Model) -> Self {
        // Rows written outside the API may hold a malformed array; show no images then.
        let images = serde_json::from_value(m.images).unwrap_or_default();
        Self {
            id: m.id,
            name: m.name,
            slug: m.slug,
            description: m.description,
            price: m.price,
            old_price: m.old_price,
            final_price: m.final_price,
            category: m.category,
            subcategory: m.subcategory,
            images,
            stock: m.stock,
            rating: m.rating,
            reviews: m.reviews,
            is_new: m.is_new,
            is_limited_edition: m.is_limited_edition,
            is_blue_monday_sale: m.is_blue_monday_sale,
            is_active: m.is_active,
            created_at: m.created_at.with_timezone(&Utc),
            updated_at: m.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum InquiryStatus {
    New,
    Read,
    Responded,
    Closed,
}

impl InquiryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InquiryStatus::New => "new",
            InquiryStatus::Read => "read",
            InquiryStatus::Responded => "responded",
            InquiryStatus::Closed => "closed",
        }
    }

    pub const ALL: [InquiryStatus; 4] = [
        InquiryStatus::New,
        InquiryStatus::Read,
        InquiryStatus::Responded,
        InquiryStatus::Closed,
    ];
}

impl fmt::Display for InquiryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InquiryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InquiryStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown inquiry status '{s}'"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Inquiry {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub subject: Option<String>,
    pub message: String,
    pub product_id: Option<Uuid>,
    pub status: InquiryStatus,
    pub response: Option<String>,
    pub responded_by: Option<Uuid>,
    pub responded_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<entity::inquiries::Model> for Inquiry {
    fn from(m: entity::inquiries::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            email: m.email,
            phone: m.phone,
            company: m.company,
            subject: m.subject,
            message: m.message,
            product_id: m.product_id,
            // The column only ever receives values from `InquiryStatus::as_str`.
            status: m.status.parse().unwrap_or(InquiryStatus::New),
            response: m.response,
            responded_by: m.responded_by,
            responded_at: m.responded_at.map(|dt| dt.with_timezone(&Utc)),
            created_at: m.created_at.with_timezone(&Utc),
            updated_at: m.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    pub id: Uuid,
    pub page_key: String,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub content: Option<String>,
    pub button_text: Option<String>,
    pub button_link: Option<String>,
    pub image: Option<String>,
    pub background_image: Option<String>,
    pub video_url: Option<String>,
    pub items: Vec<ContentItem>,
    #[schema(value_type = Object)]
    pub metadata: serde_json::Value,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<entity::contents::Model> for Content {
    fn from(m: entity::contents::Model) -> Self {
        let mut items: Vec<ContentItem> = serde_json::from_value(m.items).unwrap_or_default();
        items.sort_by_key(|item| item.order);
        Self {
            id: m.id,
            page_key: m.page_key,
            title: m.title,
            subtitle: m.subtitle,
            content: m.content,
            button_text: m.button_text,
            button_link: m.button_link,
            image: m.image,
            background_image: m.background_image,
            video_url: m.video_url,
            items,
            metadata: m.metadata,
            is_published: m.is_published,
            created_at: m.created_at.with_timezone(&Utc),
            updated_at: m.updated_at.with_timezone(&Utc),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inquiry_status_parses_known_values_only() {
        assert_eq!("responded".parse::<InquiryStatus>(), Ok(InquiryStatus::Responded));
        assert_eq!("closed".parse::<InquiryStatus>(), Ok(InquiryStatus::Closed));
        assert!("archived".parse::<InquiryStatus>().is_err());
        assert!("NEW".parse::<InquiryStatus>().is_err());
    }

    #[test]
    fn inquiry_status_serializes_lowercase() {
        let json = serde_json::to_string(&InquiryStatus::Read).unwrap();
        assert_eq!(json, "\"read\"");
    }

    #[test]
    fn content_items_are_returned_in_display_order() {
        let now = chrono::Utc::now().fixed_offset();
        let model = entity::contents::Model {
            id: Uuid::new_v4(),
            page_key: "home-hero".into(),
            title: Some("Hero".into()),
            subtitle: None,
            content: None,
            button_text: None,
            button_link: None,
            image: None,
            background_image: None,
            video_url: None,
            items: serde_json::json!([
                { "title": "Second", "order": 2 },
                { "title": "First", "order": 1 }
            ]),
            metadata: serde_json::json!({}),
            is_published: true,
            created_at: now,
            updated_at: now,
        };
        let content = Content::from(model);
        let titles: Vec<_> = content.items.iter().map(|i| i.title.as_deref()).collect();
        assert_eq!(titles, vec![Some("First"), Some("Second")]);
    }
}

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{Content, ContentItem};

/// Full replacement of a page's content block.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpsertContentRequest {
    #[validate(length(max = 300))]
    pub title: Option<String>,
    #[validate(length(max = 500))]
    pub subtitle: Option<String>,
    pub content: Option<String>,
    #[validate(length(max = 100))]
    pub button_text: Option<String>,
    #[validate(length(max = 2048))]
    pub button_link: Option<String>,
    #[validate(length(max = 2048))]
    pub image: Option<String>,
    #[validate(length(max = 2048))]
    pub background_image: Option<String>,
    #[validate(length(max = 2048))]
    pub video_url: Option<String>,
    #[serde(default)]
    pub items: Vec<ContentItem>,
    #[schema(value_type = Option<Object>)]
    pub metadata: Option<serde_json::Value>,
    pub is_published: Option<bool>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ContentList {
    #[schema(value_type = Vec<Content>)]
    pub items: Vec<Content>,
}

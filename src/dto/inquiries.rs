use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::Inquiry;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInquiryRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    #[validate(length(max = 200))]
    pub company: Option<String>,
    #[validate(length(max = 300))]
    pub subject: Option<String>,
    #[validate(length(min = 1, max = 5000, message = "Message must be 1-5000 characters"))]
    pub message: String,
    pub product_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateInquiryStatusRequest {
    /// One of `new`, `read`, `responded`, `closed`.
    pub status: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RespondInquiryRequest {
    #[validate(length(min = 1, max = 5000, message = "Response must be 1-5000 characters"))]
    pub response: String,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct InquiryList {
    #[schema(value_type = Vec<Inquiry>)]
    pub items: Vec<Inquiry>,
}

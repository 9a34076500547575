use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Review, Service};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateServiceRequest {
    #[validate(length(min = 1, message = "Service name cannot be empty"))]
    pub name: String,
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: f64,
    #[validate(email(message = "Invalid owner email address"))]
    pub email: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
}

/// Partial update for a service. Omitted fields are left untouched;
/// a request providing none of them is rejected by the handler.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateServiceRequest {
    #[validate(length(min = 1, message = "Service name cannot be empty"))]
    pub name: Option<String>,
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: Option<f64>,
    #[validate(email(message = "Invalid owner email address"))]
    pub email: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ReviewRequest {
    #[validate(email(message = "Invalid reviewer email address"))]
    pub user_email: String,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,
    #[validate(length(min = 1, message = "Comment cannot be empty"))]
    pub comment: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceListParams {
    pub search: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct OwnerParams {
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceResponse {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub reviews: Vec<Review>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Service> for ServiceResponse {
    fn from(service: Service) -> Self {
        Self {
            id: service.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: service.name,
            price: service.price,
            email: service.email,
            description: service.description,
            category: service.category,
            image_url: service.image_url,
            reviews: service.reviews,
            created_at: service.created_at.to_rfc3339(),
            updated_at: service.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceResponse {
    pub success: bool,
    pub message: String,
    pub inserted_id: String,
}

#[derive(Debug, Serialize)]
pub struct ConfirmationResponse {
    pub success: bool,
    pub message: String,
}

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A review embedded in its service document. Reviews are append-only
/// and are never deduplicated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub user_email: String,
    pub rating: i32,
    pub comment: String,
}

/// A service listing as stored in the `services` collection. Field
/// names follow the camelCase wire contract on both BSON and JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub price: f64,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Service {
    pub fn new(
        name: String,
        price: f64,
        email: String,
        description: Option<String>,
        category: Option<String>,
        image_url: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            name,
            price,
            email,
            description,
            category,
            image_url,
            reviews: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson;

    #[test]
    fn serializes_with_camel_case_keys_and_without_unset_fields() {
        let service = Service::new(
            "Lawn Mowing".to_string(),
            25.0,
            "owner@example.com".to_string(),
            Some("Weekly lawn care".to_string()),
            None,
            None,
        );

        let document = bson::to_document(&service).expect("service should serialize");

        assert!(!document.contains_key("_id"));
        assert_eq!(document.get_str("name").unwrap(), "Lawn Mowing");
        assert_eq!(document.get_f64("price").unwrap(), 25.0);
        assert_eq!(document.get_str("email").unwrap(), "owner@example.com");
        assert_eq!(document.get_str("description").unwrap(), "Weekly lawn care");
        assert!(!document.contains_key("category"));
        assert!(!document.contains_key("imageUrl"));
        assert!(document.get_array("reviews").unwrap().is_empty());
        assert!(document.get_datetime("createdAt").is_ok());
        assert!(document.get_datetime("updatedAt").is_ok());
    }

    #[test]
    fn deserializes_documents_missing_the_reviews_array() {
        let document = bson::doc! {
            "_id": bson::oid::ObjectId::new(),
            "name": "Deep Cleaning",
            "price": 80.5,
            "email": "owner@example.com",
            "createdAt": bson::DateTime::now(),
            "updatedAt": bson::DateTime::now(),
        };

        let service: Service = bson::from_document(document).expect("service should deserialize");

        assert!(service.id.is_some());
        assert!(service.reviews.is_empty());
        assert_eq!(service.price, 80.5);
    }

    #[test]
    fn review_round_trips_through_bson() {
        let review = Review {
            user_email: "user@example.com".to_string(),
            rating: 4,
            comment: "Arrived on time".to_string(),
        };

        let document = bson::to_document(&review).expect("review should serialize");
        assert_eq!(document.get_str("userEmail").unwrap(), "user@example.com");
        assert_eq!(document.get_i32("rating").unwrap(), 4);

        let decoded: Review = bson::from_document(document).expect("review should deserialize");
        assert_eq!(decoded, review);
    }
}

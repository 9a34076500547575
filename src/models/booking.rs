use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A booking as stored in the `bookings` collection. Everything beyond
/// the booking user is optional; the client decides how much of the
/// booked service it snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn new(
        user_email: String,
        service_id: Option<String>,
        service_name: Option<String>,
        price: Option<f64>,
        date: Option<String>,
    ) -> Self {
        Self {
            id: None,
            user_email,
            service_id,
            service_name,
            price,
            date,
            created_at: Utc::now(),
        }
    }
}

pub mod app;
pub mod bookings;
pub mod services;

pub use app::{health_check, readiness_check, welcome};
pub use bookings::{create_booking, delete_booking, list_bookings};
pub use services::{
    add_review, create_service, delete_service, get_service, list_services, my_services,
    update_service,
};

use mongodb::bson::oid::ObjectId;

use crate::error::AppError;

/// Parses a path segment into an `ObjectId`. A malformed id is a client
/// error, distinct from an id that is well formed but matches nothing.
pub(crate) fn parse_object_id(raw: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw)
        .map_err(|_| AppError::BadRequest(anyhow::anyhow!("Invalid document id: {}", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_canonical_hex_ids() {
        let id = parse_object_id("507f1f77bcf86cd799439011").expect("valid id");
        assert_eq!(id.to_hex(), "507f1f77bcf86cd799439011");
    }

    #[test]
    fn rejects_malformed_ids_as_bad_request() {
        for raw in ["not-an-id", "", "507f1f77bcf86cd79943901", "zzzf1f77bcf86cd799439011"] {
            let err = parse_object_id(raw).unwrap_err();
            assert!(matches!(err, AppError::BadRequest(_)), "{raw:?}");
        }
    }
}

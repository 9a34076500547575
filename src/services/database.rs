use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    options::{FindOptions, IndexOptions},
    Client, Collection, Database, IndexModel,
};

use crate::error::AppError;
use crate::models::{Booking, Review, Service};

const SERVICES_COLLECTION: &str = "services";
const BOOKINGS_COLLECTION: &str = "bookings";

/// Handle on the marketplace database. Cheap to clone; all handlers
/// share one underlying connection pool.
#[derive(Clone)]
pub struct MarketplaceDb {
    client: Client,
    db: Database,
}

impl MarketplaceDb {
    /// Builds a client for the given deployment. The driver connects
    /// lazily, so this succeeds even while the server is unreachable;
    /// `health_check` is the way to probe actual connectivity.
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        let client = Client::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to create MongoDB client: {}", e);
            AppError::from(e)
        })?;
        let db = client.database(database);

        tracing::info!(database = %database, "MongoDB client initialized");

        Ok(Self { client, db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        let owner_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(
                IndexOptions::builder()
                    .name("service_owner_email_idx".to_string())
                    .build(),
            )
            .build();
        let price_index = IndexModel::builder()
            .keys(doc! { "price": 1 })
            .options(
                IndexOptions::builder()
                    .name("service_price_idx".to_string())
                    .build(),
            )
            .build();
        let booking_user_index = IndexModel::builder()
            .keys(doc! { "userEmail": 1 })
            .options(
                IndexOptions::builder()
                    .name("booking_user_email_idx".to_string())
                    .build(),
            )
            .build();

        self.services()
            .create_index(owner_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create services owner index: {}", e);
                AppError::from(e)
            })?;
        self.services()
            .create_index(price_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create services price index: {}", e);
                AppError::from(e)
            })?;
        self.bookings()
            .create_index(booking_user_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create bookings user index: {}", e);
                AppError::from(e)
            })?;

        tracing::info!("Database indexes ready");
        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB ping failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn services(&self) -> Collection<Service> {
        self.db.collection(SERVICES_COLLECTION)
    }

    pub fn bookings(&self) -> Collection<Booking> {
        self.db.collection(BOOKINGS_COLLECTION)
    }

    pub async fn insert_service(&self, service: &Service) -> Result<ObjectId, AppError> {
        let result = self.services().insert_one(service, None).await.map_err(|e| {
            tracing::error!("Failed to insert service: {}", e);
            AppError::from(e)
        })?;

        result.inserted_id.as_object_id().ok_or_else(|| {
            AppError::InternalError(anyhow::anyhow!("Insert did not return an ObjectId"))
        })
    }

    /// Lists services matching `filter`, newest first.
    pub async fn list_services(&self, filter: Document) -> Result<Vec<Service>, AppError> {
        let cursor = self
            .services()
            .find(filter, newest_first())
            .await
            .map_err(|e| {
                tracing::error!("Failed to query services: {}", e);
                AppError::from(e)
            })?;

        cursor.try_collect().await.map_err(|e| {
            tracing::error!("Failed to read services cursor: {}", e);
            AppError::from(e)
        })
    }

    pub async fn find_service(&self, id: ObjectId) -> Result<Option<Service>, AppError> {
        self.services()
            .find_one(doc! { "_id": id }, None)
            .await
            .map_err(|e| {
                tracing::error!(service_id = %id, "Failed to fetch service: {}", e);
                AppError::from(e)
            })
    }

    /// Applies `update` to the service with the given id and returns the
    /// number of documents that matched.
    pub async fn update_service(&self, id: ObjectId, update: Document) -> Result<u64, AppError> {
        let result = self
            .services()
            .update_one(doc! { "_id": id }, update, None)
            .await
            .map_err(|e| {
                tracing::error!(service_id = %id, "Failed to update service: {}", e);
                AppError::from(e)
            })?;

        Ok(result.matched_count)
    }

    pub async fn delete_service(&self, id: ObjectId) -> Result<u64, AppError> {
        let result = self
            .services()
            .delete_one(doc! { "_id": id }, None)
            .await
            .map_err(|e| {
                tracing::error!(service_id = %id, "Failed to delete service: {}", e);
                AppError::from(e)
            })?;

        Ok(result.deleted_count)
    }

    /// Appends a review to the service's embedded array and returns the
    /// number of documents that matched.
    pub async fn push_review(&self, id: ObjectId, review: &Review) -> Result<u64, AppError> {
        let review = mongodb::bson::to_bson(review).map_err(|e| {
            tracing::error!(service_id = %id, "Failed to serialize review: {}", e);
            AppError::InternalError(anyhow::anyhow!(e))
        })?;

        let result = self
            .services()
            .update_one(
                doc! { "_id": id },
                doc! {
                    "$push": { "reviews": review },
                    "$set": { "updatedAt": mongodb::bson::DateTime::now() },
                },
                None,
            )
            .await
            .map_err(|e| {
                tracing::error!(service_id = %id, "Failed to append review: {}", e);
                AppError::from(e)
            })?;

        Ok(result.matched_count)
    }

    pub async fn insert_booking(&self, booking: &Booking) -> Result<ObjectId, AppError> {
        let result = self.bookings().insert_one(booking, None).await.map_err(|e| {
            tracing::error!("Failed to insert booking: {}", e);
            AppError::from(e)
        })?;

        result.inserted_id.as_object_id().ok_or_else(|| {
            AppError::InternalError(anyhow::anyhow!("Insert did not return an ObjectId"))
        })
    }

    /// Lists bookings placed by `user_email`, newest first.
    pub async fn list_bookings(&self, user_email: &str) -> Result<Vec<Booking>, AppError> {
        let cursor = self
            .bookings()
            .find(doc! { "userEmail": user_email }, newest_first())
            .await
            .map_err(|e| {
                tracing::error!("Failed to query bookings: {}", e);
                AppError::from(e)
            })?;

        cursor.try_collect().await.map_err(|e| {
            tracing::error!("Failed to read bookings cursor: {}", e);
            AppError::from(e)
        })
    }

    pub async fn delete_booking(&self, id: ObjectId) -> Result<u64, AppError> {
        let result = self
            .bookings()
            .delete_one(doc! { "_id": id }, None)
            .await
            .map_err(|e| {
                tracing::error!(booking_id = %id, "Failed to delete booking: {}", e);
                AppError::from(e)
            })?;

        Ok(result.deleted_count)
    }
}

/// Find options shared by every list query: creation time descending.
fn newest_first() -> FindOptions {
    FindOptions::builder()
        .sort(doc! { "createdAt": -1 })
        .build()
}

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::dtos::{
    BookingListParams, BookingResponse, CreateBookingRequest, CreateBookingResponse,
    SuccessResponse,
};
use crate::error::AppError;
use crate::extractors::ValidatedJson;
use crate::handlers::parse_object_id;
use crate::models::Booking;
use crate::startup::AppState;

pub async fn create_booking(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateBookingRequest>,
) -> Result<(StatusCode, Json<CreateBookingResponse>), AppError> {
    let booking = Booking::new(
        request.user_email,
        request.service_id,
        request.service_name,
        request.price,
        request.date,
    );

    let inserted_id = state.db.insert_booking(&booking).await?;

    tracing::info!(booking_id = %inserted_id, "Booking created");

    Ok((
        StatusCode::CREATED,
        Json(CreateBookingResponse {
            success: true,
            inserted_id: inserted_id.to_hex(),
        }),
    ))
}

pub async fn list_bookings(
    State(state): State<AppState>,
    Query(params): Query<BookingListParams>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    let user_email = params
        .user_email
        .filter(|email| !email.is_empty())
        .ok_or_else(|| {
            AppError::BadRequest(anyhow::anyhow!(
                "Missing required query parameter: userEmail"
            ))
        })?;

    let bookings = state.db.list_bookings(&user_email).await?;

    Ok(Json(
        bookings.into_iter().map(BookingResponse::from).collect(),
    ))
}

pub async fn delete_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    let id = parse_object_id(&id)?;

    let deleted = state.db.delete_booking(id).await?;
    if deleted == 0 {
        return Err(AppError::NotFound(anyhow::anyhow!("Booking not found")));
    }

    tracing::info!(booking_id = %id, "Booking deleted");

    Ok(Json(SuccessResponse { success: true }))
}

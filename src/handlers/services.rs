use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use mongodb::bson::{doc, DateTime as BsonDateTime, Document};

use crate::dtos::{
    ConfirmationResponse, CreateServiceRequest, CreateServiceResponse, OwnerParams, ReviewRequest,
    ServiceListParams, ServiceResponse, UpdateServiceRequest,
};
use crate::error::AppError;
use crate::extractors::ValidatedJson;
use crate::handlers::parse_object_id;
use crate::models::{Review, Service};
use crate::startup::AppState;

pub async fn create_service(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateServiceRequest>,
) -> Result<(StatusCode, Json<CreateServiceResponse>), AppError> {
    let service = Service::new(
        request.name,
        request.price,
        request.email,
        request.description,
        request.category,
        request.image_url,
    );

    let inserted_id = state.db.insert_service(&service).await?;

    tracing::info!(service_id = %inserted_id, "Service added");

    Ok((
        StatusCode::CREATED,
        Json(CreateServiceResponse {
            success: true,
            message: "Service added successfully".to_string(),
            inserted_id: inserted_id.to_hex(),
        }),
    ))
}

pub async fn list_services(
    State(state): State<AppState>,
    Query(params): Query<ServiceListParams>,
) -> Result<Json<Vec<ServiceResponse>>, AppError> {
    let filter = build_list_filter(&params);
    let services = state.db.list_services(filter).await?;

    Ok(Json(
        services.into_iter().map(ServiceResponse::from).collect(),
    ))
}

pub async fn get_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ServiceResponse>, AppError> {
    let id = parse_object_id(&id)?;

    let service = state
        .db
        .find_service(id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Service not found")))?;

    Ok(Json(ServiceResponse::from(service)))
}

pub async fn update_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateServiceRequest>,
) -> Result<Json<ConfirmationResponse>, AppError> {
    let id = parse_object_id(&id)?;

    let mut fields = build_update_fields(&request);
    if fields.is_empty() {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "No updatable fields provided"
        )));
    }
    fields.insert("updatedAt", BsonDateTime::now());

    let matched = state.db.update_service(id, doc! { "$set": fields }).await?;
    if matched == 0 {
        return Err(AppError::NotFound(anyhow::anyhow!("Service not found")));
    }

    tracing::info!(service_id = %id, "Service updated");

    Ok(Json(ConfirmationResponse {
        success: true,
        message: "Service updated successfully".to_string(),
    }))
}

pub async fn delete_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ConfirmationResponse>, AppError> {
    let id = parse_object_id(&id)?;

    let deleted = state.db.delete_service(id).await?;
    if deleted == 0 {
        return Err(AppError::NotFound(anyhow::anyhow!("Service not found")));
    }

    tracing::info!(service_id = %id, "Service deleted");

    Ok(Json(ConfirmationResponse {
        success: true,
        message: "Service deleted successfully".to_string(),
    }))
}

pub async fn my_services(
    State(state): State<AppState>,
    Query(params): Query<OwnerParams>,
) -> Result<Json<Vec<ServiceResponse>>, AppError> {
    let email = params.email.filter(|email| !email.is_empty()).ok_or_else(|| {
        AppError::BadRequest(anyhow::anyhow!("Missing required query parameter: email"))
    })?;

    let services = state.db.list_services(doc! { "email": email }).await?;

    Ok(Json(
        services.into_iter().map(ServiceResponse::from).collect(),
    ))
}

pub async fn add_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<ReviewRequest>,
) -> Result<Json<ConfirmationResponse>, AppError> {
    let id = parse_object_id(&id)?;

    let review = Review {
        user_email: request.user_email,
        rating: request.rating,
        comment: request.comment,
    };

    let matched = state.db.push_review(id, &review).await?;
    if matched == 0 {
        return Err(AppError::NotFound(anyhow::anyhow!("Service not found")));
    }

    tracing::info!(service_id = %id, "Review appended");

    Ok(Json(ConfirmationResponse {
        success: true,
        message: "Review added successfully".to_string(),
    }))
}

/// Builds the `find` filter for the service list. The search term is
/// escaped so it always matches as a literal substring, never as a
/// regex pattern supplied by the caller.
fn build_list_filter(params: &ServiceListParams) -> Document {
    let mut filter = Document::new();

    if let Some(search) = params.search.as_deref().filter(|s| !s.is_empty()) {
        filter.insert(
            "name",
            doc! { "$regex": regex::escape(search), "$options": "i" },
        );
    }

    let mut price = Document::new();
    if let Some(min) = params.min_price {
        price.insert("$gte", min);
    }
    if let Some(max) = params.max_price {
        price.insert("$lte", max);
    }
    if !price.is_empty() {
        filter.insert("price", price);
    }

    filter
}

fn build_update_fields(request: &UpdateServiceRequest) -> Document {
    let mut fields = Document::new();

    if let Some(name) = request.name.as_deref() {
        fields.insert("name", name);
    }
    if let Some(price) = request.price {
        fields.insert("price", price);
    }
    if let Some(email) = request.email.as_deref() {
        fields.insert("email", email);
    }
    if let Some(description) = request.description.as_deref() {
        fields.insert("description", description);
    }
    if let Some(category) = request.category.as_deref() {
        fields.insert("category", category);
    }
    if let Some(image_url) = request.image_url.as_deref() {
        fields.insert("imageUrl", image_url);
    }

    fields
}

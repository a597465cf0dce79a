use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;

use crate::{
    dtos::{
        parts::{PartCreatedResponse, PartRequest, PartsQuery},
        MessageResponse,
    },
    models::Product,
    startup::AppState,
    utils::ValidatedJson,
};

fn part_not_found() -> AppError {
    AppError::NotFound(anyhow::anyhow!("Part not found"))
}

/// List parts, optionally filtered by part number
#[utoipa::path(
    get,
    path = "/parts",
    params(PartsQuery),
    responses((status = 200, description = "Parts ordered by id", body = Vec<crate::models::Part>)),
    tag = "Parts"
)]
pub async fn list_parts(
    State(state): State<AppState>,
    Query(query): Query<PartsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let parts = state.db.list_parts(query.part_no.as_deref().map(str::trim)).await?;
    Ok(Json(parts))
}

/// Get one part
#[utoipa::path(
    get,
    path = "/parts/{id}",
    params(("id" = i64, Path, description = "Part id")),
    responses(
        (status = 200, description = "Part", body = crate::models::Part),
        (status = 404, description = "Part not found", body = crate::dtos::ErrorResponse)
    ),
    tag = "Parts"
)]
pub async fn get_part(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let part = state.db.get_part(id).await?.ok_or_else(part_not_found)?;
    Ok(Json(part))
}

/// Add a part to inventory
#[utoipa::path(
    post,
    path = "/parts",
    request_body = PartRequest,
    responses(
        (status = 201, description = "Part created", body = PartCreatedResponse),
        (status = 400, description = "Validation error", body = crate::dtos::ErrorResponse)
    ),
    tag = "Parts"
)]
pub async fn create_part(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<PartRequest>,
) -> Result<impl IntoResponse, AppError> {
    let part = state.db.create_part(&req.into_input()).await?;
    Ok((
        StatusCode::CREATED,
        Json(PartCreatedResponse {
            message: "Part added successfully".to_string(),
            id: part.id,
        }),
    ))
}

/// Replace a part's editable fields
#[utoipa::path(
    put,
    path = "/parts/{id}",
    params(("id" = i64, Path, description = "Part id")),
    request_body = PartRequest,
    responses(
        (status = 200, description = "Updated part", body = crate::models::Part),
        (status = 400, description = "Validation error", body = crate::dtos::ErrorResponse),
        (status = 404, description = "Part not found", body = crate::dtos::ErrorResponse)
    ),
    tag = "Parts"
)]
pub async fn update_part(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<PartRequest>,
) -> Result<impl IntoResponse, AppError> {
    let part = state
        .db
        .update_part(id, &req.into_input())
        .await?
        .ok_or_else(part_not_found)?;
    Ok(Json(part))
}

/// Delete a part
#[utoipa::path(
    delete,
    path = "/parts/{id}",
    params(("id" = i64, Path, description = "Part id")),
    responses(
        (status = 200, description = "Part deleted", body = MessageResponse),
        (status = 404, description = "Part not found", body = crate::dtos::ErrorResponse)
    ),
    tag = "Parts"
)]
pub async fn delete_part(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if !state.db.delete_part(id).await? {
        return Err(part_not_found());
    }
    Ok(Json(MessageResponse::new("Part deleted successfully")))
}

/// Vehicle models that have parts
#[utoipa::path(
    get,
    path = "/models",
    responses((status = 200, description = "Distinct vehicle models", body = Vec<String>)),
    tag = "Parts"
)]
pub async fn list_models(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.db.list_vehicle_models().await?))
}

/// Parts for one vehicle model
#[utoipa::path(
    get,
    path = "/models/{model}/parts",
    params(("model" = String, Path, description = "Vehicle model")),
    responses((status = 200, description = "Parts for the model", body = Vec<crate::models::Part>)),
    tag = "Parts"
)]
pub async fn list_parts_by_model(
    State(state): State<AppState>,
    Path(model): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.db.list_parts_by_model(&model).await?))
}

/// Storefront catalogue
#[utoipa::path(
    get,
    path = "/products",
    responses((status = 200, description = "Catalogue view of every part", body = Vec<Product>)),
    tag = "Parts"
)]
pub async fn list_products(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let products: Vec<Product> = state
        .db
        .list_parts(None)
        .await?
        .into_iter()
        .map(Product::from)
        .collect();
    Ok(Json(products))
}

/// One catalogue entry
#[utoipa::path(
    get,
    path = "/products/{id}",
    params(("id" = i64, Path, description = "Part id")),
    responses(
        (status = 200, description = "Catalogue entry", body = Product),
        (status = 404, description = "Part not found", body = crate::dtos::ErrorResponse)
    ),
    tag = "Parts"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let part = state.db.get_part(id).await?.ok_or_else(part_not_found)?;
    Ok(Json(Product::from(part)))
}

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;

use crate::{
    dtos::{
        estimates::{
            ConvertEstimateResponse, EstimateSearchQuery, LatestEstimateIdResponse,
            SaveEstimateResponse, ServiceEstimateRequest,
        },
        limits::ensure_amount,
    },
    models::DocumentType,
    startup::AppState,
    utils::ValidatedJson,
};

/// Save an estimate (no stock effect)
#[utoipa::path(
    post,
    path = "/service-estimate",
    request_body = ServiceEstimateRequest,
    responses(
        (status = 200, description = "Estimate saved", body = SaveEstimateResponse),
        (status = 400, description = "Validation error", body = crate::dtos::ErrorResponse)
    ),
    tag = "Estimates"
)]
pub async fn save_estimate(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<ServiceEstimateRequest>,
) -> Result<impl IntoResponse, AppError> {
    let input = req.into_model();
    ensure_amount("Estimate total", input.resolved_total())?;
    let estimate_id = state.db.save_estimate(&input).await?;

    Ok(Json(SaveEstimateResponse {
        message: "Estimate saved successfully".to_string(),
        estimate_id,
    }))
}

/// Search estimates by customer name
#[utoipa::path(
    get,
    path = "/search-estimates",
    params(EstimateSearchQuery),
    responses(
        (status = 200, description = "Matching estimates", body = Vec<crate::models::EstimateWithParts>),
        (status = 400, description = "Unknown document type", body = crate::dtos::ErrorResponse)
    ),
    tag = "Estimates"
)]
pub async fn search_estimates(
    State(state): State<AppState>,
    Query(query): Query<EstimateSearchQuery>,
) -> Result<impl IntoResponse, AppError> {
    let document_type = match query.document_type.as_deref().filter(|t| !t.is_empty()) {
        Some(raw) => Some(DocumentType::parse(raw).ok_or_else(|| {
            AppError::BadRequest(anyhow::anyhow!("Invalid document type: {}", raw))
        })?),
        None => None,
    };

    let name = query.name.unwrap_or_default();
    Ok(Json(state.db.search_estimates(name.trim(), document_type).await?))
}

/// One estimate with its lines
#[utoipa::path(
    get,
    path = "/estimate/{id}",
    params(("id" = i64, Path, description = "Estimate id")),
    responses(
        (status = 200, description = "Estimate", body = crate::models::EstimateWithParts),
        (status = 404, description = "Estimate not found", body = crate::dtos::ErrorResponse)
    ),
    tag = "Estimates"
)]
pub async fn get_estimate(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let estimate = state
        .db
        .get_estimate(id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Estimate not found")))?;
    Ok(Json(estimate))
}

/// Highest estimate id
#[utoipa::path(
    get,
    path = "/latest-estimate-id",
    responses((status = 200, description = "Latest id, 0 when none", body = LatestEstimateIdResponse)),
    tag = "Estimates"
)]
pub async fn latest_estimate_id(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let estimate_id = state.db.latest_estimate_id().await?;
    Ok(Json(LatestEstimateIdResponse { estimate_id }))
}

/// Convert an estimate into an invoice
#[utoipa::path(
    post,
    path = "/estimate/{id}/convert",
    params(("id" = i64, Path, description = "Estimate id")),
    responses(
        (status = 200, description = "Converted", body = ConvertEstimateResponse),
        (status = 400, description = "Already an invoice", body = crate::dtos::ErrorResponse),
        (status = 404, description = "Estimate not found", body = crate::dtos::ErrorResponse)
    ),
    tag = "Estimates"
)]
pub async fn convert_estimate(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let estimate = state.db.convert_estimate(id).await?;
    Ok(Json(ConvertEstimateResponse {
        message: "Estimate converted to invoice".to_string(),
        estimate,
    }))
}

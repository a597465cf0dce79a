use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;

use crate::{
    dtos::{
        invoices::{LatestInvoiceIdResponse, NameQuery},
        labour::{
            LabourSummaryRequest, LabourSummaryResponse, SaveLabourInvoiceRequest,
            SaveLabourInvoiceResponse,
        },
        limits::ensure_storable,
    },
    startup::AppState,
    utils::ValidatedJson,
};

/// Save a labour invoice
///
/// Item subtotals, taxes and the grand total are computed server-side.
#[utoipa::path(
    post,
    path = "/save-labour-invoice",
    request_body = SaveLabourInvoiceRequest,
    responses(
        (status = 200, description = "Labour invoice saved", body = SaveLabourInvoiceResponse),
        (status = 400, description = "Validation error", body = crate::dtos::ErrorResponse)
    ),
    tag = "Labour invoices"
)]
pub async fn save_labour_invoice(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<SaveLabourInvoiceRequest>,
) -> Result<impl IntoResponse, AppError> {
    let input = req.into_model();
    ensure_storable(&input.totals())?;
    let saved = state.db.save_labour_invoice(&input).await?;

    Ok(Json(SaveLabourInvoiceResponse {
        message: "Labour invoice saved successfully".to_string(),
        invoice_id: saved.invoice_id,
        totals: saved.totals,
    }))
}

/// Save or replace a labour invoice summary
#[utoipa::path(
    post,
    path = "/labour-invoice-summary",
    request_body = LabourSummaryRequest,
    responses(
        (status = 200, description = "Summary saved", body = LabourSummaryResponse),
        (status = 400, description = "Missing required fields", body = crate::dtos::ErrorResponse),
        (status = 404, description = "Labour invoice not found", body = crate::dtos::ErrorResponse)
    ),
    tag = "Labour invoices"
)]
pub async fn save_labour_summary(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LabourSummaryRequest>,
) -> Result<impl IntoResponse, AppError> {
    let summary = state.db.upsert_labour_summary(&req.into()).await?;
    Ok(Json(LabourSummaryResponse {
        message: "Labour invoice summary saved successfully".to_string(),
        summary,
    }))
}

/// Search labour invoices by customer name
#[utoipa::path(
    get,
    path = "/search-labour-invoices",
    params(NameQuery),
    responses((status = 200, description = "Matching labour invoices", body = Vec<crate::models::LabourInvoiceWithItems>)),
    tag = "Labour invoices"
)]
pub async fn search_labour_invoices(
    State(state): State<AppState>,
    Query(query): Query<NameQuery>,
) -> Result<impl IntoResponse, AppError> {
    let name = query.name.unwrap_or_default();
    Ok(Json(state.db.search_labour_invoices(name.trim()).await?))
}

/// Highest labour invoice id
#[utoipa::path(
    get,
    path = "/latest-labour-invoice-id",
    responses((status = 200, description = "Latest id, 0 when none", body = LatestInvoiceIdResponse)),
    tag = "Labour invoices"
)]
pub async fn latest_labour_invoice_id(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let invoice_id = state.db.latest_labour_invoice_id().await?;
    Ok(Json(LatestInvoiceIdResponse { invoice_id }))
}

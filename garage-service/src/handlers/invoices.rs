use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;

use crate::{
    dtos::{
        invoices::{
            CustomerTotalResponse, InvoiceSummaryRequest, LatestInvoiceIdResponse, NameQuery,
            SaveInvoiceRequest, SaveInvoiceResponse, ServiceInvoiceRequest,
            ServiceInvoiceResponse,
        },
        limits::{ensure_amount, ensure_storable},
    },
    startup::AppState,
    utils::ValidatedJson,
};

/// Save a tax invoice and decrement stock
///
/// Header, lines, stock and summary are written atomically. If any part is
/// missing or short of stock nothing is written.
#[utoipa::path(
    post,
    path = "/save-invoice",
    request_body = SaveInvoiceRequest,
    responses(
        (status = 200, description = "Invoice saved", body = SaveInvoiceResponse),
        (status = 400, description = "Validation error or insufficient stock", body = crate::dtos::ErrorResponse)
    ),
    tag = "Tax invoices"
)]
pub async fn save_invoice(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<SaveInvoiceRequest>,
) -> Result<impl IntoResponse, AppError> {
    let input = req.into_model();
    ensure_storable(&input.totals())?;
    let saved = state.db.save_tax_invoice(&input).await?;

    Ok(Json(SaveInvoiceResponse {
        message: "Invoice saved successfully".to_string(),
        invoice_id: saved.invoice_id,
        summary: saved.totals,
    }))
}

/// Tax invoice with lines and summary
#[utoipa::path(
    get,
    path = "/invoice/{invoice_id}",
    params(("invoice_id" = i64, Path, description = "Invoice id")),
    responses(
        (status = 200, description = "Invoice", body = crate::models::InvoiceWithParts),
        (status = 404, description = "Invoice not found", body = crate::dtos::ErrorResponse)
    ),
    tag = "Tax invoices"
)]
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let invoice = state
        .db
        .get_invoice(invoice_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Invoice not found")))?;
    Ok(Json(invoice))
}

/// Store a printable service invoice
#[utoipa::path(
    post,
    path = "/service-invoice",
    request_body = ServiceInvoiceRequest,
    responses(
        (status = 200, description = "Service invoice saved", body = ServiceInvoiceResponse),
        (status = 400, description = "Validation error", body = crate::dtos::ErrorResponse)
    ),
    tag = "Tax invoices"
)]
pub async fn save_service_invoice(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<ServiceInvoiceRequest>,
) -> Result<impl IntoResponse, AppError> {
    let input = req.into_model();
    ensure_amount("Total due", input.total_due)?;
    let invoice = state.db.save_service_invoice(&input).await?;

    Ok(Json(ServiceInvoiceResponse {
        message: "Service invoice saved successfully".to_string(),
        invoice_id: invoice.id,
        invoice_number: invoice.invoice_number,
    }))
}

/// Save or replace an invoice summary
#[utoipa::path(
    post,
    path = "/invoice-summary",
    request_body = InvoiceSummaryRequest,
    responses(
        (status = 200, description = "Summary saved", body = crate::models::InvoiceSummary),
        (status = 400, description = "Missing required fields", body = crate::dtos::ErrorResponse),
        (status = 404, description = "Invoice not found", body = crate::dtos::ErrorResponse)
    ),
    tag = "Tax invoices"
)]
pub async fn save_invoice_summary(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<InvoiceSummaryRequest>,
) -> Result<impl IntoResponse, AppError> {
    let summary = state.db.upsert_invoice_summary(&req.into()).await?;
    Ok(Json(summary))
}

/// All invoice summaries, newest first
#[utoipa::path(
    get,
    path = "/invoice-summary",
    responses((status = 200, description = "Summaries", body = Vec<crate::models::InvoiceSummary>)),
    tag = "Tax invoices"
)]
pub async fn list_invoice_summaries(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.db.list_invoice_summaries().await?))
}

/// Highest tax invoice id
#[utoipa::path(
    get,
    path = "/latest-invoice-id",
    responses((status = 200, description = "Latest id, 0 when none", body = LatestInvoiceIdResponse)),
    tag = "Tax invoices"
)]
pub async fn latest_invoice_id(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let invoice_id = state.db.latest_invoice_id().await?;
    Ok(Json(LatestInvoiceIdResponse { invoice_id }))
}

/// Total billed to one customer
#[utoipa::path(
    get,
    path = "/customer-total/{customer_name}",
    params(("customer_name" = String, Path, description = "Exact customer name")),
    responses(
        (status = 200, description = "Sum of total due", body = CustomerTotalResponse),
        (status = 404, description = "No invoices for the customer", body = crate::dtos::ErrorResponse)
    ),
    tag = "Tax invoices"
)]
pub async fn customer_total(
    State(state): State<AppState>,
    Path(customer_name): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let total_amount = state
        .db
        .customer_total(&customer_name)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("No invoices found for customer")))?;

    Ok(Json(CustomerTotalResponse {
        customer_name,
        total_amount,
    }))
}

/// Invoice headers for reporting
#[utoipa::path(
    get,
    path = "/invoices-details",
    responses((status = 200, description = "Invoice headers", body = Vec<crate::models::Invoice>)),
    tag = "Tax invoices"
)]
pub async fn invoices_details(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.db.list_invoice_headers().await?))
}

/// Search tax invoices by customer name
#[utoipa::path(
    get,
    path = "/search-invoices",
    params(NameQuery),
    responses((status = 200, description = "Matching invoices", body = Vec<crate::models::InvoiceWithParts>)),
    tag = "Tax invoices"
)]
pub async fn search_invoices(
    State(state): State<AppState>,
    Query(query): Query<NameQuery>,
) -> Result<impl IntoResponse, AppError> {
    let name = query.name.unwrap_or_default();
    Ok(Json(state.db.search_invoices(name.trim()).await?))
}

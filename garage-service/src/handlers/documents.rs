use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;

use crate::{
    dtos::{
        documents::{CustomersQuery, DocumentTypeSelector, UpdateStatusRequest},
        MessageResponse,
    },
    models::{DocumentKind, DocumentStatus},
    startup::AppState,
    utils::ValidatedJson,
};

fn parse_kind(raw: Option<&str>) -> Result<DocumentKind, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(DocumentKind::default()),
        Some(raw) => DocumentKind::parse(&raw.to_lowercase())
            .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("Invalid invoice type: {}", raw))),
    }
}

/// Customer list, one row per invoice
#[utoipa::path(
    get,
    path = "/customers",
    params(CustomersQuery),
    responses(
        (status = 200, description = "Invoice headers with totals", body = Vec<crate::models::CustomerRow>),
        (status = 400, description = "Unknown type", body = crate::dtos::ErrorResponse)
    ),
    tag = "Documents"
)]
pub async fn list_customers(
    State(state): State<AppState>,
    Query(query): Query<CustomersQuery>,
) -> Result<impl IntoResponse, AppError> {
    let kind = parse_kind(query.kind.as_deref())?;
    Ok(Json(state.db.list_customers(kind).await?))
}

/// Change a document's status
#[utoipa::path(
    put,
    path = "/update-status/{id}",
    params(("id" = i64, Path, description = "Document id")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = MessageResponse),
        (status = 400, description = "Invalid status or type", body = crate::dtos::ErrorResponse),
        (status = 404, description = "Document not found", body = crate::dtos::ErrorResponse)
    ),
    tag = "Documents"
)]
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    let status = DocumentStatus::parse(req.status.trim()).ok_or_else(|| {
        AppError::BadRequest(anyhow::anyhow!(
            "Invalid status: must be Pending, Paid or Completed"
        ))
    })?;
    let kind = parse_kind(req.invoice_type.as_deref())?;

    if !state.db.update_document_status(kind, id, status).await? {
        return Err(AppError::NotFound(anyhow::anyhow!("Invoice not found")));
    }

    Ok(Json(MessageResponse::new(format!(
        "Status updated to {}",
        status.as_str()
    ))))
}

/// Delete a document and its lines
///
/// The document type may be given in a JSON body or as a query parameter.
#[utoipa::path(
    delete,
    path = "/delete-invoice/{id}",
    params(("id" = i64, Path, description = "Document id"), DocumentTypeSelector),
    request_body(content = DocumentTypeSelector, description = "Optional document type"),
    responses(
        (status = 200, description = "Document deleted", body = MessageResponse),
        (status = 400, description = "Invalid type", body = crate::dtos::ErrorResponse),
        (status = 404, description = "Document not found", body = crate::dtos::ErrorResponse)
    ),
    tag = "Documents"
)]
pub async fn delete_invoice(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<DocumentTypeSelector>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let from_body = if body.iter().all(u8::is_ascii_whitespace) {
        DocumentTypeSelector::default()
    } else {
        serde_json::from_slice::<DocumentTypeSelector>(&body)
            .map_err(|e| AppError::BadRequest(anyhow::anyhow!("Invalid JSON body: {}", e)))?
    };

    let kind = parse_kind(from_body.invoice_type.or(query.invoice_type).as_deref())?;

    if !state.db.delete_document(kind, id).await? {
        return Err(AppError::NotFound(anyhow::anyhow!("Invoice not found")));
    }

    Ok(Json(MessageResponse::new("Invoice deleted successfully")))
}

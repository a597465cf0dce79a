use axum::{extract::State, response::IntoResponse, Json};
use service_core::error::AppError;

use crate::startup::AppState;

/// Headline counters for the dashboard
#[utoipa::path(
    get,
    path = "/api/dashboard-stats",
    responses((status = 200, description = "Dashboard counters", body = crate::models::DashboardStats)),
    tag = "Dashboard"
)]
pub async fn dashboard_stats(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.db.dashboard_stats().await?))
}

/// Count and revenue per document family
#[utoipa::path(
    get,
    path = "/invoice-stats",
    responses((status = 200, description = "Per-family counts and revenue", body = crate::models::InvoiceStats)),
    tag = "Dashboard"
)]
pub async fn invoice_stats(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.db.invoice_stats().await?))
}

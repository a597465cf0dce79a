//! Read-side aggregates for the dashboard and customer lists.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_invoices: i64,
    pub total_parts: i64,
    pub pending_orders: i64,
    pub total_revenue: Decimal,
}

#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct DocumentStat {
    pub count: i64,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceStats {
    pub tax_invoices: DocumentStat,
    pub estimate_invoices: DocumentStat,
    pub labour_invoices: DocumentStat,
}

/// One invoice header in the customer list.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct CustomerRow {
    pub id: i64,
    pub invoice_type: String,
    pub customer_name: String,
    pub address: Option<String>,
    pub contact: Option<String>,
    pub email: Option<String>,
    pub model: Option<String>,
    pub reg_no: Option<String>,
    pub invoice_date: NaiveDate,
    pub status: String,
    pub total_due: Decimal,
}

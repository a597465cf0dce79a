//! Tax invoice and service invoice models.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

use super::totals::{LineAmounts, Totals};

/// Customer and vehicle details captured on every billing document.
#[derive(Debug, Clone)]
pub struct CustomerDetails {
    pub name: String,
    pub address: Option<String>,
    pub contact: Option<String>,
    pub email: Option<String>,
    pub model: Option<String>,
    pub reg_no: Option<String>,
    pub date: NaiveDate,
}

/// One requested parts line.
#[derive(Debug, Clone)]
pub struct InvoiceLine {
    pub part_id: Option<i64>,
    pub part_no: String,
    pub part_description: Option<String>,
    pub hsn_sac: Option<String>,
    pub vehicle: Option<String>,
    pub quantity: i32,
    pub mrp: Decimal,
    pub rate: Decimal,
    pub cgst: Decimal,
    pub sgst: Decimal,
}

impl InvoiceLine {
    pub fn amounts(&self) -> LineAmounts {
        LineAmounts::compute(self.rate, self.quantity, self.cgst, self.sgst)
    }
}

/// Input for the stock-decrementing tax invoice save.
#[derive(Debug, Clone)]
pub struct CreateTaxInvoice {
    pub customer: CustomerDetails,
    pub lines: Vec<InvoiceLine>,
}

impl CreateTaxInvoice {
    pub fn totals(&self) -> Totals {
        let amounts: Vec<LineAmounts> = self.lines.iter().map(InvoiceLine::amounts).collect();
        super::tax_totals(&amounts)
    }
}

/// Result of a committed tax invoice save.
#[derive(Debug, Clone, Copy)]
pub struct SavedTaxInvoice {
    pub invoice_id: i64,
    pub totals: Totals,
}

/// Tax invoice header row.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Invoice {
    pub invoice_id: i64,
    pub name: String,
    pub address: Option<String>,
    pub contact: Option<String>,
    pub email: Option<String>,
    pub model: Option<String>,
    pub reg_no: Option<String>,
    pub invoice_date: NaiveDate,
    pub status: String,
    pub created_utc: DateTime<Utc>,
}

/// Tax invoice line row.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct InvoicePart {
    pub id: i64,
    pub invoice_id: i64,
    pub part_id: Option<i64>,
    pub part_no: String,
    pub part_description: Option<String>,
    pub hsn_sac: Option<String>,
    pub qty: i32,
    pub rate: Decimal,
    pub cgst: Decimal,
    pub sgst: Decimal,
    pub amount: Decimal,
}

/// Stored totals of a tax invoice.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct InvoiceSummary {
    pub id: i64,
    pub invoice_id: i64,
    pub customer_name: String,
    pub invoice_date: NaiveDate,
    pub subtotal: Decimal,
    pub cgst: Decimal,
    pub sgst: Decimal,
    pub total_due: Decimal,
}

/// Header with its lines and summary.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InvoiceWithParts {
    #[serde(flatten)]
    pub invoice: Invoice,
    pub parts: Vec<InvoicePart>,
    pub summary: Option<InvoiceSummary>,
}

/// Explicit summary write for an existing invoice.
#[derive(Debug, Clone)]
pub struct UpsertInvoiceSummary {
    pub invoice_id: i64,
    pub customer_name: String,
    pub invoice_date: NaiveDate,
    pub subtotal: Decimal,
    pub cgst: Decimal,
    pub sgst: Decimal,
    pub total_due: Decimal,
}

/// Printable service invoice snapshot; does not touch stock.
#[derive(Debug, Clone)]
pub struct CreateServiceInvoice {
    pub customer: CustomerDetails,
    pub lines: Vec<InvoiceLine>,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total_due: Decimal,
}

/// Identity of a stored service invoice.
#[derive(Debug, Clone, FromRow)]
pub struct ServiceInvoice {
    pub id: i64,
    pub invoice_number: String,
}

//! Labour invoice models.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::invoice::CustomerDetails;
use super::totals::{LabourAmounts, Totals};

/// One labour line as submitted. Amounts are computed server-side.
#[derive(Debug, Clone)]
pub struct LabourItem {
    pub sno: i32,
    pub description: String,
    pub tinkering: Decimal,
    pub painting: Decimal,
    pub electrician: Decimal,
    pub mechanical: Decimal,
    pub cgst: Decimal,
    pub sgst: Decimal,
}

impl LabourItem {
    pub fn amounts(&self) -> LabourAmounts {
        LabourAmounts::compute(
            [self.tinkering, self.painting, self.electrician, self.mechanical],
            self.cgst,
            self.sgst,
        )
    }
}

#[derive(Debug, Clone)]
pub struct CreateLabourInvoice {
    pub customer: CustomerDetails,
    pub items: Vec<LabourItem>,
}

impl CreateLabourInvoice {
    pub fn totals(&self) -> Totals {
        let amounts: Vec<LabourAmounts> = self.items.iter().map(LabourItem::amounts).collect();
        super::labour_totals(&amounts)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SavedLabourInvoice {
    pub invoice_id: i64,
    pub totals: Totals,
}

/// Labour invoice header row.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct LabourInvoice {
    pub id: i64,
    pub customer_name: String,
    pub address: Option<String>,
    pub contact: Option<String>,
    pub email: Option<String>,
    pub model: Option<String>,
    pub reg_no: Option<String>,
    pub invoice_date: NaiveDate,
    pub subtotal: Decimal,
    pub cgst: Decimal,
    pub sgst: Decimal,
    pub grand_total: Decimal,
    pub status: String,
    pub created_utc: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LabourInvoiceItem {
    pub id: i64,
    pub labour_invoice_id: i64,
    pub sno: i32,
    pub description: String,
    pub tinkering: Decimal,
    pub painting: Decimal,
    pub electrician: Decimal,
    pub mechanical: Decimal,
    pub cgst: Decimal,
    pub sgst: Decimal,
    pub subtotal: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct LabourInvoiceSummary {
    pub id: i64,
    pub labour_invoice_id: i64,
    pub customer_name: String,
    pub invoice_date: NaiveDate,
    pub subtotal: Decimal,
    pub cgst: Decimal,
    pub sgst: Decimal,
    pub total_due: Decimal,
    #[schema(value_type = Object)]
    pub items: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LabourInvoiceWithItems {
    #[serde(flatten)]
    pub invoice: LabourInvoice,
    pub items: Vec<LabourInvoiceItem>,
}

#[derive(Debug, Clone)]
pub struct UpsertLabourSummary {
    pub labour_invoice_id: i64,
    pub customer_name: String,
    pub invoice_date: NaiveDate,
    pub subtotal: Decimal,
    pub cgst: Decimal,
    pub sgst: Decimal,
    pub total_due: Decimal,
    /// Snapshot of the items; the stored item rows are used when absent.
    pub items: Option<serde_json::Value>,
}

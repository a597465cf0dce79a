//! Estimate (quotation) models.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::invoice::{CustomerDetails, InvoiceLine};
use super::{tax_totals, LineAmounts};

/// Whether a parts document is still a quotation or has been issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    #[default]
    Estimate,
    Invoice,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Estimate => "estimate",
            DocumentType::Invoice => "invoice",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "estimate" => Some(DocumentType::Estimate),
            "invoice" => Some(DocumentType::Invoice),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateEstimate {
    pub document_type: DocumentType,
    pub customer: CustomerDetails,
    pub lines: Vec<InvoiceLine>,
    /// Client-supplied grand total; computed from the lines when absent.
    pub total_amount: Option<Decimal>,
}

impl CreateEstimate {
    /// Grand total to store: the supplied one, else the lines' tax total.
    pub fn resolved_total(&self) -> Decimal {
        self.total_amount.unwrap_or_else(|| {
            let amounts: Vec<LineAmounts> = self.lines.iter().map(InvoiceLine::amounts).collect();
            tax_totals(&amounts).total_due
        })
    }
}

/// Estimate header row.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Estimate {
    pub estimate_id: i64,
    pub document_type: String,
    pub customer_name: String,
    pub address: Option<String>,
    pub contact: Option<String>,
    pub email: Option<String>,
    pub model: Option<String>,
    pub reg_no: Option<String>,
    pub estimate_date: NaiveDate,
    pub total_amount: Decimal,
    pub status: String,
    pub created_utc: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct EstimatePart {
    pub id: i64,
    pub estimate_id: i64,
    pub part_no: String,
    pub part_description: Option<String>,
    pub hsn_sac: Option<String>,
    pub quantity: i32,
    pub rate: Decimal,
    pub cgst: Decimal,
    pub sgst: Decimal,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EstimateWithParts {
    #[serde(flatten)]
    pub estimate: Estimate,
    pub parts: Vec<EstimatePart>,
}

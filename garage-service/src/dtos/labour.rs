use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::customer::CustomerDetailsDto;
use super::date;
use super::limits::{money, non_blank, tax_rate, unit_price};
use crate::models::{CreateLabourInvoice, LabourInvoiceSummary, LabourItem, Totals, UpsertLabourSummary};

/// Labour line as entered. `subtotal`/`total` sent by clients are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct LabourItemDto {
    #[serde(default)]
    pub sno: Option<i32>,
    #[validate(
        length(min = 1, message = "Description is required"),
        custom(function = "non_blank", message = "Description is required")
    )]
    #[schema(example = "Door dent removal")]
    pub description: String,
    #[serde(default)]
    #[validate(custom(function = "unit_price"))]
    pub tinkering: Decimal,
    #[serde(default)]
    #[validate(custom(function = "unit_price"))]
    pub painting: Decimal,
    #[serde(default)]
    #[validate(custom(function = "unit_price"))]
    pub electrician: Decimal,
    #[serde(default)]
    #[validate(custom(function = "unit_price"))]
    pub mechanical: Decimal,
    #[serde(default)]
    #[validate(custom(function = "tax_rate"))]
    pub cgst: Decimal,
    #[serde(default)]
    #[validate(custom(function = "tax_rate"))]
    pub sgst: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveLabourInvoiceRequest {
    #[validate(nested)]
    pub customer_details: CustomerDetailsDto,
    #[validate(length(min = 1, message = "At least one labour item is required"), nested)]
    pub labour_items: Vec<LabourItemDto>,
}

impl SaveLabourInvoiceRequest {
    pub fn into_model(self) -> CreateLabourInvoice {
        let items = self
            .labour_items
            .into_iter()
            .enumerate()
            .map(|(idx, item)| LabourItem {
                sno: item.sno.unwrap_or(idx as i32 + 1),
                description: item.description.trim().to_string(),
                tinkering: item.tinkering,
                painting: item.painting,
                electrician: item.electrician,
                mechanical: item.mechanical,
                cgst: item.cgst,
                sgst: item.sgst,
            })
            .collect();

        CreateLabourInvoice {
            customer: self.customer_details.into_model(),
            items,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveLabourInvoiceResponse {
    #[schema(example = "Labour invoice saved successfully")]
    pub message: String,
    pub invoice_id: i64,
    pub totals: Totals,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LabourSummaryRequest {
    pub invoice_id: i64,
    #[validate(
        length(min = 1, max = 255, message = "Missing required fields"),
        custom(function = "non_blank", message = "Missing required fields")
    )]
    pub customer_name: String,
    #[serde(deserialize_with = "date::required")]
    #[schema(value_type = String, example = "2025-03-01")]
    pub invoice_date: NaiveDate,
    #[validate(custom(function = "money"))]
    pub subtotal: Decimal,
    #[validate(custom(function = "money"))]
    pub cgst: Decimal,
    #[validate(custom(function = "money"))]
    pub sgst: Decimal,
    #[validate(custom(function = "money"))]
    pub total_due: Decimal,
    /// Item snapshot; the stored items are captured when omitted.
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub items: Option<serde_json::Value>,
}

impl From<LabourSummaryRequest> for UpsertLabourSummary {
    fn from(req: LabourSummaryRequest) -> Self {
        Self {
            labour_invoice_id: req.invoice_id,
            customer_name: req.customer_name.trim().to_string(),
            invoice_date: req.invoice_date,
            subtotal: req.subtotal,
            cgst: req.cgst,
            sgst: req.sgst,
            total_due: req.total_due,
            items: req.items.filter(|v| !v.is_null()),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LabourSummaryResponse {
    #[schema(example = "Labour invoice summary saved successfully")]
    pub message: String,
    pub summary: LabourInvoiceSummary,
}

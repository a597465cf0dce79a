use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::customer::{CustomerDetailsDto, SelectedPartDto};
use super::date;
use super::limits::{money, non_blank};
use crate::models::{
    CreateServiceInvoice, CreateTaxInvoice, InvoiceLine, Totals, UpsertInvoiceSummary,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveInvoiceRequest {
    #[validate(nested)]
    pub customer_details: CustomerDetailsDto,
    #[validate(length(min = 1, message = "At least one part must be selected"), nested)]
    pub selected_parts: Vec<SelectedPartDto>,
}

impl SaveInvoiceRequest {
    pub fn into_model(self) -> CreateTaxInvoice {
        CreateTaxInvoice {
            customer: self.customer_details.into_model(),
            lines: self.selected_parts.into_iter().map(InvoiceLine::from).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveInvoiceResponse {
    #[schema(example = "Invoice saved successfully")]
    pub message: String,
    pub invoice_id: i64,
    pub summary: Totals,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInvoiceRequest {
    #[validate(nested)]
    pub customer_details: CustomerDetailsDto,
    #[validate(length(min = 1, message = "At least one part must be selected"), nested)]
    pub selected_parts: Vec<SelectedPartDto>,
    #[serde(default)]
    #[validate(custom(function = "money"))]
    pub subtotal: Decimal,
    #[serde(default)]
    #[validate(custom(function = "money"))]
    pub tax: Decimal,
    /// `subtotal + tax` when omitted.
    #[serde(default)]
    #[validate(custom(function = "money"))]
    pub total_due: Option<Decimal>,
}

impl ServiceInvoiceRequest {
    pub fn into_model(self) -> CreateServiceInvoice {
        CreateServiceInvoice {
            customer: self.customer_details.into_model(),
            lines: self.selected_parts.into_iter().map(InvoiceLine::from).collect(),
            total_due: self
                .total_due
                .unwrap_or_else(|| self.subtotal.saturating_add(self.tax)),
            subtotal: self.subtotal,
            tax: self.tax,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInvoiceResponse {
    #[schema(example = "Service invoice saved successfully")]
    pub message: String,
    pub invoice_id: i64,
    #[schema(example = "INV-1740787200000")]
    pub invoice_number: String,
}

/// Every field is mandatory; a missing one is a 400.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceSummaryRequest {
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
}

impl From<InvoiceSummaryRequest> for UpsertInvoiceSummary {
    fn from(req: InvoiceSummaryRequest) -> Self {
        Self {
            invoice_id: req.invoice_id,
            customer_name: req.customer_name.trim().to_string(),
            invoice_date: req.invoice_date,
            subtotal: req.subtotal,
            cgst: req.cgst,
            sgst: req.sgst,
            total_due: req.total_due,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LatestInvoiceIdResponse {
    pub invoice_id: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerTotalResponse {
    pub customer_name: String,
    pub total_amount: Decimal,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct NameQuery {
    /// Case-insensitive customer name substring.
    pub name: Option<String>,
}

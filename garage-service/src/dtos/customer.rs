use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::date;
use super::limits::{non_blank, tax_rate, unit_price};
use crate::models::{CustomerDetails, InvoiceLine};

/// Customer block shared by every billing request.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDetailsDto {
    #[serde(default)]
    #[validate(
        length(min = 1, max = 255, message = "Customer name is required"),
        custom(function = "non_blank", message = "Customer name is required")
    )]
    #[schema(example = "Ravi Kumar")]
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    #[validate(length(max = 64))]
    pub contact: Option<String>,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub email: Option<String>,
    #[serde(default)]
    #[validate(length(max = 128))]
    #[schema(example = "Swift Dzire")]
    pub model: Option<String>,
    #[serde(default, alias = "reg_no")]
    #[validate(length(max = 64))]
    #[schema(example = "KA01AB1234")]
    pub reg_no: Option<String>,
    /// Defaults to today when absent.
    #[serde(default, alias = "date", deserialize_with = "date::optional")]
    #[schema(value_type = Option<String>, example = "2025-03-01")]
    pub invoice_date: Option<NaiveDate>,
}

impl CustomerDetailsDto {
    pub fn into_model(self) -> CustomerDetails {
        CustomerDetails {
            name: self.name.trim().to_string(),
            address: self.address,
            contact: self.contact,
            email: self.email,
            model: self.model,
            reg_no: self.reg_no,
            date: self.invoice_date.unwrap_or_else(|| Utc::now().date_naive()),
        }
    }
}

fn one() -> i32 {
    1
}

/// A part picked onto an invoice or estimate.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SelectedPartDto {
    /// Matched by id when present, otherwise by part number.
    #[serde(default)]
    pub part_id: Option<i64>,
    #[validate(
        length(min = 1, max = 64, message = "Part number must be 1 to 64 characters"),
        custom(function = "non_blank", message = "Part number is required")
    )]
    #[schema(example = "BRK-100")]
    pub part_no: String,
    #[serde(default)]
    pub part_description: Option<String>,
    #[serde(default)]
    #[validate(length(max = 32))]
    pub hsn_sac: Option<String>,
    #[serde(default)]
    #[validate(length(max = 128))]
    pub vehicle: Option<String>,
    #[serde(default = "one", alias = "qty")]
    #[validate(range(min = 1, max = 10_000, message = "Quantity must be between 1 and 10000"))]
    #[schema(example = 2)]
    pub quantity: i32,
    #[serde(default)]
    #[validate(custom(function = "unit_price"))]
    pub mrp: Decimal,
    #[serde(default)]
    #[validate(custom(function = "unit_price"))]
    #[schema(example = "400.00")]
    pub rate: Decimal,
    #[serde(default)]
    #[validate(custom(function = "tax_rate"))]
    #[schema(example = "9")]
    pub cgst: Decimal,
    #[serde(default)]
    #[validate(custom(function = "tax_rate"))]
    #[schema(example = "9")]
    pub sgst: Decimal,
}

impl From<SelectedPartDto> for InvoiceLine {
    fn from(dto: SelectedPartDto) -> Self {
        Self {
            part_id: dto.part_id,
            part_no: dto.part_no.trim().to_string(),
            part_description: dto.part_description,
            hsn_sac: dto.hsn_sac,
            vehicle: dto.vehicle,
            quantity: dto.quantity,
            mrp: dto.mrp,
            rate: dto.rate,
            cgst: dto.cgst,
            sgst: dto.sgst,
        }
    }
}

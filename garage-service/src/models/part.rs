//! Parts inventory model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// A stocked part.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Part {
    pub id: i64,
    pub serial_number: Option<String>,
    pub part_no: String,
    pub hsn_sac: Option<String>,
    pub vehicle: Option<String>,
    pub part_description: Option<String>,
    pub qty: i32,
    pub mrp: Decimal,
    pub rate: Decimal,
    pub value: Decimal,
    /// CGST percentage.
    pub cgst: Decimal,
    /// SGST percentage.
    pub sgst: Decimal,
    pub created_utc: DateTime<Utc>,
}

/// Editable part fields, used for both create and full update.
#[derive(Debug, Clone, Default)]
pub struct PartInput {
    pub serial_number: Option<String>,
    pub part_no: String,
    pub hsn_sac: Option<String>,
    pub vehicle: Option<String>,
    pub part_description: Option<String>,
    pub qty: i32,
    pub mrp: Decimal,
    pub rate: Decimal,
    pub value: Decimal,
    pub cgst: Decimal,
    pub sgst: Decimal,
}

/// Vehicle a catalogue product fits, with the price charged for it.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SuitableVehicle {
    pub model: String,
    pub price: Decimal,
}

/// Storefront projection of a part.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Product {
    pub id: i64,
    pub serial_number: Option<String>,
    pub part_no: String,
    pub name: String,
    pub brand: String,
    pub availability: bool,
    pub price: Decimal,
    pub suitable_for: Vec<SuitableVehicle>,
    pub qty: i32,
    pub mrp: Decimal,
    pub rate: Decimal,
    pub value: Decimal,
    pub cgst: Decimal,
    pub sgst: Decimal,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl From<Part> for Product {
    fn from(part: Part) -> Self {
        Self {
            id: part.id,
            serial_number: part.serial_number,
            name: non_blank(part.part_description).unwrap_or_else(|| "Unnamed Part".to_string()),
            brand: non_blank(part.hsn_sac).unwrap_or_else(|| "Unknown Brand".to_string()),
            availability: part.qty > 0,
            price: part.mrp,
            suitable_for: vec![SuitableVehicle {
                model: non_blank(part.vehicle).unwrap_or_else(|| "Multiple Vehicles".to_string()),
                price: part.rate,
            }],
            part_no: part.part_no,
            qty: part.qty,
            mrp: part.mrp,
            rate: part.rate,
            value: part.value,
            cgst: part.cgst,
            sgst: part.sgst,
        }
    }
}

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use super::limits::{money, non_blank, tax_rate, unit_price};
use crate::models::{PartInput, MAX_AMOUNT};

/// Body for creating or fully replacing a part.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "stock_value_fits", skip_on_field_errors = true))]
pub struct PartRequest {
    #[serde(default)]
    #[validate(length(max = 64))]
    pub serial_number: Option<String>,
    #[serde(default)]
    #[validate(
        length(min = 1, max = 64, message = "Part number must be 1 to 64 characters"),
        custom(function = "non_blank", message = "Part number is required")
    )]
    #[schema(example = "BRK-100")]
    pub part_no: String,
    #[serde(default)]
    #[validate(length(max = 32))]
    pub hsn_sac: Option<String>,
    #[serde(default)]
    #[validate(length(max = 128))]
    #[schema(example = "Swift Dzire")]
    pub vehicle: Option<String>,
    #[serde(default)]
    #[schema(example = "Front brake pad set")]
    pub part_description: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0, max = 1_000_000, message = "Quantity must be between 0 and 1000000"))]
    #[schema(example = 10)]
    pub qty: i32,
    #[serde(default)]
    #[validate(custom(function = "unit_price"))]
    pub mrp: Decimal,
    #[serde(default)]
    #[validate(custom(function = "unit_price"))]
    #[schema(example = "400.00")]
    pub rate: Decimal,
    /// Stock value; `qty * rate` when omitted.
    #[serde(default)]
    #[validate(custom(function = "money"))]
    pub value: Option<Decimal>,
    #[serde(default)]
    #[validate(custom(function = "tax_rate"))]
    pub cgst: Decimal,
    #[serde(default)]
    #[validate(custom(function = "tax_rate"))]
    pub sgst: Decimal,
}

fn stock_value(rate: Decimal, qty: i32) -> Decimal {
    rate.saturating_mul(Decimal::from(qty)).round_dp(2)
}

fn stock_value_fits(req: &PartRequest) -> Result<(), ValidationError> {
    if req.value.is_none() && stock_value(req.rate, req.qty) > MAX_AMOUNT {
        let mut err = ValidationError::new("stock_value");
        err.message = Some("qty * rate exceeds the maximum stock value".into());
        return Err(err);
    }
    Ok(())
}

impl PartRequest {
    pub fn into_input(self) -> PartInput {
        let value = self
            .value
            .unwrap_or_else(|| stock_value(self.rate, self.qty));

        PartInput {
            serial_number: self.serial_number,
            part_no: self.part_no.trim().to_string(),
            hsn_sac: self.hsn_sac,
            vehicle: self.vehicle,
            part_description: self.part_description,
            qty: self.qty,
            mrp: self.mrp,
            rate: self.rate,
            value,
            cgst: self.cgst,
            sgst: self.sgst,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PartCreatedResponse {
    #[schema(example = "Part added successfully")]
    pub message: String,
    #[schema(example = 1)]
    pub id: i64,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct PartsQuery {
    /// Case-insensitive part number substring.
    pub part_no: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn value_defaults_to_stock_value() {
        let req: PartRequest =
            serde_json::from_str(r#"{"part_no":"OIL-1","qty":4,"rate":"250.25"}"#).unwrap();
        assert_eq!(req.into_input().value, dec!(1001.00));
    }

    #[test]
    fn explicit_value_is_kept() {
        let req: PartRequest =
            serde_json::from_str(r#"{"part_no":"OIL-1","qty":4,"rate":10,"value":5}"#).unwrap();
        assert_eq!(req.into_input().value, dec!(5));
    }

    #[test]
    fn negative_quantity_is_invalid() {
        let req: PartRequest = serde_json::from_str(r#"{"part_no":"OIL-1","qty":-1}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn missing_part_number_is_invalid() {
        let req: PartRequest = serde_json::from_str(r#"{"qty":1}"#).unwrap();
        assert!(req.validate().is_err());
    }

    fn request(json: &str) -> PartRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn blank_or_long_part_number_is_invalid() {
        assert!(request(r#"{"part_no":"   ","qty":1}"#).validate().is_err());

        let long = format!(r#"{{"part_no":"{}","qty":1}}"#, "X".repeat(65));
        let errors = request(&long).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("part_no"));
    }

    #[test]
    fn prices_and_taxes_are_bounded() {
        assert!(request(r#"{"part_no":"OIL-1","rate":-1}"#).validate().is_err());
        assert!(request(r#"{"part_no":"OIL-1","rate":"99999999999"}"#).validate().is_err());
        assert!(request(r#"{"part_no":"OIL-1","cgst":1000}"#).validate().is_err());
        assert!(request(r#"{"part_no":"OIL-1","value":-5}"#).validate().is_err());
    }

    #[test]
    fn stock_value_must_fit_the_money_column() {
        let req = request(r#"{"part_no":"OIL-1","qty":1000000,"rate":"999999.99"}"#);
        let errors = req.validate().unwrap_err();
        assert!(errors.errors().contains_key("__all__"));

        let ok = request(r#"{"part_no":"OIL-1","qty":1000000,"rate":"999999.99","value":1}"#);
        assert!(ok.validate().is_ok());
    }
}

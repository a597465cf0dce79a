use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::customer::{CustomerDetailsDto, SelectedPartDto};
use super::limits::money;
use crate::models::{CreateEstimate, DocumentType, Estimate, InvoiceLine};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceEstimateRequest {
    #[validate(nested)]
    pub customer_details: CustomerDetailsDto,
    #[serde(default)]
    #[validate(nested)]
    pub selected_parts: Vec<SelectedPartDto>,
    /// Computed from the lines when omitted.
    #[serde(default)]
    #[validate(custom(function = "money"))]
    pub total_due: Option<Decimal>,
    #[serde(default)]
    pub document_type: Option<DocumentType>,
}

impl ServiceEstimateRequest {
    pub fn into_model(self) -> CreateEstimate {
        CreateEstimate {
            document_type: self.document_type.unwrap_or_default(),
            customer: self.customer_details.into_model(),
            lines: self.selected_parts.into_iter().map(InvoiceLine::from).collect(),
            total_amount: self.total_due,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveEstimateResponse {
    #[schema(example = "Estimate saved successfully")]
    pub message: String,
    pub estimate_id: i64,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct EstimateSearchQuery {
    pub name: Option<String>,
    /// `estimate` or `invoice`.
    pub document_type: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LatestEstimateIdResponse {
    pub estimate_id: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConvertEstimateResponse {
    #[schema(example = "Estimate converted to invoice")]
    pub message: String,
    pub estimate: Estimate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_type_defaults_to_estimate() {
        let req: ServiceEstimateRequest =
            serde_json::from_str(r#"{"customerDetails":{"name":"Ravi"}}"#).unwrap();
        assert_eq!(req.into_model().document_type, DocumentType::Estimate);
    }

    #[test]
    fn explicit_invoice_type_is_kept() {
        let req: ServiceEstimateRequest = serde_json::from_str(
            r#"{"customerDetails":{"name":"Ravi"},"documentType":"invoice","totalDue":"99.50"}"#,
        )
        .unwrap();
        let model = req.into_model();
        assert_eq!(model.document_type, DocumentType::Invoice);
        assert_eq!(model.total_amount, Some(Decimal::new(9950, 2)));
    }

    #[test]
    fn oversized_total_is_invalid() {
        let req: ServiceEstimateRequest = serde_json::from_str(
            r#"{"customerDetails":{"name":"Ravi"},"totalDue":"99999999999"}"#,
        )
        .unwrap();
        assert!(req.validate().is_err());
    }
}

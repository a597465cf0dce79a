use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Deserialize, IntoParams)]
pub struct CustomersQuery {
    /// `tax` (default) or `labour`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStatusRequest {
    /// `Pending`, `Paid` or `Completed`.
    #[schema(example = "Paid")]
    pub status: String,
    /// `tax` (default), `labour` or `estimate`.
    #[serde(default)]
    #[schema(example = "tax")]
    pub invoice_type: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
pub struct DocumentTypeSelector {
    #[serde(default)]
    pub invoice_type: Option<String>,
}

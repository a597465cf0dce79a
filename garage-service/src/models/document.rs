//! Status and kind shared by every billing document.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Payment/progress status of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum DocumentStatus {
    Pending,
    Paid,
    Completed,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Pending => "Pending",
            DocumentStatus::Paid => "Paid",
            DocumentStatus::Completed => "Completed",
        }
    }

    /// Strict parse; unknown values are rejected rather than defaulted.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Pending" => Some(DocumentStatus::Pending),
            "Paid" => Some(DocumentStatus::Paid),
            "Completed" => Some(DocumentStatus::Completed),
            _ => None,
        }
    }
}

/// Which family of document a customer-facing operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    #[default]
    Tax,
    Labour,
    Estimate,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Tax => "tax",
            DocumentKind::Labour => "labour",
            DocumentKind::Estimate => "estimate",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "tax" => Some(DocumentKind::Tax),
            "labour" => Some(DocumentKind::Labour),
            "estimate" => Some(DocumentKind::Estimate),
            _ => None,
        }
    }

    /// Header table and its primary key column.
    pub fn header_table(&self) -> (&'static str, &'static str) {
        match self {
            DocumentKind::Tax => ("invoices", "invoice_id"),
            DocumentKind::Labour => ("labour_invoices", "id"),
            DocumentKind::Estimate => ("estimates", "estimate_id"),
        }
    }
}

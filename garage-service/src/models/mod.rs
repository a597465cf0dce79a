//! Domain models for garage-service.

mod dashboard;
mod document;
mod estimate;
mod invoice;
mod labour;
mod part;
mod totals;
mod user;

pub use dashboard::{CustomerRow, DashboardStats, DocumentStat, InvoiceStats};
pub use document::{DocumentKind, DocumentStatus};
pub use estimate::{CreateEstimate, DocumentType, Estimate, EstimatePart, EstimateWithParts};
pub use invoice::{
    CreateServiceInvoice, CreateTaxInvoice, CustomerDetails, Invoice, InvoiceLine, InvoicePart,
    InvoiceSummary, InvoiceWithParts, SavedTaxInvoice, ServiceInvoice, UpsertInvoiceSummary,
};
pub use labour::{
    CreateLabourInvoice, LabourInvoice, LabourInvoiceItem, LabourInvoiceSummary,
    LabourInvoiceWithItems, LabourItem, SavedLabourInvoice, UpsertLabourSummary,
};
pub use part::{Part, PartInput, Product, SuitableVehicle};
pub use totals::{labour_totals, tax_totals, LabourAmounts, LineAmounts, Totals, MAX_AMOUNT};
pub use user::{SanitizedUser, User};

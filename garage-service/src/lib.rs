pub mod config;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;
pub mod utils;

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health_check,
        handlers::health::readiness_check,
        handlers::health::metrics_handler,
        handlers::auth::signup,
        handlers::auth::login,
        handlers::auth::current_user,
        handlers::parts::list_parts,
        handlers::parts::get_part,
        handlers::parts::create_part,
        handlers::parts::update_part,
        handlers::parts::delete_part,
        handlers::parts::list_models,
        handlers::parts::list_parts_by_model,
        handlers::parts::list_products,
        handlers::parts::get_product,
        handlers::invoices::save_invoice,
        handlers::invoices::get_invoice,
        handlers::invoices::save_service_invoice,
        handlers::invoices::save_invoice_summary,
        handlers::invoices::list_invoice_summaries,
        handlers::invoices::latest_invoice_id,
        handlers::invoices::customer_total,
        handlers::invoices::invoices_details,
        handlers::invoices::search_invoices,
        handlers::estimates::save_estimate,
        handlers::estimates::search_estimates,
        handlers::estimates::get_estimate,
        handlers::estimates::latest_estimate_id,
        handlers::estimates::convert_estimate,
        handlers::labour::save_labour_invoice,
        handlers::labour::save_labour_summary,
        handlers::labour::search_labour_invoices,
        handlers::labour::latest_labour_invoice_id,
        handlers::documents::list_customers,
        handlers::documents::update_status,
        handlers::documents::delete_invoice,
        handlers::dashboard::dashboard_stats,
        handlers::dashboard::invoice_stats,
    ),
    components(
        schemas(
            dtos::ErrorResponse,
            dtos::MessageResponse,
            dtos::HealthResponse,
            dtos::auth::SignupRequest,
            dtos::auth::SignupResponse,
            dtos::auth::LoginRequest,
            dtos::auth::LoginResponse,
            dtos::customer::CustomerDetailsDto,
            dtos::customer::SelectedPartDto,
            dtos::parts::PartRequest,
            dtos::parts::PartCreatedResponse,
            dtos::invoices::SaveInvoiceRequest,
            dtos::invoices::SaveInvoiceResponse,
            dtos::invoices::ServiceInvoiceRequest,
            dtos::invoices::ServiceInvoiceResponse,
            dtos::invoices::InvoiceSummaryRequest,
            dtos::invoices::LatestInvoiceIdResponse,
            dtos::invoices::CustomerTotalResponse,
            dtos::estimates::ServiceEstimateRequest,
            dtos::estimates::SaveEstimateResponse,
            dtos::estimates::LatestEstimateIdResponse,
            dtos::estimates::ConvertEstimateResponse,
            dtos::labour::LabourItemDto,
            dtos::labour::SaveLabourInvoiceRequest,
            dtos::labour::SaveLabourInvoiceResponse,
            dtos::labour::LabourSummaryRequest,
            dtos::labour::LabourSummaryResponse,
            dtos::documents::UpdateStatusRequest,
            dtos::documents::DocumentTypeSelector,
            models::SanitizedUser,
            models::Part,
            models::Product,
            models::SuitableVehicle,
            models::Invoice,
            models::InvoicePart,
            models::InvoiceSummary,
            models::InvoiceWithParts,
            models::Totals,
            models::Estimate,
            models::EstimatePart,
            models::EstimateWithParts,
            models::DocumentType,
            models::LabourInvoice,
            models::LabourInvoiceItem,
            models::LabourInvoiceSummary,
            models::LabourInvoiceWithItems,
            models::CustomerRow,
            models::DashboardStats,
            models::DocumentStat,
            models::InvoiceStats,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Observability", description = "Health and metrics"),
        (name = "Authentication", description = "Signup, login and current user"),
        (name = "Parts", description = "Parts inventory and catalogue"),
        (name = "Tax invoices", description = "Stock-decrementing tax invoices"),
        (name = "Estimates", description = "Quotations"),
        (name = "Labour invoices", description = "Labour-only invoices"),
        (name = "Documents", description = "Customer lists, status and deletion"),
        (name = "Dashboard", description = "Aggregate statistics")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

//! Application startup and lifecycle management.

use crate::config::GarageConfig;
use crate::handlers;
use crate::middleware::auth_middleware;
use crate::services::{init_metrics, Database, JwtService};
use crate::ApiDoc;
use axum::{
    http::{header, HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post, put},
    Json, Router,
};
use secrecy::ExposeSecret;
use service_core::error::AppError;
use service_core::middleware::metrics::metrics_middleware;
use service_core::middleware::security_headers::security_headers_middleware;
use service_core::middleware::tracing::{make_request_span, request_id_middleware, REQUEST_ID_HEADER};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GarageConfig>,
    pub db: Database,
    pub jwt: JwtService,
}

/// Business routes: parts, billing documents and dashboard.
fn business_routes() -> Router<AppState> {
    Router::new()
        // Parts
        .route(
            "/parts",
            get(handlers::parts::list_parts).post(handlers::parts::create_part),
        )
        .route(
            "/parts/:id",
            get(handlers::parts::get_part)
                .put(handlers::parts::update_part)
                .delete(handlers::parts::delete_part),
        )
        .route("/models", get(handlers::parts::list_models))
        .route("/models/:model/parts", get(handlers::parts::list_parts_by_model))
        .route("/products", get(handlers::parts::list_products))
        .route("/products/:id", get(handlers::parts::get_product))
        // Tax invoices
        .route("/save-invoice", post(handlers::invoices::save_invoice))
        .route("/invoice/:invoice_id", get(handlers::invoices::get_invoice))
        .route("/service-invoice", post(handlers::invoices::save_service_invoice))
        .route(
            "/invoice-summary",
            get(handlers::invoices::list_invoice_summaries)
                .post(handlers::invoices::save_invoice_summary),
        )
        .route("/latest-invoice-id", get(handlers::invoices::latest_invoice_id))
        .route(
            "/customer-total/:customer_name",
            get(handlers::invoices::customer_total),
        )
        .route("/invoices-details", get(handlers::invoices::invoices_details))
        .route("/search-invoices", get(handlers::invoices::search_invoices))
        // Estimates
        .route("/service-estimate", post(handlers::estimates::save_estimate))
        .route("/search-estimates", get(handlers::estimates::search_estimates))
        .route("/estimate/:id", get(handlers::estimates::get_estimate))
        .route("/estimate/:id/convert", post(handlers::estimates::convert_estimate))
        .route("/latest-estimate-id", get(handlers::estimates::latest_estimate_id))
        // Labour invoices
        .route("/save-labour-invoice", post(handlers::labour::save_labour_invoice))
        .route(
            "/labour-invoice-summary",
            post(handlers::labour::save_labour_summary),
        )
        .route(
            "/search-labour-invoices",
            get(handlers::labour::search_labour_invoices),
        )
        .route(
            "/latest-labour-invoice-id",
            get(handlers::labour::latest_labour_invoice_id),
        )
        // Customers and document maintenance
        .route("/customers", get(handlers::documents::list_customers))
        .route("/update-status/:id", put(handlers::documents::update_status))
        .route("/delete-invoice/:id", delete(handlers::documents::delete_invoice))
        // Dashboard
        .route("/api/dashboard-stats", get(handlers::dashboard::dashboard_stats))
        .route("/invoice-stats", get(handlers::dashboard::invoice_stats))
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins = if allowed_origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(allowed_origins.iter().filter_map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|e| tracing::error!(origin = %origin, error = %e, "Ignoring invalid CORS origin"))
                .ok()
        }))
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}

/// Build the full HTTP router for the given state.
pub fn build_router(state: AppState) -> Router {
    let mut app = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .route("/metrics", get(handlers::health::metrics_handler))
        .route("/signup", post(handlers::auth::signup))
        .route("/login", post(handlers::auth::login))
        .merge(
            Router::new()
                .route("/user", get(handlers::auth::current_user))
                .layer(from_fn_with_state(state.clone(), auth_middleware)),
        );

    let business = business_routes();
    app = if state.config.security.require_auth {
        app.merge(business.layer(from_fn_with_state(state.clone(), auth_middleware)))
    } else {
        app.merge(business)
    };

    if state.config.swagger_enabled() {
        app = app.merge(
            SwaggerUi::new("/docs").url("/.well-known/openapi.json", ApiDoc::openapi()),
        );
    } else {
        app = app.route(
            "/.well-known/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        );
    }

    app.with_state(state.clone())
        .layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(cors_layer(&state.config.security.allowed_origins))
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: GarageConfig) -> Result<Self, AppError> {
        Self::build_internal(config, true).await
    }

    /// Build the application without running migrations.
    pub async fn build_without_migrations(config: GarageConfig) -> Result<Self, AppError> {
        Self::build_internal(config, false).await
    }

    async fn build_internal(config: GarageConfig, run_migrations: bool) -> Result<Self, AppError> {
        init_metrics();

        let db = Database::new(
            config.database.url.expose_secret(),
            config.database.max_connections,
            config.database.min_connections,
        )
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to connect to PostgreSQL");
            e
        })?;

        if run_migrations {
            db.run_migrations().await.map_err(|e| {
                tracing::error!(error = %e, "Failed to run migrations");
                e
            })?;
        }

        let addr = config.common.socket_addr();
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!(error = %e, addr = %addr, "Failed to bind HTTP listener");
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(port, "Garage service listener bound");

        let state = AppState {
            jwt: JwtService::new(&config.jwt),
            config: Arc::new(config),
            db,
        };

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn db(&self) -> &Database {
        &self.state.db
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state.clone());

        tracing::info!(
            service = %self.state.config.service_name,
            version = %self.state.config.service_version,
            port = self.port,
            require_auth = self.state.config.security.require_auth,
            "Service ready to accept connections"
        );

        axum::serve(self.listener, router).await.map_err(|e| {
            tracing::error!(error = %e, "HTTP server error");
            std::io::Error::other(format!("HTTP server error: {}", e))
        })
    }
}

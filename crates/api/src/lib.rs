//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes for financial reports and companies
//! - Authentication middleware
//! - Request extractors
//! - Error to response mapping

pub mod error;
pub mod middleware;
pub mod routes;

use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use bizdir_core::companies::CompanyRepository;
use bizdir_core::reports::{FinancialReportRepository, FinancialReportService};
use bizdir_shared::JwtService;

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Financial report service.
    pub reports: Arc<FinancialReportService>,
    /// Company storage, used for ownership checks.
    pub companies: Arc<dyn CompanyRepository>,
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
}

impl AppState {
    /// Builds the state from repository implementations.
    #[must_use]
    pub fn new(
        reports: Arc<dyn FinancialReportRepository>,
        companies: Arc<dyn CompanyRepository>,
        jwt_service: JwtService,
    ) -> Self {
        Self {
            reports: Arc::new(FinancialReportService::new(reports)),
            companies,
            jwt_service: Arc::new(jwt_service),
        }
    }

    /// Caps how many quarters a single financials query may span.
    #[must_use]
    pub fn with_max_period_quarters(mut self, max: usize) -> Self {
        let reports = (*self.reports).clone().with_max_period_quarters(max);
        self.reports = Arc::new(reports);
        self
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

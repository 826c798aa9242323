//! Financial report routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::companies::require_owner;
use crate::{ApiError, AppState, middleware::AuthUser};
use bizdir_core::fiscal::Period;
use bizdir_core::reports::{
    FinancialReport, FinancialReportChanges, NewFinancialReport, ReportCollection,
};
use bizdir_shared::types::{CompanyId, FinancialReportId};

/// Creates the public report routes.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/companies/{company_id}/financials",
            get(get_company_financials),
        )
        .route("/financials/{report_id}", get(get_report))
}

/// Creates the report routes (requires auth middleware to be applied externally).
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/companies/{company_id}/financials", post(create_report))
        .route(
            "/financials/{report_id}",
            put(update_report).delete(delete_report),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating a financial report.
#[derive(Debug, Deserialize)]
pub struct CreateReportRequest {
    /// Revenue for the quarter.
    pub revenue: Decimal,
    /// Costs for the quarter.
    pub costs: Decimal,
    /// Calendar year.
    pub year: i32,
    /// Quarter within the year (1-4).
    pub quarter: u8,
}

/// A company's reports over a period with derived totals.
#[derive(Debug, Serialize)]
pub struct CompanyFinancialsResponse {
    /// Company the reports belong to.
    pub company_id: CompanyId,
    /// Requested period.
    pub period: Period,
    /// Total revenue.
    pub revenue: Decimal,
    /// Total costs.
    pub costs: Decimal,
    /// Revenue minus costs.
    pub profit: Decimal,
    /// Reports found, in calendar order.
    pub reports: Vec<FinancialReport>,
}

impl CompanyFinancialsResponse {
    fn new(company_id: CompanyId, collection: ReportCollection) -> Self {
        Self {
            company_id,
            period: collection.period,
            revenue: collection.revenue(),
            costs: collection.costs(),
            profit: collection.profit(),
            reports: collection.reports,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /companies/{company_id}/financials
async fn create_report(
    State(state): State<AppState>,
    user: AuthUser,
    Path(company_id): Path<CompanyId>,
    Json(body): Json<CreateReportRequest>,
) -> Result<(StatusCode, Json<FinancialReport>), ApiError> {
    require_owner(&state, company_id, &user).await?;

    let report = state
        .reports
        .create(NewFinancialReport {
            company_id,
            revenue: body.revenue,
            costs: body.costs,
            year: body.year,
            quarter: body.quarter,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(report)))
}

/// GET /companies/{company_id}/financials?start_year&start_quarter&end_year&end_quarter
async fn get_company_financials(
    State(state): State<AppState>,
    Path(company_id): Path<CompanyId>,
    Query(period): Query<Period>,
) -> Result<Json<CompanyFinancialsResponse>, ApiError> {
    let collection = state.reports.get_by_company(company_id, period).await?;
    Ok(Json(CompanyFinancialsResponse::new(company_id, collection)))
}

/// GET /financials/{report_id}
async fn get_report(
    State(state): State<AppState>,
    Path(report_id): Path<FinancialReportId>,
) -> Result<Json<FinancialReport>, ApiError> {
    Ok(Json(state.reports.get_by_id(report_id).await?))
}

/// PUT /financials/{report_id}
///
/// Fields left out of the body keep their stored value.
async fn update_report(
    State(state): State<AppState>,
    user: AuthUser,
    Path(report_id): Path<FinancialReportId>,
    Json(changes): Json<FinancialReportChanges>,
) -> Result<Json<FinancialReport>, ApiError> {
    let report = state.reports.get_by_id(report_id).await?;
    require_owner(&state, report.company_id, &user).await?;

    state.reports.update(report_id, changes).await?;

    Ok(Json(state.reports.get_by_id(report_id).await?))
}

/// DELETE /financials/{report_id}
async fn delete_report(
    State(state): State<AppState>,
    user: AuthUser,
    Path(report_id): Path<FinancialReportId>,
) -> Result<StatusCode, ApiError> {
    let report = state.reports.get_by_id(report_id).await?;
    require_owner(&state, report.company_id, &user).await?;

    state.reports.delete_by_id(report_id).await?;

    info!(%report_id, user_id = %user.user_id(), "financial report removed");
    Ok(StatusCode::NO_CONTENT)
}

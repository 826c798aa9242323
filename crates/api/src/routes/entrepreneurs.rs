//! Entrepreneur rollups across all of an owner's companies.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::{ApiError, AppState};
use bizdir_core::fiscal::Period;
use bizdir_core::reports::{FinancialReport, ReportError};
use bizdir_shared::types::{CompanyId, UserId};

/// Creates the entrepreneur routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/entrepreneurs/{user_id}/financials",
            get(get_owner_financials),
        )
        .route(
            "/entrepreneurs/{user_id}/most-profitable",
            get(get_most_profitable),
        )
}

/// All reports of an entrepreneur's companies over a period.
#[derive(Debug, Serialize)]
pub struct OwnerFinancialsResponse {
    /// Entrepreneur the rollup was built for.
    pub owner_id: UserId,
    /// Requested period.
    pub period: Period,
    /// Companies included, in rollup order.
    pub companies: Vec<CompanyId>,
    /// Total revenue.
    pub revenue: Decimal,
    /// Total costs.
    pub costs: Decimal,
    /// Revenue minus costs.
    pub profit: Decimal,
    /// Reports grouped by company, each group in calendar order.
    pub reports: Vec<FinancialReport>,
}

/// The entrepreneur's company with the highest profit over a period.
#[derive(Debug, Serialize)]
pub struct MostProfitableResponse {
    /// Winning company, absent when the entrepreneur has none.
    pub company_id: Option<CompanyId>,
    /// Requested period.
    pub period: Period,
    /// Profit of the winning company.
    pub profit: Decimal,
}

async fn owner_company_ids(state: &AppState, owner_id: UserId) -> Result<Vec<CompanyId>, ApiError> {
    let companies = state
        .companies
        .list_by_owner(owner_id)
        .await
        .map_err(ApiError::company)?;

    debug!(%owner_id, companies = companies.len(), "loaded owner companies");
    Ok(companies.into_iter().map(|c| c.id).collect())
}

/// GET /entrepreneurs/{user_id}/financials?start_year&start_quarter&end_year&end_quarter
async fn get_owner_financials(
    State(state): State<AppState>,
    Path(owner_id): Path<UserId>,
    Query(period): Query<Period>,
) -> Result<Json<OwnerFinancialsResponse>, ApiError> {
    period.validate().map_err(ReportError::from)?;

    let companies = owner_company_ids(&state, owner_id).await?;
    let collection = state.reports.get_by_companies(&companies, period).await?;

    Ok(Json(OwnerFinancialsResponse {
        owner_id,
        period,
        companies,
        revenue: collection.revenue(),
        costs: collection.costs(),
        profit: collection.profit(),
        reports: collection.reports,
    }))
}

/// GET /entrepreneurs/{user_id}/most-profitable?start_year&start_quarter&end_year&end_quarter
async fn get_most_profitable(
    State(state): State<AppState>,
    Path(owner_id): Path<UserId>,
    Query(period): Query<Period>,
) -> Result<Json<MostProfitableResponse>, ApiError> {
    period.validate().map_err(ReportError::from)?;

    let companies = owner_company_ids(&state, owner_id).await?;
    let best = state.reports.most_profitable(&companies, period).await?;

    Ok(Json(match best {
        Some((company_id, collection)) => MostProfitableResponse {
            company_id: Some(company_id),
            period,
            profit: collection.profit(),
        },
        None => MostProfitableResponse {
            company_id: None,
            period,
            profit: Decimal::ZERO,
        },
    }))
}

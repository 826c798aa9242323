//! Company routes and ownership checks.

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    routing::delete,
};
use tracing::{info, warn};

use crate::{ApiError, AppState, middleware::AuthUser};
use bizdir_core::companies::Company;
use bizdir_shared::AppError;
use bizdir_shared::types::CompanyId;

/// Creates the company routes (requires auth middleware to be applied externally).
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/companies/{company_id}", delete(delete_company))
}

/// Loads a company and checks that the authenticated user owns it.
pub(crate) async fn require_owner(
    state: &AppState,
    company_id: CompanyId,
    user: &AuthUser,
) -> Result<Company, ApiError> {
    let company = state
        .companies
        .get_by_id(company_id)
        .await
        .map_err(ApiError::company)?;

    if !company.is_owned_by(user.user_id()) {
        warn!(%company_id, user_id = %user.user_id(), "ownership check failed");
        return Err(AppError::Forbidden("you do not own this company".to_string()).into());
    }

    Ok(company)
}

/// DELETE /companies/{company_id}
///
/// Deletes the company together with all of its financial reports.
async fn delete_company(
    State(state): State<AppState>,
    user: AuthUser,
    Path(company_id): Path<CompanyId>,
) -> Result<StatusCode, ApiError> {
    require_owner(&state, company_id, &user).await?;

    state
        .companies
        .delete_with_reports(company_id)
        .await
        .map_err(ApiError::company)?;

    info!(%company_id, user_id = %user.user_id(), "company deleted");
    Ok(StatusCode::NO_CONTENT)
}

//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth_middleware};

pub mod companies;
pub mod entrepreneurs;
pub mod health;
pub mod reports;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Mutations require an authenticated entrepreneur
    let protected_routes = Router::new()
        .merge(reports::protected_routes())
        .merge(companies::protected_routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(reports::public_routes())
        .merge(entrepreneurs::routes())
        .merge(protected_routes)
}

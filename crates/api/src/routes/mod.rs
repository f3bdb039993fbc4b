//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod boarding_houses;
pub mod coa;
pub mod health;
pub mod reconciliations;
pub mod reports;
pub mod transactions;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(boarding_houses::routes())
        .merge(coa::routes())
        .merge(transactions::routes())
        .merge(reports::routes())
        .merge(reconciliations::routes())
}

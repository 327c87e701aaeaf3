//! Route definitions.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;

use super::handlers::{self, AppState};
use crate::service::ExchangeRateService;

/// Prefix the rate endpoints are additionally mounted under.
pub const API_PREFIX: &str = "/api/exchangerate";

pub fn create_router(service: Arc<ExchangeRateService>) -> Router {
    let state = Arc::new(AppState { service });

    let rates = Router::new()
        .route("/currencies", get(handlers::currencies))
        .route("/rates", get(handlers::rates))
        .route("/rates/date", get(handlers::rates_by_date))
        .route("/rates/latest", get(handlers::latest_rates));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/openapi.json", get(handlers::openapi))
        .merge(rates.clone())
        .nest(API_PREFIX, rates)
        .with_state(state)
}

//! Request handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::core::{ExchangeRate, RatesError};
use crate::service::ExchangeRateService;

/// Application state.
pub struct AppState {
    pub service: Arc<ExchangeRateService>,
}

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    version: String,
}

/// Error response.
#[derive(Serialize)]
pub struct ErrorResponse {
    error: String,
}

impl IntoResponse for RatesError {
    fn into_response(self) -> Response {
        let status = match &self {
            RatesError::Validation(_) => StatusCode::BAD_REQUEST,
            e if e.is_upstream_error() => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_client_error() {
            warn!(error = %self, "Rejected request");
        } else {
            error!(error = %self, "Rate request failed");
        }

        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Query parameters for the rate series.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatesQuery {
    pub currency_code: Option<String>,
    pub dt_start: Option<String>,
    pub dt_end: Option<String>,
}

/// Query parameters for a single effective date.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatesByDateQuery {
    pub currency_code: Option<String>,
    pub dt_eff: Option<String>,
}

/// Query parameters for the latest snapshot.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestRatesQuery {
    pub currency_code: Option<String>,
}

/// Health check handler.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// OpenAPI description of this service.
pub async fn openapi() -> Json<serde_json::Value> {
    Json(super::openapi::openapi_document())
}

/// List every currency code the ECB publishes.
pub async fn currencies(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<String>>, RatesError> {
    state.service.currencies().await.map(Json)
}

/// Rates for a base currency, optionally bounded by `dtStart` and `dtEnd`.
pub async fn rates(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RatesQuery>,
) -> Result<Json<Vec<ExchangeRate>>, RatesError> {
    let currency_code = required_currency(query.currency_code.as_deref())?;
    let start = optional_date("dtStart", query.dt_start.as_deref())?;
    let end = optional_date("dtEnd", query.dt_end.as_deref())?;

    state
        .service
        .rates(currency_code, start, end)
        .await
        .map(Json)
}

/// Rates for a base currency on the effective date `dtEff`.
pub async fn rates_by_date(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RatesByDateQuery>,
) -> Result<Json<Vec<ExchangeRate>>, RatesError> {
    let currency_code = required_currency(query.currency_code.as_deref())?;
    let dt_eff = optional_date("dtEff", query.dt_eff.as_deref())?
        .ok_or_else(|| RatesError::Validation("Effective date (dtEff) is required".to_string()))?;

    state
        .service
        .rates_on(currency_code, dt_eff)
        .await
        .map(Json)
}

/// Most recent snapshot for a base currency.
pub async fn latest_rates(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LatestRatesQuery>,
) -> Result<Json<Vec<ExchangeRate>>, RatesError> {
    let currency_code = required_currency(query.currency_code.as_deref())?;
    state.service.latest_rates(currency_code).await.map(Json)
}

fn required_currency(value: Option<&str>) -> Result<&str, RatesError> {
    crate::service::validate_currency_code(value.unwrap_or_default())
}

/// Parses a query date, accepting `YYYY-MM-DD` or an ISO date-time whose
/// date part is kept. Blank values count as absent.
fn optional_date(name: &str, value: Option<&str>) -> Result<Option<NaiveDate>, RatesError> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| value.parse::<NaiveDateTime>().map(|dt| dt.date()))
        .map(Some)
        .map_err(|_| {
            RatesError::Validation(format!(
                "Invalid {name} '{value}', expected a date like 2024-01-31"
            ))
        })
}

// HTTP surface: hotel search and health check
use crate::hotel_service::{HotelService, NormalizedPrice, SearchError, SearchResult};
use crate::validation::{validate_search, HotelSearchQuery, ValidationError};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

pub const SUPPLIER_CONFIG_HEADER: &str = "x-liteapi-supplier-config";

#[derive(Clone)]
pub struct AppState {
    pub hotel_service: Arc<dyn HotelService>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/hotels", get(search_hotels))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct HotelPriceResponse {
    pub data: Vec<NormalizedPrice>,
    pub supplier: SupplierAudit,
}

#[derive(Debug, Serialize)]
pub struct SupplierAudit {
    pub request: String,
    pub response: String,
}

impl From<SearchResult> for HotelPriceResponse {
    fn from(result: SearchResult) -> Self {
        HotelPriceResponse {
            data: result.prices,
            supplier: SupplierAudit {
                request: result.supplier_request,
                response: result.supplier_response,
            },
        }
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{}", .0.body_text())]
    Query(#[from] QueryRejection),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Search(#[from] SearchError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Query(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Search(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        message: "healthy".to_string(),
    })
}

pub async fn search_hotels(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<HotelSearchQuery>, QueryRejection>,
) -> Result<Json<HotelPriceResponse>, ApiError> {
    let Query(query) = query.map_err(|e| {
        info!(reason = %e.body_text(), "rejected hotel search query");
        e
    })?;
    let supplier_config = headers
        .get(SUPPLIER_CONFIG_HEADER)
        .and_then(|value| value.to_str().ok());

    let params = validate_search(&query, supplier_config, Utc::now().date_naive()).map_err(|e| {
        info!(reason = %e, "rejected hotel search");
        e
    })?;

    let result = state
        .hotel_service
        .search_hotels(params)
        .await
        .map_err(|e| {
            error!(error = %e, "hotel search failed");
            e
        })?;

    Ok(Json(result.into()))
}

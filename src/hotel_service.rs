// Hotel price search: builds the supplier request, normalizes the supplier
// response into per-hotel prices in the requested currency.

use crate::currency::{ConversionError, CurrencyConverter};
use crate::supplier::{
    HotelsFilter, Occupancy, RateError, Stay, SupplierRequest, SupplierResponse,
};
use crate::supplier_client::{ClientError, SupplierClient};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("failed to marshal supplier request: {0}")]
    Marshal(serde_json::Error),

    #[error("supplier request failed: {0}")]
    Supplier(#[from] ClientError),

    #[error("failed to unmarshal supplier response: {0}")]
    Unmarshal(serde_json::Error),

    #[error("failed to parse MinRate for hotel {hotel_code}: {source}")]
    InvalidRate {
        hotel_code: String,
        source: RateError,
    },

    #[error("failed to convert price for hotel {hotel_code}: {source}")]
    Conversion {
        hotel_code: String,
        source: ConversionError,
    },
}

// Validated search input
#[derive(Debug, Clone, PartialEq)]
pub struct SearchParams {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub hotel_ids: Vec<u64>,
    pub currency: String,
    pub occupancies: Vec<Occupancy>,
    // Opaque caller token selecting the integration, forwarded as-is
    pub supplier_config: String,
}

impl From<&SearchParams> for SupplierRequest {
    fn from(params: &SearchParams) -> Self {
        SupplierRequest {
            stay: Stay {
                check_in: params.check_in.format("%Y-%m-%d").to_string(),
                check_out: params.check_out.format("%Y-%m-%d").to_string(),
            },
            occupancies: params.occupancies.clone(),
            hotels: HotelsFilter {
                hotel: params.hotel_ids.clone(),
            },
        }
    }
}

/// A hotel price expressed in the requested currency.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedPrice {
    pub hotel_id: String,
    pub currency: String,
    pub price: f64,
}

#[derive(Debug, Clone)]
pub struct SearchResult {
    pub prices: Vec<NormalizedPrice>,
    // Verbatim supplier payloads, kept for auditing
    pub supplier_request: String,
    pub supplier_response: String,
}

// Hotel search trait
#[async_trait]
pub trait HotelService: Send + Sync + 'static {
    async fn search_hotels(&self, params: SearchParams) -> Result<SearchResult, SearchError>;
}

pub struct HotelPriceService {
    client: Arc<dyn SupplierClient>,
    converter: Arc<dyn CurrencyConverter>,
}

impl HotelPriceService {
    pub fn new(client: Arc<dyn SupplierClient>, converter: Arc<dyn CurrencyConverter>) -> Self {
        Self { client, converter }
    }

    // One price per supplier hotel, in supplier order. The first bad record
    // fails the whole batch.
    fn normalize(
        &self,
        response: &SupplierResponse,
        currency: &str,
    ) -> Result<Vec<NormalizedPrice>, SearchError> {
        let mut prices = Vec::with_capacity(response.hotels.hotels.len());

        for hotel in &response.hotels.hotels {
            let hotel_code = hotel.code_string();

            let mut price = hotel.price().map_err(|source| SearchError::InvalidRate {
                hotel_code: hotel_code.clone(),
                source,
            })?;

            if hotel.currency != currency {
                price = self
                    .converter
                    .convert(price, &hotel.currency, currency)
                    .map_err(|source| SearchError::Conversion {
                        hotel_code: hotel_code.clone(),
                        source,
                    })?;
            }

            prices.push(NormalizedPrice {
                hotel_id: hotel_code,
                currency: currency.to_string(),
                price,
            });
        }

        Ok(prices)
    }
}

#[async_trait]
impl HotelService for HotelPriceService {
    async fn search_hotels(&self, params: SearchParams) -> Result<SearchResult, SearchError> {
        let request = SupplierRequest::from(&params);
        let supplier_request = serde_json::to_string(&request).map_err(SearchError::Marshal)?;

        info!(
            hotels = params.hotel_ids.len(),
            check_in = %params.check_in,
            check_out = %params.check_out,
            currency = %params.currency,
            "searching supplier"
        );

        let body = self
            .client
            .search(Bytes::from(supplier_request.clone()))
            .await?;

        let response: SupplierResponse =
            serde_json::from_slice(&body).map_err(SearchError::Unmarshal)?;
        debug!(
            records = response.hotels.hotels.len(),
            total = response.hotels.total,
            "supplier response decoded"
        );

        let prices = self.normalize(&response, &params.currency).map_err(|e| {
            warn!(error = %e, "discarding supplier response");
            e
        })?;

        info!(prices = prices.len(), "search complete");

        Ok(SearchResult {
            prices,
            supplier_request,
            supplier_response: String::from_utf8_lossy(&body).into_owned(),
        })
    }
}

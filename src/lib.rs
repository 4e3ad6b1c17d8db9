// Hotel price search service: validates caller queries, searches the signed
// supplier API and returns normalized prices in the requested currency.

pub mod config;
pub mod currency;
pub mod hotel_service;
pub mod routes;
pub mod supplier;
pub mod supplier_client;
pub mod validation;

// Re-export key types for convenience
pub use config::{AppConfig, ConfigError};
pub use currency::{ConversionError, CurrencyConverter, CurrencyService};
pub use hotel_service::{
    HotelPriceService, HotelService, NormalizedPrice, SearchError, SearchParams, SearchResult,
};
pub use routes::{router, AppState};
pub use supplier::{Occupancy, RateError, SupplierHotel, SupplierRequest, SupplierResponse};
pub use supplier_client::{ClientConfig, ClientError, SignedSupplierClient, SupplierClient};
pub use validation::{validate_search, HotelSearchQuery, ValidationError};

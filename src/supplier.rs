use serde::{Deserialize, Serialize};
use std::num::ParseFloatError;
use thiserror::Error;

// Data structures for the supplier search request
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SupplierRequest {
    pub stay: Stay,
    pub occupancies: Vec<Occupancy>,
    pub hotels: HotelsFilter,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stay {
    pub check_in: String,
    pub check_out: String,
}

/// One room configuration. Missing counts decode as zero and unknown keys
/// (e.g. `childrenAges`) are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Occupancy {
    pub rooms: u32,
    pub adults: u32,
    pub children: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HotelsFilter {
    pub hotel: Vec<u64>,
}

// Data structures for the supplier JSON response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SupplierResponse {
    pub hotels: SupplierHotels,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierHotels {
    // Omitted by the supplier when nothing is available
    #[serde(default)]
    pub hotels: Vec<SupplierHotel>,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    #[serde(default)]
    pub total: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierHotel {
    pub code: u64,
    #[serde(default)]
    pub name: String,
    pub min_rate: String,
    pub max_rate: Option<String>,
    pub currency: String,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RateError {
    #[error(transparent)]
    Parse(#[from] ParseFloatError),

    #[error("rate is not a finite number: {0}")]
    NonFinite(String),
}

impl SupplierHotel {
    pub fn code_string(&self) -> String {
        self.code.to_string()
    }

    /// The bookable price of the hotel, taken from its minimum rate.
    pub fn price(&self) -> Result<f64, RateError> {
        let rate = self.min_rate.parse::<f64>()?;
        if !rate.is_finite() {
            return Err(RateError::NonFinite(self.min_rate.clone()));
        }
        Ok(rate)
    }
}

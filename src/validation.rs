// Decoding and validation of the inbound hotel search query
use crate::hotel_service::SearchParams;
use crate::supplier::Occupancy;
use chrono::NaiveDate;
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

// Raw query parameters, exactly as received
#[derive(Debug, Default, Clone, Deserialize)]
pub struct HotelSearchQuery {
    pub checkin: Option<String>,
    pub checkout: Option<String>,
    pub currency: Option<String>,
    #[serde(rename = "guestNationality")]
    pub guest_nationality: Option<String>,
    #[serde(rename = "hotelIds")]
    pub hotel_ids: Option<String>,
    pub occupancies: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    CheckIn,
    CheckOut,
}

impl fmt::Display for DateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateField::CheckIn => write!(f, "check-in"),
            DateField::CheckOut => write!(f, "check-out"),
        }
    }
}

/// A rejected search query. The message is returned to the caller verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingParameter(&'static str),

    #[error("{0} date must be in format YYYY-MM-DD")]
    BadDateFormat(DateField),

    #[error("{0} date must be in the future")]
    DateInPast(DateField),

    #[error("check-out date must be after check-in date")]
    CheckOutNotAfterCheckIn,

    #[error("supplier config is required")]
    MissingSupplierConfig,

    #[error("invalid hotel ID format")]
    InvalidHotelId,

    #[error("invalid occupancies format")]
    InvalidOccupancies,
}

/// Validates a search query against `today`, stopping at the first failure.
pub fn validate_search(
    query: &HotelSearchQuery,
    supplier_config: Option<&str>,
    today: NaiveDate,
) -> Result<SearchParams, ValidationError> {
    let checkin = required(&query.checkin, "checkin")?;
    let checkout = required(&query.checkout, "checkout")?;
    let hotel_ids = required(&query.hotel_ids, "hotelIds")?;
    let occupancies = required(&query.occupancies, "occupancies")?;
    let currency = required(&query.currency, "currency")?;

    let check_in = parse_date(checkin, DateField::CheckIn)?;
    let check_out = parse_date(checkout, DateField::CheckOut)?;

    if check_in < today {
        return Err(ValidationError::DateInPast(DateField::CheckIn));
    }
    if check_out < today {
        return Err(ValidationError::DateInPast(DateField::CheckOut));
    }
    if check_out <= check_in {
        return Err(ValidationError::CheckOutNotAfterCheckIn);
    }

    let supplier_config = match supplier_config {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => return Err(ValidationError::MissingSupplierConfig),
    };

    Ok(SearchParams {
        check_in,
        check_out,
        hotel_ids: parse_hotel_ids(hotel_ids)?,
        currency: currency.to_string(),
        occupancies: parse_occupancies(occupancies)?,
        supplier_config,
    })
}

fn required<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str, ValidationError> {
    match value.as_deref() {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ValidationError::MissingParameter(name)),
    }
}

// Exactly YYYY-MM-DD: zero padded, no sign, no surrounding whitespace
fn parse_date(value: &str, field: DateField) -> Result<NaiveDate, ValidationError> {
    let bytes = value.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && [0..4, 5..7, 8..10]
            .into_iter()
            .all(|range| bytes[range].iter().all(u8::is_ascii_digit));
    if !well_formed {
        return Err(ValidationError::BadDateFormat(field));
    }

    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| ValidationError::BadDateFormat(field))
}

// Comma separated positive integers, e.g. "1234,5678"
pub fn parse_hotel_ids(value: &str) -> Result<Vec<u64>, ValidationError> {
    value
        .split(',')
        .map(|token| match token.parse::<u64>() {
            Ok(id) if id > 0 => Ok(id),
            _ => Err(ValidationError::InvalidHotelId),
        })
        .collect()
}

// JSON array of occupancy objects
pub fn parse_occupancies(value: &str) -> Result<Vec<Occupancy>, ValidationError> {
    serde_json::from_str(value).map_err(|_| ValidationError::InvalidOccupancies)
}

// Currency conversion between ISO 4217 codes
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    #[error("failed to find Currency by code: {0}")]
    UnknownCurrency(String),
}

// Currency converter trait
pub trait CurrencyConverter: Send + Sync + 'static {
    // Convert an amount from the source currency into the target currency
    fn convert(&self, amount: f64, source: &str, target: &str) -> Result<f64, ConversionError>;
}

/// Validates both codes against the ISO 4217 table, then applies the
/// exchange rate between them.
#[derive(Debug, Default, Clone)]
pub struct CurrencyService {}

impl CurrencyService {
    pub fn new() -> Self {
        Self {}
    }

    // No rate provider is wired in yet, every pair converts 1:1
    fn rate(&self, _source: &str, _target: &str) -> f64 {
        1.0
    }
}

impl CurrencyConverter for CurrencyService {
    fn convert(&self, amount: f64, source: &str, target: &str) -> Result<f64, ConversionError> {
        if !is_known_currency(source) {
            return Err(ConversionError::UnknownCurrency(source.to_string()));
        }
        if !is_known_currency(target) {
            return Err(ConversionError::UnknownCurrency(target.to_string()));
        }

        Ok(amount * self.rate(source, target))
    }
}

pub fn is_known_currency(code: &str) -> bool {
    CURRENCY_CODES.binary_search(&code).is_ok()
}

// Active ISO 4217 alphabetic codes, sorted for binary search
const CURRENCY_CODES: &[&str] = &[
    "AED", "AFN", "ALL", "AMD", "ANG", "AOA", "ARS", "AUD", "AWG", "AZN", "BAM", "BBD", "BDT",
    "BGN", "BHD", "BIF", "BMD", "BND", "BOB", "BRL", "BSD", "BTN", "BWP", "BYN", "BZD", "CAD",
    "CDF", "CHF", "CLP", "CNY", "COP", "CRC", "CUP", "CVE", "CZK", "DJF", "DKK", "DOP", "DZD",
    "EGP", "ERN", "ETB", "EUR", "FJD", "FKP", "GBP", "GEL", "GHS", "GIP", "GMD", "GNF", "GTQ",
    "GYD", "HKD", "HNL", "HTG", "HUF", "IDR", "ILS", "INR", "IQD", "IRR", "ISK", "JMD", "JOD",
    "JPY", "KES", "KGS", "KHR", "KMF", "KPW", "KRW", "KWD", "KYD", "KZT", "LAK", "LBP", "LKR",
    "LRD", "LSL", "LYD", "MAD", "MDL", "MGA", "MKD", "MMK", "MNT", "MOP", "MRU", "MUR", "MVR",
    "MWK", "MXN", "MYR", "MZN", "NAD", "NGN", "NIO", "NOK", "NPR", "NZD", "OMR", "PAB", "PEN",
    "PGK", "PHP", "PKR", "PLN", "PYG", "QAR", "RON", "RSD", "RUB", "RWF", "SAR", "SBD", "SCR",
    "SDG", "SEK", "SGD", "SHP", "SLE", "SOS", "SRD", "SSP", "STN", "SVC", "SYP", "SZL", "THB",
    "TJS", "TMT", "TND", "TOP", "TRY", "TTD", "TWD", "TZS", "UAH", "UGX", "USD", "UYU", "UZS",
    "VES", "VND", "VUV", "WST", "XAF", "XCD", "XOF", "XPF", "YER", "ZAR", "ZMW", "ZWL",
];

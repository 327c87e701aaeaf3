//! Exchange rate value types

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Value of one unit of the base currency expressed in `currency_code` on `date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRate {
    pub currency_code: String,
    /// Serialized as an exact JSON number, never through `f64`
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub rate: Decimal,
    pub date: NaiveDate,
}

impl ExchangeRate {
    pub fn new(currency_code: impl Into<String>, rate: Decimal, date: NaiveDate) -> Self {
        Self {
            currency_code: currency_code.into(),
            rate,
            date,
        }
    }
}

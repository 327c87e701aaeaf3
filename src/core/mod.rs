//! Core rate retrieval and conversion logic

pub mod config;
pub mod document;
pub mod error;
pub mod log;
pub mod rate;
pub mod rates;
pub mod source;

// Re-export main types for cleaner imports
pub use error::RatesError;
pub use rate::ExchangeRate;
pub use source::DocumentSource;

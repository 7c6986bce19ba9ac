//! Core business logic abstractions

pub mod config;
pub mod error;
pub mod log;
pub mod rates;

// Re-export main types for cleaner imports
pub use error::{RatesError, RatesResult};
pub use rates::{
    MidRate, QueryMode, RateQuery, RateReport, RateSource, RateValue, RatesRequest, RatesSeries,
    RatesSpan, Table, TradeRate,
};

//! Errors surfaced to callers of the exchange endpoints.

use thiserror::Error;

/// Smallest number of quotations the upstream service will serve.
pub const MIN_QUOTATIONS: i64 = 1;
/// Largest number of quotations the upstream service will serve.
pub const MAX_QUOTATIONS: i64 = 255;

pub const TOO_FEW_QUOTATIONS: &str = "400 BadRequest - Liczba wyników nie może być mniejsza niż 1 / \
     The number of quotations cannot be less than one";

pub const NOT_A_COUNT: &str = "400 BadRequest - Nieprawidłowa liczba wyników / \
     The number of quotations must be a whole number";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RatesError {
    /// The upstream body could not be decoded into a rates series. Carries the
    /// body untouched.
    #[error("{body}")]
    NotFound { body: String },
    #[error("{detail}")]
    BadRequest { detail: String },
}

impl RatesError {
    /// The text exposed to clients as `detail`.
    pub fn detail(&self) -> &str {
        match self {
            RatesError::NotFound { body } => body,
            RatesError::BadRequest { detail } => detail,
        }
    }
}

pub type RatesResult<T> = Result<T, RatesError>;

pub fn not_found_from_upstream(body: impl Into<String>) -> RatesError {
    RatesError::NotFound { body: body.into() }
}

/// Builds the error for a quotation count outside `MIN_QUOTATIONS..=MAX_QUOTATIONS`.
///
/// Counts below one get a fixed message. Counts above the limit mirror whatever
/// the upstream service answered, which is its own "limit exceeded" notice.
pub fn bad_request_from_count(count: i64, body: Option<&str>) -> RatesError {
    let detail = if count < MIN_QUOTATIONS {
        TOO_FEW_QUOTATIONS.to_string()
    } else {
        body.unwrap_or_default().to_string()
    };
    RatesError::BadRequest { detail }
}

pub fn count_in_range(count: i64) -> bool {
    (MIN_QUOTATIONS..=MAX_QUOTATIONS).contains(&count)
}

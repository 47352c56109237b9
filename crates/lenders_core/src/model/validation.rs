//! Field validation shared by all records.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static ISO_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\d{4}-(0[1-9]|1[0-2])-(0[1-9]|[12]\d|3[01])(T([01]\d|2[0-3]):[0-5]\d(:[0-5]\d(\.\d+)?)?(Z|[+-]\d{2}:\d{2})?)?$",
    )
    .expect("valid iso date regex")
});

/// Validation failure for a record about to be written or just loaded.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    EmptyUsername,
    EmptyPassword,
    InvalidDate { field: &'static str, value: String },
    InvalidAmount { field: &'static str, value: f64 },
    LoanToValueOutOfRange(f64),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username cannot be empty"),
            Self::EmptyPassword => write!(f, "password cannot be empty"),
            Self::InvalidDate { field, value } => {
                write!(f, "{field} must be an ISO-8601 date, got `{value}`")
            }
            Self::InvalidAmount { field, value } => {
                write!(f, "{field} must be a non-negative finite amount, got {value}")
            }
            Self::LoanToValueOutOfRange(value) => {
                write!(f, "ltv_percent must be within 0..=100, got {value}")
            }
        }
    }
}

impl Error for ValidationError {}

/// Accepts `YYYY-MM-DD` with an optional time and offset suffix.
pub fn check_iso_date(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if ISO_DATE_RE.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::InvalidDate {
            field,
            value: value.to_string(),
        })
    }
}

pub fn check_amount(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::InvalidAmount { field, value })
    }
}

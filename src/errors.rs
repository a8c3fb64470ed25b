use chrono::NaiveDate;
use thiserror::Error;

use crate::decimal::Money;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    #[error("end date before start date: start {start}, end {end}")]
    InvalidDateRange {
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("scheme not found: {scheme_id}")]
    SchemeNotFound {
        scheme_id: String,
    },

    #[error("calculation failure: {message}")]
    CalculationFailure {
        message: String,
    },

    #[error("invalid amount: {amount}")]
    InvalidAmount {
        amount: Money,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, CalcError>;

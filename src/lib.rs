pub mod accrual;
pub mod calendar;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod interest;
pub mod loan;
pub mod types;

// re-export key types
pub use accrual::{
    fallback_interest, AccrualOrchestrator, AccrualSummary, AccruedInterest, SchemeLookup,
};
pub use config::{ConfigIssue, Scheme, SchemeConfig, SchemeRegistry, DEFAULT_SCHEME_ID};
pub use decimal::{Money, Rate};
pub use errors::{CalcError, Result};
pub use interest::{InterestCalculation, InterestEngine};
pub use loan::{LoanRecord, PaymentRecord};
pub use types::{AccrualMethod, CalculationType, DayThreshold, LoanId};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;

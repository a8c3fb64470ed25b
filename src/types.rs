use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// unique identifier for a loan
pub type LoanId = Uuid;

/// interest calculation strategy carried by a scheme
///
/// unknown identifiers read from storage resolve to `Simple`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CalculationType {
    /// whole months at a monthly rate, surcharge after validity
    Tiered,
    /// partial months discounted through day thresholds
    DayBasisTiered,
    /// annual rate over a 360 day year with a minimum billable period
    DayBasisCompound,
    /// annual rate over a 365 day year
    Simple,
}

impl CalculationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CalculationType::Tiered => "tiered",
            CalculationType::DayBasisTiered => "day_basis_tiered",
            CalculationType::DayBasisCompound => "day_basis_compound",
            CalculationType::Simple => "simple",
        }
    }

    /// parse a stored identifier, anything unrecognised is simple
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "tiered" => CalculationType::Tiered,
            "day_basis_tiered" => CalculationType::DayBasisTiered,
            "day_basis_compound" => CalculationType::DayBasisCompound,
            _ => CalculationType::Simple,
        }
    }
}

impl From<String> for CalculationType {
    fn from(s: String) -> Self {
        CalculationType::parse(&s)
    }
}

impl From<CalculationType> for String {
    fn from(t: CalculationType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for CalculationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// partial month band: a period shorter than `days` counts as `fraction` of a month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayThreshold {
    pub days: u32,
    pub fraction: Decimal,
}

impl DayThreshold {
    pub fn new(days: u32, fraction: Decimal) -> Self {
        Self { days, fraction }
    }
}

/// how an accrued interest figure was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "calculation_type", rename_all = "snake_case")]
pub enum AccrualMethod {
    /// computed by the loan's scheme strategy
    Scheme(CalculationType),
    /// jumping-month approximation after a scheme failure
    Fallback,
    /// evaluation date precedes the accrual start
    NotStarted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculation_type_parse() {
        assert_eq!(CalculationType::parse("tiered"), CalculationType::Tiered);
        assert_eq!(CalculationType::parse(" Day_Basis_Tiered "), CalculationType::DayBasisTiered);
        assert_eq!(CalculationType::parse("day_basis_compound"), CalculationType::DayBasisCompound);
        assert_eq!(CalculationType::parse("flat_rate_v2"), CalculationType::Simple);
    }

    #[test]
    fn test_calculation_type_serde() {
        let t: CalculationType = serde_json::from_str("\"day_basis_compound\"").unwrap();
        assert_eq!(t, CalculationType::DayBasisCompound);

        let unknown: CalculationType = serde_json::from_str("\"legacy\"").unwrap();
        assert_eq!(unknown, CalculationType::Simple);

        assert_eq!(serde_json::to_string(&CalculationType::Tiered).unwrap(), "\"tiered\"");
    }

    #[test]
    fn test_accrual_method_json() {
        let json = serde_json::to_string(&AccrualMethod::Scheme(CalculationType::Tiered)).unwrap();
        assert_eq!(json, r#"{"kind":"scheme","calculation_type":"tiered"}"#);

        let json = serde_json::to_string(&AccrualMethod::Fallback).unwrap();
        assert_eq!(json, r#"{"kind":"fallback"}"#);
    }
}

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::calendar::elapsed_days;
use crate::errors::Result;
use crate::interest::{accrue, AccrualTerms, StrategyOutcome};

/// annual rate on actual days over a 365 day year, no surcharge
pub fn calculate(terms: &AccrualTerms) -> Result<StrategyOutcome> {
    let days = elapsed_days(terms.start, terms.end).max(0);
    let interest = accrue(terms.principal, terms.base_rate, Decimal::from(days))? / dec!(365);

    Ok(StrategyOutcome {
        interest,
        duration: format!("{days} Days"),
        rate_description: format!("{} PA", terms.base_rate),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::{Money, Rate};
    use chrono::NaiveDate;

    fn terms(end: NaiveDate) -> AccrualTerms {
        AccrualTerms {
            principal: dec!(100000),
            start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end,
            base_rate: Rate::from_whole_percent(18),
            surcharge_rate: Rate::from_whole_percent(18),
            validity_months: 12,
        }
    }

    #[test]
    fn test_full_year() {
        let outcome = calculate(&terms(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap())).unwrap();
        assert_eq!(Money::round_whole(outcome.interest), Money::from_major(18_000));
        assert_eq!(outcome.duration, "365 Days");
        assert_eq!(outcome.rate_description, "18% PA");
    }

    #[test]
    fn test_partial_month() {
        let outcome = calculate(&terms(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap())).unwrap();
        // 100000 * 0.18 * 30 / 365 = 1479.45
        assert_eq!(Money::round_whole(outcome.interest), Money::from_major(1_479));
        assert_eq!(outcome.duration, "30 Days");
    }
}

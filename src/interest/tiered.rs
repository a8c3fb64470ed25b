use rust_decimal::Decimal;

use crate::calendar::jumping_months;
use crate::errors::Result;
use crate::interest::{accrue, checked_add, describe_rates, AccrualTerms, StrategyOutcome};

/// whole months at the base rate, surcharge rate for months beyond validity
pub fn calculate(terms: &AccrualTerms) -> Result<StrategyOutcome> {
    let months = jumping_months(terms.start, terms.end);
    let surcharged = months > terms.validity_months;

    let interest = if surcharged {
        let base = accrue(
            terms.principal,
            terms.base_rate,
            Decimal::from(terms.validity_months),
        )?;
        let extra = accrue(
            terms.principal,
            terms.surcharge_rate,
            Decimal::from(months - terms.validity_months),
        )?;
        checked_add(base, extra)?
    } else {
        accrue(terms.principal, terms.base_rate, Decimal::from(months))?
    };

    Ok(StrategyOutcome {
        interest,
        duration: format!("{months} Months"),
        rate_description: describe_rates(
            terms.base_rate,
            terms.surcharge_rate,
            terms.validity_months,
            "per month",
            surcharged,
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Rate;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn terms(start: NaiveDate, end: NaiveDate, validity_months: u32) -> AccrualTerms {
        AccrualTerms {
            principal: dec!(100000),
            start,
            end,
            base_rate: Rate::from_whole_percent(2),
            surcharge_rate: Rate::from_percentage(dec!(2.5)),
            validity_months,
        }
    }

    #[test]
    fn test_nothing_accrues_on_the_start_date() {
        let outcome = calculate(&terms(date(2024, 1, 15), date(2024, 1, 15), 12)).unwrap();
        assert_eq!(outcome.interest, Decimal::ZERO);
        assert_eq!(outcome.duration, "0 Months");
    }

    // follows the day-of-month rollover rule, not the 0-month worked example
    #[test]
    fn test_started_month_counts_whole() {
        // 5 days in, day of month passed
        let outcome = calculate(&terms(date(2024, 1, 15), date(2024, 1, 20), 12)).unwrap();
        assert_eq!(outcome.interest, dec!(2000));
        assert_eq!(outcome.duration, "1 Months");
        assert_eq!(outcome.rate_description, "2% per month");
    }

    #[test]
    fn test_exact_month_boundaries() {
        let outcome = calculate(&terms(date(2024, 1, 15), date(2024, 2, 15), 12)).unwrap();
        assert_eq!(outcome.interest, dec!(2000));

        let outcome = calculate(&terms(date(2024, 1, 15), date(2024, 2, 16), 12)).unwrap();
        assert_eq!(outcome.interest, dec!(4000));
        assert_eq!(outcome.duration, "2 Months");
    }

    #[test]
    fn test_surcharge_after_validity() {
        // three whole months, validity two
        let outcome = calculate(&terms(date(2024, 1, 1), date(2024, 4, 1), 2)).unwrap();
        assert_eq!(outcome.interest, dec!(6500));
        assert_eq!(outcome.duration, "3 Months");
        assert_eq!(
            outcome.rate_description,
            "2% per month for 2 months, 2.5% per month from month 3"
        );

        // one day past the anchor rolls into a fourth month
        let outcome = calculate(&terms(date(2024, 1, 1), date(2024, 4, 2), 2)).unwrap();
        assert_eq!(outcome.interest, dec!(9000));
        assert_eq!(outcome.duration, "4 Months");
    }

    #[test]
    fn test_validity_boundary_uses_base_rate() {
        let outcome = calculate(&terms(date(2024, 1, 1), date(2024, 3, 1), 2)).unwrap();
        assert_eq!(outcome.interest, dec!(4000));
        assert_eq!(outcome.rate_description, "2% per month");
    }
}

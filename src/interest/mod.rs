pub mod day_basis;
pub mod simple;
pub mod tiered;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Scheme;
use crate::decimal::{Money, Rate};
use crate::errors::{CalcError, Result};
use crate::types::CalculationType;

pub use day_basis::{band_fraction, TieredAccumulator};

/// interest calculation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterestCalculation {
    /// whole currency units
    pub total_interest: Money,
    /// duration description, e.g. "7 Months"
    pub total_months: String,
    /// which rate(s) applied and from when
    pub final_interest_rate: String,
    /// principal the interest was computed on
    pub amount: Money,
}

/// fully resolved inputs for a strategy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccrualTerms {
    pub principal: Decimal,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub base_rate: Rate,
    pub surcharge_rate: Rate,
    pub validity_months: u32,
}

/// unrounded strategy output
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyOutcome {
    pub interest: Decimal,
    pub duration: String,
    pub rate_description: String,
}

/// stateless engine computing interest for a scheme
#[derive(Debug, Clone, Copy, Default)]
pub struct InterestEngine;

impl InterestEngine {
    pub fn new() -> Self {
        Self
    }

    /// calculate interest owed between two dates under a scheme
    ///
    /// the rate and validity overrides replace the scheme's own values, the
    /// scheme then only contributes its strategy and banding parameters.
    pub fn calculate(
        &self,
        scheme: &Scheme,
        amount: Money,
        start: NaiveDate,
        end: NaiveDate,
        override_rate: Option<Rate>,
        override_validity_months: Option<u32>,
    ) -> Result<InterestCalculation> {
        if end < start {
            return Err(CalcError::InvalidDateRange { start, end });
        }
        if amount.is_negative() {
            return Err(CalcError::InvalidAmount { amount });
        }

        let config = &scheme.scheme_config;
        let base_rate = override_rate.unwrap_or(scheme.interest_rate);
        let terms = AccrualTerms {
            principal: amount.as_decimal(),
            start,
            end,
            base_rate,
            surcharge_rate: config.surcharge_rate(scheme.calculation_type, base_rate),
            validity_months: override_validity_months.unwrap_or_else(|| config.validity_months()),
        };

        let outcome = match scheme.calculation_type {
            CalculationType::Tiered => tiered::calculate(&terms)?,
            CalculationType::DayBasisTiered => day_basis::calculate_tiered(&terms, config)?,
            CalculationType::DayBasisCompound => day_basis::calculate_compound(&terms, config)?,
            CalculationType::Simple => simple::calculate(&terms)?,
        };

        let total_interest = Money::round_whole(outcome.interest);
        debug!(
            scheme = %scheme.slug,
            strategy = %scheme.calculation_type,
            %total_interest,
            duration = %outcome.duration,
            "interest calculated"
        );

        Ok(InterestCalculation {
            total_interest,
            total_months: outcome.duration,
            final_interest_rate: outcome.rate_description,
            amount,
        })
    }
}

/// principal * rate% * periods, failing instead of panicking on overflow
pub(crate) fn accrue(principal: Decimal, rate: Rate, periods: Decimal) -> Result<Decimal> {
    principal
        .checked_mul(rate.fraction())
        .and_then(|v| v.checked_mul(periods))
        .ok_or_else(|| CalcError::CalculationFailure {
            message: format!("overflow accruing {rate} on {principal} for {periods} periods"),
        })
}

pub(crate) fn checked_add(a: Decimal, b: Decimal) -> Result<Decimal> {
    a.checked_add(b).ok_or_else(|| CalcError::CalculationFailure {
        message: "overflow summing interest".to_string(),
    })
}

/// rate text for a base rate that switches to a surcharge after validity
pub(crate) fn describe_rates(
    base: Rate,
    surcharge: Rate,
    validity_months: u32,
    unit: &str,
    surcharged: bool,
) -> String {
    if surcharged {
        format!(
            "{base} {unit} for {validity_months} months, {surcharge} {unit} from month {}",
            validity_months + 1
        )
    } else {
        format!("{base} {unit}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DayThreshold;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_rejects_reversed_dates() {
        let engine = InterestEngine::new();
        let scheme = Scheme::tiered_monthly("tiered", Rate::from_whole_percent(2), 12);

        let result = engine.calculate(
            &scheme,
            Money::from_major(100_000),
            date(2024, 3, 1),
            date(2024, 2, 1),
            None,
            None,
        );

        assert_eq!(
            result,
            Err(CalcError::InvalidDateRange {
                start: date(2024, 3, 1),
                end: date(2024, 2, 1),
            })
        );
    }

    #[test]
    fn test_rejects_negative_principal() {
        let engine = InterestEngine::new();
        let scheme = Scheme::simple("simple", Rate::from_whole_percent(18));

        let result = engine.calculate(
            &scheme,
            Money::from_major(-1),
            date(2024, 1, 1),
            date(2024, 2, 1),
            None,
            None,
        );
        assert!(matches!(result, Err(CalcError::InvalidAmount { .. })));
    }

    #[test]
    fn test_overrides_replace_scheme_terms() {
        let engine = InterestEngine::new();
        // scheme says 5% for 1 month, the loan was written at 2% for 12
        let scheme = Scheme::tiered_monthly("tiered", Rate::from_whole_percent(5), 1);

        let calc = engine
            .calculate(
                &scheme,
                Money::from_major(100_000),
                date(2024, 1, 15),
                date(2024, 4, 15),
                Some(Rate::from_whole_percent(2)),
                Some(12),
            )
            .unwrap();

        assert_eq!(calc.total_interest, Money::from_major(6_000));
        assert_eq!(calc.total_months, "3 Months");
        assert_eq!(calc.final_interest_rate, "2% per month");
        assert_eq!(calc.amount, Money::from_major(100_000));
    }

    #[test]
    fn test_default_surcharge_follows_override_rate() {
        let engine = InterestEngine::new();
        let scheme = Scheme::tiered_monthly("tiered", Rate::from_whole_percent(5), 1);

        // 2 months at override 2%: 1 month base, 1 month at 2.5%
        let calc = engine
            .calculate(
                &scheme,
                Money::from_major(100_000),
                date(2024, 1, 15),
                date(2024, 3, 15),
                Some(Rate::from_whole_percent(2)),
                None,
            )
            .unwrap();

        assert_eq!(calc.total_interest, Money::from_major(4_500));
    }

    #[test]
    fn test_configured_surcharge_survives_rate_override() {
        let engine = InterestEngine::new();
        let scheme = Scheme::tiered_monthly("tiered", Rate::from_whole_percent(2), 1)
            .with_surcharge(Rate::from_whole_percent(4));

        // 1 month at base, 1 month at the configured 4%
        let calc = engine
            .calculate(&scheme, Money::from_major(100_000), date(2024, 1, 15), date(2024, 3, 15), None, None)
            .unwrap();
        assert_eq!(calc.total_interest, Money::from_major(6_000));
        assert_eq!(calc.final_interest_rate, "2% per month for 1 months, 4% per month from month 2");

        let calc = engine
            .calculate(
                &scheme,
                Money::from_major(100_000),
                date(2024, 1, 15),
                date(2024, 3, 15),
                Some(Rate::from_whole_percent(3)),
                None,
            )
            .unwrap();
        assert_eq!(calc.total_interest, Money::from_major(7_000));
    }

    #[test]
    fn test_configured_min_days() {
        let engine = InterestEngine::new();
        let scheme = Scheme::day_basis_compound("dbc", Rate::from_whole_percent(24), 12).with_min_days(20);

        let calc = engine
            .calculate(&scheme, Money::from_major(100_000), date(2024, 1, 1), date(2024, 1, 5), None, None)
            .unwrap();
        // 100000 * 0.24 * 20 / 360 = 1333.33
        assert_eq!(calc.total_interest, Money::from_major(1_333));
        assert_eq!(calc.total_months, "20 Days (Actual: 4)");
    }

    #[test]
    fn test_every_strategy_returns_whole_units() {
        let engine = InterestEngine::new();
        let principal = Money::from_str_exact("123457.89").unwrap();
        let schemes = [
            Scheme::tiered_monthly("t", Rate::from_percentage(dec!(1.75)), 3),
            Scheme::day_basis_tiered("dbt", Rate::from_percentage(dec!(1.75)), 3),
            Scheme::day_basis_compound("dbc", Rate::from_percentage(dec!(21.5)), 3),
            Scheme::simple("s", Rate::from_percentage(dec!(17.3))),
        ];

        for scheme in &schemes {
            for end in [date(2024, 1, 4), date(2024, 2, 19), date(2024, 9, 23)] {
                let calc = engine
                    .calculate(scheme, principal, date(2024, 1, 1), end, None, None)
                    .unwrap();
                assert!(calc.total_interest.is_whole(), "{} {}", scheme.slug, end);
                assert!(!calc.total_interest.is_negative());
            }
        }
    }

    #[test]
    fn test_calculation_is_idempotent() {
        let engine = InterestEngine::new();
        let scheme = Scheme::day_basis_tiered("dbt", Rate::from_whole_percent(2), 2)
            .with_thresholds(vec![DayThreshold::new(10, dec!(0.5))]);

        let run = || {
            engine.calculate(
                &scheme,
                Money::from_major(75_000),
                date(2023, 11, 20),
                date(2024, 3, 2),
                None,
                None,
            )
        };

        assert_eq!(run(), run());
    }

    #[test]
    fn test_same_day_is_valid_range() {
        let engine = InterestEngine::new();
        let scheme = Scheme::tiered_monthly("tiered", Rate::from_whole_percent(2), 12);
        let calc = engine
            .calculate(
                &scheme,
                Money::from_major(50_000),
                date(2024, 6, 1),
                date(2024, 6, 1),
                None,
                None,
            )
            .unwrap();
        assert!(calc.total_interest.is_zero());
        assert_eq!(calc.total_months, "0 Months");
    }

    #[test]
    fn test_describe_rates() {
        let base = Rate::from_whole_percent(2);
        let surcharge = Rate::from_percentage(dec!(2.5));
        assert_eq!(describe_rates(base, surcharge, 12, "per month", false), "2% per month");
        assert_eq!(
            describe_rates(base, surcharge, 12, "per month", true),
            "2% per month for 12 months, 2.5% per month from month 13"
        );
    }
}

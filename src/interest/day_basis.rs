//! Day-driven strategies: fractional month banding and annual day-count billing.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::warn;

use crate::calendar::{elapsed_days, jumping_months, month_increments, MonthIncrement};
use crate::config::{ConfigIssue, SchemeConfig};
use crate::decimal::Rate;
use crate::errors::{CalcError, Result};
use crate::interest::{accrue, checked_add, describe_rates, AccrualTerms, StrategyOutcome};
use crate::types::DayThreshold;

/// commercial year for annual day-count schemes
const DAYS_PER_YEAR: Decimal = dec!(360);

/// days credited per validity month once the surcharge applies
const DAYS_PER_VALIDITY_MONTH: i64 = 30;

/// month fraction for a period of `days`
///
/// first threshold in the given order with `days < threshold.days` wins,
/// a period matching none counts as a full month
pub fn band_fraction(days: u32, thresholds: &[DayThreshold]) -> Decimal {
    thresholds
        .iter()
        .find(|t| days < t.days)
        .map_or(Decimal::ONE, |t| t.fraction)
}

/// running totals of the month walk
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TieredAccumulator {
    /// fractional months counted so far
    pub months: Decimal,
    pub interest: Decimal,
    /// any increment billed at the surcharge rate
    pub surcharged: bool,
}

impl TieredAccumulator {
    /// fold one increment into the totals
    pub fn apply(
        self,
        increment: &MonthIncrement,
        terms: &AccrualTerms,
        thresholds: &[DayThreshold],
    ) -> Result<Self> {
        let fraction = band_fraction(increment.days, thresholds);
        let months = checked_add(self.months, fraction)?;

        let surcharged = months > Decimal::from(terms.validity_months);
        let rate = if surcharged {
            terms.surcharge_rate
        } else {
            terms.base_rate
        };
        let interest = checked_add(self.interest, accrue(terms.principal, rate, fraction)?)?;

        Ok(Self {
            months,
            interest,
            surcharged: self.surcharged || surcharged,
        })
    }
}

/// monthly rate over calendar-month increments, short periods discounted by thresholds
pub fn calculate_tiered(terms: &AccrualTerms, config: &SchemeConfig) -> Result<StrategyOutcome> {
    check_thresholds(config)?;
    let thresholds = &config.thresholds;

    let totals = month_increments(terms.start, terms.end).try_fold(
        TieredAccumulator::default(),
        |acc, increment| acc.apply(&increment, terms, thresholds),
    )?;

    Ok(StrategyOutcome {
        interest: totals.interest,
        duration: format!("{:.2} Months", totals.months),
        rate_description: describe_rates(
            terms.base_rate,
            terms.surcharge_rate,
            terms.validity_months,
            "per month",
            totals.surcharged,
        ),
    })
}

/// annual rate per day on a 360 day year, with a minimum billable period
pub fn calculate_compound(terms: &AccrualTerms, config: &SchemeConfig) -> Result<StrategyOutcome> {
    let min_days = i64::from(config.min_days());
    let elapsed = elapsed_days(terms.start, terms.end);

    let days_to_use = if elapsed > 0 && elapsed < min_days {
        min_days
    } else {
        elapsed + 1
    };

    // surcharge cutover follows whole months, billing follows days
    let interest_months = jumping_months(terms.start, terms.end);
    let surcharged = interest_months > terms.validity_months;

    let interest = if surcharged {
        let base_days = i64::from(terms.validity_months) * DAYS_PER_VALIDITY_MONTH;
        let extra_days = days_to_use - base_days;

        let base = accrue_days(terms.principal, terms.base_rate, base_days)?;
        if extra_days > 0 {
            let extra = accrue_days(terms.principal, terms.surcharge_rate, extra_days)?;
            checked_add(base, extra)?
        } else {
            base
        }
    } else {
        accrue_days(terms.principal, terms.base_rate, days_to_use)?
    };

    Ok(StrategyOutcome {
        interest,
        duration: format!("{days_to_use} Days (Actual: {elapsed})"),
        rate_description: describe_rates(
            terms.base_rate,
            terms.surcharge_rate,
            terms.validity_months,
            "PA",
            surcharged,
        ),
    })
}

/// interest for a count of days, dividing by the year last to keep precision
fn accrue_days(principal: Decimal, rate: Rate, days: i64) -> Result<Decimal> {
    Ok(accrue(principal, rate, Decimal::from(days))? / DAYS_PER_YEAR)
}

/// reject thresholds that cannot band a period, warn on ones that band oddly
fn check_thresholds(config: &SchemeConfig) -> Result<()> {
    for issue in config.validate() {
        match issue {
            ConfigIssue::UnsortedThresholds => {
                warn!(
                    thresholds = ?config.thresholds,
                    "day thresholds not ascending, first match in stored order applies"
                );
            }
            ConfigIssue::NonPositiveDays { position } => {
                return Err(CalcError::CalculationFailure {
                    message: format!("threshold {position} has zero days"),
                });
            }
            ConfigIssue::FractionOutOfRange { position, fraction } => {
                return Err(CalcError::CalculationFailure {
                    message: format!("threshold {position} fraction {fraction} outside (0, 1]"),
                });
            }
            ConfigIssue::ZeroMinDays => {}
        }
    }
    Ok(())
}

use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::calendar::jumping_months;
use crate::config::{Scheme, SchemeRegistry};
use crate::decimal::Money;
use crate::errors::{CalcError, Result};
use crate::interest::{accrue, InterestCalculation, InterestEngine};
use crate::loan::LoanRecord;
use crate::types::{AccrualMethod, CalculationType, LoanId};

/// source of scheme configuration
pub trait SchemeLookup {
    fn find_scheme(&self, scheme_id: &str) -> Result<&Scheme>;
}

impl SchemeLookup for SchemeRegistry {
    fn find_scheme(&self, scheme_id: &str) -> Result<&Scheme> {
        self.get(scheme_id).ok_or_else(|| CalcError::SchemeNotFound {
            scheme_id: scheme_id.to_string(),
        })
    }
}

impl SchemeLookup for Vec<Scheme> {
    fn find_scheme(&self, scheme_id: &str) -> Result<&Scheme> {
        self.iter()
            .find(|s| s.slug == scheme_id)
            .ok_or_else(|| CalcError::SchemeNotFound {
                scheme_id: scheme_id.to_string(),
            })
    }
}

impl<T: SchemeLookup + ?Sized> SchemeLookup for &T {
    fn find_scheme(&self, scheme_id: &str) -> Result<&Scheme> {
        (**self).find_scheme(scheme_id)
    }
}

/// interest accrued on one loan as of an evaluation date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccruedInterest {
    pub loan_id: LoanId,
    pub loan_number: String,
    pub interest: Money,
    pub duration: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub balance: Money,
    pub rate: String,
    pub method: AccrualMethod,
}

impl AccruedInterest {
    pub fn is_fallback(&self) -> bool {
        self.method == AccrualMethod::Fallback
    }

    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("JSON error: {}", e))
    }

    /// short alias for json output
    pub fn json(&self) -> String {
        self.to_json_pretty()
    }
}

/// accrual figures for a set of loans, for dashboards and reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccrualSummary {
    pub evaluation_date: NaiveDate,
    pub loan_count: usize,
    pub total_balance: Money,
    pub total_interest: Money,
    /// rows computed by the jumping-month fallback
    pub fallback_count: usize,
    pub rows: Vec<AccruedInterest>,
}

/// resolves a loan's accrual window and scheme, never failing
///
/// scheme lookup and strategy errors degrade to the jumping-month
/// fallback so callers always get a figure to show
pub struct AccrualOrchestrator<L: SchemeLookup> {
    engine: InterestEngine,
    schemes: L,
}

impl<L: SchemeLookup> AccrualOrchestrator<L> {
    pub fn new(schemes: L) -> Self {
        Self {
            engine: InterestEngine::new(),
            schemes,
        }
    }

    pub fn schemes(&self) -> &L {
        &self.schemes
    }

    /// interest accrued up to now
    pub fn calculate_accrued_interest(
        &self,
        loan: &LoanRecord,
        time_provider: &SafeTimeProvider,
    ) -> AccruedInterest {
        self.calculate_accrued_interest_at(loan, time_provider.now().date_naive())
    }

    /// interest accrued up to a given date
    pub fn calculate_accrued_interest_at(
        &self,
        loan: &LoanRecord,
        evaluation_date: NaiveDate,
    ) -> AccruedInterest {
        let start_date = loan.accrual_start();

        if evaluation_date < start_date {
            debug!(
                loan_id = %loan.id,
                %start_date,
                %evaluation_date,
                "evaluation date precedes accrual start"
            );
            return AccruedInterest {
                loan_id: loan.id,
                loan_number: loan.loan_number.clone(),
                interest: Money::ZERO,
                duration: "0 Days".to_string(),
                start_date,
                end_date: evaluation_date,
                balance: loan.outstanding_balance(),
                rate: loan.interest_percentage.to_string(),
                method: AccrualMethod::NotStarted,
            };
        }

        match self.scheme_interest(loan, start_date, evaluation_date) {
            Ok((calc, calculation_type)) => AccruedInterest {
                loan_id: loan.id,
                loan_number: loan.loan_number.clone(),
                interest: calc.total_interest,
                duration: calc.total_months,
                start_date,
                end_date: evaluation_date,
                balance: calc.amount,
                rate: calc.final_interest_rate,
                method: AccrualMethod::Scheme(calculation_type),
            },
            Err(err) => {
                match &err {
                    CalcError::SchemeNotFound { scheme_id } => error!(
                        loan_id = %loan.id,
                        loan_number = %loan.loan_number,
                        %scheme_id,
                        "scheme not found, using jumping-month fallback"
                    ),
                    other => warn!(
                        loan_id = %loan.id,
                        loan_number = %loan.loan_number,
                        scheme_id = %loan.scheme_id(),
                        error = %other,
                        "interest calculation failed, using jumping-month fallback"
                    ),
                }
                fallback_interest(loan, start_date, evaluation_date)
            }
        }
    }

    /// accrue every loan as of one date and total the results
    pub fn summarize(&self, loans: &[LoanRecord], evaluation_date: NaiveDate) -> AccrualSummary {
        let rows: Vec<AccruedInterest> = loans
            .iter()
            .map(|loan| self.calculate_accrued_interest_at(loan, evaluation_date))
            .collect();

        let (total_balance, total_interest) = rows
            .iter()
            .fold((Money::ZERO, Money::ZERO), |(balance, interest), row| {
                (balance + row.balance, interest + row.interest)
            });

        AccrualSummary {
            evaluation_date,
            loan_count: rows.len(),
            total_balance,
            total_interest,
            fallback_count: rows.iter().filter(|r| r.is_fallback()).count(),
            rows,
        }
    }

    fn scheme_interest(
        &self,
        loan: &LoanRecord,
        start_date: NaiveDate,
        evaluation_date: NaiveDate,
    ) -> Result<(InterestCalculation, CalculationType)> {
        let scheme = self.schemes.find_scheme(loan.scheme_id())?;

        // loan terms win over the scheme's current rate and validity
        let calc = self.engine.calculate(
            scheme,
            loan.outstanding_balance(),
            start_date,
            evaluation_date,
            Some(loan.interest_percentage),
            Some(loan.validity_months),
        )?;

        Ok((calc, scheme.calculation_type))
    }
}

/// jumping-month approximation: balance * rate * whole months
///
/// a negative (overpaid) balance accrues nothing
pub fn fallback_interest(
    loan: &LoanRecord,
    start_date: NaiveDate,
    evaluation_date: NaiveDate,
) -> AccruedInterest {
    let months = jumping_months(start_date, evaluation_date);
    let balance = loan.outstanding_balance();

    let raw = accrue(
        balance.max(Money::ZERO).as_decimal(),
        loan.interest_percentage,
        Decimal::from(months),
    )
    .unwrap_or_else(|err| {
        error!(loan_id = %loan.id, error = %err, "fallback interest overflowed");
        Decimal::ZERO
    });

    AccruedInterest {
        loan_id: loan.id,
        loan_number: loan.loan_number.clone(),
        interest: Money::round_whole(raw),
        duration: format!("{months} Months (Fallback)"),
        start_date,
        end_date: evaluation_date,
        balance,
        rate: loan.interest_percentage.to_string(),
        method: AccrualMethod::Fallback,
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::DEFAULT_SCHEME_ID;
use crate::decimal::{Money, Rate};
use crate::types::LoanId;

/// a payment recorded against a loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub amount: Money,
    pub payment_date: NaiveDate,
}

/// read-only view of a pledge loan, as much as accrual needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRecord {
    pub id: LoanId,
    pub loan_number: String,
    /// original disbursed amount
    pub amount: Money,
    /// outstanding balance, `None` when balance tracking never started
    pub balance: Option<Money>,
    /// rate the loan was written at
    pub interest_percentage: Rate,
    pub validity_months: u32,
    /// scheme slug stored on the loan
    pub calculation_method: Option<String>,
    pub loan_date: NaiveDate,
    #[serde(default)]
    pub payments: Vec<PaymentRecord>,
}

impl LoanRecord {
    pub fn new(
        loan_number: &str,
        amount: Money,
        interest_percentage: Rate,
        validity_months: u32,
        loan_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            loan_number: loan_number.to_string(),
            amount,
            balance: None,
            interest_percentage,
            validity_months,
            calculation_method: None,
            loan_date,
            payments: Vec::new(),
        }
    }

    pub fn with_balance(mut self, balance: Money) -> Self {
        self.balance = Some(balance);
        self
    }

    pub fn with_scheme(mut self, scheme_id: &str) -> Self {
        self.calculation_method = Some(scheme_id.to_string());
        self
    }

    pub fn with_payment(mut self, amount: Money, payment_date: NaiveDate) -> Self {
        self.payments.push(PaymentRecord {
            amount,
            payment_date,
        });
        self
    }

    /// amount interest accrues on
    pub fn outstanding_balance(&self) -> Money {
        self.balance.unwrap_or(self.amount)
    }

    /// latest payment date, regardless of recording order
    pub fn last_payment_date(&self) -> Option<NaiveDate> {
        self.payments.iter().map(|p| p.payment_date).max()
    }

    /// interest accrues from the last payment, or from disbursement
    pub fn accrual_start(&self) -> NaiveDate {
        self.last_payment_date().unwrap_or(self.loan_date)
    }

    /// stored scheme slug, or the default scheme
    pub fn scheme_id(&self) -> &str {
        self.calculation_method
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SCHEME_ID)
    }
}

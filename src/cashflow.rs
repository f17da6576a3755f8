//! Folds a year of transactions into monthly income and expense totals.

use time::Month;

use crate::{
    money::Money,
    period::MONTHS,
    transaction::{Transaction, TransactionType},
};

/// The income and expense totals for one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyCashflow {
    /// The month the totals belong to.
    pub month: Month,
    /// The sum of all income amounts in the month.
    pub total_income: Money,
    /// The sum of all expense amounts in the month.
    pub total_expense: Money,
}

impl MonthlyCashflow {
    fn empty(month: Month) -> Self {
        Self {
            month,
            total_income: Money::ZERO,
            total_expense: Money::ZERO,
        }
    }

    /// Income minus expenses for the month.
    pub fn net(&self) -> Money {
        self.total_income - self.total_expense
    }
}

/// Monthly cashflow for a calendar year, January first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnualCashflow {
    /// The year the totals belong to.
    pub year: i32,
    /// The totals for each month, in calendar order.
    pub months: [MonthlyCashflow; 12],
}

impl AnnualCashflow {
    /// Cashflow for `year` with zero totals in every month.
    pub fn empty(year: i32) -> Self {
        Self {
            year,
            months: MONTHS.map(MonthlyCashflow::empty),
        }
    }

    /// The sum of all income in the year.
    pub fn total_income(&self) -> Money {
        self.months.iter().map(|month| month.total_income).sum()
    }

    /// The sum of all expenses in the year.
    pub fn total_expense(&self) -> Money {
        self.months.iter().map(|month| month.total_expense).sum()
    }

    /// Income minus expenses for the year.
    pub fn net(&self) -> Money {
        self.total_income() - self.total_expense()
    }

    /// Whether every month has zero income and zero expenses.
    pub fn is_empty(&self) -> bool {
        self.months
            .iter()
            .all(|month| month.total_income == Money::ZERO && month.total_expense == Money::ZERO)
    }
}

/// Sum `transactions` into twelve monthly buckets for `year`.
///
/// Transactions dated outside of `year` are ignored. The result does not
/// depend on the order of `transactions`.
pub fn aggregate_annual_cashflow(transactions: &[Transaction], year: i32) -> AnnualCashflow {
    let mut cashflow = AnnualCashflow::empty(year);

    for transaction in transactions
        .iter()
        .filter(|transaction| transaction.date.year() == year)
    {
        let bucket = &mut cashflow.months[transaction.date.month() as usize - 1];

        match transaction.transaction_type {
            TransactionType::Income => bucket.total_income += transaction.amount,
            TransactionType::Expense => bucket.total_expense += transaction.amount,
        }
    }

    cashflow
}

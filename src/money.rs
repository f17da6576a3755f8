//! A fixed-point currency amount.
//!
//! Amounts are stored as a whole number of minor units (pence) so that sums
//! are exact no matter how many transactions are added together.
//!
//! Arithmetic saturates at the `i64` bounds rather than wrapping. Amounts
//! entered through the transaction form are capped at
//! [MAX_TRANSACTION_AMOUNT], far below the point where sums could saturate.

use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub},
};

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlResult, ToSqlOutput, ValueRef},
};

use crate::Error;

/// The number of minor units in one major unit, e.g. pence in a pound.
const MINOR_UNITS_PER_MAJOR: i64 = 100;

/// The largest amount a single transaction may have: £10,000,000,000.00.
pub const MAX_TRANSACTION_AMOUNT: Money = Money(1_000_000_000_000);

/// An amount of money stored as a count of minor units (pence).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// Zero pounds and zero pence.
    pub const ZERO: Money = Money(0);

    /// Create an amount from a count of minor units, e.g. `1050` is £10.50.
    pub const fn from_minor_units(minor_units: i64) -> Self {
        Self(minor_units)
    }

    /// The amount as a count of minor units.
    pub const fn minor_units(&self) -> i64 {
        self.0
    }

    /// Whether the amount is strictly greater than zero.
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Whether the amount is strictly less than zero.
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// The magnitude of the amount.
    pub const fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// The whole units part of the magnitude, e.g. `12` for £12.34.
    pub const fn whole_units(&self) -> i64 {
        (self.0 / MINOR_UNITS_PER_MAJOR).abs()
    }

    /// The fractional part of the magnitude in minor units, e.g. `34` for £12.34.
    pub const fn fractional_units(&self) -> i64 {
        (self.0 % MINOR_UNITS_PER_MAJOR).abs()
    }

    /// The amount in major units as a float.
    ///
    /// Only use this for display purposes such as chart data, never for
    /// arithmetic.
    pub fn major_units(&self) -> f64 {
        self.0 as f64 / MINOR_UNITS_PER_MAJOR as f64
    }

    /// Parse a decimal amount such as `"12"`, `"12.5"` or `"-0.99"`.
    ///
    /// # Errors
    /// Returns [Error::InvalidAmount] if `text` is not a decimal number with
    /// at most two decimal places or the amount does not fit in an `i64`.
    pub fn parse(text: &str) -> Result<Self, Error> {
        let invalid = || Error::InvalidAmount(text.to_owned());

        let decimal = text.trim().parse::<Decimal>().map_err(|_| invalid())?;

        if decimal.scale() > 2 {
            return Err(invalid());
        }

        decimal
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|minor_units| minor_units.to_i64())
            .map(Self)
            .ok_or_else(invalid)
    }
}

impl fmt::Display for Money {
    /// Plain decimal form with two decimal places, e.g. `-12.50`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        write!(
            f,
            "{sign}{}.{:02}",
            self.whole_units(),
            self.fractional_units()
        )
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Self) -> Self::Output {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Self) -> Self::Output {
        Money(self.0.saturating_sub(rhs.0))
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Self::Output {
        Money(self.0.saturating_neg())
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl ToSql for Money {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0))
    }
}

impl FromSql for Money {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        i64::column_result(value).map(Money)
    }
}

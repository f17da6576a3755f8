//! Defines the core data models and database queries for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use time::Date;

use crate::{
    Error,
    category::{CategoryId, CategoryName},
    money::Money,
    period::YearsRange,
};

// ============================================================================
// MODELS
// ============================================================================

/// Database identifier for a transaction.
pub type TransactionId = i64;

/// Whether a transaction brought money in or sent money out.
///
/// This is recorded explicitly rather than derived from the sign of the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionType {
    /// Money earned, e.g. a salary payment.
    Income,
    /// Money spent, e.g. a grocery shop.
    Expense,
}

impl TransactionType {
    /// The value used in forms and the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }

    /// The human readable name, e.g. "Income".
    pub fn label(&self) -> &'static str {
        match self {
            TransactionType::Income => "Income",
            TransactionType::Expense => "Expense",
        }
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(Error::InvalidTransactionType(other.to_owned())),
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The amount of money spent or earned, always a positive magnitude.
    pub amount: Money,
    /// When the transaction happened.
    pub date: Date,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The name of the category the transaction belongs to.
    pub category: CategoryName,
    /// Whether the transaction is income or an expense.
    pub transaction_type: TransactionType,
}

/// A validated transaction that has not been saved yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// The amount of money spent or earned, greater than zero.
    pub amount: Money,
    /// When the transaction happened.
    pub date: Date,
    /// A text description of what the transaction was for, may be empty.
    pub description: String,
    /// The category the transaction belongs to.
    pub category_id: CategoryId,
    /// Whether the transaction is income or an expense.
    pub transaction_type: TransactionType,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const SELECT_TRANSACTION: &str = "SELECT t.id, t.amount, t.date, t.description, c.name, t.transaction_type
    FROM \"transaction\" t
    INNER JOIN category c ON c.id = t.category_id";

/// Create a new transaction in the database.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidCategory] if the category ID does not refer to a real category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    new_transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .execute(
            "INSERT INTO \"transaction\" (amount, date, description, category_id, transaction_type)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            (
                new_transaction.amount,
                new_transaction.date,
                &new_transaction.description,
                new_transaction.category_id,
                new_transaction.transaction_type,
            ),
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::InvalidCategory,
            error => error.into(),
        })?;

    let id = connection.last_insert_rowid();

    get_transaction(id, connection)
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!("{SELECT_TRANSACTION} WHERE t.id = :id"))?
        .query_one(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Retrieve the transactions dated within `[start, end_exclusive)`, newest first.
///
/// The bounds are `yyyy-MM-dd` strings.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn get_transactions_between(
    start: &str,
    end_exclusive: &str,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "{SELECT_TRANSACTION}
            WHERE t.date >= :start AND t.date < :end
            ORDER BY t.date DESC, t.id DESC"
        ))?
        .query_map(
            &[(":start", &start), (":end", &end_exclusive)],
            map_transaction_row,
        )?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Get the years of the oldest and newest transactions.
///
/// Returns `None` if there are no transactions.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn get_years_range(connection: &Connection) -> Result<Option<YearsRange>, Error> {
    let (min_date, max_date): (Option<Date>, Option<Date>) = connection.query_row(
        "SELECT MIN(date), MAX(date) FROM \"transaction\";",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;

    Ok(min_date.zip(max_date).map(|(min_date, max_date)| YearsRange {
        min_year: min_date.year(),
        max_year: max_date.year(),
    }))
}

/// Create the transaction table in the database.
///
/// The category table must already exist.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                amount INTEGER NOT NULL,
                date TEXT NOT NULL,
                description TEXT NOT NULL,
                category_id INTEGER NOT NULL,
                transaction_type TEXT NOT NULL CHECK (transaction_type IN ('income', 'expense')),
                FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE RESTRICT
                )",
        (),
    )?;

    // Used by the monthly listing and the annual cashflow queries.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_date ON \"transaction\"(date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
///
/// The row must have the columns of [SELECT_TRANSACTION].
fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let amount = row.get(1)?;
    let date = row.get(2)?;
    let description = row.get(3)?;
    let raw_category: String = row.get(4)?;
    let transaction_type = row.get(5)?;

    Ok(Transaction {
        id,
        amount,
        date,
        description,
        category: CategoryName::new_unchecked(&raw_category),
        transaction_type,
    })
}

// ============================================================================
// TESTS
// ============================================================================

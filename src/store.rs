//! The transaction query service used by the page handlers.
//!
//! Handlers only see the [TransactionStore] trait, so the pages can be tested
//! against stores that fail or return canned data.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;

use crate::{
    Error,
    cashflow::{AnnualCashflow, aggregate_annual_cashflow},
    category::{Category, CategoryName, create_category, get_all_categories},
    period::{MonthPeriod, YearsRange, year_date_bounds},
    transaction::{
        NewTransaction, Transaction, create_transaction, get_transactions_between,
        get_years_range,
    },
};

/// Reads and writes transactions and categories.
///
/// The methods block, so async code should call them through [run_blocking].
pub trait TransactionStore: Send + Sync {
    /// All transactions dated within `period`, newest first.
    ///
    /// # Errors
    /// Returns an error if the underlying store fails. An empty month is `Ok(vec![])`.
    fn transactions_for_month(&self, period: MonthPeriod) -> Result<Vec<Transaction>, Error>;

    /// All transactions dated within `year`, newest first.
    ///
    /// # Errors
    /// Returns an error if the underlying store fails.
    fn transactions_for_year(&self, year: i32) -> Result<Vec<Transaction>, Error>;

    /// The monthly income and expense totals for `year`.
    ///
    /// # Errors
    /// Returns an error if the underlying store fails.
    fn annual_cashflow(&self, year: i32) -> Result<AnnualCashflow, Error> {
        let transactions = self.transactions_for_year(year)?;

        Ok(aggregate_annual_cashflow(&transactions, year))
    }

    /// The span of years with at least one transaction, or `None` if there are no transactions.
    ///
    /// # Errors
    /// Returns an error if the underlying store fails.
    fn years_range(&self) -> Result<Option<YearsRange>, Error>;

    /// Save a new transaction and return it with its generated ID.
    ///
    /// # Errors
    /// Returns [Error::InvalidCategory] if the category does not exist, or
    /// another error if the underlying store fails.
    fn create_transaction(&self, new_transaction: NewTransaction) -> Result<Transaction, Error>;

    /// All categories, sorted by name.
    ///
    /// # Errors
    /// Returns an error if the underlying store fails.
    fn categories(&self) -> Result<Vec<Category>, Error>;

    /// Save a new category and return it with its generated ID.
    ///
    /// # Errors
    /// Returns [Error::DuplicateCategoryName] if the name is taken, or another
    /// error if the underlying store fails.
    fn create_category(&self, name: CategoryName) -> Result<Category, Error>;
}

/// A [TransactionStore] backed by a SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SqliteTransactionStore {
    /// Create a store that uses `connection`.
    ///
    /// The database must have been set up with [crate::initialize_db].
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)
    }
}

impl TransactionStore for SqliteTransactionStore {
    fn transactions_for_month(&self, period: MonthPeriod) -> Result<Vec<Transaction>, Error> {
        let (start, end) = period.date_bounds();

        get_transactions_between(&start, &end, &*self.lock()?)
    }

    fn transactions_for_year(&self, year: i32) -> Result<Vec<Transaction>, Error> {
        let (start, end) = year_date_bounds(year);

        get_transactions_between(&start, &end, &*self.lock()?)
    }

    fn years_range(&self) -> Result<Option<YearsRange>, Error> {
        get_years_range(&*self.lock()?)
    }

    fn create_transaction(&self, new_transaction: NewTransaction) -> Result<Transaction, Error> {
        create_transaction(new_transaction, &*self.lock()?)
    }

    fn categories(&self) -> Result<Vec<Category>, Error> {
        get_all_categories(&*self.lock()?)
    }

    fn create_category(&self, name: CategoryName) -> Result<Category, Error> {
        create_category(name, &*self.lock()?)
    }
}

/// Run a blocking store query on the blocking thread pool.
///
/// # Errors
/// Returns the query's error, or [Error::BackgroundTaskFailed] if the task
/// panicked or was cancelled.
pub async fn run_blocking<T, F>(store: &Arc<dyn TransactionStore>, query: F) -> Result<T, Error>
where
    T: Send + 'static,
    F: FnOnce(&dyn TransactionStore) -> Result<T, Error> + Send + 'static,
{
    let store = Arc::clone(store);

    tokio::task::spawn_blocking(move || query(store.as_ref()))
        .await
        .map_err(|error| {
            tracing::error!("store query did not complete: {error}");
            Error::BackgroundTaskFailed(error.to_string())
        })?
}

#[cfg(test)]
mod sqlite_store_tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;
    use time::{Month, macros::date};

    use crate::{
        Error,
        category::CategoryName,
        db::initialize,
        money::Money,
        period::{MonthPeriod, YearsRange},
        transaction::{NewTransaction, TransactionType},
    };

    use super::{SqliteTransactionStore, TransactionStore, run_blocking};

    fn get_store() -> SqliteTransactionStore {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        SqliteTransactionStore::new(Arc::new(Mutex::new(connection)))
    }

    fn seed(store: &SqliteTransactionStore) {
        store
            .create_category(CategoryName::new_unchecked("General"))
            .unwrap();

        let rows = [
            (date!(2023 - 12 - 31), 1_000, TransactionType::Income),
            (date!(2024 - 03 - 05), 10_000, TransactionType::Income),
            (date!(2024 - 03 - 20), 4_000, TransactionType::Expense),
            (date!(2024 - 04 - 01), 250, TransactionType::Expense),
        ];

        for (date, minor_units, transaction_type) in rows {
            store
                .create_transaction(NewTransaction {
                    amount: Money::from_minor_units(minor_units),
                    date,
                    description: String::new(),
                    category_id: 1,
                    transaction_type,
                })
                .unwrap();
        }
    }

    #[test]
    fn month_query_returns_only_that_month() {
        let store = get_store();
        seed(&store);

        let transactions = store
            .transactions_for_month(MonthPeriod {
                year: 2024,
                month: Month::March,
            })
            .unwrap();

        assert_eq!(transactions.len(), 2);
        assert!(
            transactions
                .iter()
                .all(|transaction| transaction.date.month() == Month::March
                    && transaction.date.year() == 2024)
        );
    }

    #[test]
    fn empty_month_is_not_an_error() {
        let store = get_store();
        seed(&store);

        let transactions = store.transactions_for_month(MonthPeriod {
            year: 2024,
            month: Month::July,
        });

        assert_eq!(transactions, Ok(vec![]));
    }

    #[test]
    fn annual_cashflow_uses_only_that_year() {
        let store = get_store();
        seed(&store);

        let cashflow = store.annual_cashflow(2024).unwrap();

        assert_eq!(cashflow.total_income(), Money::from_minor_units(10_000));
        assert_eq!(cashflow.total_expense(), Money::from_minor_units(4_250));
        assert_eq!(cashflow.months[2].total_expense, Money::from_minor_units(4_000));
        assert_eq!(cashflow.months[3].total_expense, Money::from_minor_units(250));
    }

    #[test]
    fn years_range_spans_all_transactions() {
        let store = get_store();
        assert_eq!(store.years_range(), Ok(None));

        seed(&store);

        assert_eq!(
            store.years_range(),
            Ok(Some(YearsRange {
                min_year: 2023,
                max_year: 2024
            }))
        );
    }

    #[test]
    fn create_with_unknown_category_fails() {
        let store = get_store();

        let result = store.create_transaction(NewTransaction {
            amount: Money::from_minor_units(100),
            date: date!(2024 - 07 - 15),
            description: String::new(),
            category_id: 7,
            transaction_type: TransactionType::Expense,
        });

        assert_eq!(result, Err(Error::InvalidCategory));
    }

    #[tokio::test]
    async fn run_blocking_returns_query_result() {
        let store = get_store();
        seed(&store);
        let store: Arc<dyn TransactionStore> = Arc::new(store);

        let categories = run_blocking(&store, |store| store.categories()).await;

        assert_eq!(categories.map(|categories| categories.len()), Ok(1));
    }
}

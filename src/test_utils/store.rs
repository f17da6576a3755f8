use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    Error,
    category::{Category, CategoryName},
    db::initialize,
    period::{MonthPeriod, YearsRange},
    store::{SqliteTransactionStore, TransactionStore},
    transaction::{NewTransaction, Transaction},
};

/// A store where every query fails, for checking how pages handle store errors.
pub(crate) struct FailingStore;

impl TransactionStore for FailingStore {
    fn transactions_for_month(&self, _period: MonthPeriod) -> Result<Vec<Transaction>, Error> {
        Err(Error::DatabaseLockError)
    }

    fn transactions_for_year(&self, _year: i32) -> Result<Vec<Transaction>, Error> {
        Err(Error::DatabaseLockError)
    }

    fn years_range(&self) -> Result<Option<YearsRange>, Error> {
        Err(Error::DatabaseLockError)
    }

    fn create_transaction(&self, _new_transaction: NewTransaction) -> Result<Transaction, Error> {
        Err(Error::DatabaseLockError)
    }

    fn categories(&self) -> Result<Vec<Category>, Error> {
        Err(Error::DatabaseLockError)
    }

    fn create_category(&self, _name: CategoryName) -> Result<Category, Error> {
        Err(Error::DatabaseLockError)
    }
}

/// An in-memory SQLite store with the categories `names`, given IDs from 1 in order.
#[track_caller]
pub(crate) fn sqlite_store_with_categories(names: &[&str]) -> SqliteTransactionStore {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    initialize(&connection).expect("Could not initialize database");
    let store = SqliteTransactionStore::new(Arc::new(Mutex::new(connection)));

    for name in names {
        store
            .create_category(CategoryName::new_unchecked(name))
            .expect("Could not create category");
    }

    store
}

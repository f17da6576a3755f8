//! Transactions: the model, storage, and the pages for listing and creating them.
//!
//! - `core` holds the `Transaction` model and its SQL.
//! - `form` parses and validates the new transaction form.
//! - `submission` drives a form submission from idle to success or failure.
//! - the remaining modules are route handlers and views.

mod core;
mod create_endpoint;
mod create_page;
mod form;
mod submission;
mod transactions_page;
mod view;

pub use self::core::{
    NewTransaction, Transaction, TransactionId, TransactionType, create_transaction,
    create_transaction_table, get_transactions_between, get_years_range,
};
pub use create_endpoint::create_transaction_endpoint;
pub use create_page::get_create_transaction_page;
pub use transactions_page::get_transactions_page;

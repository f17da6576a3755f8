//! The lifecycle of a new transaction form submission.
//!
//! ```text
//! Idle --begin(form)--> Submitting(payload) --finish(result)--> Success | Failed
//!   \--begin(invalid form)-----------------------------------> Failed
//! ```
//!
//! Side effects only happen between `Submitting` and the terminal states: the
//! store call in [submit] and the redirect built for [SubmissionState::Success].

use std::sync::Arc;

use serde::Serialize;
use time::Date;

use crate::{
    Error, endpoints,
    store::{TransactionStore, run_blocking},
    transaction::{
        core::{NewTransaction, Transaction, TransactionId},
        form::TransactionForm,
    },
};

/// Where a transaction form submission is up to.
#[derive(Debug, PartialEq)]
pub enum SubmissionState {
    /// Nothing has been submitted yet.
    Idle,
    /// The form was valid and the payload is being saved.
    Submitting(NewTransaction),
    /// The transaction was saved.
    Success {
        /// The saved transaction.
        transaction: Transaction,
        /// The listing page for the month of the saved transaction.
        redirect_url: String,
    },
    /// The form was invalid or the store rejected the payload.
    Failed(Error),
}

impl SubmissionState {
    /// Validate `form` against `today`, moving from `Idle` to `Submitting`
    /// or `Failed`.
    ///
    /// Any other starting state is returned unchanged.
    pub fn begin(self, form: &TransactionForm, today: Date) -> Self {
        match self {
            SubmissionState::Idle => match form.validate(today) {
                Ok(payload) => SubmissionState::Submitting(payload),
                Err(error) => SubmissionState::Failed(error),
            },
            other => other,
        }
    }

    /// Record the outcome of saving the payload, moving from `Submitting` to
    /// `Success` or `Failed`.
    ///
    /// Any other starting state is returned unchanged.
    pub fn finish(self, result: Result<Transaction, Error>) -> Self {
        match self {
            SubmissionState::Submitting(_) => match result {
                Ok(transaction) => SubmissionState::Success {
                    redirect_url: transactions_page_url(&transaction),
                    transaction,
                },
                Err(error) => SubmissionState::Failed(error),
            },
            other => other,
        }
    }
}

#[derive(Serialize)]
struct CreatedTransactionQuery {
    month: u8,
    year: i32,
    created: TransactionId,
}

/// The listing page for the month and year of `transaction`, flagged with
/// the ID of the transaction that was just created.
pub fn transactions_page_url(transaction: &Transaction) -> String {
    let query = CreatedTransactionQuery {
        month: transaction.date.month() as u8,
        year: transaction.date.year(),
        created: transaction.id,
    };

    match serde_urlencoded::to_string(&query) {
        Ok(query) => format!("{}?{query}", endpoints::TRANSACTIONS_VIEW),
        Err(error) => {
            tracing::error!("could not encode transactions page query: {error}");
            endpoints::TRANSACTIONS_VIEW.to_owned()
        }
    }
}

/// Run a form submission from `Idle` to a terminal state.
pub async fn submit(
    store: &Arc<dyn TransactionStore>,
    form: &TransactionForm,
    today: Date,
) -> SubmissionState {
    match SubmissionState::Idle.begin(form, today) {
        SubmissionState::Submitting(payload) => {
            let result = run_blocking(store, {
                let payload = payload.clone();
                move |store| store.create_transaction(payload)
            })
            .await;

            SubmissionState::Submitting(payload).finish(result)
        }
        state => state,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use time::{Date, macros::date};

    use crate::{
        Error,
        category::CategoryName,
        money::Money,
        store::TransactionStore,
        test_utils::{FailingStore, sqlite_store_with_categories},
        transaction::{Transaction, TransactionType, form::TransactionForm},
    };

    use super::{SubmissionState, submit, transactions_page_url};

    const TODAY: Date = date!(2025 - 06 - 15);

    fn form(date: &str, category_id: &str) -> TransactionForm {
        TransactionForm {
            transaction_type: "expense".to_owned(),
            amount: "9.99".to_owned(),
            transaction_date: date.to_owned(),
            category_id: category_id.to_owned(),
            description: "Book".to_owned(),
        }
    }

    fn saved_transaction() -> Transaction {
        Transaction {
            id: 1,
            amount: Money::from_minor_units(999),
            date: date!(2024 - 07 - 15),
            description: "Book".to_owned(),
            category: CategoryName::new_unchecked("Books"),
            transaction_type: TransactionType::Expense,
        }
    }

    #[test]
    fn begin_with_valid_form_is_submitting() {
        let state = SubmissionState::Idle.begin(&form("2024-07-15", "1"), TODAY);

        assert!(matches!(state, SubmissionState::Submitting(_)));
    }

    #[test]
    fn begin_with_invalid_form_fails_without_submitting() {
        let state = SubmissionState::Idle.begin(&form("not a date", "1"), TODAY);

        assert_eq!(
            state,
            SubmissionState::Failed(Error::InvalidDate("not a date".to_owned()))
        );
    }

    #[test]
    fn finish_with_success_redirects_to_month_of_transaction() {
        let state = SubmissionState::Idle
            .begin(&form("2024-07-15", "1"), TODAY)
            .finish(Ok(saved_transaction()));

        assert_eq!(
            state,
            SubmissionState::Success {
                transaction: saved_transaction(),
                redirect_url: "/transactions?month=7&year=2024&created=1".to_owned(),
            }
        );
    }

    #[test]
    fn begin_with_date_outside_supported_years_fails() {
        let state = SubmissionState::Idle.begin(&form("2035-07-15", "1"), TODAY);

        assert!(
            matches!(state, SubmissionState::Failed(Error::DateOutOfRange { .. })),
            "want a date out of range failure, got {state:?}"
        );
    }

    #[test]
    fn finish_with_error_keeps_message() {
        let state = SubmissionState::Idle
            .begin(&form("2024-07-15", "1"), TODAY)
            .finish(Err(Error::InvalidCategory));

        assert_eq!(state, SubmissionState::Failed(Error::InvalidCategory));
    }

    #[test]
    fn transitions_from_wrong_state_are_ignored() {
        let state = SubmissionState::Failed(Error::NonPositiveAmount);

        let state = state.begin(&form("2024-07-15", "1"), TODAY);
        assert_eq!(state, SubmissionState::Failed(Error::NonPositiveAmount));

        let state = SubmissionState::Idle.finish(Ok(saved_transaction()));
        assert_eq!(state, SubmissionState::Idle);
    }

    #[test]
    fn url_uses_one_indexed_month() {
        let mut transaction = saved_transaction();
        transaction.date = date!(2025 - 01 - 31);
        transaction.id = 42;

        assert_eq!(
            transactions_page_url(&transaction),
            "/transactions?month=1&year=2025&created=42"
        );
    }

    #[tokio::test]
    async fn submit_saves_transaction() {
        let store: Arc<dyn TransactionStore> = Arc::new(sqlite_store_with_categories(&["Books"]));

        let state = submit(&store, &form("2024-07-15", "1"), TODAY).await;

        match state {
            SubmissionState::Success {
                transaction,
                redirect_url,
            } => {
                assert_eq!(transaction.category, CategoryName::new_unchecked("Books"));
                assert_eq!(redirect_url, "/transactions?month=7&year=2024&created=1");
            }
            other => panic!("want success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn submit_with_unknown_category_fails() {
        let store: Arc<dyn TransactionStore> = Arc::new(sqlite_store_with_categories(&[]));

        let state = submit(&store, &form("2024-07-15", "5"), TODAY).await;

        assert_eq!(state, SubmissionState::Failed(Error::InvalidCategory));
    }

    #[tokio::test]
    async fn submit_propagates_store_failure() {
        let store: Arc<dyn TransactionStore> = Arc::new(FailingStore);

        let state = submit(&store, &form("2024-07-15", "1"), TODAY).await;

        assert_eq!(state, SubmissionState::Failed(Error::DatabaseLockError));
    }
}

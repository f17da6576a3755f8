//! Defines the endpoint for creating a new transaction.
use std::sync::Arc;

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;

use crate::{
    AppState, Error,
    store::TransactionStore,
    timezone::local_today,
    transaction::{
        form::TransactionForm,
        submission::{SubmissionState, submit},
    },
};

/// The state needed to create a transaction.
#[derive(Clone)]
pub struct CreateTransactionState {
    /// The store the transaction is saved to.
    pub transaction_store: Arc<dyn TransactionStore>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transaction_store: state.transaction_store.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// A route handler for creating a new transaction.
///
/// On success the client is redirected to the listing for the month of the
/// new transaction. On failure an error alert is returned and the form stays
/// on the page.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let today = match local_today(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => {
            tracing::error!("Invalid timezone {}", state.local_timezone);
            return error.into_alert_response();
        }
    };

    match submit(&state.transaction_store, &form, today).await {
        SubmissionState::Success {
            transaction,
            redirect_url,
        } => {
            tracing::info!(
                "created transaction {} dated {}",
                transaction.id,
                transaction.date
            );

            (HxRedirect(redirect_url), StatusCode::SEE_OTHER).into_response()
        }
        SubmissionState::Failed(error) => {
            tracing::error!("could not create transaction: {error}");

            error.into_alert_response()
        }
        state => {
            tracing::error!("transaction submission stopped in a non-terminal state: {state:?}");

            Error::BackgroundTaskFailed("submission did not finish".to_owned())
                .into_alert_response()
        }
    }
}

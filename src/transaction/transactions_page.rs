//! Defines the route handler for the page that lists the transactions of one month.
use std::sync::Arc;

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    AppState, Error,
    period::{PeriodQuery, normalize_month_period, year_options},
    store::{TransactionStore, run_blocking},
    timezone::local_today,
    transaction::view::transactions_view,
};

/// The state needed for the transactions page.
#[derive(Clone)]
pub struct TransactionsViewState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The store to read transactions from.
    pub transaction_store: Arc<dyn TransactionStore>,
}

impl FromRef<AppState> for TransactionsViewState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            transaction_store: state.transaction_store.clone(),
        }
    }
}

/// The query parameters for the transactions page, e.g. `?year=2024&month=7&created=12`.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionsPageQuery {
    /// The requested year.
    pub year: Option<String>,
    /// The requested 1-indexed month.
    pub month: Option<String>,
    /// Set after a redirect from creating a transaction.
    pub created: Option<String>,
}

/// Render the transactions of the requested month.
///
/// Missing or invalid `year` and `month` fall back to the current year and month.
pub async fn get_transactions_page(
    State(state): State<TransactionsViewState>,
    Query(query): Query<TransactionsPageQuery>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)
        .inspect_err(|_| tracing::error!("Invalid timezone {}", state.local_timezone))?;
    let period = normalize_month_period(
        &PeriodQuery {
            year: query.year,
            month: query.month,
        },
        today,
    );

    let (transactions, years_range) = tokio::try_join!(
        run_blocking(&state.transaction_store, move |store| {
            store.transactions_for_month(period)
        }),
        run_blocking(&state.transaction_store, |store| store.years_range()),
    )
    .inspect_err(|error| tracing::error!("Could not load transactions page: {error}"))?;

    let year_options = year_options(years_range, period.year);
    let show_created_alert = query.created.is_some();

    Ok(transactions_view(period, &transactions, &year_options, show_created_alert).into_response())
}

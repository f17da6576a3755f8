//! Defines the route handler for the page for creating a new transaction.

use std::sync::Arc;

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use time::Date;

use crate::{
    AppState, Error,
    category::Category,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base, currency_input_styles, link,
        loading_spinner,
    },
    navigation::NavBar,
    store::{TransactionStore, run_blocking},
    timezone::local_today,
    transaction::{
        core::TransactionType,
        form::{TransactionFormDefaults, transaction_form_fields},
    },
};

fn create_transaction_view(today: Date, categories: &[Category]) -> Markup {
    let create_transaction_route = endpoints::TRANSACTIONS_API;
    let nav_bar = NavBar::new(endpoints::NEW_TRANSACTION_VIEW).into_html();
    let spinner = loading_spinner();
    let defaults = TransactionFormDefaults {
        transaction_type: TransactionType::Expense,
        date: today,
    };

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            @if categories.is_empty() {
                h2 class="text-xl font-bold mb-4" { "New Transaction" }

                p
                {
                    "Every transaction needs a category. "
                    (link(endpoints::CATEGORIES_VIEW, "Create a category"))
                    " before adding transactions."
                }
            } @else {
                form
                    hx-post=(create_transaction_route)
                    hx-target-error="#alert-container"
                    class="w-full space-y-4 md:space-y-6"
                {
                    h2 class="text-xl font-bold" { "New Transaction" }

                    (transaction_form_fields(&defaults, categories))

                    button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                    {
                        span
                            id="indicator"
                            class="inline htmx-indicator"
                        {
                            (spinner)
                        }
                        " Create Transaction"
                    }
                }
            }
        }
    };

    base("Create Transaction", &[currency_input_styles()], &content)
}

/// The state needed for create new transaction page.
#[derive(Clone)]
pub struct CreateTransactionPageState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The store for looking up categories.
    pub transaction_store: Arc<dyn TransactionStore>,
}

impl FromRef<AppState> for CreateTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            transaction_store: state.transaction_store.clone(),
        }
    }
}

/// Renders the page for creating a transaction.
pub async fn get_create_transaction_page(
    State(state): State<CreateTransactionPageState>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)
        .inspect_err(|_| tracing::error!("Invalid timezone {}", state.local_timezone))?;

    let categories = run_blocking(&state.transaction_store, |store| store.categories())
        .await
        .inspect_err(|error| {
            tracing::error!("Failed to retrieve categories for new transaction page: {error}")
        })?;

    Ok(create_transaction_view(today, &categories).into_response())
}

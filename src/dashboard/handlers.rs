//! Dashboard HTTP handlers and view rendering.
//!
//! The dashboard shows the cashflow card for one year: a bar chart of
//! monthly income and expenses, the yearly totals, and a table of the
//! monthly figures.

use std::sync::Arc;

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    AppState, Error,
    cashflow::AnnualCashflow,
    dashboard::{
        charts::{DashboardChart, chart_container, chart_script},
        tables::{monthly_table, summary_panel},
    },
    endpoints,
    html::{
        BUTTON_SECONDARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, HeadElement, base, link,
    },
    navigation::NavBar,
    period::{normalize_year, year_options},
    store::{TransactionStore, run_blocking},
    timezone::local_today,
};

const ECHARTS_SCRIPT: &str = "/static/echarts.6.0.0.min.js";

/// The state needed for displaying the dashboard page.
#[derive(Clone)]
pub struct DashboardState {
    /// The store to read the cashflow from.
    pub transaction_store: Arc<dyn TransactionStore>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transaction_store: state.transaction_store.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The query parameters for the dashboard, e.g. `?year=2024`.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// The requested year.
    pub year: Option<String>,
}

/// Display the cashflow for the requested year.
///
/// A missing or invalid `year` falls back to the current year.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)
        .inspect_err(|_| tracing::error!("Invalid timezone {}", state.local_timezone))?;
    let year = normalize_year(query.year.as_deref(), today);

    let (cashflow, years_range) = tokio::try_join!(
        run_blocking(&state.transaction_store, move |store| store
            .annual_cashflow(year)),
        run_blocking(&state.transaction_store, |store| store.years_range()),
    )
    .inspect_err(|error| tracing::error!("Could not load cashflow for {year}: {error}"))?;

    let year_options = year_options(years_range, year);

    Ok(dashboard_view(&cashflow, &year_options).into_response())
}

fn dashboard_view(cashflow: &AnnualCashflow, year_options: &[i32]) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();
    let chart = (!cashflow.is_empty()).then(|| DashboardChart::cashflow(cashflow));

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class="flex flex-col items-center px-2 lg:px-6 py-4 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            section
                id="cashflow"
                class="w-full p-4 rounded-lg shadow bg-white dark:bg-gray-800 space-y-4"
            {
                header class="flex justify-between flex-wrap items-end gap-4"
                {
                    h2 class="text-xl font-semibold" { "Cashflow" }

                    (year_filter_form(cashflow.year, year_options))
                }

                @match &chart {
                    Some(chart) => {
                        div class="grid grid-cols-1 lg:grid-cols-[1fr_250px] gap-4 items-start"
                        {
                            (chart_container(chart))
                            (summary_panel(cashflow))
                        }

                        (monthly_table(cashflow))
                    }
                    None => (empty_state_view(cashflow.year)),
                }
            }
        }
    );

    let scripts = match chart {
        Some(chart) => vec![
            HeadElement::ScriptLink(ECHARTS_SCRIPT.to_owned()),
            chart_script(&chart),
        ],
        None => Vec::new(),
    };

    base("Dashboard", &scripts, &content)
}

fn year_filter_form(selected_year: i32, year_options: &[i32]) -> Markup {
    html! {
        form
            method="get"
            action=(endpoints::DASHBOARD_VIEW)
            class="flex items-end gap-2"
        {
            div
            {
                label for="year" class="sr-only" { "Year" }

                select name="year" id="year" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for year in year_options {
                        option value=(year) selected[*year == selected_year] { (year) }
                    }
                }
            }

            button type="submit" class=(BUTTON_SECONDARY_STYLE) { "Show" }
        }
    }
}

fn empty_state_view(year: i32) -> Markup {
    let new_transaction_link = link(endpoints::NEW_TRANSACTION_VIEW, "Add a transaction");

    html! {
        div class="py-8 text-center" data-empty-state="true"
        {
            p class=(FORM_LABEL_STYLE) { "There are no transactions for " (year) }

            p class="text-sm text-gray-500 dark:text-gray-400"
            {
                (new_transaction_link) " to see your cashflow here."
            }
        }
    }
}

#[cfg(test)]
mod dashboard_route_tests {
    use std::sync::Arc;

    use axum::{
        extract::{Query, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{
        money::Money,
        store::TransactionStore,
        test_utils::{
            FailingStore, assert_content_type, assert_status_ok, assert_valid_html,
            parse_html_document, sqlite_store_with_categories,
        },
        timezone::local_today,
        transaction::{NewTransaction, TransactionType},
    };

    use super::{DashboardQuery, DashboardState, get_dashboard_page};

    fn seeded_state() -> DashboardState {
        let store = sqlite_store_with_categories(&["Salary", "Groceries"]);
        for (date, minor_units, category_id, transaction_type) in [
            (date!(2024 - 03 - 01), 10_000, 1, TransactionType::Income),
            (date!(2024 - 03 - 15), 4_000, 2, TransactionType::Expense),
            (date!(2023 - 12 - 31), 2_500, 2, TransactionType::Expense),
        ] {
            store
                .create_transaction(NewTransaction {
                    amount: Money::from_minor_units(minor_units),
                    date,
                    description: String::new(),
                    category_id,
                    transaction_type,
                })
                .unwrap();
        }

        DashboardState {
            transaction_store: Arc::new(store),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    fn query(year: &str) -> Query<DashboardQuery> {
        Query(DashboardQuery {
            year: Some(year.to_owned()),
        })
    }

    fn summary_value(html: &Html, kind: &str) -> String {
        let selector = Selector::parse(&format!("dd[data-summary={kind}]")).unwrap();
        html.select(&selector)
            .next()
            .unwrap_or_else(|| panic!("could not find summary {kind}"))
            .text()
            .collect::<String>()
            .trim()
            .to_owned()
    }

    #[tokio::test]
    async fn shows_cashflow_for_requested_year() {
        let response = get_dashboard_page(State(seeded_state()), query("2024"))
            .await
            .unwrap();

        assert_status_ok(&response);
        assert_content_type(&response, "text/html; charset=utf-8");
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        assert_eq!(summary_value(&html, "income"), "£100");
        assert_eq!(summary_value(&html, "expense"), "£40");
        assert_eq!(summary_value(&html, "net"), "£60");
        assert_eq!(
            html.select(&Selector::parse("tr[data-month-row]").unwrap())
                .count(),
            12
        );
        assert!(
            html.select(&Selector::parse("#cashflow-chart").unwrap())
                .next()
                .is_some(),
            "want chart container"
        );
        let script_src = html
            .select(&Selector::parse("script[src]").unwrap())
            .filter_map(|script| script.value().attr("src"))
            .any(|src| src.contains("echarts"));
        assert!(script_src, "want echarts script");
    }

    #[tokio::test]
    async fn year_without_transactions_shows_empty_state() {
        let response = get_dashboard_page(State(seeded_state()), query("2022"))
            .await
            .unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let empty_state = html
            .select(&Selector::parse("[data-empty-state]").unwrap())
            .next()
            .unwrap()
            .text()
            .collect::<String>();
        assert!(
            empty_state.contains("There are no transactions for 2022"),
            "{empty_state:?}"
        );
        assert!(
            html.select(&Selector::parse("#cashflow-chart").unwrap())
                .next()
                .is_none()
        );
    }

    #[tokio::test]
    async fn year_filter_offers_range_and_selected_year() {
        let response = get_dashboard_page(State(seeded_state()), query("2024"))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        let options = html
            .select(&Selector::parse("select[name=year] option").unwrap())
            .map(|option| {
                (
                    option.text().collect::<String>(),
                    option.value().attr("selected").is_some(),
                )
            })
            .collect::<Vec<_>>();
        assert_eq!(
            options,
            vec![("2024".to_owned(), true), ("2023".to_owned(), false)]
        );
    }

    #[tokio::test]
    async fn invalid_year_falls_back_to_current_year() {
        let today = local_today("Etc/UTC").unwrap();

        let response = get_dashboard_page(State(seeded_state()), query("1066"))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        let selected = html
            .select(&Selector::parse("select[name=year] option[selected]").unwrap())
            .next()
            .and_then(|option| option.value().attr("value").map(str::to_owned));
        assert_eq!(selected, Some(today.year().to_string()));
    }

    #[tokio::test]
    async fn store_failure_renders_error_page() {
        let state = DashboardState {
            transaction_store: Arc::new(FailingStore) as Arc<dyn TransactionStore>,
            local_timezone: "Etc/UTC".to_owned(),
        };

        let response = get_dashboard_page(State(state), query("2024"))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let html = parse_html_document(response).await;
        assert!(
            html.select(&Selector::parse("[data-cashflow-summary]").unwrap())
                .next()
                .is_none()
        );
    }
}

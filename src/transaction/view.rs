//! HTML rendering for the monthly transactions page.

use axum::http::Uri;
use maud::{Markup, html};

use crate::{
    alert::Alert,
    endpoints,
    html::{
        BUTTON_SECONDARY_STYLE, CATEGORY_BADGE_STYLE, EXPENSE_BADGE_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, INCOME_BADGE_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, date_attribute,
        format_currency, format_month_year, format_ordinal_date, month_abbrev,
        truncate_description,
    },
    navigation::NavBar,
    period::{MONTHS, MonthPeriod},
    transaction::core::{Transaction, TransactionType},
};

/// The message shown when the selected month has no transactions.
pub(crate) const EMPTY_MONTH_MESSAGE: &str = "There are no transactions for this month";

fn amount_class(transaction_type: TransactionType) -> &'static str {
    match transaction_type {
        TransactionType::Income => "text-green-700 dark:text-green-300",
        TransactionType::Expense => "text-red-700 dark:text-red-300",
    }
}

fn type_badge_style(transaction_type: TransactionType) -> &'static str {
    match transaction_type {
        TransactionType::Income => INCOME_BADGE_STYLE,
        TransactionType::Expense => EXPENSE_BADGE_STYLE,
    }
}

pub(crate) fn transactions_view(
    period: MonthPeriod,
    transactions: &[Transaction],
    year_options: &[i32],
    show_created_alert: bool,
) -> Markup {
    let create_transaction_route = Uri::from_static(endpoints::NEW_TRANSACTION_VIEW);
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();
    let heading = format!("{} Transactions", format_month_year(period.year, period.month));

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl"
            {
                @if show_created_alert {
                    (Alert::Success { message: "Transaction created".to_owned() }.into_html())
                }

                header class="flex justify-between flex-wrap items-end gap-4"
                {
                    h1 class="text-xl font-bold" { (heading) }

                    a href=(create_transaction_route) class=(LINK_STYLE)
                    {
                        "New Transaction"
                    }
                }

                (period_filter_form(period, year_options))

                section class="rounded bg-gray-50 dark:bg-gray-800 overflow-x-auto"
                {
                    @if transactions.is_empty() {
                        p
                            class="px-6 py-8 text-center text-gray-500 dark:text-gray-400"
                            data-empty-state="true"
                        {
                            (EMPTY_MONTH_MESSAGE)
                        }
                    } @else {
                        table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                        {
                            thead class=(TABLE_HEADER_STYLE)
                            {
                                tr
                                {
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                                    th scope="col" class="px-6 py-4 text-right" { "Amount" }
                                }
                            }

                            tbody
                            {
                                @for transaction in transactions {
                                    (transaction_row_view(transaction))
                                }
                            }
                        }
                    }
                }
            }
        }
    };

    base("Transactions", &[], &content)
}

fn transaction_row_view(transaction: &Transaction) -> Markup {
    let (description, tooltip) = truncate_description(&transaction.description);

    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-row="true"
        {
            td class="px-6 py-4 whitespace-nowrap"
            {
                time datetime=(date_attribute(transaction.date))
                {
                    (format_ordinal_date(transaction.date))
                }
            }
            td class=(TABLE_CELL_STYLE) title=[tooltip] { (description) }
            td class=(TABLE_CELL_STYLE)
            {
                span class=(type_badge_style(transaction.transaction_type))
                {
                    (transaction.transaction_type.label())
                }
            }
            td class=(TABLE_CELL_STYLE)
            {
                span class=(CATEGORY_BADGE_STYLE) { (transaction.category) }
            }
            td class={ "px-6 py-4 text-right tabular-nums " (amount_class(transaction.transaction_type)) }
            {
                (format_currency(transaction.amount))
            }
        }
    }
}

fn period_filter_form(period: MonthPeriod, year_options: &[i32]) -> Markup {
    html! {
        form
            method="get"
            action=(endpoints::TRANSACTIONS_VIEW)
            class="flex flex-wrap items-end gap-4"
        {
            div
            {
                label for="month" class=(FORM_LABEL_STYLE) { "Month" }

                select name="month" id="month" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for month in MONTHS {
                        option value=(month as u8) selected[month == period.month]
                        {
                            (month_abbrev(month))
                        }
                    }
                }
            }

            div
            {
                label for="year" class=(FORM_LABEL_STYLE) { "Year" }

                select name="year" id="year" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for year in year_options {
                        option value=(year) selected[*year == period.year] { (year) }
                    }
                }
            }

            button type="submit" class=(BUTTON_SECONDARY_STYLE) { "Show" }
        }
    }
}

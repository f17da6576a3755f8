//! Table views for the cashflow card.

use maud::{Markup, html};

use crate::{
    cashflow::AnnualCashflow,
    html::{TABLE_CELL_STYLE, TABLE_ROW_STYLE, format_currency, month_abbrev},
    money::Money,
};

const TABLE_HEADER_CELL_STYLE: &str = "px-3 py-3 text-right";
const TABLE_DATA_CELL_STYLE: &str = "px-3 py-2 text-right whitespace-nowrap tabular-nums";
const TABLE_CELL_GREEN_STYLE: &str = "text-green-600 dark:text-green-400";
const TABLE_CELL_RED_STYLE: &str = "text-red-600 dark:text-red-400";

/// Gets the CSS class for coloring amounts (green for zero or more, red for negative).
fn amount_color_class(amount: Money) -> &'static str {
    if amount.is_negative() {
        TABLE_CELL_RED_STYLE
    } else {
        TABLE_CELL_GREEN_STYLE
    }
}

/// The yearly income, expense and net totals shown beside the chart.
pub(super) fn summary_panel(cashflow: &AnnualCashflow) -> Markup {
    let net = cashflow.net();

    html! {
        dl class="space-y-4" data-cashflow-summary="true"
        {
            div
            {
                dt class="text-sm text-gray-500 dark:text-gray-400" { "Income" }
                dd class={"text-lg font-semibold " (TABLE_CELL_GREEN_STYLE)} data-summary="income"
                {
                    (format_currency(cashflow.total_income()))
                }
            }

            div
            {
                dt class="text-sm text-gray-500 dark:text-gray-400" { "Expenses" }
                dd class={"text-lg font-semibold " (TABLE_CELL_RED_STYLE)} data-summary="expense"
                {
                    (format_currency(cashflow.total_expense()))
                }
            }

            div class="pt-4 border-t border-gray-200 dark:border-gray-700"
            {
                dt class="text-sm text-gray-500 dark:text-gray-400" { "Net" }
                dd class={"text-lg font-bold " (amount_color_class(net))} data-summary="net"
                {
                    (format_currency(net))
                }
            }
        }
    }
}

/// One row per month with income, expenses and net.
pub(super) fn monthly_table(cashflow: &AnnualCashflow) -> Markup {
    html! {
        div class="overflow-x-auto rounded-lg shadow"
        {
            table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class="text-xs text-gray-900 uppercase bg-gray-100 dark:bg-gray-700 dark:text-gray-400"
                {
                    tr
                    {
                        th scope="col" class="px-3 py-3" { "Month" }
                        th scope="col" class=(TABLE_HEADER_CELL_STYLE) { "Income" }
                        th scope="col" class=(TABLE_HEADER_CELL_STYLE) { "Expenses" }
                        th scope="col" class=(TABLE_HEADER_CELL_STYLE) { "Net" }
                    }
                }

                tbody
                {
                    @for month in &cashflow.months {
                        tr class=(TABLE_ROW_STYLE) data-month-row="true"
                        {
                            th scope="row" class={(TABLE_CELL_STYLE) " font-medium text-gray-900 dark:text-white"}
                            {
                                (month_abbrev(month.month))
                            }
                            td class=(TABLE_DATA_CELL_STYLE) { (format_currency(month.total_income)) }
                            td class=(TABLE_DATA_CELL_STYLE) { (format_currency(month.total_expense)) }
                            td class={(TABLE_DATA_CELL_STYLE) " " (amount_color_class(month.net()))}
                            {
                                (format_currency(month.net()))
                            }
                        }
                    }
                }
            }
        }
    }
}

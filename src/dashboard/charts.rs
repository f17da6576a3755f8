//! The ECharts bar chart of monthly income and expenses.

use charming::{
    Chart,
    component::{Axis, Grid, Legend},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, ItemStyle, JsFunction, Tooltip, Trigger,
    },
    series::bar,
};
use maud::{Markup, PreEscaped, html};

use crate::{cashflow::AnnualCashflow, html::HeadElement, html::month_abbrev};

/// The HTML element ID of the cashflow chart container.
pub(super) const CASHFLOW_CHART_ID: &str = "cashflow-chart";

/// A chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

impl DashboardChart {
    pub(super) fn cashflow(cashflow: &AnnualCashflow) -> Self {
        Self {
            id: CASHFLOW_CHART_ID,
            options: cashflow_chart(cashflow).to_string(),
        }
    }
}

pub(super) fn chart_container(chart: &DashboardChart) -> Markup {
    html!(
        div
            id=(chart.id)
            class="min-h-[320px] w-full rounded dark:bg-gray-100"
        {}
    )
}

/// Generates the JavaScript that initializes `chart` once the page loads.
///
/// The chart follows the system colour scheme and resizes with the window.
pub(super) fn chart_script(chart: &DashboardChart) -> HeadElement {
    let script = format!(
        r#"document.addEventListener('DOMContentLoaded', function() {{
            const chartDom = document.getElementById("{}");
            const chart = echarts.init(chartDom);
            const option = {};
            chart.setOption(option);

            window.addEventListener('resize', chart.resize);

            const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
            const updateTheme = () => {{
                const isDarkMode = darkModeMediaQuery.matches;
                chart.setTheme(isDarkMode ? 'dark' : 'default');
            }}
            darkModeMediaQuery.addEventListener('change', updateTheme);
            updateTheme();
        }});"#,
        chart.id, chart.options
    );

    HeadElement::ScriptSource(PreEscaped(script))
}

fn cashflow_chart(cashflow: &AnnualCashflow) -> Chart {
    let labels = cashflow
        .months
        .iter()
        .map(|month| month_abbrev(month.month))
        .collect::<Vec<_>>();
    let income = cashflow
        .months
        .iter()
        .map(|month| month.total_income.major_units())
        .collect::<Vec<_>>();
    let expenses = cashflow
        .months
        .iter()
        .map(|month| month.total_expense.major_units())
        .collect::<Vec<_>>();

    Chart::new()
        .tooltip(currency_tooltip())
        .legend(Legend::new().top("1%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(
            bar::Bar::new()
                .name("Income")
                .item_style(ItemStyle::new().color("#16a34a"))
                .data(income),
        )
        .series(
            bar::Bar::new()
                .name("Expenses")
                .item_style(ItemStyle::new().color("#dc2626"))
                .data(expenses),
        )
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-GB', {
              style: 'currency',
              currency: 'GBP'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}

#[cfg(test)]
mod tests {
    use time::Month;

    use crate::{cashflow::AnnualCashflow, html::HeadElement, money::Money};

    use super::{CASHFLOW_CHART_ID, DashboardChart, chart_script};

    #[test]
    fn chart_options_have_both_series_and_all_months() {
        let mut cashflow = AnnualCashflow::empty(2024);
        cashflow.months[2].total_income = Money::from_minor_units(100_000);
        cashflow.months[2].total_expense = Money::from_minor_units(4_050);

        let chart = DashboardChart::cashflow(&cashflow);

        assert_eq!(chart.id, CASHFLOW_CHART_ID);
        assert!(chart.options.contains("\"Income\""), "{}", chart.options);
        assert!(chart.options.contains("\"Expenses\""), "{}", chart.options);
        assert!(chart.options.contains("\"Jan\""));
        assert!(chart.options.contains("\"Dec\""));
        assert!(chart.options.contains("1000"));
        assert!(chart.options.contains("40.5"));
        assert_eq!(cashflow.months[2].month, Month::March);
    }

    #[test]
    fn script_initializes_chart_by_id() {
        let chart = DashboardChart::cashflow(&AnnualCashflow::empty(2024));

        match chart_script(&chart) {
            HeadElement::ScriptSource(script) => {
                assert!(script.0.contains(CASHFLOW_CHART_ID));
                assert!(script.0.contains("echarts.init"));
            }
            _ => panic!("want an inline script"),
        }
    }
}

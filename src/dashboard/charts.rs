//! Chart generation and rendering for the dashboard.
//!
//! Charts are built as ECharts options with `charming` and initialised by a
//! small script once the page has loaded:
//! - **Expenses by category**: a pie of each expense category's yearly total
//! - **Monthly totals**: income and expenses per month with the balance overlaid

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, Emphasis, EmphasisFocus, JsFunction,
        Tooltip, Trigger,
    },
    series::{Bar, Line, Pie},
};
use maud::{Markup, PreEscaped, html};
use rust_decimal::{Decimal, prelude::ToPrimitive};

use crate::{
    html::HeadElement,
    rollup::{CategoryExpense, MonthlyRollup, MonthlyTotals},
};

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Renders the HTML containers for dashboard charts.
pub(super) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Generates JavaScript initialization code for dashboard charts.
///
/// Each chart follows the system colour scheme and resizes with the window.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
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
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

fn to_f64(amount: Decimal) -> f64 {
    amount.to_f64().unwrap_or_default()
}

fn to_f64_series(totals: &MonthlyTotals) -> Vec<f64> {
    totals.iter().copied().map(to_f64).collect()
}

pub(super) fn expenses_by_category_chart(category_expenses: &[CategoryExpense]) -> Chart {
    let data: Vec<(f64, String)> = category_expenses
        .iter()
        .filter(|expense| !expense.value.is_zero())
        .map(|expense| (to_f64(expense.value), expense.name.clone()))
        .collect();

    Chart::new()
        .title(
            Title::new()
                .text("Expenses by category")
                .subtext("Whole year"),
        )
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter()),
        )
        .legend(Legend::new().bottom("1%"))
        .series(
            Pie::new()
                .name("Expenses")
                .radius(vec!["40%", "70%"])
                .data(data),
        )
}

pub(super) fn monthly_totals_chart(rollup: &MonthlyRollup) -> Chart {
    let labels: Vec<String> = rollup
        .months
        .iter()
        .map(|month| month.get(..3).unwrap_or(*month).to_owned())
        .collect();

    Chart::new()
        .title(
            Title::new()
                .text("Monthly totals")
                .subtext("Income and expenses per month"),
        )
        .tooltip(currency_tooltip())
        .legend(Legend::new().bottom("1%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("10%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(
            Bar::new()
                .name("Income")
                .emphasis(Emphasis::new().focus(EmphasisFocus::Series))
                .data(to_f64_series(&rollup.income.totals)),
        )
        .series(
            Bar::new()
                .name("Expenses")
                .emphasis(Emphasis::new().focus(EmphasisFocus::Series))
                .data(to_f64_series(&rollup.expense.totals)),
        )
        .series(
            Line::new()
                .name("Balance")
                .data(to_f64_series(&rollup.balance)),
        )
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}

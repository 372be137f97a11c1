//! The month by month grid of a table.

use maud::{Markup, html};
use rust_decimal::Decimal;

use crate::{
    budget_table::BudgetTableId,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, BUTTON_SECONDARY_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE, format_currency,
    },
    rollup::{CategoryRollup, MONTH_LABELS, MonthlyRollup, MonthlyTotals},
};

const CELL_INPUT_STYLE: &str = "w-24 p-1 rounded text-sm text-right bg-transparent \
    border border-transparent hover:border-gray-300 focus:border-blue-600 \
    dark:hover:border-gray-600 dark:focus:border-blue-500";

const CURRENT_MONTH_STYLE: &str = "bg-blue-50 dark:bg-blue-950";

const TOTAL_ROW_STYLE: &str = "font-semibold bg-gray-50 border-b dark:bg-gray-700 dark:border-gray-600";

fn amount_style(amount: Decimal) -> &'static str {
    if amount < Decimal::ZERO {
        "text-red-600 dark:text-red-400"
    } else {
        ""
    }
}

/// One block of rows in the grid, e.g. the fixed expenses.
struct Section<'a> {
    title: &'a str,
    categories: &'a [CategoryRollup],
    totals: &'a MonthlyTotals,
}

fn month_style(month_index: usize, current_month: Option<usize>) -> &'static str {
    if current_month == Some(month_index) {
        CURRENT_MONTH_STYLE
    } else {
        ""
    }
}

/// Render the grid for the rollup of table `table_id`.
///
/// `current_month` is the zero based index of the month to highlight, if the
/// table is for the current year.
pub(super) fn monthly_grid(
    table_id: BudgetTableId,
    rollup: &MonthlyRollup,
    current_month: Option<usize>,
) -> Markup {
    let sections = [
        Section {
            title: "Income",
            categories: &rollup.income.categories,
            totals: &rollup.income.totals,
        },
        Section {
            title: "Fixed expenses",
            categories: &rollup.expense.fixed.categories,
            totals: &rollup.expense.fixed.totals,
        },
        Section {
            title: "Variable expenses",
            categories: &rollup.expense.variable.categories,
            totals: &rollup.expense.variable.totals,
        },
        Section {
            title: "Extra expenses",
            categories: &rollup.expense.extra.categories,
            totals: &rollup.expense.extra.totals,
        },
        Section {
            title: "Investments",
            categories: &rollup.expense.investment.categories,
            totals: &rollup.expense.investment.totals,
        },
    ];

    html! {
        div class="w-full overflow-x-auto rounded shadow-md"
        {
            table id="monthly-grid" class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        @for (index, label) in rollup.months.iter().enumerate() {
                            th
                                scope="col"
                                class={ (TABLE_CELL_STYLE) " text-right " (month_style(index, current_month)) }
                                aria-current=[(current_month == Some(index)).then_some("date")]
                            {
                                (label.get(..3).unwrap_or(*label))
                            }
                        }
                        th scope="col" class={ (TABLE_CELL_STYLE) " text-right" } { "Total" }
                    }
                }

                @for section in &sections {
                    tbody
                    {
                        tr class=(TABLE_HEADER_STYLE)
                        {
                            th scope="colgroup" colspan="14" class=(TABLE_CELL_STYLE) { (section.title) }
                        }

                        @for category in section.categories {
                            (category_row(table_id, category, current_month))
                        }

                        (totals_row(&format!("Total {}", section.title.to_lowercase()), section.totals, current_month))
                    }
                }

                tfoot
                {
                    (totals_row("Total expenses", &rollup.expense.totals, current_month))
                    (totals_row("Balance", &rollup.balance, current_month))
                }
            }
        }
    }
}

fn category_row(
    table_id: BudgetTableId,
    category: &CategoryRollup,
    current_month: Option<usize>,
) -> Markup {
    let category_endpoint = format_endpoint(endpoints::CATEGORY, category.id);

    html! {
        tr class=(TABLE_ROW_STYLE) data-category-id=(category.id)
        {
            th scope="row" class={ (TABLE_CELL_STYLE) " font-medium text-gray-900 dark:text-white whitespace-nowrap" }
            {
                details
                {
                    summary class="cursor-pointer" { (category.name) }

                    form
                        hx-put=(category_endpoint)
                        hx-target-error="#alert-container"
                        class="flex gap-2 mt-2"
                    {
                        input
                            type="text"
                            name="name"
                            value=(category.name)
                            aria-label={ "New name for " (category.name) }
                            required
                            class="w-32 p-1 rounded text-sm border border-gray-300 dark:bg-gray-700 dark:border-gray-600";
                        button type="submit" class=(BUTTON_SECONDARY_STYLE) { "Rename" }
                    }

                    button
                        hx-delete=(category_endpoint)
                        hx-confirm={
                            "Are you sure you want to delete the category '" (category.name)
                            "'? All of its amounts will be deleted too."
                        }
                        hx-target-error="#alert-container"
                        class={ (BUTTON_DELETE_STYLE) " mt-2" }
                    {
                        "Delete"
                    }
                }
            }

            @for (index, amount) in category.monthly_totals.iter().enumerate() {
                td class={ (TABLE_CELL_STYLE) " text-right " (month_style(index, current_month)) }
                {
                    (month_cell_form(table_id, category, index, *amount))
                }
            }

            td class={ (TABLE_CELL_STYLE) " text-right" } { (format_currency(category.total)) }
        }
    }
}

/// An inline form that replaces the amount of one month when it changes.
fn month_cell_form(
    table_id: BudgetTableId,
    category: &CategoryRollup,
    month_index: usize,
    amount: Decimal,
) -> Markup {
    let month_label = MONTH_LABELS.get(month_index).copied().unwrap_or_default();

    html! {
        form
            hx-post=(endpoints::ENTRIES_API)
            hx-trigger="change"
            hx-target-error="#alert-container"
        {
            input type="hidden" name="table_id" value=(table_id);
            input type="hidden" name="category_id" value=(category.id);
            input type="hidden" name="month" value=(month_index + 1);
            input type="hidden" name="mode" value="replace";
            input
                type="text"
                name="amount"
                inputmode="decimal"
                value=(format!("{amount:.2}"))
                aria-label={ (category.name) " " (month_label) }
                required
                class=(CELL_INPUT_STYLE);
        }
    }
}

fn totals_row(title: &str, totals: &MonthlyTotals, current_month: Option<usize>) -> Markup {
    let total: Decimal = totals.iter().sum();

    html! {
        tr class=(TOTAL_ROW_STYLE)
        {
            th scope="row" class=(TABLE_CELL_STYLE) { (title) }

            @for (index, amount) in totals.iter().enumerate() {
                td class={
                    (TABLE_CELL_STYLE) " text-right " (month_style(index, current_month))
                    " " (amount_style(*amount))
                }
                {
                    (format_currency(*amount))
                }
            }

            td class={ (TABLE_CELL_STYLE) " text-right" } { (format_currency(total)) }
        }
    }
}

//! Forms for adding amounts and categories to the active table.

use maud::{Markup, html};

use crate::{
    budget_table::BudgetTableId,
    category::{Category, CategoryType, ExpenseSubtype, IncomeSubtype},
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
    rollup::MONTH_LABELS,
};

/// Adds an amount on top of whatever is already recorded for the month.
pub(super) fn add_to_month_form(
    table_id: BudgetTableId,
    categories: &[Category],
    default_month: u8,
) -> Markup {
    html! {
        form
            hx-post=(endpoints::ENTRIES_API)
            hx-target-error="#alert-container"
            class="flex flex-wrap items-end gap-3"
        {
            input type="hidden" name="table_id" value=(table_id);
            input type="hidden" name="mode" value="accumulate";

            div
            {
                label for="entry-category" class=(FORM_LABEL_STYLE) { "Category" }
                select id="entry-category" name="category_id" required class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for (label, category_type) in [
                        ("Income", CategoryType::Income),
                        ("Expenses", CategoryType::Expense),
                    ] {
                        optgroup label=(label)
                        {
                            @for category in categories
                                .iter()
                                .filter(|category| category.category_type() == category_type)
                            {
                                option value=(category.id) { (category.name) }
                            }
                        }
                    }
                }
            }

            div
            {
                label for="entry-month" class=(FORM_LABEL_STYLE) { "Month" }
                select id="entry-month" name="month" required class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for (index, label) in MONTH_LABELS.iter().enumerate() {
                        @let month = index as u8 + 1;
                        option value=(month) selected[month == default_month] { (label) }
                    }
                }
            }

            div
            {
                label for="entry-amount" class=(FORM_LABEL_STYLE) { "Amount" }
                input
                    id="entry-amount"
                    name="amount"
                    type="text"
                    inputmode="decimal"
                    placeholder="0.00"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add to month" }
            }
        }
    }
}

pub(super) fn new_category_form(table_id: BudgetTableId) -> Markup {
    html! {
        form
            hx-post=(endpoints::CATEGORIES_API)
            hx-target-error="#alert-container"
            class="flex flex-wrap items-end gap-3"
        {
            input type="hidden" name="table_id" value=(table_id);

            div
            {
                label for="category-name" class=(FORM_LABEL_STYLE) { "Name" }
                input
                    id="category-name"
                    name="name"
                    type="text"
                    placeholder="Insurance"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="category-type" class=(FORM_LABEL_STYLE) { "Type" }
                select id="category-type" name="type" required class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value=(CategoryType::Expense.as_str()) selected { "Expense" }
                    option value=(CategoryType::Income.as_str()) { "Income" }
                }
            }

            div
            {
                label for="category-subtype" class=(FORM_LABEL_STYLE) { "Subtype" }
                select id="category-subtype" name="subtype" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" selected { "Default" }
                    optgroup label="Expense"
                    {
                        @for subtype in ExpenseSubtype::ALL {
                            option value=(subtype.as_str()) { (subtype.label()) }
                        }
                    }
                    optgroup label="Income"
                    {
                        // Investment is shared with expenses and listed there.
                        @for subtype in IncomeSubtype::ALL
                            .into_iter()
                            .filter(|subtype| *subtype != IncomeSubtype::Investment)
                        {
                            option value=(subtype.as_str()) { (subtype.label()) }
                        }
                    }
                }
            }

            div
            {
                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add category" }
            }
        }
    }
}

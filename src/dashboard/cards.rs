//! Summary cards for the yearly income, expenses and balance.

use maud::{Markup, html};
use rust_decimal::Decimal;

use crate::{html::format_currency, rollup::DashboardRollup};

/// Renders the income, expense and balance cards.
pub(super) fn summary_cards_view(rollup: &DashboardRollup) -> Markup {
    html! {
        section class="w-full mx-auto mb-8"
        {
            div class="grid grid-cols-1 sm:grid-cols-3 gap-4"
            {
                (summary_card("Income", rollup.total_income, "text-green-600 dark:text-green-400"))
                (summary_card("Expenses", rollup.total_expense, "text-red-600 dark:text-red-400"))
                (summary_card("Balance", rollup.balance, balance_style(rollup.balance)))
            }
        }
    }
}

fn balance_style(balance: Decimal) -> &'static str {
    if balance < Decimal::ZERO {
        "text-red-600 dark:text-red-400"
    } else {
        "text-gray-900 dark:text-white"
    }
}

fn summary_card(title: &str, amount: Decimal, amount_style: &str) -> Markup {
    html! {
        div
            class="bg-white dark:bg-gray-800 border border-gray-200
                   dark:border-gray-700 rounded-lg p-4 shadow-md"
            aria-label={ (title) ": " (format_currency(amount)) }
        {
            h3 class="text-lg font-semibold mb-2" { (title) }
            div class={ "text-3xl font-bold " (amount_style) } { (format_currency(amount)) }
        }
    }
}

//! Monthly page handler and layout.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    budget_table::{
        BudgetTable, TableQuery, get_budget_tables_for_user, new_table_form, resolve_active_table,
        table_selector,
    },
    category::Category,
    endpoints::{self, format_endpoint},
    html::{BUTTON_DELETE_STYLE, PAGE_CONTAINER_STYLE, base},
    monthly_page::{
        forms::{add_to_month_form, new_category_form},
        grid::monthly_grid,
    },
    navigation::NavBar,
    rollup::{MonthlyRollup, load_categories_with_entries, monthly_rollup},
    timezone::local_today,
};

/// The state needed for the monthly page.
#[derive(Debug, Clone)]
pub struct MonthlyPageState {
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for MonthlyPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Display the month by month grid of the active table.
///
/// `?table=<id>` picks the table and remembers the choice.
pub async fn get_monthly_page(
    State(state): State<MonthlyPageState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<TableQuery>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let today = local_today(&state.local_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        Error::InvalidTimezoneError(state.local_timezone.clone())
    })?;

    let nav_bar = NavBar::new(endpoints::MONTHLY_VIEW).into_html();

    let Some(table) = resolve_active_table(user_id, query.table, &connection)? else {
        return Ok(no_tables_view(nav_bar, today.year()).into_response());
    };

    let tables = get_budget_tables_for_user(user_id, &connection)?;
    let categories = load_categories_with_entries(table.id, &connection)?;
    let rollup = monthly_rollup(&categories);
    let current_month =
        (today.year() == table.year).then(|| usize::from(u8::from(today.month())) - 1);

    let page = MonthlyPage {
        table: &table,
        tables: &tables,
        rollup: &rollup,
        current_month,
        default_year: today.year(),
    };

    let categories: Vec<_> = categories
        .into_iter()
        .map(|category_with_entries| category_with_entries.category)
        .collect();

    Ok(monthly_view(nav_bar, page, &categories).into_response())
}

struct MonthlyPage<'a> {
    table: &'a BudgetTable,
    tables: &'a [BudgetTable],
    rollup: &'a MonthlyRollup,
    current_month: Option<usize>,
    default_year: i32,
}

fn monthly_view(
    nav_bar: Markup,
    page: MonthlyPage<'_>,
    categories: &[Category],
) -> Markup {
    let table = page.table;
    let default_month = page.current_month.map_or(1, |index| index as u8 + 1);

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-screen-2xl space-y-6"
            {
                header class="flex flex-wrap justify-between items-center gap-4"
                {
                    h1 class="text-2xl font-bold" { (table.display_name()) }

                    div class="flex items-center gap-4"
                    {
                        (table_selector(page.tables, table, endpoints::MONTHLY_VIEW))

                        button
                            hx-delete=(format_endpoint(endpoints::TABLE, table.id))
                            hx-confirm={
                                "Are you sure you want to delete '" (table.display_name())
                                "'? All of its categories and amounts will be deleted too."
                            }
                            hx-target-error="#alert-container"
                            class=(BUTTON_DELETE_STYLE)
                        {
                            "Delete table"
                        }
                    }
                }

                (monthly_grid(table.id, page.rollup, page.current_month))

                section
                {
                    h2 class="text-xl font-semibold mb-3" { "Add to a month" }
                    (add_to_month_form(table.id, categories, default_month))
                }

                section
                {
                    h2 class="text-xl font-semibold mb-3" { "New category" }
                    (new_category_form(table.id))
                }

                section
                {
                    h2 class="text-xl font-semibold mb-3" { "New table" }
                    (new_table_form(page.default_year))
                }
            }
        }
    };

    base(&table.display_name(), &[], &content)
}

fn no_tables_view(nav_bar: Markup, default_year: i32) -> Markup {
    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            h2 class="text-xl font-bold" { "Nothing here yet..." }

            p class="mb-4" { "Create a table for a year to start tracking your budget." }

            (new_table_form(default_year))
        }
    };

    base("Monthly", &[], &content)
}

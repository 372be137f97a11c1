//! Dashboard HTTP handler and view rendering.

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
    dashboard::{
        cards::summary_cards_view,
        charts::{
            DashboardChart, charts_script, charts_view, expenses_by_category_chart,
            monthly_totals_chart,
        },
    },
    endpoints,
    html::{HeadElement, PAGE_CONTAINER_STYLE, base, link},
    navigation::NavBar,
    rollup::{DashboardRollup, dashboard_rollup, load_categories_with_entries, monthly_rollup},
    timezone::local_today,
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading tables and entries.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Display a yearly overview of the active table.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<TableQuery>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();

    let Some(table) = resolve_active_table(user_id, query.table, &connection)? else {
        let today = local_today(&state.local_timezone).ok_or_else(|| {
            tracing::error!("Invalid timezone {}", state.local_timezone);
            Error::InvalidTimezoneError(state.local_timezone.clone())
        })?;

        return Ok(dashboard_no_data_view(nav_bar, today.year()).into_response());
    };

    let tables = get_budget_tables_for_user(user_id, &connection)?;
    let categories = load_categories_with_entries(table.id, &connection)
        .inspect_err(|error| tracing::error!("could not load table {}: {error}", table.id))?;

    let summary = dashboard_rollup(&table, &categories);
    let charts = [
        DashboardChart {
            id: "expenses-chart",
            options: expenses_by_category_chart(&summary.category_expenses).to_string(),
        },
        DashboardChart {
            id: "monthly-chart",
            options: monthly_totals_chart(&monthly_rollup(&categories)).to_string(),
        },
    ];

    Ok(dashboard_view(nav_bar, &table, &tables, &summary, &charts).into_response())
}

/// Renders the dashboard page when the user has no tables yet.
fn dashboard_no_data_view(nav_bar: Markup, default_year: i32) -> Markup {
    let monthly_link = link(endpoints::MONTHLY_VIEW, "monthly page");

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            h2 class="text-xl font-bold"
            {
                "Nothing here yet..."
            }

            p class="mb-4"
            {
                "Charts will show up here once you create a table and add some amounts
                on the " (monthly_link) "."
            }

            (new_table_form(default_year))
        }
    );

    base("Dashboard", &[], &content)
}

fn dashboard_view(
    nav_bar: Markup,
    table: &BudgetTable,
    tables: &[BudgetTable],
    summary: &DashboardRollup,
    charts: &[DashboardChart],
) -> Markup {
    let monthly_link = link(&endpoints::monthly_view_for(table.id), "Open the monthly view");

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            header class="w-full flex flex-wrap justify-between items-center gap-4 mb-6"
            {
                h1 class="text-2xl font-bold" { (table.display_name()) }

                div class="flex items-center gap-4"
                {
                    (table_selector(tables, table, endpoints::DASHBOARD_VIEW))
                    (monthly_link)
                }
            }

            (summary_cards_view(summary))

            (charts_view(charts))
        }
    );

    let scripts = [
        HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
        charts_script(charts),
    ];

    base("Dashboard", &scripts, &content)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::{Query, State},
        http::StatusCode,
    };
    use rust_decimal::Decimal;
    use scraper::{Html, Selector};
    use time::Month;

    use crate::{
        budget_table::{TableQuery, create_budget_table},
        endpoints,
        entry::{UpsertMode, upsert_entry},
        rollup::load_categories_with_entries,
        test_utils::{
            assert_valid_html, get_test_db_connection, insert_test_user,
            must_get_form_by_endpoint, parse_html_document,
        },
    };

    use super::{DashboardState, get_dashboard_page};

    #[tokio::test]
    async fn dashboard_page_loads_successfully() {
        let connection = get_test_db_connection();
        let user = insert_test_user(&connection);
        let table = create_budget_table(user.id, 2025, None, &connection).unwrap();
        let categories = load_categories_with_entries(table.id, &connection).unwrap();
        for (category_with_entries, amount) in categories.iter().zip([5000, 1200]) {
            upsert_entry(
                &table,
                category_with_entries.category.id,
                Month::January,
                Decimal::from(amount),
                UpsertMode::Accumulate,
                &connection,
            )
            .unwrap();
        }
        let state = DashboardState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "Etc/UTC".to_owned(),
        };

        let response = get_dashboard_page(
            State(state),
            Extension(user.id),
            Query(TableQuery::default()),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_chart_exists(&html, "expenses-chart");
        assert_chart_exists(&html, "monthly-chart");
        must_get_form_by_endpoint(&html, "hx-post", endpoints::SELECTED_TABLE);

        let balance_card = html
            .select(&Selector::parse("div[aria-label^='Balance']").unwrap())
            .next()
            .expect("balance card");
        assert_eq!(balance_card.value().attr("aria-label"), Some("Balance: $3,800.00"));
    }

    #[tokio::test]
    async fn displays_prompt_text_on_no_tables() {
        let connection = get_test_db_connection();
        let user = insert_test_user(&connection);
        let state = DashboardState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "Etc/UTC".to_owned(),
        };

        let response = get_dashboard_page(
            State(state),
            Extension(user.id),
            Query(TableQuery::default()),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        must_get_form_by_endpoint(&html, "hx-post", endpoints::TABLES_API);
        assert!(html.select(&Selector::parse("#charts").unwrap()).next().is_none());
    }

    #[track_caller]
    fn assert_chart_exists(html: &Html, chart_id: &str) {
        let selector = Selector::parse(&format!("#{}", chart_id)).unwrap();
        assert!(
            html.select(&selector).next().is_some(),
            "Chart with id '{}' not found",
            chart_id
        );
    }
}

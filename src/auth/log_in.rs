//! The log-in page and the log-in form handler.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    AppState, Error,
    auth::{
        get_user_by_email, invalidate_auth_cookie, redirect::normalize_redirect_url,
        set_auth_cookie,
    },
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, LINK_STYLE, base, email_input, loading_spinner, log_in_register,
        password_input,
    },
    timezone::get_local_offset,
};

/// How long the auth cookie should last if the user selects "remember me" at log-in.
const REMEMBER_ME_COOKIE_DURATION: Duration = Duration::days(7);

pub const INVALID_CREDENTIALS_ERROR_MSG: &str = "Incorrect email or password.";
const INTERNAL_ERROR_MSG: &str = "An internal error occurred. Please try again later.";

fn log_in_form(email: &str, error_message: Option<&str>, redirect_url: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::LOG_IN_API)
            hx-indicator="#indicator"
            hx-disabled-elt="#email, #password, #submit-button"
            class="space-y-4 md:space-y-6"
        {
            @if let Some(redirect_url) = redirect_url {
                input type="hidden" name="redirect_url" value=(redirect_url);
            }

            (email_input(email, None))
            (password_input("", 0, error_message))

            div class="flex items-center gap-x-3"
            {
                input
                    type="checkbox"
                    name="remember_me"
                    id="remember_me"
                    tabindex="0"
                    class="rounded-xs";

                label
                    for="remember_me"
                    class="block text-sm font-medium text-gray-900 dark:text-white"
                {
                    "Keep me logged in for one week"
                }
            }

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                "Log in"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Don't have an account? "
                a href=(endpoints::REGISTER_VIEW) tabindex="0" class=(LINK_STYLE)
                {
                    "Register here"
                }
            }
        }
    }
}

fn parse_redirect_url(raw_url: Option<&str>, source: &str) -> Option<String> {
    let raw_url = raw_url.filter(|url| !url.is_empty())?;
    let redirect_url = normalize_redirect_url(raw_url);

    if redirect_url.is_none() {
        tracing::warn!("ignoring invalid redirect URL from {source}: {raw_url}");
    }

    redirect_url
}

#[derive(Deserialize)]
pub struct RedirectQuery {
    pub redirect_url: Option<String>,
}

/// Display the log-in page.
pub async fn get_log_in_page(Query(query): Query<RedirectQuery>) -> Response {
    let redirect_url = parse_redirect_url(query.redirect_url.as_deref(), "log-in query");
    let log_in_form = log_in_form("", None, redirect_url.as_deref());
    let content = log_in_register("Log in to your account", &log_in_form);

    base("Log In", &[], &content).into_response()
}

/// The state needed to perform a login.
#[derive(Debug, Clone)]
pub struct LoginState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LoginState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

impl FromRef<LoginState> for Key {
    fn from_ref(state: &LoginState) -> Self {
        state.cookie_key.clone()
    }
}

/// The data entered by the user in the log-in form.
#[derive(Clone, Serialize, Deserialize)]
pub struct LogInData {
    pub email: String,
    pub password: String,

    /// Set to any value when the "remember me" checkbox is ticked, missing
    /// otherwise.
    pub remember_me: Option<String>,

    /// Where to go after logging in.
    pub redirect_url: Option<String>,
}

/// Handler for log-in requests via the POST method.
///
/// On success the auth cookie is set and the client is redirected to the
/// page they came from, or the dashboard. Otherwise the form is returned with
/// an error message. Unknown emails and wrong passwords get the same message.
pub async fn post_log_in(
    State(state): State<LoginState>,
    jar: PrivateCookieJar,
    Form(user_data): Form<LogInData>,
) -> Response {
    let redirect_url = parse_redirect_url(user_data.redirect_url.as_deref(), "log-in form");
    let redirect_url = redirect_url.as_deref();
    let render_error =
        |message: &str| log_in_form(&user_data.email, Some(message), redirect_url).into_response();

    let user = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(error) => {
                tracing::error!("could not acquire database lock: {error}");
                return render_error(INTERNAL_ERROR_MSG);
            }
        };

        match get_user_by_email(&user_data.email, &connection) {
            Ok(user) => user,
            Err(Error::NotFound) => return render_error(INVALID_CREDENTIALS_ERROR_MSG),
            Err(error) => {
                tracing::error!("unhandled error while looking up user: {error}");
                return render_error(INTERNAL_ERROR_MSG);
            }
        }
    };

    match user.password_hash.verify(&user_data.password) {
        Ok(true) => {}
        Ok(false) => return render_error(INVALID_CREDENTIALS_ERROR_MSG),
        Err(error) => {
            tracing::error!("unhandled error while verifying credentials: {error}");
            return render_error(INTERNAL_ERROR_MSG);
        }
    }

    let cookie_duration = if user_data.remember_me.is_some() {
        REMEMBER_ME_COOKIE_DURATION
    } else {
        state.cookie_duration
    };

    let Some(local_offset) = get_local_offset(&state.local_timezone) else {
        return Error::InvalidTimezoneError(state.local_timezone).into_response();
    };

    let redirect_url = redirect_url.unwrap_or(endpoints::DASHBOARD_VIEW).to_owned();

    match set_auth_cookie(jar.clone(), user.id, cookie_duration, local_offset) {
        Ok(jar) => {
            tracing::info!("user {} logged in", user.id);
            (StatusCode::SEE_OTHER, HxRedirect(redirect_url), jar).into_response()
        }
        Err(error) => {
            tracing::error!("could not set auth cookie: {error}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                HxRedirect(endpoints::INTERNAL_ERROR_VIEW.to_owned()),
                invalidate_auth_cookie(jar),
            )
                .into_response()
        }
    }
}

//! The registration page and the handler that creates new users.

use std::{
    str::FromStr,
    sync::{Arc, Mutex},
};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use email_address::EmailAddress;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    AppState, Error,
    auth::{PasswordHash, ValidatedPassword, create_user, set_auth_cookie},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE, base,
        email_input, loading_spinner, log_in_register, password_input,
    },
    internal_server_error::get_internal_server_error_redirect,
    timezone::get_local_offset,
};

/// The minimum number of characters the password should have to be considered
/// valid on the client side. The server checks the strength on top of this.
const PASSWORD_INPUT_MIN_LENGTH: u8 = 14;

fn confirm_password_input(min_length: u8, error_message: Option<&str>) -> Markup {
    html! {
        div
        {
            label for="confirm-password" class=(FORM_LABEL_STYLE)
            {
                "Confirm Password"
            }

            input
                type="password"
                name="confirm_password"
                id="confirm-password"
                placeholder="••••••••"
                class=(FORM_TEXT_INPUT_STYLE)
                required
                minlength=(min_length)
                autofocus[error_message.is_some()];

            @if let Some(error_message) = error_message
            {
                p class="text-red-500 text-base" { (error_message) }
            }
        }
    }
}

/// Error messages for each field of the registration form.
#[derive(Default)]
struct RegistrationErrors<'a> {
    email: Option<&'a str>,
    password: Option<&'a str>,
    confirm_password: Option<&'a str>,
}

fn registration_form(email: &str, password: &str, errors: RegistrationErrors) -> Markup {
    html! {
        form
            hx-post=(endpoints::USERS)
            hx-indicator="#indicator"
            hx-disabled-elt="#email, #password, #confirm-password, #submit-button"
            class="space-y-4 md:space-y-6"
        {
            (email_input(email, errors.email))
            (password_input(password, PASSWORD_INPUT_MIN_LENGTH, errors.password))
            (confirm_password_input(PASSWORD_INPUT_MIN_LENGTH, errors.confirm_password))

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                "Create Account"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Already have an account? "
                a href=(endpoints::LOG_IN_VIEW) tabindex="0" class=(LINK_STYLE)
                {
                    "Log in here"
                }
            }
        }
    }
}

fn render_errors(user_data: &RegisterForm, errors: RegistrationErrors) -> Response {
    registration_form(&user_data.email, &user_data.password, errors).into_response()
}

/// Display the registration page.
pub async fn get_register_page() -> Response {
    let registration_form = registration_form("", "", RegistrationErrors::default());
    let content = log_in_register("Create an account", &registration_form);

    base("Register", &[], &content).into_response()
}

/// The state needed for creating a new user.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

impl FromRef<RegistrationState> for Key {
    fn from_ref(state: &RegistrationState) -> Self {
        state.cookie_key.clone()
    }
}

#[derive(Serialize, Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Create a user from the registration form and log them in.
///
/// Problems with the input are shown next to the offending field.
pub async fn register_user(
    State(state): State<RegistrationState>,
    jar: PrivateCookieJar,
    Form(user_data): Form<RegisterForm>,
) -> Response {
    let email = match EmailAddress::from_str(user_data.email.trim()) {
        Ok(email) => email,
        Err(_) => {
            let message = Error::InvalidEmail(user_data.email.clone()).to_string();
            return render_errors(&user_data, RegistrationErrors {
                email: Some(&message),
                ..Default::default()
            });
        }
    };

    let validated_password = match ValidatedPassword::new(&user_data.password, &[email.as_str()])
    {
        Ok(password) => password,
        Err(error) => {
            let message = error.to_string();
            return render_errors(&user_data, RegistrationErrors {
                password: Some(&message),
                ..Default::default()
            });
        }
    };

    if user_data.password != user_data.confirm_password {
        return render_errors(&user_data, RegistrationErrors {
            confirm_password: Some("Passwords do not match"),
            ..Default::default()
        });
    }

    let password_hash = match PasswordHash::new(validated_password, PasswordHash::DEFAULT_COST) {
        Ok(hash) => hash,
        Err(error) => {
            tracing::error!("an error occurred while hashing a password: {error}");
            return get_internal_server_error_redirect();
        }
    };

    let Some(local_offset) = get_local_offset(&state.local_timezone) else {
        return Error::InvalidTimezoneError(state.local_timezone).into_response();
    };

    let user = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(error) => {
                tracing::error!("could not acquire database lock: {error}");
                return get_internal_server_error_redirect();
            }
        };

        match create_user(email, password_hash, &connection) {
            Ok(user) => user,
            Err(Error::DuplicateEmail) => {
                let message = Error::DuplicateEmail.to_string();
                return render_errors(&user_data, RegistrationErrors {
                    email: Some(&message),
                    ..Default::default()
                });
            }
            Err(error) => {
                tracing::error!("an unhandled error occurred while inserting a new user: {error}");
                return get_internal_server_error_redirect();
            }
        }
    };

    tracing::info!("registered user {}", user.id);

    match set_auth_cookie(jar, user.id, state.cookie_duration, local_offset) {
        Ok(jar) => (
            StatusCode::SEE_OTHER,
            HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
            jar,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("an error occurred while setting the auth cookie: {error}");
            get_internal_server_error_redirect()
        }
    }
}

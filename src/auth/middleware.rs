//! Authentication middleware that validates the auth cookie, extends the
//! session and redirects anonymous users to the log-in page.

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::{StatusCode, header::SET_COOKIE},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use time::Duration;

use crate::{
    AppState,
    auth::{
        cookie::extend_auth_cookie_duration_if_needed,
        get_token_from_cookies,
        redirect::{build_log_in_redirect_url, log_in_url_with_redirect},
    },
    endpoints,
    timezone::get_local_offset,
};

/// How long a session is kept alive after each authenticated request.
const SESSION_EXTENSION: Duration = Duration::minutes(5);

/// The state needed for the auth middleware
#[derive(Clone)]
pub struct AuthState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

impl FromRef<AuthState> for Key {
    fn from_ref(state: &AuthState) -> Self {
        state.cookie_key.clone()
    }
}

async fn auth_guard_internal(
    state: AuthState,
    request: Request,
    next: Next,
    get_redirect: impl Fn(&str) -> Response,
) -> Response {
    let log_in_url = build_log_in_redirect_url(&request)
        .or_else(|| log_in_url_with_redirect(endpoints::DASHBOARD_VIEW))
        .unwrap_or_else(|| endpoints::LOG_IN_VIEW.to_owned());

    let Some(local_offset) = get_local_offset(&state.local_timezone) else {
        tracing::error!(
            "invalid timezone \"{}\", redirecting to log in page",
            state.local_timezone
        );
        return get_redirect(&log_in_url);
    };

    let (mut parts, body) = request.into_parts();
    let jar = match PrivateCookieJar::from_request_parts(&mut parts, &state).await {
        Ok(jar) => jar,
        Err(error) => {
            tracing::error!("could not get cookie jar: {error:?}");
            return get_redirect(&log_in_url);
        }
    };
    let user_id = match get_token_from_cookies(&jar) {
        Ok(token) => token.user_id,
        Err(error) => {
            tracing::debug!("rejecting request to {}: {error}", parts.uri.path());
            return get_redirect(&log_in_url);
        }
    };

    parts.extensions.insert(user_id);
    let response = next.run(Request::from_parts(parts, body)).await;

    let jar = match extend_auth_cookie_duration_if_needed(
        jar.clone(),
        SESSION_EXTENSION,
        local_offset,
    ) {
        Ok(jar) => jar,
        Err(error) => {
            tracing::error!("could not extend session for user {user_id}: {error}");
            jar
        }
    };

    let (mut parts, body) = response.into_parts();
    for cookie in jar.into_response().headers().get_all(SET_COOKIE) {
        parts.headers.append(SET_COOKIE, cookie.to_owned());
    }

    Response::from_parts(parts, body)
}

/// Middleware for page routes.
///
/// With a valid auth cookie the [UserID](crate::auth::UserID) is added to the
/// request extensions, so handlers can take `Extension(user_id): Extension<UserID>`.
/// Otherwise the client is redirected to the log-in page.
pub async fn auth_guard(State(state): State<AuthState>, request: Request, next: Next) -> Response {
    auth_guard_internal(state, request, next, |log_in_url| {
        Redirect::to(log_in_url).into_response()
    })
    .await
}

/// Middleware for HTMX routes.
///
/// Same as [auth_guard], but anonymous requests get an `HX-Redirect` to the
/// log-in page instead of a plain redirect.
pub async fn auth_guard_hx(
    State(state): State<AuthState>,
    request: Request,
    next: Next,
) -> Response {
    auth_guard_internal(state, request, next, |log_in_url| {
        (HxRedirect(log_in_url.to_owned()), StatusCode::OK).into_response()
    })
    .await
}

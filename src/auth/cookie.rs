//! Reading and writing the encrypted auth cookie.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime, UtcOffset};

use crate::{
    Error,
    auth::{Token, UserID},
};

pub(crate) const COOKIE_TOKEN: &str = "token";
/// The default duration for which auth cookies are valid.
pub const DEFAULT_COOKIE_DURATION: Duration = Duration::minutes(5);

/// Add an auth cookie for `user_id` that expires `duration` from now.
///
/// The expiry is recorded in the local timezone given by `local_offset`.
///
/// # Errors
///
/// Returns [Error::JSONSerializationError] if the token cannot be serialized.
pub fn set_auth_cookie(
    jar: PrivateCookieJar,
    user_id: UserID,
    duration: Duration,
    local_offset: UtcOffset,
) -> Result<PrivateCookieJar, Error> {
    let expires_at = OffsetDateTime::now_utc().to_offset(local_offset) + duration;

    set_token_cookie(jar, &Token {
        user_id,
        expires_at,
    })
}

fn set_token_cookie(jar: PrivateCookieJar, token: &Token) -> Result<PrivateCookieJar, Error> {
    let token_string = serde_json::to_string(token)
        .map_err(|error| Error::JSONSerializationError(error.to_string()))?;

    Ok(jar.add(
        Cookie::build((COOKIE_TOKEN, token_string))
            .expires(token.expires_at)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    ))
}

/// Overwrite the auth cookie with an expired, empty value so the client drops it.
pub fn invalidate_auth_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_TOKEN, "deleted"))
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}

/// Read the session token from the auth cookie.
///
/// # Errors
///
/// Returns [Error::CookieMissing] if there is no auth cookie, and
/// [Error::InvalidCredentials] if the token cannot be read or has expired.
pub fn get_token_from_cookies(jar: &PrivateCookieJar) -> Result<Token, Error> {
    let cookie = jar.get(COOKIE_TOKEN).ok_or(Error::CookieMissing)?;
    let token: Token =
        serde_json::from_str(cookie.value_trimmed()).map_err(|_| Error::InvalidCredentials)?;

    if !token.is_valid_at(OffsetDateTime::now_utc()) {
        return Err(Error::InvalidCredentials);
    }

    Ok(token)
}

/// Push the expiry of the auth cookie out to `duration` from now, unless it
/// already expires later than that.
///
/// # Errors
///
/// The jar is not modified if an error is returned. Returns:
/// - the errors of [get_token_from_cookies] if there is no valid token,
/// - [Error::InvalidDateFormat] if the new expiry overflows.
pub fn extend_auth_cookie_duration_if_needed(
    jar: PrivateCookieJar,
    duration: Duration,
    local_offset: UtcOffset,
) -> Result<PrivateCookieJar, Error> {
    let token = get_token_from_cookies(&jar)?;

    let new_expiry = OffsetDateTime::now_utc()
        .to_offset(local_offset)
        .checked_add(duration)
        .ok_or_else(|| {
            Error::InvalidDateFormat(
                format!("adding {duration} overflows"),
                token.expires_at.to_string(),
            )
        })?;

    if new_expiry <= token.expires_at {
        return Ok(jar);
    }

    set_token_cookie(jar, &Token {
        user_id: token.user_id,
        expires_at: new_expiry,
    })
}

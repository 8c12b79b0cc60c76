//! Auth routes: GitHub OAuth flow and session lookup.
//!
//! DESIGN
//! ======
//! The browser-facing half of the flow (`/api/login/github*`) always answers
//! with a redirect so the user lands back on the app; failures carry a short
//! `auth_error` reason in the query string. The JSON half
//! (`/api/auth/*`) reports the current session and signs out.

use axum::extract::{FromRef, FromRequestParts, OptionalFromRequestParts, Query, State};
use axum::http::request::Parts;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use time::Duration;

use crate::services::{auth as auth_svc, session};
use crate::state::AppState;

pub(crate) const COOKIE_NAME: &str = "session_token";
pub(crate) const OAUTH_STATE_COOKIE_NAME: &str = "github_oauth_state";
const OAUTH_STATE_TTL_MINUTES: i64 = 10;

/// Root-scoped, httpOnly, `SameSite=Lax` cookie living for `max_age`.
fn base_cookie(name: &'static str, value: String, secure: bool, max_age: Duration) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(max_age)
        .build()
}

fn expired_cookie(name: &'static str, secure: bool) -> Cookie<'static> {
    base_cookie(name, String::new(), secure, Duration::ZERO)
}

/// Browser lifetime of the session cookie, matching the server-side row.
fn session_cookie(token: String, secure: bool, ttl_days: i32) -> Cookie<'static> {
    base_cookie(COOKIE_NAME, token, secure, Duration::days(i64::from(ttl_days)))
}

/// `302 Found` to `location`, carrying whatever cookies `jar` holds.
fn found(jar: CookieJar, location: &str) -> Response {
    (StatusCode::FOUND, jar, [(header::LOCATION, location.to_owned())]).into_response()
}

fn not_configured() -> Response {
    (StatusCode::SERVICE_UNAVAILABLE, "GitHub OAuth not configured").into_response()
}

// =============================================================================
// AUTH EXTRACTOR
// =============================================================================

/// Signed-in account resolved from the `session_token` cookie.
/// Use as a handler parameter to require authentication, or as
/// `Option<AuthUser>` where signed-out callers are allowed.
pub struct AuthUser {
    pub account: session::Account,
    pub token: String,
}

async fn lookup<S>(parts: &Parts, state: &S) -> Result<Option<AuthUser>, StatusCode>
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    let jar = CookieJar::from_headers(&parts.headers);
    let token = jar.get(COOKIE_NAME).map(Cookie::value).unwrap_or_default();
    if token.is_empty() {
        return Ok(None);
    }

    let app_state = AppState::from_ref(state);
    let account = session::lookup_session(&app_state.pool, token)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "session lookup failed");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(account.map(|account| AuthUser { account, token: token.to_owned() }))
}

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        lookup(parts, state).await?.ok_or(StatusCode::UNAUTHORIZED)
    }
}

impl<S> OptionalFromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Option<Self>, Self::Rejection> {
        lookup(parts, state).await
    }
}

// =============================================================================
// LOGIN FLOW
// =============================================================================

/// `GET /api/login/github`: set the state cookie and redirect to GitHub.
pub async fn github_login(State(state): State<AppState>) -> Response {
    let Some(config) = &state.github else {
        return not_configured();
    };

    let oauth_state = session::generate_oauth_state();
    let cookie = base_cookie(
        OAUTH_STATE_COOKIE_NAME,
        oauth_state.clone(),
        state.cookie_secure,
        Duration::minutes(OAUTH_STATE_TTL_MINUTES),
    );

    let jar = CookieJar::new().add(cookie);
    found(jar, &config.authorize_url(&oauth_state))
}

#[derive(Deserialize)]
pub struct CallbackQuery {
    code: Option<String>,
    state: Option<String>,
    /// Set by GitHub when the user denies access.
    error: Option<String>,
}

/// Reason reported to the app in `/?auth_error=<reason>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CallbackFailure {
    AccessDenied,
    StateMismatch,
    MissingCode,
    TokenExchange,
    Profile,
    Server,
}

impl CallbackFailure {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::AccessDenied => "access_denied",
            Self::StateMismatch => "state_mismatch",
            Self::MissingCode => "missing_code",
            Self::TokenExchange => "token_exchange",
            Self::Profile => "profile",
            Self::Server => "server_error",
        }
    }

    pub(crate) fn location(self) -> String {
        format!("/?auth_error={}", self.as_str())
    }
}

/// Validate the callback parameters against the state cookie, yielding the code.
pub(crate) fn check_callback<'a>(params: &'a CallbackQuery, expected_state: &str) -> Result<&'a str, CallbackFailure> {
    if params.error.is_some() {
        return Err(CallbackFailure::AccessDenied);
    }
    let callback_state = params.state.as_deref().unwrap_or_default();
    if expected_state.is_empty() || expected_state != callback_state {
        return Err(CallbackFailure::StateMismatch);
    }
    params
        .code
        .as_deref()
        .filter(|c| !c.is_empty())
        .ok_or(CallbackFailure::MissingCode)
}

/// `GET /api/login/github/callback`: exchange code, upsert user, set cookie, redirect to `/`.
pub async fn github_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<CallbackQuery>,
) -> Response {
    let Some(config) = state.github.clone() else {
        return not_configured();
    };
    let secure = state.cookie_secure;

    let expected_state = jar
        .get(OAUTH_STATE_COOKIE_NAME)
        .map(Cookie::value)
        .unwrap_or_default()
        .to_owned();
    // The state cookie is single-use whatever the outcome.
    let jar = jar.add(expired_cookie(OAUTH_STATE_COOKIE_NAME, secure));

    match complete_login(&state, &config, &params, &expected_state).await {
        Ok(token) => {
            let jar = jar.add(session_cookie(token, secure, state.session_ttl_days));
            found(jar, "/")
        }
        Err(failure) => {
            tracing::warn!(reason = failure.as_str(), "github login failed");
            found(jar, &failure.location())
        }
    }
}

async fn complete_login(
    state: &AppState,
    config: &auth_svc::GitHubConfig,
    params: &CallbackQuery,
    expected_state: &str,
) -> Result<String, CallbackFailure> {
    let code = check_callback(params, expected_state)?;

    let access_token = auth_svc::exchange_code(&state.http, config, code)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "github rejected the oauth code");
            CallbackFailure::TokenExchange
        })?;

    let gh_user = auth_svc::fetch_github_user(&state.http, &access_token)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "github profile unavailable");
            CallbackFailure::Profile
        })?;

    let email = match gh_user.email.clone() {
        Some(email) => Some(email),
        None => auth_svc::fetch_primary_email(&state.http, &access_token)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, login = %gh_user.login, "github email fetch failed");
                None
            }),
    };

    let user_id = auth_svc::upsert_user(&state.pool, &gh_user, email.as_deref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "could not store github user");
            CallbackFailure::Server
        })?;

    let token = session::create_session(&state.pool, user_id, state.session_ttl_days)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "could not open session");
            CallbackFailure::Server
        })?;

    tracing::info!(%user_id, login = %gh_user.login, "user signed in");
    Ok(token)
}

// =============================================================================
// SESSION
// =============================================================================

/// `GET /api/auth/session`: `{ "user": { "name" } }` or `null`.
pub async fn session(auth: Option<AuthUser>) -> Json<Option<todos::Session>> {
    Json(auth.map(|a| a.account.to_session()))
}

/// `POST /api/auth/signout`: delete session, clear cookie.
pub async fn signout(State(state): State<AppState>, auth: Option<AuthUser>) -> impl IntoResponse {
    if let Some(auth) = auth {
        if let Err(e) = session::delete_session(&state.pool, &auth.token).await {
            tracing::warn!(error = %e, user_id = %auth.account.id, "session delete failed");
        }
    }

    let jar = CookieJar::new().add(expired_cookie(COOKIE_NAME, state.cookie_secure));
    (jar, StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;

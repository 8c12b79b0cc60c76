use super::*;

fn params(code: Option<&str>, state: Option<&str>, error: Option<&str>) -> CallbackQuery {
    CallbackQuery {
        code: code.map(str::to_owned),
        state: state.map(str::to_owned),
        error: error.map(str::to_owned),
    }
}

// =============================================================================
// check_callback
// =============================================================================

#[test]
fn check_callback_accepts_matching_state() {
    let p = params(Some("abc"), Some("nonce"), None);
    assert_eq!(check_callback(&p, "nonce"), Ok("abc"));
}

#[test]
fn check_callback_rejects_state_mismatch() {
    let p = params(Some("abc"), Some("other"), None);
    assert_eq!(check_callback(&p, "nonce"), Err(CallbackFailure::StateMismatch));
}

#[test]
fn check_callback_rejects_missing_cookie() {
    let p = params(Some("abc"), Some(""), None);
    assert_eq!(check_callback(&p, ""), Err(CallbackFailure::StateMismatch));
}

#[test]
fn check_callback_rejects_missing_state_param() {
    let p = params(Some("abc"), None, None);
    assert_eq!(check_callback(&p, "nonce"), Err(CallbackFailure::StateMismatch));
}

#[test]
fn check_callback_rejects_missing_code() {
    let p = params(None, Some("nonce"), None);
    assert_eq!(check_callback(&p, "nonce"), Err(CallbackFailure::MissingCode));
    let p = params(Some(""), Some("nonce"), None);
    assert_eq!(check_callback(&p, "nonce"), Err(CallbackFailure::MissingCode));
}

#[test]
fn check_callback_reports_provider_denial_first() {
    let p = params(None, Some("other"), Some("access_denied"));
    assert_eq!(check_callback(&p, "nonce"), Err(CallbackFailure::AccessDenied));
}

// =============================================================================
// CallbackFailure
// =============================================================================

#[test]
fn failure_location_targets_root_with_reason() {
    assert_eq!(CallbackFailure::StateMismatch.location(), "/?auth_error=state_mismatch");
    assert_eq!(CallbackFailure::Server.location(), "/?auth_error=server_error");
}

// =============================================================================
// cookies
// =============================================================================

#[test]
fn base_cookie_is_http_only_lax_root() {
    let cookie = base_cookie(OAUTH_STATE_COOKIE_NAME, "tok".into(), true, Duration::minutes(10));
    assert_eq!(cookie.value(), "tok");
    assert_eq!(cookie.path(), Some("/"));
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    assert_eq!(cookie.secure(), Some(true));
    assert_eq!(cookie.max_age(), Some(Duration::minutes(10)));
}

#[test]
fn session_cookie_outlives_the_browser_for_the_session_ttl() {
    let cookie = session_cookie("tok".into(), false, 30);
    assert_eq!(cookie.name(), COOKIE_NAME);
    assert_eq!(cookie.max_age(), Some(Duration::days(30)));
    assert_eq!(cookie.http_only(), Some(true));
    assert!(cookie.to_string().contains("Max-Age=2592000"));
}

#[test]
fn expired_cookie_has_zero_max_age() {
    let cookie = expired_cookie(OAUTH_STATE_COOKIE_NAME, false);
    assert_eq!(cookie.value(), "");
    assert_eq!(cookie.max_age(), Some(Duration::ZERO));
    assert_eq!(cookie.secure(), Some(false));
}

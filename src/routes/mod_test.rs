use super::*;
use axum::body::{self, Body};
use axum::http::{Request, header};
use tower::ServiceExt;

use crate::config::Config;
use crate::state::test_helpers::{test_app_state, test_app_state_with, test_config};

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn healthz_returns_ok() {
    let response = app(test_app_state()).oneshot(get_request("/healthz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn login_redirects_to_github_with_state_cookie() {
    let response = app(test_app_state())
        .oneshot(get_request("/api/login/github"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);

    let location = response.headers()[header::LOCATION].to_str().unwrap();
    assert!(location.starts_with("https://github.com/login/oauth/authorize?"));
    assert!(location.contains("scope=user%3Aemail"));
    assert!(location.contains("client_id=test-client"));

    let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with("github_oauth_state="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(cookie.contains("Path=/"));
    assert!(cookie.contains("Max-Age=600"));
    assert!(!cookie.contains("Secure"));

    let nonce = cookie
        .trim_start_matches("github_oauth_state=")
        .split(';')
        .next()
        .unwrap();
    assert!(location.contains(&format!("state={nonce}")));
}

#[tokio::test]
async fn login_cookie_is_secure_when_configured() {
    let config = Config { cookie_secure: true, ..test_config() };
    let response = app(test_app_state_with(&config))
        .oneshot(get_request("/api/login/github"))
        .await
        .unwrap();
    let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.contains("Secure"));
}

#[tokio::test]
async fn login_without_github_config_is_unavailable() {
    let config = Config { github: None, ..test_config() };
    let response = app(test_app_state_with(&config))
        .oneshot(get_request("/api/login/github"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn callback_with_wrong_state_redirects_with_error() {
    let request = Request::builder()
        .method("GET")
        .uri("/api/login/github/callback?code=abc&state=forged")
        .header(header::COOKIE, "github_oauth_state=expected")
        .body(Body::empty())
        .unwrap();
    let response = app(test_app_state()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "/?auth_error=state_mismatch");

    let cleared = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|c| c.starts_with("github_oauth_state=") && c.contains("Max-Age=0"));
    assert!(cleared, "state cookie should be cleared");
}

#[tokio::test]
async fn callback_denied_by_user_redirects_with_error() {
    let response = app(test_app_state())
        .oneshot(get_request("/api/login/github/callback?error=access_denied"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "/?auth_error=access_denied");
}

#[tokio::test]
async fn session_without_cookie_is_null() {
    let response = app(test_app_state())
        .oneshot(get_request("/api/auth/session"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert!(json.is_null());
}

#[tokio::test]
async fn signout_without_session_clears_cookie() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/signout")
        .body(Body::empty())
        .unwrap();
    let response = app(test_app_state()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with("session_token="));
    assert!(cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn todos_require_session() {
    let response = app(test_app_state()).oneshot(get_request("/api/todos")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .method("PUT")
        .uri("/api/todos")
        .header("content-type", "application/json")
        .body(Body::from("[]"))
        .unwrap();
    let response = app(test_app_state()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn layout_requires_session() {
    let response = app(test_app_state())
        .oneshot(get_request("/api/settings/layout"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

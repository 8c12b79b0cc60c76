use super::*;

#[test]
fn url_joins_without_double_slash() {
    let api = ApiClient::new("http://127.0.0.1:3000/", None).unwrap();
    assert_eq!(api.url("/api/todos"), "http://127.0.0.1:3000/api/todos");
    assert_eq!(api.login_url(), "http://127.0.0.1:3000/api/login/github");
}

#[test]
fn blank_token_is_no_session() {
    assert!(!ApiClient::new("http://localhost", None).unwrap().has_session());
    assert!(!ApiClient::new("http://localhost", Some("  ")).unwrap().has_session());
    assert!(ApiClient::new("http://localhost", Some("abc123")).unwrap().has_session());
}

#[test]
fn token_with_newline_is_rejected() {
    let err = ApiClient::new("http://localhost", Some("abc\ndef")).unwrap_err();
    assert!(matches!(err, CliError::InvalidHeader(_)));
}

#[test]
fn save_error_maps_unauthorized() {
    assert!(matches!(save_error(CliError::Unauthorized), SaveError::Unauthorized));
}

#[test]
fn save_error_maps_server_rejection() {
    let err = save_error(CliError::Server { status: 400, message: "duplicate".into() });
    match err {
        SaveError::Rejected(msg) => {
            assert!(msg.contains("400"));
            assert!(msg.contains("duplicate"));
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[test]
fn save_error_maps_other_failures_to_transport() {
    let err = save_error(CliError::InvalidBaseUrl("nope".into()));
    assert!(matches!(err, SaveError::Transport(_)));
}

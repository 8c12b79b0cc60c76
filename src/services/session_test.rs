use super::*;

#[test]
fn random_hex_has_two_chars_per_byte() {
    assert_eq!(random_hex(0), "");
    let hex = random_hex(5);
    assert_eq!(hex.len(), 10);
    assert!(hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
}

#[test]
fn session_token_is_64_hex_chars() {
    let token = generate_token();
    assert_eq!(token.len(), 64);
    assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn oauth_state_is_32_hex_chars() {
    assert_eq!(generate_oauth_state().len(), 32);
}

#[test]
fn tokens_are_not_repeated() {
    assert_ne!(generate_token(), generate_token());
    assert_ne!(generate_oauth_state(), generate_oauth_state());
}

#[test]
fn session_view_exposes_only_name() {
    let account = Account { id: Uuid::nil(), name: "The Octocat".into() };
    let json = serde_json::to_value(account.to_session()).unwrap();
    assert_eq!(json, serde_json::json!({ "user": { "name": "The Octocat" } }));
}

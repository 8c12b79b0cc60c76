use super::*;

#[tokio::test]
async fn state_carries_github_config() {
    let state = test_helpers::test_app_state();
    let github = state.github.expect("github configured");
    assert_eq!(github.client_id, "test-client");
    assert!(!state.cookie_secure);
}

#[tokio::test]
async fn state_without_github_disables_login() {
    let config = Config { github: None, ..test_helpers::test_config() };
    let state = test_helpers::test_app_state_with(&config);
    assert!(state.github.is_none());
    assert_eq!(&*state.leetcode_graphql_url, "https://leetcode.com/graphql");
}

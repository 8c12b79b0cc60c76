use super::*;
use time::macros::date;

fn sample_question(qid: &str) -> Question {
    Question {
        qid: qid.into(),
        title: "Two Sum".into(),
        title_slug: "two-sum".into(),
        difficulty: Some(Difficulty::Easy),
        tags: vec!["Array".into()],
    }
}

// =============================================================================
// parse_daily
// =============================================================================

#[test]
fn parse_daily_extracts_question() {
    let body = r#"{
        "data": {
            "activeDailyCodingChallengeQuestion": {
                "date": "2024-06-15",
                "question": {
                    "questionFrontendId": "42",
                    "title": "Trapping Rain Water",
                    "titleSlug": "trapping-rain-water",
                    "difficulty": "Hard",
                    "topicTags": [{"name": "Array"}, {"name": "Two Pointers"}]
                }
            }
        }
    }"#;
    let q = parse_daily(body).unwrap();
    assert_eq!(q.qid, "42");
    assert_eq!(q.title_slug, "trapping-rain-water");
    assert_eq!(q.difficulty, Some(Difficulty::Hard));
    assert_eq!(q.tags, vec!["Array".to_owned(), "Two Pointers".to_owned()]);
}

#[test]
fn parse_daily_tolerates_missing_tags_and_unknown_difficulty() {
    let body = r#"{"data":{"activeDailyCodingChallengeQuestion":{"question":{
        "questionFrontendId":"1","title":"Two Sum","titleSlug":"two-sum","difficulty":"Legendary"}}}}"#;
    let q = parse_daily(body).unwrap();
    assert!(q.tags.is_empty());
    assert!(q.difficulty.is_none());
}

#[test]
fn parse_daily_rejects_missing_data() {
    let err = parse_daily(r#"{"errors":[{"message":"rate limited"}]}"#).unwrap_err();
    assert!(matches!(err, QuestionError::Malformed(_)));
}

#[test]
fn parse_daily_rejects_non_json() {
    assert!(matches!(parse_daily("<html>").unwrap_err(), QuestionError::Malformed(_)));
}

// =============================================================================
// DailyCache
// =============================================================================

#[tokio::test]
async fn daily_cache_hits_only_for_same_day() {
    let cache = DailyCache::default();
    assert!(cache.get(date!(2024 - 06 - 15)).await.is_none());

    cache.put(date!(2024 - 06 - 15), sample_question("1")).await;
    assert_eq!(cache.get(date!(2024 - 06 - 15)).await.unwrap().qid, "1");
    assert!(cache.get(date!(2024 - 06 - 16)).await.is_none());
}

#[tokio::test]
async fn daily_cache_clones_share_storage() {
    let cache = DailyCache::default();
    let clone = cache.clone();
    clone.put(date!(2024 - 06 - 15), sample_question("7")).await;
    assert_eq!(cache.get(date!(2024 - 06 - 15)).await.unwrap().qid, "7");
}

// =============================================================================
// search helpers
// =============================================================================

#[test]
fn like_pattern_wraps_and_trims() {
    assert_eq!(like_pattern("  two sum "), "%two sum%");
}

#[test]
fn like_pattern_escapes_wildcards() {
    assert_eq!(like_pattern("100%_a\\b"), "%100\\%\\_a\\\\b%");
}

#[test]
fn clamp_limit_defaults_and_bounds() {
    assert_eq!(clamp_limit(None), DEFAULT_SEARCH_LIMIT);
    assert_eq!(clamp_limit(Some(0)), 1);
    assert_eq!(clamp_limit(Some(500)), 50);
    assert_eq!(clamp_limit(Some(25)), 25);
}

use super::*;
use crate::NewTodo;
use time::macros::date;

const TODAY: Date = date!(2024 - 06 - 15);

fn todo(title: &str, done: bool, date: Option<Date>) -> TodoItem {
    let mut item = TodoItem::new(NewTodo { title: Some(title.to_owned()), date, ..NewTodo::default() });
    item.done = done;
    item
}

fn titles(items: &[&TodoItem]) -> Vec<String> {
    items.iter().map(|t| t.title.clone()).collect()
}

fn mixed_list() -> Vec<TodoItem> {
    vec![
        todo("undated", false, None),
        todo("yesterday", false, Some(date!(2024 - 06 - 14))),
        todo("today", false, Some(TODAY)),
        todo("tomorrow", false, Some(date!(2024 - 06 - 16))),
        todo("next-week", false, Some(date!(2024 - 06 - 22))),
        todo("done-past", true, Some(date!(2024 - 06 - 01))),
        todo("done-future", true, Some(date!(2024 - 07 - 01))),
        todo("done-undated", true, None),
    ]
}

// =============================================================================
// partition
// =============================================================================

#[test]
fn partition_assigns_each_section() {
    let list = mixed_list();
    let p = partition(&list, TODAY);
    assert_eq!(titles(&p.in_progress), ["undated", "yesterday", "today"]);
    assert_eq!(titles(&p.planned), ["tomorrow", "next-week"]);
    assert_eq!(titles(&p.done), ["done-past", "done-future", "done-undated"]);
}

#[test]
fn partition_is_exact_cover() {
    let list = mixed_list();
    let p = partition(&list, TODAY);
    assert_eq!(p.len(), list.len());

    let mut seen: Vec<_> = Section::ALL
        .iter()
        .flat_map(|s| p.section(*s).iter().map(|t| t.id))
        .collect();
    seen.sort();
    let mut expected: Vec<_> = list.iter().map(|t| t.id).collect();
    expected.sort();
    assert_eq!(seen, expected);
}

#[test]
fn partition_of_empty_list_is_empty() {
    let empty: Vec<TodoItem> = Vec::new();
    let p = partition(&empty, TODAY);
    assert!(p.is_empty());
}

#[test]
fn undated_open_todo_is_always_in_progress() {
    let item = todo("x", false, None);
    for today in [date!(2000 - 01 - 01), TODAY, date!(2099 - 12 - 31)] {
        assert_eq!(section_of(&item, today), Section::InProgress);
    }
}

#[test]
fn done_ignores_date() {
    assert_eq!(section_of(&todo("x", true, Some(date!(2030 - 01 - 01))), TODAY), Section::Done);
}

#[test]
fn section_parse_accepts_aliases() {
    assert_eq!(Section::parse("progress"), Some(Section::InProgress));
    assert_eq!(Section::parse("Future"), Some(Section::Planned));
    assert_eq!(Section::parse("done"), Some(Section::Done));
    assert_eq!(Section::parse("later"), None);
}

// =============================================================================
// filters
// =============================================================================

#[test]
fn empty_filters_match_everything() {
    let list = mixed_list();
    assert!(Filters::default().is_empty());
    assert_eq!(filter(&list, &Filters::default()).len(), list.len());
}

#[test]
fn difficulty_filter_excludes_unrated() {
    let mut easy = todo("easy", false, None);
    easy.difficulty = Some(Difficulty::Easy);
    let mut hard = todo("hard", false, None);
    hard.difficulty = Some(Difficulty::Hard);
    let unrated = todo("unrated", false, None);
    let list = vec![easy, hard, unrated];

    let filters = Filters { difficulty: [Difficulty::Hard].into(), ..Filters::default() };
    assert_eq!(titles(&filter(&list, &filters)), ["hard"]);
}

#[test]
fn tag_filter_matches_any_shared_tag() {
    let mut a = todo("a", false, None);
    a.tags = vec!["Array".to_owned()];
    let mut b = todo("b", false, None);
    b.tags = vec!["Graph".to_owned(), "BFS".to_owned()];
    let c = todo("c", false, None);
    let list = vec![a, b, c];

    let filters = Filters { tags: ["BFS".to_owned(), "Array".to_owned()].into(), ..Filters::default() };
    assert_eq!(titles(&filter(&list, &filters)), ["a", "b"]);
}

#[test]
fn board_filters_before_partitioning() {
    let mut list = mixed_list();
    list[0].tags = vec!["DP".to_owned()];
    list[3].tags = vec!["DP".to_owned()];
    let filters = Filters { tags: ["DP".to_owned()].into(), ..Filters::default() };

    let p = board(&list, &filters, TODAY);
    assert_eq!(titles(&p.in_progress), ["undated"]);
    assert_eq!(titles(&p.planned), ["tomorrow"]);
    assert!(p.done.is_empty());
}

#[test]
fn first_difficulty_follows_ordering() {
    let filters = Filters { difficulty: [Difficulty::Hard, Difficulty::Medium].into(), ..Filters::default() };
    assert_eq!(filters.first_difficulty(), Some(Difficulty::Medium));
    assert_eq!(Filters::default().first_difficulty(), None);
}

// =============================================================================
// group_by_date
// =============================================================================

#[test]
fn group_by_date_increasing_puts_undated_first() {
    let list = vec![
        todo("b1", false, Some(date!(2024 - 06 - 20))),
        todo("a", false, Some(date!(2024 - 06 - 16))),
        todo("none", false, None),
        todo("b2", false, Some(date!(2024 - 06 - 20))),
    ];
    let refs: Vec<_> = list.iter().collect();
    let groups = group_by_date(&refs, DateOrder::Increasing);

    let keys: Vec<_> = groups.iter().map(|(d, _)| *d).collect();
    assert_eq!(keys, [None, Some(date!(2024 - 06 - 16)), Some(date!(2024 - 06 - 20))]);
    assert_eq!(titles(&groups[2].1), ["b1", "b2"]);
}

#[test]
fn group_by_date_decreasing_puts_newest_first() {
    let list = vec![
        todo("old", true, Some(date!(2024 - 06 - 01))),
        todo("new", true, Some(date!(2024 - 06 - 14))),
        todo("none", true, None),
    ];
    let refs: Vec<_> = list.iter().collect();
    let groups = group_by_date(&refs, DateOrder::Decreasing);

    let keys: Vec<_> = groups.iter().map(|(d, _)| *d).collect();
    assert_eq!(keys, [Some(date!(2024 - 06 - 14)), Some(date!(2024 - 06 - 01)), None]);
}

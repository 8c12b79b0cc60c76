use super::*;
use time::macros::date;
use todos::NewTodo;
use todos::views::Section;

const TODAY: Date = date!(2024 - 06 - 15);

fn todo(title: &str, date: Option<Date>, done: bool) -> TodoItem {
    let mut item = TodoItem::new(NewTodo { title: Some(title.to_owned()), date, ..NewTodo::default() });
    item.done = done;
    item
}

fn position(haystack: &str, needle: &str) -> usize {
    haystack.find(needle).unwrap_or_else(|| panic!("{needle:?} not in:\n{haystack}"))
}

#[test]
fn todo_line_shows_id_mark_and_metadata() {
    let mut item = todo("Two Sum", Some(TODAY), true);
    item.difficulty = Some(Difficulty::Easy);
    item.tags = vec!["Array".into(), "Hash Table".into()];
    let line = todo_line(&item, true);
    assert!(line.starts_with(&short_id(&item)));
    assert!(line.contains("[x] Two Sum (Easy) #Array #Hash Table @2024-06-15"));
}

#[test]
fn todo_line_marks_untitled() {
    let item = todo("", None, false);
    assert!(todo_line(&item, false).contains("[ ] (untitled)"));
}

#[test]
fn short_id_is_eight_hex_chars() {
    let item = todo("x", None, false);
    let id = short_id(&item);
    assert_eq!(id.len(), 8);
    assert!(item.id.simple().to_string().starts_with(&id));
}

#[test]
fn row_layout_lists_sections_in_order() {
    let todos = vec![
        todo("later", Some(date!(2024 - 06 - 20)), false),
        todo("now", None, false),
        todo("finished", Some(TODAY), true),
    ];
    let out = board(&todos, &BoardState::default(), TODAY);
    assert!(position(&out, "In Progress (1)") < position(&out, "Planned (1)"));
    assert!(position(&out, "Planned (1)") < position(&out, "Done (1)"));
    assert!(position(&out, "In Progress") < position(&out, "now"));
    assert!(position(&out, "Planned") < position(&out, "later"));
    assert!(position(&out, "Done") < position(&out, "finished"));
}

#[test]
fn planned_groups_ascend_and_done_groups_descend() {
    let todos = vec![
        todo("p-late", Some(date!(2024 - 06 - 30)), false),
        todo("p-soon", Some(date!(2024 - 06 - 16)), false),
        todo("d-old", Some(date!(2024 - 06 - 01)), true),
        todo("d-new", Some(date!(2024 - 06 - 14)), true),
    ];
    let out = board(&todos, &BoardState::default(), TODAY);
    assert!(position(&out, "p-soon") < position(&out, "p-late"));
    assert!(position(&out, "d-new") < position(&out, "d-old"));
    assert!(position(&out, "  2024-06-16") < position(&out, "  2024-06-30"));
}

#[test]
fn collapsed_section_hides_items() {
    let todos = vec![todo("hidden", Some(TODAY), true), todo("visible", None, false)];
    let mut state = BoardState::default();
    state.sections.set(Section::Done, false);
    let out = board(&todos, &state, TODAY);
    assert!(out.contains("Done (1) [collapsed]"));
    assert!(!out.contains("hidden"));
    assert!(out.contains("visible"));
}

#[test]
fn filters_and_daily_goal_are_announced() {
    let mut easy = todo("easy one", None, false);
    easy.difficulty = Some(Difficulty::Easy);
    let hard = todo("hard one", None, false);

    let mut state = BoardState::default();
    state.filters.difficulty.insert(Difficulty::Easy);
    state.daily_done = true;

    let out = board(&[easy, hard], &state, TODAY);
    assert!(out.starts_with("daily challenge done\nfilters: difficulty=Easy"));
    assert!(out.contains("easy one"));
    assert!(!out.contains("hard one"));
}

#[test]
fn col_layout_puts_sections_side_by_side() {
    let todos = vec![todo("now", None, false), todo("later", Some(date!(2024 - 06 - 20)), false)];
    let state = BoardState { layout: Layout::Col, ..BoardState::default() };
    let out = board(&todos, &state, TODAY);
    let first = out.lines().next().unwrap();
    assert!(first.starts_with("In Progress (1)"));
    assert!(first.contains(" | Planned (1)"));
    assert!(first.contains(" | Done (0)"));
}

#[test]
fn fit_pads_and_truncates() {
    assert_eq!(fit("abc", 5), "abc  ");
    assert_eq!(fit("abcdefgh", 5), "abcd~");
}

#[test]
fn question_line_lists_tags() {
    let q = Question {
        qid: "1".into(),
        title: "Two Sum".into(),
        title_slug: "two-sum".into(),
        difficulty: Some(Difficulty::Easy),
        tags: vec!["Array".into(), "Hash Table".into()],
    };
    assert_eq!(question_line(&q), "1. Two Sum (Easy) [Array, Hash Table]");
}

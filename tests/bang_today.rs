// Tests for the trailing "!" due-today shortcut and how it composes with parsing.
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use quickadd::model::{DateValue, ParserConfig, TokenType, apply_bang_today, build_draft_at};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()
}

fn now() -> NaiveDateTime {
    today().and_hms_opt(14, 45, 0).unwrap()
}

#[test]
fn test_trailing_bang_means_today_at_midnight() {
    let out = apply_bang_today("Buy milk !", today());
    assert_eq!(out.title, "Buy milk");
    let due = out.due.expect("bang should set a due date");
    assert_eq!(due.start(), today().and_time(NaiveTime::MIN));
    assert_eq!(out.remainder_end, "Buy milk".len());
}

#[test]
fn test_lone_bang() {
    let out = apply_bang_today("!", today());
    assert_eq!(out.title, "");
    assert_eq!(out.due, Some(DateValue::AllDay(today())));

    let out = apply_bang_today("   !  ", today());
    assert_eq!(out.title, "");
    assert_eq!(out.due, Some(DateValue::AllDay(today())));
}

#[test]
fn test_bang_glued_to_word_is_text() {
    let out = apply_bang_today("call bob!", today());
    assert_eq!(out.title, "call bob!");
    assert!(out.due.is_none());
    assert_eq!(out.remainder_end, "call bob!".len());
}

#[test]
fn test_surrounding_whitespace() {
    let out = apply_bang_today("  Buy milk   !  ", today());
    assert_eq!(out.title, "Buy milk");
    assert!(out.due.is_some());
}

#[test]
fn test_only_bangs_do_not_match() {
    for input in ["!!", "! !", "Wow!!"] {
        let out = apply_bang_today(input, today());
        assert!(out.due.is_none(), "input: {}", input);
        assert_eq!(out.title, input);
    }
}

#[test]
fn test_bang_wins_over_parsed_date() {
    let draft = build_draft_at("Call mom tomorrow !", &ParserConfig::default(), now());
    assert_eq!(draft.title, "Call mom");
    assert_eq!(draft.due, Some(DateValue::AllDay(today())));

    // The parser still saw and claimed "tomorrow", but never the "!"
    let parse = draft.parse.expect("parser enabled");
    let date = parse.tokens_of(TokenType::Date).next().unwrap();
    assert_eq!(date.raw, "tomorrow");
}

#[test]
fn test_bang_works_with_parser_disabled() {
    let config = ParserConfig {
        enabled: false,
        ..ParserConfig::default()
    };
    let draft = build_draft_at("Buy milk #groceries !", &config, now());
    assert!(draft.parse.is_none());
    assert_eq!(draft.title, "Buy milk #groceries");
    assert_eq!(draft.due, Some(DateValue::AllDay(today())));
    assert!(draft.project.is_none());
}

#[test]
fn test_draft_without_bang() {
    let draft = build_draft_at("Buy milk #groceries @errand", &ParserConfig::default(), now());
    assert_eq!(draft.title, "Buy milk");
    assert!(draft.due.is_none());
    assert_eq!(draft.project.as_deref(), Some("groceries"));
    assert_eq!(draft.labels, vec!["errand".to_string()]);

    let config = ParserConfig {
        enabled: false,
        ..ParserConfig::default()
    };
    let draft = build_draft_at("  Buy   milk tomorrow ", &config, now());
    assert_eq!(draft.title, "Buy milk tomorrow");
    assert!(draft.due.is_none());
}

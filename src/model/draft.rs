// Combines the "!" shortcut with a parse pass into the draft a caller submits.
use crate::model::bang::apply_bang_today;
use crate::model::parser::{ParserConfig, parse_at};
use crate::model::token::{DateValue, ParseResult};
use chrono::{Local, NaiveDateTime};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TaskDraft {
    pub title: String,
    pub due: Option<DateValue>,
    pub project: Option<String>,
    pub labels: Vec<String>,
    /// Parse of the text the parser saw (the input minus any trailing " !").
    pub parse: Option<ParseResult>,
}

pub fn build_draft(input: &str, config: &ParserConfig) -> TaskDraft {
    build_draft_at(input, config, Local::now().naive_local())
}

/// The shortcut runs first and is not gated by `config.enabled`. When it
/// matches, the parser never sees the trailing "!" and the shortcut's date
/// wins over any parsed date.
pub fn build_draft_at(input: &str, config: &ParserConfig, now: NaiveDateTime) -> TaskDraft {
    let bang = apply_bang_today(input, now.date());
    let parse = parse_at(&input[..bang.remainder_end], config, now);

    let title = match (&parse, bang.due) {
        (Some(p), _) => p.title.clone(),
        (None, Some(_)) => bang.title,
        (None, None) => input.split_whitespace().collect::<Vec<_>>().join(" "),
    };

    TaskDraft {
        title,
        due: bang.due.or(parse.as_ref().and_then(|p| p.due)),
        project: parse.as_ref().and_then(|p| p.project.clone()),
        labels: parse.as_ref().map(|p| p.labels.clone()).unwrap_or_default(),
        parse,
    }
}

// The "!" shortcut: a trailing, space-separated "!" means due today.
use crate::model::token::DateValue;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BangOutcome {
    pub title: String,
    pub due: Option<DateValue>,
    /// Byte offset where the text before the shortcut ends. Equal to the
    /// input length when nothing matched.
    pub remainder_end: usize,
}

/// Applies the shortcut independently of the parser configuration.
///
/// - `"Buy milk !"` -> title `"Buy milk"`, due today
/// - `"!"` -> empty title, due today
/// - `"call bob!"` -> unchanged, no date
pub fn apply_bang_today(input: &str, today: NaiveDate) -> BangOutcome {
    let trimmed = input.trim();
    if trimmed == "!" {
        let leading = input.len() - input.trim_start().len();
        return BangOutcome {
            title: String::new(),
            due: Some(DateValue::AllDay(today)),
            remainder_end: leading,
        };
    }

    if let Some(before) = input.trim_end().strip_suffix('!')
        && before.ends_with(char::is_whitespace)
    {
        let kept = before.trim_end();
        if kept.chars().any(|c| c != '!' && !c.is_whitespace()) {
            return BangOutcome {
                title: kept.trim().to_string(),
                due: Some(DateValue::AllDay(today)),
                remainder_end: kept.len(),
            };
        }
    }

    BangOutcome {
        title: input.to_string(),
        due: None,
        remainder_end: input.len(),
    }
}

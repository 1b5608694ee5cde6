// File: src/model/token.rs
// Token and result types produced by the smart-input parser.
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// The closed set of token kinds the parser can emit.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TokenType {
    Project,
    Label,
    Date,
}

/// A resolved due date. All-day values have no time component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateValue {
    AllDay(NaiveDate),
    Specific(NaiveDateTime),
}

impl DateValue {
    pub fn date(&self) -> NaiveDate {
        match self {
            DateValue::AllDay(d) => *d,
            DateValue::Specific(dt) => dt.date(),
        }
    }

    /// Start instant; midnight for all-day values.
    pub fn start(&self) -> NaiveDateTime {
        match self {
            DateValue::AllDay(d) => d.and_time(NaiveTime::MIN),
            DateValue::Specific(dt) => *dt,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenValue {
    /// Project or label name, unquoted.
    Reference(String),
    Date(DateValue),
}

/// A typed span of the input. `start..end` is a half-open byte range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedToken {
    pub kind: TokenType,
    pub start: usize,
    pub end: usize,
    pub value: TokenValue,
    pub raw: String,
}

impl ParsedToken {
    pub fn reference_name(&self) -> Option<&str> {
        match &self.value {
            TokenValue::Reference(name) => Some(name),
            TokenValue::Date(_) => None,
        }
    }

    pub fn date_value(&self) -> Option<DateValue> {
        match self.value {
            TokenValue::Date(d) => Some(d),
            TokenValue::Reference(_) => None,
        }
    }
}

/// Output of one parse pass. Tokens are in extraction order, not
/// left-to-right.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParseResult {
    pub tokens: Vec<ParsedToken>,
    pub title: String,
    pub due: Option<DateValue>,
    pub project: Option<String>,
    pub labels: Vec<String>,
}

impl ParseResult {
    pub fn tokens_of(&self, kind: TokenType) -> impl Iterator<Item = &ParsedToken> {
        self.tokens.iter().filter(move |t| t.kind == kind)
    }

    pub fn has(&self, kind: TokenType) -> bool {
        self.tokens.iter().any(|t| t.kind == kind)
    }

    /// Tokens sorted by position, for highlighting.
    pub fn tokens_by_position(&self) -> Vec<&ParsedToken> {
        let mut sorted: Vec<&ParsedToken> = self.tokens.iter().collect();
        sorted.sort_by_key(|t| t.start);
        sorted
    }
}

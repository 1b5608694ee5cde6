// File: src/model/parser.rs
use crate::model::dates::{DateResolver, NaturalDateResolver, extract_date};
use crate::model::prefixes::{RefKind, SyntaxMode, get_prefixes};
use crate::model::token::{ParseResult, ParsedToken, TokenType, TokenValue};
use chrono::{Local, NaiveDateTime};
use std::collections::BTreeSet;

/// Immutable input to [`parse`]. Equality and hashing cover every field so
/// callers can memoize on `(input, config)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParserConfig {
    pub enabled: bool,
    pub syntax_mode: SyntaxMode,
    pub suppress_types: BTreeSet<TokenType>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            syntax_mode: SyntaxMode::default(),
            suppress_types: BTreeSet::new(),
        }
    }
}

impl ParserConfig {
    pub fn with_suppressed(mut self, types: impl IntoIterator<Item = TokenType>) -> Self {
        self.suppress_types.extend(types);
        self
    }

    fn is_suppressed(&self, kind: TokenType) -> bool {
        self.suppress_types.contains(&kind)
    }
}

/// Byte ranges already claimed by an extractor during one parse pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsumedRegions {
    ranges: Vec<(usize, usize)>,
}

impl ConsumedRegions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claim(&mut self, start: usize, end: usize) {
        if start < end {
            self.ranges.push((start, end));
        }
    }

    pub fn overlaps(&self, start: usize, end: usize) -> bool {
        self.ranges.iter().any(|&(s, e)| s < end && start < e)
    }

    pub fn contains(&self, pos: usize) -> bool {
        self.ranges.iter().any(|&(s, e)| s <= pos && pos < e)
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn ranges(&self) -> &[(usize, usize)] {
        &self.ranges
    }
}

/// Parses `input` against the local clock.
///
/// Returns `None` when parsing is disabled or the input is blank.
pub fn parse(input: &str, config: &ParserConfig) -> Option<ParseResult> {
    parse_at(input, config, Local::now().naive_local())
}

pub fn parse_at(input: &str, config: &ParserConfig, now: NaiveDateTime) -> Option<ParseResult> {
    parse_with(input, config, &NaturalDateResolver, now)
}

/// Runs the extractors in priority order (project, label, date) over a shared
/// ledger. Suppressed kinds are skipped and their text stays in the title.
pub fn parse_with(
    input: &str,
    config: &ParserConfig,
    resolver: &dyn DateResolver,
    now: NaiveDateTime,
) -> Option<ParseResult> {
    if !config.enabled || input.trim().is_empty() {
        return None;
    }

    let prefixes = get_prefixes(config.syntax_mode);
    let mut ledger = ConsumedRegions::new();
    let mut tokens = Vec::new();

    if !config.is_suppressed(TokenType::Project)
        && let Some(token) =
            extract_references(input, prefixes.project, RefKind::Project, &mut ledger)
                .into_iter()
                .next()
    {
        tokens.push(token);
    }

    if !config.is_suppressed(TokenType::Label) {
        tokens.extend(extract_references(
            input,
            prefixes.label,
            RefKind::Label,
            &mut ledger,
        ));
    }

    if !config.is_suppressed(TokenType::Date)
        && let Some(token) = extract_date(input, &mut ledger, resolver, now)
    {
        tokens.push(token);
    }

    let title = title_residue(input, &ledger);
    let due = tokens.iter().find_map(|t| t.date_value());
    let project = tokens
        .iter()
        .find(|t| t.kind == TokenType::Project)
        .and_then(|t| t.reference_name())
        .map(str::to_string);
    let mut labels: Vec<String> = Vec::new();
    for name in tokens
        .iter()
        .filter(|t| t.kind == TokenType::Label)
        .filter_map(|t| t.reference_name())
    {
        if !labels.iter().any(|l| l == name) {
            labels.push(name.to_string());
        }
    }

    Some(ParseResult {
        tokens,
        title,
        due,
        project,
        labels,
    })
}

/// Finds `prefix`-led references that start a word and are not yet claimed.
///
/// Projects only keep the first hit; see `parse_with`. Every returned token is
/// already claimed in `ledger`.
fn extract_references(
    input: &str,
    prefix: char,
    kind: RefKind,
    ledger: &mut ConsumedRegions,
) -> Vec<ParsedToken> {
    let mut found = Vec::new();
    let mut prev: Option<char> = None;

    for (idx, c) in input.char_indices() {
        let at_word_start = prev.is_none_or(char::is_whitespace);
        prev = Some(c);
        if c != prefix || !at_word_start || ledger.contains(idx) {
            continue;
        }

        let body_start = idx + c.len_utf8();
        let Some((name, end)) = read_reference_name(input, body_start) else {
            continue;
        };
        if ledger.overlaps(idx, end) {
            continue;
        }
        ledger.claim(idx, end);
        found.push(ParsedToken {
            kind: match kind {
                RefKind::Project => TokenType::Project,
                RefKind::Label => TokenType::Label,
            },
            start: idx,
            end,
            value: TokenValue::Reference(name),
            raw: input[idx..end].to_string(),
        });
        if kind == RefKind::Project {
            break;
        }
    }
    found
}

/// Reads a bare word or a `"quoted name"` starting at `from`.
/// Returns the unquoted name and the end offset of the raw text.
fn read_reference_name(input: &str, from: usize) -> Option<(String, usize)> {
    let rest = &input[from..];
    if let Some(quoted) = rest.strip_prefix('"') {
        let mut escaped = false;
        let mut close = None;
        for (i, c) in quoted.char_indices() {
            if escaped {
                escaped = false;
                continue;
            }
            match c {
                '\\' => escaped = true,
                '"' => {
                    close = Some(i);
                    break;
                }
                _ => {}
            }
        }
        // Unterminated quotes run to the end of input.
        let (inner, end) = match close {
            Some(i) => (&quoted[..i], from + 1 + i + 1),
            None => (quoted, input.len()),
        };
        let name = unescape(inner);
        return (!name.trim().is_empty()).then_some((name, end));
    }

    let len = rest.find(char::is_whitespace).unwrap_or(rest.len());
    if len == 0 {
        return None;
    }
    Some((rest[..len].to_string(), from + len))
}

fn title_residue(input: &str, ledger: &ConsumedRegions) -> String {
    let mut residue = String::with_capacity(input.len());
    for (idx, c) in input.char_indices() {
        if ledger.contains(idx) {
            // Keep word boundaries where a token is cut out.
            if !residue.ends_with(' ') {
                residue.push(' ');
            }
        } else {
            residue.push(c);
        }
    }
    residue.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            } else {
                out.push('\\');
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Formats a reference so the parser reads it back as a single token.
pub fn quote_reference(prefix: char, name: &str) -> String {
    if name.is_empty() || name.chars().any(|c| c.is_whitespace() || c == '"' || c == '\\') {
        let escaped = name.replace('\\', "\\\\").replace('"', "\\\"");
        format!("{}\"{}\"", prefix, escaped)
    } else {
        format!("{}{}", prefix, name)
    }
}

// File: src/model/dates.rs
// Natural-language date resolution and the date extractor.
//
// The resolver scans free text for English date/time phrases and returns every
// candidate left-to-right. Relative phrases are forward-biased: "friday" or
// "jan 5" never land in the past. Explicit ISO dates are taken as written.
//
// Supported:
//   today, tonight, tomorrow, tmr, day after tomorrow
//   monday / mon ... (next occurrence, today included)
//   next friday, next week, next month, next year
//   in 3 days, in two weeks, in 3d
//   2025-01-05, jan 5, January 5th, 5 jan
//   ... at 5pm, ... 17:30, at 9am (standalone)
use crate::model::parser::ConsumedRegions;
use crate::model::token::{DateValue, ParsedToken, TokenType, TokenValue};
use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

/// One match reported by a resolver: `text` was found at byte `index`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateCandidate {
    pub index: usize,
    pub text: String,
    pub value: DateValue,
}

impl DateCandidate {
    pub fn span(&self) -> (usize, usize) {
        (self.index, self.index + self.text.len())
    }
}

/// Source of date candidates. Implementations return candidates in their own
/// ranking order; the extractor only ever looks at the first.
pub trait DateResolver {
    fn resolve(&self, text: &str, now: NaiveDateTime) -> Vec<DateCandidate>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NaturalDateResolver;

impl DateResolver for NaturalDateResolver {
    fn resolve(&self, text: &str, now: NaiveDateTime) -> Vec<DateCandidate> {
        let words = split_words(text);
        let mut out = Vec::new();
        let mut i = 0;
        while i < words.len() {
            if let Some((value, consumed)) = match_phrase(&words, i, now) {
                let start = words[i].start;
                let end = words[i + consumed - 1].end;
                out.push(DateCandidate {
                    index: start,
                    text: text[start..end].to_string(),
                    value,
                });
                i += consumed;
            } else {
                i += 1;
            }
        }
        out
    }
}

/// Runs the resolver and claims the first candidate's span.
///
/// If that span overlaps text an earlier extractor already claimed, no date is
/// emitted at all; lower-ranked candidates are not consulted.
pub fn extract_date(
    input: &str,
    ledger: &mut ConsumedRegions,
    resolver: &dyn DateResolver,
    now: NaiveDateTime,
) -> Option<ParsedToken> {
    let candidate = resolver.resolve(input, now).into_iter().next()?;
    let (start, end) = candidate.span();
    let raw = input.get(start..end)?;
    if ledger.overlaps(start, end) {
        return None;
    }
    ledger.claim(start, end);
    Some(ParsedToken {
        kind: TokenType::Date,
        start,
        end,
        value: TokenValue::Date(candidate.value),
        raw: raw.to_string(),
    })
}

// --- WORD SCANNING ---

#[derive(Debug, Clone)]
struct Word {
    start: usize,
    end: usize,
    lower: String,
}

/// Splits on whitespace, then trims each word to its alphanumeric core so that
/// "tomorrow," or "#today" still expose the date word.
fn split_words(text: &str) -> Vec<Word> {
    let mut words = Vec::new();
    let mut run_start: Option<usize> = None;
    for (idx, c) in text.char_indices() {
        if c.is_whitespace() {
            if let Some(s) = run_start.take() {
                push_core(text, s, idx, &mut words);
            }
        } else if run_start.is_none() {
            run_start = Some(idx);
        }
    }
    if let Some(s) = run_start {
        push_core(text, s, text.len(), &mut words);
    }
    words
}

fn push_core(text: &str, start: usize, end: usize, out: &mut Vec<Word>) {
    let run = &text[start..end];
    let lead = run.len() - run.trim_start_matches(|c: char| !c.is_alphanumeric()).len();
    let core = run[lead..].trim_end_matches(|c: char| !c.is_alphanumeric());
    if core.is_empty() {
        return;
    }
    out.push(Word {
        start: start + lead,
        end: start + lead + core.len(),
        lower: core.to_lowercase(),
    });
}

// --- PHRASE MATCHING ---

fn word_at(words: &[Word], i: usize) -> Option<&str> {
    words.get(i).map(|w| w.lower.as_str())
}

/// Tries every phrase at position `i`; returns the value and the number of
/// words consumed, including any trailing time.
fn match_phrase(words: &[Word], i: usize, now: NaiveDateTime) -> Option<(DateValue, usize)> {
    let today = now.date();

    if let Some((date, consumed)) = match_date_part(words, i, today) {
        if let Some((time, extra)) = match_trailing_time(words, i + consumed) {
            return Some((DateValue::Specific(date.and_time(time)), consumed + extra));
        }
        return Some((DateValue::AllDay(date), consumed));
    }

    if word_at(words, i) == Some("tonight") {
        let time = NaiveTime::from_hms_opt(20, 0, 0)?;
        return Some((DateValue::Specific(today.and_time(time)), 1));
    }

    // Standalone time: today, or tomorrow once it has passed.
    let (time, consumed) = if word_at(words, i) == Some("at") {
        (parse_time_string(word_at(words, i + 1)?)?, 2)
    } else {
        (parse_time_string(word_at(words, i)?)?, 1)
    };
    let mut at = today.and_time(time);
    if at < now {
        at += Duration::days(1);
    }
    Some((DateValue::Specific(at), consumed))
}

fn match_date_part(words: &[Word], i: usize, today: NaiveDate) -> Option<(NaiveDate, usize)> {
    let first = word_at(words, i)?;
    match first {
        "today" => return Some((today, 1)),
        "tomorrow" | "tmr" | "tmrw" => return Some((today + Duration::days(1), 1)),
        "day" if word_at(words, i + 1) == Some("after")
            && word_at(words, i + 2) == Some("tomorrow") =>
        {
            return Some((today + Duration::days(2), 3));
        }
        "next" => {
            let d = parse_next_date(word_at(words, i + 1)?, today)?;
            return Some((d, 2));
        }
        "in" => {
            let (amount, unit, extra) =
                parse_amount_and_unit(word_at(words, i + 1)?, word_at(words, i + 2))?;
            let d = parse_in_date(amount, unit, today)?;
            return Some((d, 2 + extra));
        }
        _ => {}
    }

    if let Some(target) = parse_weekday(first) {
        return Some((upcoming_weekday(today, target, true), 1));
    }

    if let Ok(d) = NaiveDate::parse_from_str(first, "%Y-%m-%d") {
        return Some((d, 1));
    }

    // "jan 5" / "january 5th"
    if let Some(month) = parse_month(first)
        && let Some(day) = word_at(words, i + 1).and_then(parse_day_of_month)
    {
        return Some((forward_month_day(today, month, day)?, 2));
    }
    // "5 jan"
    if let Some(day) = parse_day_of_month(first)
        && let Some(month) = word_at(words, i + 1).and_then(parse_month)
    {
        return Some((forward_month_day(today, month, day)?, 2));
    }
    None
}

fn match_trailing_time(words: &[Word], i: usize) -> Option<(NaiveTime, usize)> {
    let w = word_at(words, i)?;
    if w == "at" {
        return parse_time_string(word_at(words, i + 1)?).map(|t| (t, 2));
    }
    parse_time_string(w).map(|t| (t, 1))
}

// --- DATE PARSING HELPERS ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Day,
    Week,
    Month,
    Year,
}

fn parse_unit(s: &str) -> Option<Unit> {
    match s {
        "d" | "day" | "days" => Some(Unit::Day),
        "w" | "week" | "weeks" => Some(Unit::Week),
        "mo" | "month" | "months" => Some(Unit::Month),
        "y" | "year" | "years" => Some(Unit::Year),
        _ => None,
    }
}

fn parse_english_number(s: &str) -> Option<u32> {
    match s {
        "a" | "an" | "one" => Some(1),
        "two" => Some(2),
        "three" => Some(3),
        "four" => Some(4),
        "five" => Some(5),
        "six" => Some(6),
        "seven" => Some(7),
        "eight" => Some(8),
        "nine" => Some(9),
        "ten" => Some(10),
        "eleven" => Some(11),
        "twelve" => Some(12),
        _ => s.parse::<u32>().ok(),
    }
}

/// Accepts "3 days", "two weeks" (one extra word) or glued "3d" (none).
fn parse_amount_and_unit(first: &str, second: Option<&str>) -> Option<(u32, Unit, usize)> {
    if let Some(next) = second
        && let Some(amount) = parse_english_number(first)
        && let Some(unit) = parse_unit(next)
    {
        return Some((amount, unit, 1));
    }
    let idx = first.find(|c: char| !c.is_ascii_digit())?;
    let (amount, unit) = first.split_at(idx);
    let amount = amount.parse::<u32>().ok()?;
    Some((amount, parse_unit(unit)?, 0))
}

fn parse_in_date(amount: u32, unit: Unit, today: NaiveDate) -> Option<NaiveDate> {
    match unit {
        Unit::Day => today.checked_add_signed(Duration::days(amount as i64)),
        Unit::Week => today.checked_add_signed(Duration::weeks(amount as i64)),
        Unit::Month => today.checked_add_months(Months::new(amount)),
        Unit::Year => today.checked_add_months(Months::new(amount.checked_mul(12)?)),
    }
}

fn parse_next_date(unit: &str, today: NaiveDate) -> Option<NaiveDate> {
    match unit {
        "week" => Some(today + Duration::days(7)),
        "month" => today.checked_add_months(Months::new(1)),
        "year" => today.checked_add_months(Months::new(12)),
        _ => parse_weekday(unit).map(|wd| upcoming_weekday(today, wd, false)),
    }
}

// Abbreviations that double as everyday words (sun, sat, wed) are left out.
fn parse_weekday(s: &str) -> Option<Weekday> {
    match s {
        "mon" | "monday" => Some(Weekday::Mon),
        "tue" | "tues" | "tuesday" => Some(Weekday::Tue),
        "wednesday" => Some(Weekday::Wed),
        "thu" | "thur" | "thurs" | "thursday" => Some(Weekday::Thu),
        "fri" | "friday" => Some(Weekday::Fri),
        "saturday" => Some(Weekday::Sat),
        "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

fn upcoming_weekday(from: NaiveDate, target: Weekday, include_today: bool) -> NaiveDate {
    let mut d = if include_today {
        from
    } else {
        from + Duration::days(1)
    };
    while d.weekday() != target {
        d += Duration::days(1);
    }
    d
}

fn parse_month(s: &str) -> Option<u32> {
    let m = match s {
        "jan" | "january" => 1,
        "feb" | "february" => 2,
        "mar" | "march" => 3,
        "apr" | "april" => 4,
        "may" => 5,
        "jun" | "june" => 6,
        "jul" | "july" => 7,
        "aug" | "august" => 8,
        "sep" | "sept" | "september" => 9,
        "oct" | "october" => 10,
        "nov" | "november" => 11,
        "dec" | "december" => 12,
        _ => return None,
    };
    Some(m)
}

fn parse_day_of_month(s: &str) -> Option<u32> {
    let digits = ["st", "nd", "rd", "th"]
        .iter()
        .find_map(|suffix| s.strip_suffix(suffix))
        .unwrap_or(s);
    let day = digits.parse::<u32>().ok()?;
    (1..=31).contains(&day).then_some(day)
}

/// First occurrence of `month`/`day` on or after `today`. Feb 29 may be up to
/// eight years out.
fn forward_month_day(today: NaiveDate, month: u32, day: u32) -> Option<NaiveDate> {
    (today.year()..=today.year() + 8)
        .filter_map(|year| NaiveDate::from_ymd_opt(year, month, day))
        .find(|d| *d >= today)
}

/// "5pm", "5:30pm", "12am", "17:30", "noon". Bare numbers are not times.
fn parse_time_string(s: &str) -> Option<NaiveTime> {
    if s == "noon" {
        return NaiveTime::from_hms_opt(12, 0, 0);
    }
    if s == "midnight" {
        return NaiveTime::from_hms_opt(0, 0, 0);
    }

    let parse_12h = |s: &str, is_pm: bool| -> Option<NaiveTime> {
        let (h, m) = if let Some((h_str, m_str)) = s.split_once(':') {
            (h_str.parse::<u32>().ok()?, m_str.parse::<u32>().ok()?)
        } else {
            (s.parse::<u32>().ok()?, 0)
        };
        if !(1..=12).contains(&h) || m > 59 {
            return None;
        }
        let h_24 = match (h, is_pm) {
            (12, true) => 12,
            (12, false) => 0,
            (h, true) => h + 12,
            (h, false) => h,
        };
        NaiveTime::from_hms_opt(h_24, m, 0)
    };

    if let Some(stripped) = s.strip_suffix("am") {
        return parse_12h(stripped, false);
    }
    if let Some(stripped) = s.strip_suffix("pm") {
        return parse_12h(stripped, true);
    }

    let (h_str, m_str) = s.split_once(':')?;
    if m_str.len() != 2 {
        return None;
    }
    NaiveTime::from_hms_opt(h_str.parse().ok()?, m_str.parse().ok()?, 0)
}

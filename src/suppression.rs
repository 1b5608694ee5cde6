// File: src/suppression.rs
//! Session-scoped dismissal of misdetected tokens.
//!
//! When the user dismisses a token kind, the raw text of every token of that
//! kind is recorded. The kind stays excluded from parsing until any one of the
//! recorded texts disappears from the input, at which point the whole record
//! is dropped. Changing syntax mode or toggling the parser clears everything.
use crate::model::{ParseResult, TokenType};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuppressionManager {
    records: BTreeMap<TokenType, Vec<String>>,
}

impl SuppressionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the raw text of every `kind` token in `current`, replacing any
    /// earlier record for that kind. Nothing is recorded when no such token is
    /// showing.
    pub fn suppress(&mut self, kind: TokenType, current: Option<&ParseResult>) {
        let raws: Vec<String> = current
            .map(|r| r.tokens_of(kind).map(|t| t.raw.clone()).collect())
            .unwrap_or_default();
        if raws.is_empty() {
            log::debug!("Ignoring suppression of '{}': no token showing", kind);
            return;
        }
        log::debug!("Suppressing '{}' for {:?}", kind, raws);
        self.records.insert(kind, raws);
    }

    /// Keeps a record only while all of its texts are still in `text`.
    pub fn on_input_change(&mut self, text: &str) {
        self.records.retain(|kind, raws| {
            let intact = raws.iter().all(|raw| text.contains(raw.as_str()));
            if !intact {
                log::debug!("Lifting suppression of '{}'", kind);
            }
            intact
        });
    }

    pub fn on_mode_or_enabled_change(&mut self) {
        self.reset();
    }

    pub fn reset(&mut self) {
        if !self.records.is_empty() {
            log::debug!("Clearing {} suppression record(s)", self.records.len());
        }
        self.records.clear();
    }

    pub fn suppress_types(&self) -> BTreeSet<TokenType> {
        self.records.keys().copied().collect()
    }

    pub fn is_suppressed(&self, kind: TokenType) -> bool {
        self.records.contains_key(&kind)
    }

    pub fn records(&self) -> &BTreeMap<TokenType, Vec<String>> {
        &self.records
    }
}

// File: src/session.rs
//! Editing session for one quick-capture input.
//!
//! All state that outlives a keystroke lives here: the raw input, the parser
//! toggles, suppression records and the reference cache. Callers drive it with
//! [`SessionCommand`]s and read back an immutable [`SessionSnapshot`]. A
//! session is created when the capture surface opens and dropped when it
//! closes; nothing is shared between sessions.
use crate::cache::{CacheItem, ReferenceCache};
use crate::model::{ParserConfig, SyntaxMode, TaskDraft, TokenType, build_draft_at};
use crate::suppression::SuppressionManager;
use chrono::{Local, NaiveDateTime};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    SetInput(String),
    Suppress(TokenType),
    SetSyntaxMode(SyntaxMode),
    SetEnabled(bool),
    SetProjects(Vec<CacheItem>),
    SetLabels(Vec<CacheItem>),
    /// Discard the draft: clears input and suppression, keeps the cache.
    Reset,
}

/// The parse of `input` is `draft.parse`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub input: String,
    pub config: ParserConfig,
    pub draft: TaskDraft,
}

#[derive(Debug)]
pub struct CaptureSession {
    input: String,
    enabled: bool,
    syntax_mode: SyntaxMode,
    suppression: SuppressionManager,
    cache: ReferenceCache,
    pinned_now: Option<NaiveDateTime>,
    snapshot: SessionSnapshot,
}

impl CaptureSession {
    pub fn new(enabled: bool, syntax_mode: SyntaxMode) -> Self {
        Self::build(enabled, syntax_mode, None)
    }

    /// Session whose relative dates resolve against a fixed instant.
    pub fn with_clock(enabled: bool, syntax_mode: SyntaxMode, now: NaiveDateTime) -> Self {
        Self::build(enabled, syntax_mode, Some(now))
    }

    fn build(enabled: bool, syntax_mode: SyntaxMode, pinned_now: Option<NaiveDateTime>) -> Self {
        let config = ParserConfig {
            enabled,
            syntax_mode,
            ..ParserConfig::default()
        };
        Self {
            input: String::new(),
            enabled,
            syntax_mode,
            suppression: SuppressionManager::new(),
            cache: ReferenceCache::new(),
            pinned_now,
            snapshot: SessionSnapshot {
                input: String::new(),
                config,
                draft: TaskDraft::default(),
            },
        }
    }

    pub fn snapshot(&self) -> &SessionSnapshot {
        &self.snapshot
    }

    pub fn cache(&self) -> &ReferenceCache {
        &self.cache
    }

    pub fn suppression(&self) -> &SuppressionManager {
        &self.suppression
    }

    pub fn syntax_mode(&self) -> SyntaxMode {
        self.syntax_mode
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// The configuration the next parse will run with.
    pub fn parser_config(&self) -> ParserConfig {
        ParserConfig {
            enabled: self.enabled,
            syntax_mode: self.syntax_mode,
            suppress_types: self.suppression.suppress_types(),
        }
    }

    pub fn dispatch(&mut self, command: SessionCommand) -> &SessionSnapshot {
        match command {
            SessionCommand::SetInput(text) => {
                self.suppression.on_input_change(&text);
                self.input = text;
            }
            SessionCommand::Suppress(kind) => {
                let current = self.snapshot.draft.parse.as_ref();
                self.suppression.suppress(kind, current);
            }
            SessionCommand::SetSyntaxMode(mode) => {
                if mode != self.syntax_mode {
                    log::debug!("Syntax mode {} -> {}", self.syntax_mode, mode);
                    self.syntax_mode = mode;
                    self.suppression.on_mode_or_enabled_change();
                }
            }
            SessionCommand::SetEnabled(enabled) => {
                if enabled != self.enabled {
                    self.enabled = enabled;
                    self.suppression.on_mode_or_enabled_change();
                }
            }
            SessionCommand::SetProjects(items) => {
                self.cache.set_projects(items);
                return &self.snapshot;
            }
            SessionCommand::SetLabels(items) => {
                self.cache.set_labels(items);
                return &self.snapshot;
            }
            SessionCommand::Reset => {
                self.input.clear();
                self.suppression.reset();
            }
        }
        self.reparse();
        &self.snapshot
    }

    fn now(&self) -> NaiveDateTime {
        self.pinned_now
            .unwrap_or_else(|| Local::now().naive_local())
    }

    // Skips the parse when neither the input nor the config moved.
    fn reparse(&mut self) {
        let config = self.parser_config();
        if self.snapshot.input == self.input && self.snapshot.config == config {
            return;
        }
        let draft = build_draft_at(&self.input, &config, self.now());
        self.snapshot = SessionSnapshot {
            input: self.input.clone(),
            config,
            draft,
        };
    }
}

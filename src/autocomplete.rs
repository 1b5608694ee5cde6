// File: src/autocomplete.rs
//! Inline autocomplete for project and label references.
//!
//! The controller watches the raw input and caret, independently of the
//! parser. When the caret sits after an unterminated prefix character (for
//! example `#gro` in Todoist mode) it searches the [`ReferenceCache`] and shows
//! a menu on its [`MenuSurface`]. Committing an item hands a [`CommitEvent`]
//! to the caller, who splices the text (see [`splice_completion`]).
//!
//! Key contract while the menu is open:
//! - Up / Down cycle the highlight and are consumed.
//! - Escape closes the menu and is consumed.
//! - Tab commits the highlighted item and is consumed.
//! - Enter commits the highlighted item but is NOT consumed, so the host form
//!   can submit on the same keystroke.
//! - Everything else passes through.
use crate::cache::{CacheItem, ReferenceCache};
use crate::model::{RefKind, SyntaxMode, SyntaxPrefixes, get_prefixes, quote_reference};
use thiserror::Error;
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MountError {
    #[error("autocomplete menu has no render target to mount on")]
    MissingSurface,
}

/// Render target for the suggestion menu.
pub trait MenuSurface {
    fn render(&mut self, view: &MenuView<'_>);
    fn clear(&mut self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuView<'a> {
    pub kind: RefKind,
    pub prefix: char,
    pub items: &'a [CacheItem],
    pub selected: usize,
    /// Display column of the trigger character, for positioning.
    pub anchor_column: usize,
}

/// An unterminated reference before the caret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    pub kind: RefKind,
    pub prefix: char,
    pub start: usize,
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenMenu {
    pub kind: RefKind,
    pub prefix: char,
    pub trigger_start: usize,
    pub candidates: Vec<CacheItem>,
    pub selected: usize,
    anchor_column: usize,
}

impl OpenMenu {
    fn view(&self) -> MenuView<'_> {
        MenuView {
            kind: self.kind,
            prefix: self.prefix,
            items: &self.candidates,
            selected: self.selected,
            anchor_column: self.anchor_column,
        }
    }
}

/// An open menu always has at least one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MenuState {
    #[default]
    Closed,
    Open(OpenMenu),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitEvent {
    pub item: CacheItem,
    pub trigger_start: usize,
    pub prefix: char,
    pub kind: RefKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Escape,
    Tab,
    Enter,
    Char(char),
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyInput {
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::default(),
        }
    }
}

impl From<Key> for KeyInput {
    fn from(key: Key) -> Self {
        Self::plain(key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    /// Button pressed; `inside_menu` tells whether it landed on the menu.
    Down { inside_menu: bool },
    Hover(usize),
    Click(usize),
}

pub struct AutocompleteController {
    surface: Box<dyn MenuSurface>,
    on_commit: Box<dyn FnMut(CommitEvent)>,
    prefixes: SyntaxPrefixes,
    enabled: bool,
    state: MenuState,
}

impl AutocompleteController {
    /// Fails when the host has no surface to render the menu on.
    pub fn mount(
        surface: Option<Box<dyn MenuSurface>>,
        mode: SyntaxMode,
        on_commit: impl FnMut(CommitEvent) + 'static,
    ) -> Result<Self, MountError> {
        let surface = surface.ok_or(MountError::MissingSurface)?;
        Ok(Self {
            surface,
            on_commit: Box::new(on_commit),
            prefixes: get_prefixes(mode),
            enabled: true,
            state: MenuState::Closed,
        })
    }

    pub fn set_syntax_mode(&mut self, mode: SyntaxMode) {
        self.prefixes = get_prefixes(mode);
        self.hide();
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.hide();
    }

    pub fn state(&self) -> &MenuState {
        &self.state
    }

    pub fn is_visible(&self) -> bool {
        matches!(self.state, MenuState::Open(_))
    }

    pub fn selected_index(&self) -> Option<usize> {
        match &self.state {
            MenuState::Open(menu) => Some(menu.selected),
            MenuState::Closed => None,
        }
    }

    pub fn hide(&mut self) {
        if self.is_visible() {
            log::debug!("Closing autocomplete menu");
            self.state = MenuState::Closed;
            self.surface.clear();
        }
    }

    /// Re-evaluates the trigger for `text` with the caret at byte `caret`.
    pub fn update(&mut self, text: &str, caret: usize, cache: &ReferenceCache) {
        if !self.enabled {
            self.hide();
            return;
        }
        let caret = clamp_to_boundary(text, caret);
        let Some(trigger) = detect_trigger(text, caret, self.prefixes) else {
            self.hide();
            return;
        };

        let candidates = cache.search(trigger.kind, unquote_query(&trigger.query));
        if candidates.is_empty() {
            self.hide();
            return;
        }

        if !self.is_visible() {
            log::debug!(
                "Opening {:?} menu at {} ({} candidates)",
                trigger.kind,
                trigger.start,
                candidates.len()
            );
        }
        self.state = MenuState::Open(OpenMenu {
            kind: trigger.kind,
            prefix: trigger.prefix,
            trigger_start: trigger.start,
            candidates,
            selected: 0,
            anchor_column: UnicodeWidthStr::width(&text[..trigger.start]),
        });
        self.render();
    }

    /// Returns whether the key was claimed by the menu.
    pub fn handle_key_down(&mut self, input: impl Into<KeyInput>) -> bool {
        let input = input.into();
        let m = input.modifiers;
        if m.ctrl || m.alt || m.meta {
            return false;
        }
        let MenuState::Open(menu) = &mut self.state else {
            return false;
        };
        let len = menu.candidates.len();

        match input.key {
            Key::Up => {
                menu.selected = (menu.selected + len - 1) % len;
                self.render();
                true
            }
            Key::Down => {
                menu.selected = (menu.selected + 1) % len;
                self.render();
                true
            }
            Key::Escape => {
                self.hide();
                true
            }
            Key::Tab => {
                let idx = menu.selected;
                self.commit(idx)
            }
            Key::Enter => {
                let idx = menu.selected;
                self.commit(idx);
                false
            }
            Key::Char(_) | Key::Other => false,
        }
    }

    /// Returns whether the host should swallow the pointer event.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        match event {
            // Keeps focus in the input while browsing candidates.
            PointerEvent::Down { inside_menu } => inside_menu && self.is_visible(),
            PointerEvent::Hover(idx) => {
                let MenuState::Open(menu) = &mut self.state else {
                    return false;
                };
                if idx >= menu.candidates.len() {
                    return false;
                }
                menu.selected = idx;
                self.render();
                true
            }
            PointerEvent::Click(idx) => self.commit(idx),
        }
    }

    fn render(&mut self) {
        if let MenuState::Open(menu) = &self.state {
            self.surface.render(&menu.view());
        }
    }

    fn commit(&mut self, idx: usize) -> bool {
        let in_range = matches!(&self.state, MenuState::Open(menu) if idx < menu.candidates.len());
        if !in_range {
            return false;
        }
        let MenuState::Open(mut menu) = std::mem::take(&mut self.state) else {
            return false;
        };
        self.surface.clear();
        let event = CommitEvent {
            item: menu.candidates.swap_remove(idx),
            trigger_start: menu.trigger_start,
            prefix: menu.prefix,
            kind: menu.kind,
        };
        log::debug!("Committing {:?} '{}'", event.kind, event.item.title);
        (self.on_commit)(event);
        true
    }
}

/// Finds the nearest open trigger before `caret`.
///
/// A trigger qualifies when it starts the text or follows whitespace and is
/// still open at the caret: a bare query ends at whitespace, a quoted one at
/// its closing quote. When both kinds qualify, the later one wins.
pub fn detect_trigger(text: &str, caret: usize, prefixes: SyntaxPrefixes) -> Option<Trigger> {
    let caret = clamp_to_boundary(text, caret);
    let before = &text[..caret];

    [RefKind::Project, RefKind::Label]
        .into_iter()
        .filter_map(|kind| {
            let prefix = prefixes.for_kind(kind);
            // The nearest copy is the only one that can be unterminated.
            let start = before.rfind(prefix)?;
            let at_word_start = before[..start]
                .chars()
                .next_back()
                .is_none_or(char::is_whitespace);
            let query = &before[start + prefix.len_utf8()..];
            if !at_word_start || !is_open_query(query) {
                return None;
            }
            Some(Trigger {
                kind,
                prefix,
                start,
                query: query.to_string(),
            })
        })
        .max_by_key(|t| t.start)
}

/// Replaces the trigger through the caret with the committed reference and a
/// trailing space. Returns the new text and caret.
pub fn splice_completion(text: &str, caret: usize, event: &CommitEvent) -> (String, usize) {
    let caret = clamp_to_boundary(text, caret);
    let start = clamp_to_boundary(text, event.trigger_start.min(caret));
    let insert = format!("{} ", quote_reference(event.prefix, &event.item.title));

    let mut out = String::with_capacity(text.len() + insert.len());
    out.push_str(&text[..start]);
    out.push_str(&insert);
    out.push_str(&text[caret..]);
    (out, start + insert.len())
}

fn is_open_query(query: &str) -> bool {
    let Some(quoted) = query.strip_prefix('"') else {
        return !query.contains(char::is_whitespace);
    };
    let mut escaped = false;
    for c in quoted.chars() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => return false,
            _ => {}
        }
    }
    true
}

fn unquote_query(query: &str) -> &str {
    match query.strip_prefix('"') {
        Some(inner) => inner.strip_suffix('"').unwrap_or(inner),
        None => query,
    }
}

fn clamp_to_boundary(text: &str, pos: usize) -> usize {
    let mut pos = pos.min(text.len());
    while !text.is_char_boundary(pos) {
        pos -= 1;
    }
    pos
}

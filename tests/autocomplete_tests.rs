use quickadd::autocomplete::{
    AutocompleteController, CommitEvent, Key, KeyInput, MenuState, MenuSurface, MenuView,
    Modifiers, MountError, PointerEvent, detect_trigger, splice_completion,
};
use quickadd::cache::{CacheItem, ReferenceCache};
use quickadd::model::{RefKind, SyntaxMode, get_prefixes};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Default)]
struct Screen {
    renders: Vec<(Vec<String>, usize, usize)>,
    clears: usize,
}

struct RecordingSurface(Rc<RefCell<Screen>>);

impl MenuSurface for RecordingSurface {
    fn render(&mut self, view: &MenuView<'_>) {
        let titles = view.items.iter().map(|i| i.title.clone()).collect();
        self.0
            .borrow_mut()
            .renders
            .push((titles, view.selected, view.anchor_column));
    }

    fn clear(&mut self) {
        self.0.borrow_mut().clears += 1;
    }
}

struct Harness {
    ctl: AutocompleteController,
    screen: Rc<RefCell<Screen>>,
    commits: Rc<RefCell<Vec<CommitEvent>>>,
    cache: ReferenceCache,
}

fn harness(mode: SyntaxMode) -> Harness {
    let screen = Rc::new(RefCell::new(Screen::default()));
    let commits = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&commits);
    let ctl = AutocompleteController::mount(
        Some(Box::new(RecordingSurface(Rc::clone(&screen)))),
        mode,
        move |event| sink.borrow_mut().push(event),
    )
    .unwrap();

    let mut cache = ReferenceCache::new();
    cache.set_projects(vec![
        CacheItem::new("p1", "Groceries"),
        CacheItem::new("p2", "Garden"),
        CacheItem::new("p3", "Home Chores"),
    ]);
    cache.set_labels(vec![
        CacheItem::new("l1", "errand"),
        CacheItem::new("l2", "errands-big"),
        CacheItem::new("l3", "err-later"),
        CacheItem::new("l4", "phone"),
    ]);
    Harness {
        ctl,
        screen,
        commits,
        cache,
    }
}

fn open_labels(h: &mut Harness) -> &'static str {
    let text = "Buy milk #groceries @err";
    h.ctl.update(text, text.len(), &h.cache);
    text
}

#[test]
fn test_mount_requires_surface() {
    let result = AutocompleteController::mount(None, SyntaxMode::Todoist, |_| {});
    assert_eq!(result.err(), Some(MountError::MissingSurface));
}

#[test]
fn test_detects_project_trigger() {
    let p = get_prefixes(SyntaxMode::Todoist);
    let t = detect_trigger("Buy milk #gro", 13, p).unwrap();
    assert_eq!(t.kind, RefKind::Project);
    assert_eq!(t.start, 9);
    assert_eq!(t.query, "gro");
}

#[test]
fn test_nearest_trigger_wins() {
    let p = get_prefixes(SyntaxMode::Todoist);
    let t = detect_trigger("Buy milk #groceries @err", 24, p).unwrap();
    assert_eq!(t.kind, RefKind::Label);
    assert_eq!(t.start, 20);
    assert_eq!(t.query, "err");
}

#[test]
fn test_trigger_uses_text_before_caret() {
    let p = get_prefixes(SyntaxMode::Todoist);
    let text = "Buy #gro milk @err";
    let t = detect_trigger(text, 8, p).unwrap();
    assert_eq!(t.kind, RefKind::Project);
    assert_eq!(t.query, "gro");

    assert!(detect_trigger("Buy milk", 8, p).is_none());
    assert!(detect_trigger("#gro", 0, p).is_none());
}

#[test]
fn test_whitespace_closes_bare_trigger() {
    let p = get_prefixes(SyntaxMode::Todoist);
    let text = "Buy #groceries then call mom";
    assert!(detect_trigger(text, text.len(), p).is_none());
    assert!(detect_trigger("Buy # ", 6, p).is_none());

    // A label typed after a finished project is still found
    let t = detect_trigger("Buy #groceries @ph", 18, p).unwrap();
    assert_eq!(t.kind, RefKind::Label);
}

#[test]
fn test_quoted_trigger_stays_open_until_closing_quote() {
    let p = get_prefixes(SyntaxMode::Todoist);
    let t = detect_trigger("Clean #\"Home Ch", 15, p).unwrap();
    assert_eq!(t.kind, RefKind::Project);
    assert_eq!(t.query, "\"Home Ch");

    let closed = "Clean #\"Home Chores\" now";
    assert!(detect_trigger(closed, closed.len(), p).is_none());
}

#[test]
fn test_menu_closes_once_past_the_reference() {
    let mut h = harness(SyntaxMode::Todoist);
    h.ctl.update("Buy # ", 6, &h.cache);
    assert!(!h.ctl.is_visible());

    h.ctl.update("Buy #gro", 8, &h.cache);
    assert!(h.ctl.is_visible());
    h.ctl.update("Buy #gro and", 12, &h.cache);
    assert!(!h.ctl.is_visible());
}

#[test]
fn test_vikunja_triggers() {
    let p = get_prefixes(SyntaxMode::Vikunja);
    let t = detect_trigger("Fix gate +Ga", 12, p).unwrap();
    assert_eq!(t.kind, RefKind::Project);
    assert_eq!(t.prefix, '+');

    let t = detect_trigger("Fix gate *ph", 12, p).unwrap();
    assert_eq!(t.kind, RefKind::Label);
    assert!(detect_trigger("Fix gate #Ga", 12, p).is_none());
}

#[test]
fn test_update_opens_menu_with_first_item_highlighted() {
    let mut h = harness(SyntaxMode::Todoist);
    h.ctl.update("Buy milk #gro", 13, &h.cache);

    assert!(h.ctl.is_visible());
    assert_eq!(h.ctl.selected_index(), Some(0));
    let screen = h.screen.borrow();
    let (titles, selected, column) = screen.renders.last().unwrap();
    assert_eq!(titles, &vec!["Groceries".to_string()]);
    assert_eq!(*selected, 0);
    assert_eq!(*column, 9);
}

#[test]
fn test_no_results_closes_menu() {
    let mut h = harness(SyntaxMode::Todoist);
    h.ctl.update("Buy milk #gro", 13, &h.cache);
    assert!(h.ctl.is_visible());

    h.ctl.update("Buy milk #grox", 14, &h.cache);
    assert!(!h.ctl.is_visible());
    assert_eq!(h.ctl.state(), &MenuState::Closed);
    assert_eq!(h.screen.borrow().clears, 1);
}

#[test]
fn test_empty_query_lists_everything() {
    let mut h = harness(SyntaxMode::Todoist);
    h.ctl.update("Buy milk @", 10, &h.cache);
    match h.ctl.state() {
        MenuState::Open(menu) => {
            assert_eq!(menu.kind, RefKind::Label);
            assert_eq!(menu.candidates.len(), 4);
            assert_eq!(menu.trigger_start, 9);
        }
        MenuState::Closed => panic!("menu should be open"),
    }
}

#[test]
fn test_arrow_keys_wrap() {
    let mut h = harness(SyntaxMode::Todoist);
    open_labels(&mut h);

    assert!(h.ctl.handle_key_down(Key::Down));
    assert!(h.ctl.handle_key_down(Key::Down));
    assert_eq!(h.ctl.selected_index(), Some(2));
    assert!(h.ctl.handle_key_down(Key::Down));
    assert_eq!(h.ctl.selected_index(), Some(0));

    assert!(h.ctl.handle_key_down(Key::Up));
    assert_eq!(h.ctl.selected_index(), Some(2));

    let screen = h.screen.borrow();
    assert_eq!(screen.renders.last().unwrap().1, 2);
}

#[test]
fn test_enter_commits_without_consuming() {
    let mut h = harness(SyntaxMode::Todoist);
    open_labels(&mut h);
    h.ctl.handle_key_down(Key::Down);
    h.ctl.handle_key_down(Key::Down);
    h.ctl.handle_key_down(Key::Down);

    assert!(!h.ctl.handle_key_down(Key::Enter));
    assert!(!h.ctl.is_visible());

    let commits = h.commits.borrow();
    assert_eq!(commits.len(), 1);
    assert_eq!(commits[0].item.title, "errand");
    assert_eq!(commits[0].trigger_start, 20);
    assert_eq!(commits[0].prefix, '@');
    assert_eq!(commits[0].kind, RefKind::Label);
}

#[test]
fn test_tab_commits_and_consumes() {
    let mut h = harness(SyntaxMode::Todoist);
    open_labels(&mut h);
    h.ctl.handle_key_down(Key::Down);

    assert!(h.ctl.handle_key_down(Key::Tab));
    assert!(!h.ctl.is_visible());
    assert_eq!(h.commits.borrow()[0].item.title, "errands-big");
}

#[test]
fn test_escape_closes_and_consumes() {
    let mut h = harness(SyntaxMode::Todoist);
    open_labels(&mut h);
    assert!(h.ctl.handle_key_down(Key::Escape));
    assert!(!h.ctl.is_visible());
    assert!(h.commits.borrow().is_empty());
}

#[test]
fn test_keys_pass_through_when_closed_or_unhandled() {
    let mut h = harness(SyntaxMode::Todoist);
    for key in [Key::Up, Key::Down, Key::Tab, Key::Enter, Key::Escape] {
        assert!(!h.ctl.handle_key_down(key), "{:?} while closed", key);
    }

    open_labels(&mut h);
    assert!(!h.ctl.handle_key_down(Key::Char('x')));
    assert!(!h.ctl.handle_key_down(Key::Other));
    let ctrl_down = KeyInput {
        key: Key::Down,
        modifiers: Modifiers {
            ctrl: true,
            ..Modifiers::default()
        },
    };
    assert!(!h.ctl.handle_key_down(ctrl_down));
    assert_eq!(h.ctl.selected_index(), Some(0));
    assert!(h.commits.borrow().is_empty());
}

#[test]
fn test_pointer_events() {
    let mut h = harness(SyntaxMode::Todoist);
    assert!(!h.ctl.handle_pointer(PointerEvent::Down { inside_menu: true }));

    open_labels(&mut h);
    assert!(h.ctl.handle_pointer(PointerEvent::Down { inside_menu: true }));
    assert!(!h.ctl.handle_pointer(PointerEvent::Down { inside_menu: false }));

    assert!(h.ctl.handle_pointer(PointerEvent::Hover(1)));
    assert_eq!(h.ctl.selected_index(), Some(1));
    assert!(!h.ctl.handle_pointer(PointerEvent::Hover(9)));

    assert!(!h.ctl.handle_pointer(PointerEvent::Click(9)));
    assert!(h.ctl.is_visible());
    assert!(h.ctl.handle_pointer(PointerEvent::Click(2)));
    assert!(!h.ctl.is_visible());
    assert_eq!(h.commits.borrow()[0].item.title, "err-later");
}

#[test]
fn test_splice_and_reparse_closes_menu() {
    let mut h = harness(SyntaxMode::Todoist);
    let text = "Buy milk #gro";
    h.ctl.update(text, text.len(), &h.cache);
    h.ctl.handle_key_down(Key::Tab);

    let event = h.commits.borrow()[0].clone();
    let (spliced, caret) = splice_completion(text, text.len(), &event);
    assert_eq!(spliced, "Buy milk #Groceries ");
    assert_eq!(caret, spliced.len());

    h.ctl.update(&spliced, caret, &h.cache);
    assert!(!h.ctl.is_visible());
}

#[test]
fn test_splice_quotes_multi_word_titles() {
    let event = CommitEvent {
        item: CacheItem::new("p3", "Home Chores"),
        trigger_start: 6,
        prefix: '+',
        kind: RefKind::Project,
    };
    let (spliced, caret) = splice_completion("Clean +ho tomorrow", 9, &event);
    assert_eq!(spliced, "Clean +\"Home Chores\"  tomorrow");
    assert_eq!(caret, "Clean +\"Home Chores\" ".len());
}

#[test]
fn test_quoted_query_searches_unquoted() {
    let mut h = harness(SyntaxMode::Todoist);
    let text = "Clean #\"Home Ch";
    h.ctl.update(text, text.len(), &h.cache);
    match h.ctl.state() {
        MenuState::Open(menu) => assert_eq!(menu.candidates[0].title, "Home Chores"),
        MenuState::Closed => panic!("menu should be open"),
    }
}

#[test]
fn test_mode_switch_and_disable_close_menu() {
    let mut h = harness(SyntaxMode::Todoist);
    h.ctl.update("Buy milk #gro", 13, &h.cache);
    h.ctl.set_syntax_mode(SyntaxMode::Vikunja);
    assert!(!h.ctl.is_visible());

    h.ctl.update("Buy milk #gro", 13, &h.cache);
    assert!(!h.ctl.is_visible());
    h.ctl.update("Buy milk +gro", 13, &h.cache);
    assert!(h.ctl.is_visible());

    h.ctl.set_enabled(false);
    assert!(!h.ctl.is_visible());
    h.ctl.update("Buy milk +gro", 13, &h.cache);
    assert!(!h.ctl.is_visible());

    h.ctl.set_enabled(true);
    h.ctl.update("Buy milk +gro", 13, &h.cache);
    assert!(h.ctl.is_visible());
}

#[test]
fn test_caret_past_end_is_clamped() {
    let mut h = harness(SyntaxMode::Todoist);
    h.ctl.update("Buy milk #gro", 500, &h.cache);
    assert!(h.ctl.is_visible());
}

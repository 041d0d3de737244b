//! Keyboard shortcut registry.
//!
//! One table per input context, rendered by the help overlay. The key
//! handlers in `app` stay the source of truth for behavior; this module is
//! the source of truth for what the help screen claims.

use crossterm::event::KeyCode;
use std::borrow::Cow;

/// A help-overlay row: the keys that trigger an action, and what it does.
#[derive(Debug, Clone, Copy)]
pub struct Shortcut {
    /// Alternatives for the same action, e.g. `j` and `↓`.
    pub keys: &'static [KeyCode],
    pub action: &'static str,
}

impl Shortcut {
    /// Display label joining alternatives with `/`, e.g. `"j/↓"`.
    pub fn label(&self) -> String {
        self.keys
            .iter()
            .map(|key| key_label(*key))
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Input contexts with distinct key maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutContext {
    /// Browsing the record listing
    Browse,
    /// Section menu dropped down from the navigation bar
    SectionMenu,
    /// Create/edit form
    Form,
    /// Delete confirmation dialog
    Confirm,
}

impl ShortcutContext {
    pub const ALL: [ShortcutContext; 4] = [
        ShortcutContext::Browse,
        ShortcutContext::SectionMenu,
        ShortcutContext::Form,
        ShortcutContext::Confirm,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ShortcutContext::Browse => "Browse",
            ShortcutContext::SectionMenu => "Section menu",
            ShortcutContext::Form => "Form",
            ShortcutContext::Confirm => "Confirm dialog",
        }
    }
}

/// The key map for a context, in help display order.
pub fn shortcuts_for(context: ShortcutContext) -> &'static [Shortcut] {
    match context {
        ShortcutContext::Browse => BROWSE_KEYS,
        ShortcutContext::SectionMenu => MENU_KEYS,
        ShortcutContext::Form => FORM_KEYS,
        ShortcutContext::Confirm => CONFIRM_KEYS,
    }
}

/// Human-readable label for a single key.
pub fn key_label(key: KeyCode) -> Cow<'static, str> {
    let fixed = match key {
        KeyCode::Char(' ') => "Space",
        KeyCode::Enter => "Enter",
        KeyCode::Esc => "Esc",
        KeyCode::Tab => "Tab",
        KeyCode::BackTab => "Shift+Tab",
        KeyCode::Up => "↑",
        KeyCode::Down => "↓",
        KeyCode::Left => "←",
        KeyCode::Right => "→",
        KeyCode::PageUp => "PgUp",
        KeyCode::PageDown => "PgDn",
        KeyCode::Home => "Home",
        KeyCode::End => "End",
        KeyCode::Delete => "Del",
        KeyCode::Backspace => "Backspace",
        KeyCode::Char(c) => return Cow::Owned(c.to_string()),
        KeyCode::F(n) => return Cow::Owned(format!("F{n}")),
        other => return Cow::Owned(format!("{other:?}")),
    };
    Cow::Borrowed(fixed)
}

const BROWSE_KEYS: &[Shortcut] = &[
    Shortcut { keys: &[KeyCode::Char('q')], action: "Quit" },
    Shortcut { keys: &[KeyCode::Char('?')], action: "Toggle help" },
    Shortcut { keys: &[KeyCode::Tab], action: "Next section" },
    Shortcut { keys: &[KeyCode::BackTab], action: "Previous section" },
    Shortcut { keys: &[KeyCode::Char('m')], action: "Open section menu" },
    Shortcut { keys: &[KeyCode::Char('1')], action: "Jump to section (1-8)" },
    Shortcut { keys: &[KeyCode::Char('j'), KeyCode::Down], action: "Move down" },
    Shortcut { keys: &[KeyCode::Char('k'), KeyCode::Up], action: "Move up" },
    Shortcut { keys: &[KeyCode::Char('g'), KeyCode::Home], action: "First row" },
    Shortcut { keys: &[KeyCode::Char('G'), KeyCode::End], action: "Last row" },
    Shortcut { keys: &[KeyCode::Char('n'), KeyCode::PageDown], action: "Next page" },
    Shortcut { keys: &[KeyCode::Char('p'), KeyCode::PageUp], action: "Previous page" },
    Shortcut { keys: &[KeyCode::Char('c')], action: "Create record" },
    Shortcut { keys: &[KeyCode::Char('e'), KeyCode::Enter], action: "Edit selected record" },
    Shortcut { keys: &[KeyCode::Char('d')], action: "Delete selected record" },
    Shortcut { keys: &[KeyCode::Char('x')], action: "Duplicate selected record" },
    Shortcut { keys: &[KeyCode::Char('/')], action: "Filter by name" },
    Shortcut { keys: &[KeyCode::Char('r')], action: "Refresh current page" },
    Shortcut { keys: &[KeyCode::Esc], action: "Clear filter" },
];

const MENU_KEYS: &[Shortcut] = &[
    Shortcut { keys: &[KeyCode::Char('h'), KeyCode::Left], action: "Previous group" },
    Shortcut { keys: &[KeyCode::Char('l'), KeyCode::Right], action: "Next group" },
    Shortcut { keys: &[KeyCode::Char('j'), KeyCode::Down], action: "Move down" },
    Shortcut { keys: &[KeyCode::Char('k'), KeyCode::Up], action: "Move up" },
    Shortcut { keys: &[KeyCode::Enter], action: "Open section" },
    Shortcut { keys: &[KeyCode::Esc, KeyCode::Char('m')], action: "Close menu" },
];

const FORM_KEYS: &[Shortcut] = &[
    Shortcut { keys: &[KeyCode::Tab], action: "Next field" },
    Shortcut { keys: &[KeyCode::BackTab], action: "Previous field" },
    Shortcut { keys: &[KeyCode::Enter], action: "Save (on last field)" },
    Shortcut { keys: &[KeyCode::Esc], action: "Discard and close" },
];

const CONFIRM_KEYS: &[Shortcut] = &[
    Shortcut { keys: &[KeyCode::Char('y'), KeyCode::Enter], action: "Confirm" },
    Shortcut { keys: &[KeyCode::Char('n'), KeyCode::Esc], action: "Cancel" },
];

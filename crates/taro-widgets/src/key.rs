//! Key bindings, their `aria-keyshortcuts` rendering, and the key map trait
//! widgets implement to describe their keyboard interface.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// One or more key combinations bound to a described action.
pub struct Binding {
    /// The combinations that trigger this binding.
    pub keys: Vec<KeyCombination>,
    /// What the binding does, for help text.
    pub description: String,
    /// Disabled bindings never match.
    pub enabled: bool,
}

/// A single key press with optional modifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombination {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl Binding {
    pub fn new(key: KeyCombination, description: impl Into<String>) -> Self {
        Self::with_keys(vec![key], description)
    }

    pub fn with_keys(keys: Vec<KeyCombination>, description: impl Into<String>) -> Self {
        Self {
            keys,
            description: description.into(),
            enabled: true,
        }
    }

    /// Whether `event` matches any of this binding's combinations.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        self.enabled && self.keys.iter().any(|k| k.matches(event))
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// The binding's keys as an `aria-keyshortcuts` value (space-separated).
    pub fn aria_key_shortcuts(&self) -> String {
        self.keys
            .iter()
            .map(KeyCombination::aria_key_shortcuts)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl KeyCombination {
    pub fn new(code: KeyCode) -> Self {
        Self::with_modifiers(code, KeyModifiers::NONE)
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self::with_modifiers(code, KeyModifiers::CONTROL)
    }

    pub fn alt(code: KeyCode) -> Self {
        Self::with_modifiers(code, KeyModifiers::ALT)
    }

    pub fn shift(code: KeyCode) -> Self {
        Self::with_modifiers(code, KeyModifiers::SHIFT)
    }

    pub fn with_modifiers(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Whether `event` is this combination. Extra modifiers held by the
    /// user are tolerated; missing ones are not.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        let same_code = match (self.code, event.code) {
            (KeyCode::Char(a), KeyCode::Char(b)) => a.eq_ignore_ascii_case(&b),
            (a, b) => a == b,
        };
        same_code && event.modifiers.contains(self.modifiers)
    }

    /// Render as an `aria-keyshortcuts` token, e.g. `Control+Shift+K` or
    /// `ArrowDown`.
    pub fn aria_key_shortcuts(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        for (flag, name) in [
            (KeyModifiers::CONTROL, "Control"),
            (KeyModifiers::ALT, "Alt"),
            (KeyModifiers::SHIFT, "Shift"),
            (KeyModifiers::SUPER, "Meta"),
        ] {
            if self.modifiers.contains(flag) {
                parts.push(name.to_string());
            }
        }
        parts.push(key_name(self.code));
        parts.join("+")
    }
}

fn key_name(code: KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "Space".into(),
        KeyCode::Char(c) => c.to_ascii_uppercase().to_string(),
        KeyCode::Up => "ArrowUp".into(),
        KeyCode::Down => "ArrowDown".into(),
        KeyCode::Left => "ArrowLeft".into(),
        KeyCode::Right => "ArrowRight".into(),
        KeyCode::Enter => "Enter".into(),
        KeyCode::Esc => "Escape".into(),
        KeyCode::Tab | KeyCode::BackTab => "Tab".into(),
        KeyCode::Backspace => "Backspace".into(),
        KeyCode::Delete => "Delete".into(),
        KeyCode::Home => "Home".into(),
        KeyCode::End => "End".into(),
        KeyCode::PageUp => "PageUp".into(),
        KeyCode::PageDown => "PageDown".into(),
        KeyCode::Insert => "Insert".into(),
        KeyCode::F(n) => format!("F{n}"),
        other => format!("{other:?}"),
    }
}

/// Implemented by widgets so consumers can list their keyboard interface.
pub trait KeyMap {
    /// The most important bindings, for a one-line hint.
    fn short_help(&self) -> Vec<&Binding>;
    /// All bindings, grouped.
    fn full_help(&self) -> Vec<Vec<&Binding>>;
}

/// Whether `key` is a printable character without Ctrl or Alt held.
pub(crate) fn printable(key: &KeyEvent) -> Option<char> {
    match key.code {
        KeyCode::Char(c)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            Some(c)
        }
        _ => None,
    }
}

//! Listbox: a list of options with single or multiple selection.
//!
//! DOM focus stays on the listbox itself; the active option is conveyed with
//! `aria-activedescendant` and every move asks the host to scroll the option
//! into view.

use crate::focus::{Nav, RovingFocus};
use crate::key::printable;
use crate::selection::{Selection, SelectionMode};
use crate::typeahead::Typeahead;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Instant;
use taro_core::{AccessNode, Attr, Command, Component, ElementId, Orientation, Role, TabIndex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOption {
    pub label: String,
    pub disabled: bool,
}

impl ListOption {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            disabled: false,
        }
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

impl From<&str> for ListOption {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

/// Messages for the listbox component.
#[derive(Debug, Clone)]
pub enum Message {
    KeyPress(KeyEvent),
    /// A pointer click on option `i`.
    Click(usize),
    /// Replace the options. The selection is trimmed to the new length.
    SetOptions(Vec<ListOption>),
    /// Parent-driven selection. Does not emit [`Message::SelectionChanged`].
    SetSelected(Vec<usize>),
    /// Emitted after user interaction changed the selection.
    SelectionChanged(Vec<usize>),
}

pub struct Listbox {
    id: ElementId,
    label: Option<String>,
    options: Vec<ListOption>,
    selection: Selection,
    focus: RovingFocus,
    orientation: Orientation,
    selection_follows_focus: bool,
    typeahead: Typeahead,
}

impl Listbox {
    /// A single-select listbox where selection follows focus.
    pub fn new(options: Vec<ListOption>) -> Self {
        let id = ElementId::unique("listbox");
        let len = options.len();
        let mut listbox = Self {
            focus: RovingFocus::new(Vec::new()).with_wrap(false),
            id,
            label: None,
            options: Vec::new(),
            selection: Selection::new(SelectionMode::Single, len),
            orientation: Orientation::Vertical,
            selection_follows_focus: true,
            typeahead: Typeahead::new(),
        };
        listbox.set_options(options);
        listbox
    }

    pub fn with_id(mut self, id: impl Into<ElementId>) -> Self {
        self.id = id.into();
        let options = std::mem::take(&mut self.options);
        self.set_options(options);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Switch selection mode. Multiple selection turns off selection
    /// following focus.
    pub fn with_mode(mut self, mode: SelectionMode) -> Self {
        self.selection = Selection::new(mode, self.options.len());
        if mode == SelectionMode::Multiple {
            self.selection_follows_focus = false;
        }
        self
    }

    /// In single mode, whether moving the active option also selects it.
    pub fn with_selection_follows_focus(mut self, follows: bool) -> Self {
        self.selection_follows_focus = follows && !self.selection.is_multiple();
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Wrap from the last option to the first (off by default).
    pub fn with_wrap(mut self, wrap: bool) -> Self {
        self.focus = self.focus.clone().with_wrap(wrap);
        self
    }

    pub fn with_selected(mut self, indices: &[usize]) -> Self {
        if let Some(first) = self.set_selected(indices) {
            self.focus.focus(first);
        }
        self
    }

    pub fn options(&self) -> &[ListOption] {
        &self.options
    }

    pub fn selected(&self) -> Vec<usize> {
        self.selection.selected()
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selection.is_selected(index)
    }

    /// The option `aria-activedescendant` points at.
    pub fn active(&self) -> Option<usize> {
        self.focus.has_enabled().then(|| self.focus.active())
    }

    pub fn option_id(&self, index: usize) -> ElementId {
        self.id.child(format!("option-{index}"))
    }

    fn set_options(&mut self, options: Vec<ListOption>) {
        let ids = (0..options.len()).map(|i| self.option_id(i)).collect();
        self.focus.set_items(ids);
        for (i, option) in options.iter().enumerate() {
            if option.disabled {
                self.focus.set_disabled(i, true);
            }
        }
        self.selection.set_len(options.len());
        self.options = options;
        let options = &self.options;
        self.selection.retain(|i| !options[i].disabled);
    }

    /// Replace the selection, leaving out disabled options. Returns the
    /// first index kept.
    fn set_selected(&mut self, indices: &[usize]) -> Option<usize> {
        let options = &self.options;
        let kept: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|&i| options.get(i).is_none_or(|o| !o.disabled))
            .collect();
        if kept.len() < indices.len() {
            tracing::warn!(id = %self.id, ?indices, "dropping disabled options from selection");
        }
        self.selection.set(&kept);
        self.selection.selected().first().copied()
    }

    fn is_enabled(&self, index: usize) -> bool {
        self.options.get(index).is_some_and(|o| !o.disabled)
    }

    fn changed(&mut self, changed: bool) -> Command<Message> {
        if !changed {
            return Command::none();
        }
        let options = &self.options;
        self.selection.retain(|i| !options[i].disabled);
        tracing::debug!(
            id = %self.id,
            selected = ?self.selection.selected(),
            "listbox selection changed"
        );
        Command::message(Message::SelectionChanged(self.selection.selected()))
    }

    /// The active option moved to `index`: scroll it into view and, if
    /// selection follows focus, select it.
    fn moved(&mut self, index: usize) -> Command<Message> {
        let scroll = Command::scroll_into_view(self.option_id(index));
        let selected = if self.selection_follows_focus {
            let changed = self.selection.select(index);
            self.changed(changed)
        } else {
            Command::none()
        };
        Command::batch([scroll, selected])
    }

    fn handle_key(&mut self, key: KeyEvent) -> Command<Message> {
        if let Some(nav) = Nav::from_key(&key, self.orientation) {
            return match self.focus.navigate(nav) {
                Some(i) => self.moved(i),
                None => Command::none(),
            };
        }

        let multiple = self.selection.is_multiple();
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let active = self.focus.active();

        let (next, prev) = match self.orientation {
            Orientation::Vertical => (KeyCode::Down, KeyCode::Up),
            Orientation::Horizontal => (KeyCode::Right, KeyCode::Left),
        };

        match key.code {
            code if shift && (code == next || code == prev) => {
                let nav = if code == next { Nav::Next } else { Nav::Prev };
                let Some(i) = self.focus.navigate(nav) else {
                    return Command::none();
                };
                let scroll = Command::scroll_into_view(self.option_id(i));
                let changed = if multiple {
                    self.selection.toggle(i)
                } else if self.selection_follows_focus {
                    self.selection.select(i)
                } else {
                    false
                };
                Command::batch([scroll, self.changed(changed)])
            }
            KeyCode::Char(' ') if shift && multiple => {
                if !self.is_enabled(active) {
                    return Command::none();
                }
                let changed = self.selection.select_range(active);
                self.changed(changed)
            }
            KeyCode::Char(' ') => {
                if !self.is_enabled(active) {
                    return Command::none();
                }
                let changed = self.selection.toggle(active);
                self.changed(changed)
            }
            KeyCode::Char('a') | KeyCode::Char('A') if ctrl && multiple => {
                let enabled: Vec<usize> =
                    (0..self.options.len()).filter(|&i| self.is_enabled(i)).collect();
                let all_selected = enabled.iter().all(|&i| self.selection.is_selected(i));
                let changed = if all_selected {
                    self.selection.clear()
                } else {
                    self.selection.set(&enabled)
                };
                self.changed(changed)
            }
            _ => {
                let Some(c) = printable(&key) else {
                    return Command::none();
                };
                self.typeahead.push(c, Instant::now());
                let labels: Vec<&str> = self.options.iter().map(|o| o.label.as_str()).collect();
                let found = self
                    .typeahead
                    .search(&labels, active, |i| self.focus.is_enabled(i));
                match found {
                    Some(i) if i != active => {
                        self.focus.focus(i);
                        self.moved(i)
                    }
                    _ => Command::none(),
                }
            }
        }
    }
}

impl Component for Listbox {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::KeyPress(key) => self.handle_key(key),
            Message::Click(i) => {
                if !self.is_enabled(i) {
                    tracing::warn!(index = i, "ignoring click on unavailable option");
                    return Command::none();
                }
                self.focus.focus(i);
                let changed = self.selection.toggle(i);
                Command::batch([
                    Command::scroll_into_view(self.option_id(i)),
                    self.changed(changed),
                ])
            }
            Message::SetOptions(options) => {
                self.set_options(options);
                Command::none()
            }
            Message::SetSelected(indices) => {
                self.set_selected(&indices);
                Command::none()
            }
            Message::SelectionChanged(_) => Command::none(),
        }
    }

    fn semantics(&self) -> AccessNode {
        let n = self.options.len();
        let options = self.options.iter().enumerate().map(|(i, option)| {
            AccessNode::new(self.option_id(i))
                .role(Role::Option)
                .text(option.label.clone())
                .attr(Attr::Selected, self.selection.is_selected(i))
                .attr_if(option.disabled, Attr::Disabled, true)
                .attr(Attr::PosInSet, i + 1)
                .attr(Attr::SetSize, n)
        });
        AccessNode::new(self.id.clone())
            .role(Role::Listbox)
            .tab_index(TabIndex::Tabbable)
            .attr_opt(Attr::Label, self.label.clone())
            .attr(Attr::Multiselectable, self.selection.is_multiple())
            .attr(Attr::Orientation, self.orientation)
            .attr_opt(Attr::ActiveDescendant, self.active().map(|i| self.option_id(i)))
            .children(options)
    }
}

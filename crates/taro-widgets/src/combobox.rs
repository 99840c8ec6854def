//! Editable combobox with list autocomplete.
//!
//! Typing filters the options and opens the popup listbox when anything
//! matches. Focus stays in the text input; the highlighted option is
//! conveyed with `aria-activedescendant`. Down/Up move through the matches
//! (wrapping), Enter accepts, Esc closes the popup or, when already closed,
//! clears the input.

use crate::text_edit::EditBuffer;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use taro_core::{AccessNode, Attr, AttrValue, Command, Component, ElementId, Role, TabIndex};

/// How typed text matches option labels (always case-insensitive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    StartsWith,
    Contains,
}

impl Filter {
    fn matches(self, label: &str, query: &str) -> bool {
        let label = label.to_lowercase();
        match self {
            Filter::StartsWith => label.starts_with(query),
            Filter::Contains => label.contains(query),
        }
    }
}

/// Messages for the combobox component.
#[derive(Debug, Clone)]
pub enum Message {
    KeyPress(KeyEvent),
    /// Replace the option labels.
    SetOptions(Vec<String>),
    /// Parent-driven input value. Closes the popup; does not emit
    /// [`Message::InputChanged`].
    SetValue(String),
    /// A pointer click on option `i` (index into the full option list).
    Click(usize),
    /// Emitted when the user edits the input.
    InputChanged(String),
    /// Emitted when an option is accepted: its index in the full option
    /// list and its label (now the input value).
    Accepted(usize, String),
    /// Emitted when Esc closes the popup.
    Dismissed,
}

pub struct Combobox {
    id: ElementId,
    label: Option<String>,
    options: Vec<String>,
    filter: Filter,
    edit: EditBuffer,
    open: bool,
    /// Indices into `options` matching the input, in order.
    filtered: Vec<usize>,
    /// Position in `filtered` of the highlighted option.
    active: Option<usize>,
}

impl Combobox {
    pub fn new(options: Vec<String>) -> Self {
        let mut combobox = Self {
            id: ElementId::unique("combobox"),
            label: None,
            options,
            filter: Filter::default(),
            edit: EditBuffer::default(),
            open: false,
            filtered: Vec::new(),
            active: None,
        };
        combobox.refilter();
        combobox
    }

    pub fn with_id(mut self, id: impl Into<ElementId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self.refilter();
        self
    }

    pub fn value(&self) -> String {
        self.edit.value()
    }

    /// Caret position in characters.
    pub fn cursor(&self) -> usize {
        self.edit.cursor()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Indices of the options matching the input.
    pub fn filtered(&self) -> &[usize] {
        &self.filtered
    }

    /// The highlighted option, as an index into the full option list.
    pub fn active_option(&self) -> Option<usize> {
        self.active.and_then(|a| self.filtered.get(a).copied())
    }

    pub fn input_id(&self) -> ElementId {
        self.id.child("input")
    }

    pub fn listbox_id(&self) -> ElementId {
        self.id.child("listbox")
    }

    pub fn option_id(&self, index: usize) -> ElementId {
        self.id.child(format!("option-{index}"))
    }

    fn refilter(&mut self) {
        let query = self.edit.value().to_lowercase();
        self.filtered = self
            .options
            .iter()
            .enumerate()
            .filter(|(_, label)| query.is_empty() || self.filter.matches(label, &query))
            .map(|(i, _)| i)
            .collect();
        self.active = None;
        if self.filtered.is_empty() {
            self.open = false;
        }
    }

    fn highlight(&mut self, position: usize) -> Command<Message> {
        self.active = Some(position);
        match self.active_option() {
            Some(i) => Command::scroll_into_view(self.option_id(i)),
            None => Command::none(),
        }
    }

    fn step(&mut self, forward: bool) -> Command<Message> {
        let n = self.filtered.len();
        if n == 0 {
            return Command::none();
        }
        let next = match (self.active, forward) {
            (None, true) => 0,
            (None, false) => n - 1,
            (Some(a), true) => (a + 1) % n,
            (Some(a), false) => (a + n - 1) % n,
        };
        self.open = true;
        self.highlight(next)
    }

    fn close(&mut self) {
        self.open = false;
        self.active = None;
    }

    fn accept(&mut self, index: usize) -> Command<Message> {
        let Some(label) = self.options.get(index).cloned() else {
            tracing::warn!(index, len = self.options.len(), "combobox option out of bounds");
            return Command::none();
        };
        self.edit.set_value(&label);
        self.refilter();
        self.close();
        tracing::debug!(id = %self.id, index, "combobox option accepted");
        Command::message(Message::Accepted(index, label))
    }

    /// The text changed through editing.
    fn edited(&mut self) -> Command<Message> {
        self.refilter();
        self.open = !self.filtered.is_empty() && !self.edit.is_empty();
        Command::message(Message::InputChanged(self.edit.value()))
    }

    fn handle_key(&mut self, key: KeyEvent) -> Command<Message> {
        let alt = key.modifiers.contains(KeyModifiers::ALT);
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Down if alt => {
                self.open = !self.filtered.is_empty();
                Command::none()
            }
            KeyCode::Up if alt => {
                self.close();
                Command::none()
            }
            KeyCode::Down => self.step(true),
            KeyCode::Up => self.step(false),
            KeyCode::Enter => match self.active_option() {
                Some(i) if self.open => self.accept(i),
                _ => {
                    self.close();
                    Command::none()
                }
            },
            KeyCode::Esc if self.open => {
                self.close();
                Command::message(Message::Dismissed)
            }
            KeyCode::Esc if !self.edit.is_empty() => {
                self.edit.set_value("");
                self.refilter();
                Command::message(Message::InputChanged(String::new()))
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.close();
                Command::none()
            }
            KeyCode::Backspace => {
                if self.edit.delete_back() {
                    self.edited()
                } else {
                    Command::none()
                }
            }
            KeyCode::Delete => {
                if self.edit.delete_forward() {
                    self.edited()
                } else {
                    Command::none()
                }
            }
            KeyCode::Char('w') if ctrl => {
                if self.edit.delete_word_back() {
                    self.edited()
                } else {
                    Command::none()
                }
            }
            KeyCode::Left | KeyCode::Right | KeyCode::Home | KeyCode::End => {
                match key.code {
                    KeyCode::Left => self.edit.move_left(),
                    KeyCode::Right => self.edit.move_right(),
                    KeyCode::Home => self.edit.move_home(),
                    _ => self.edit.move_end(),
                }
                self.active = None;
                Command::none()
            }
            KeyCode::Char(c) if !ctrl && !alt => {
                self.edit.insert_char(c);
                self.edited()
            }
            _ => Command::none(),
        }
    }
}

impl Component for Combobox {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::KeyPress(key) => self.handle_key(key),
            Message::SetOptions(options) => {
                self.options = options;
                let was_open = self.open;
                self.refilter();
                self.open = was_open && !self.filtered.is_empty();
                Command::none()
            }
            Message::SetValue(value) => {
                self.edit.set_value(&value);
                self.refilter();
                self.close();
                Command::none()
            }
            Message::Click(i) => self.accept(i),
            Message::InputChanged(_) | Message::Accepted(..) | Message::Dismissed => {
                Command::none()
            }
        }
    }

    fn semantics(&self) -> AccessNode {
        let active = self.active_option().filter(|_| self.open);
        let input = AccessNode::new(self.input_id())
            .role(Role::Combobox)
            .text(self.edit.value())
            .tab_index(TabIndex::Tabbable)
            .attr(Attr::Expanded, self.open)
            .attr(Attr::Controls, self.listbox_id())
            .attr(Attr::Autocomplete, AttrValue::Token("list"))
            .attr(Attr::HasPopup, AttrValue::Token("listbox"))
            .attr_opt(Attr::Label, self.label.clone())
            .attr_opt(Attr::ActiveDescendant, active.map(|i| self.option_id(i)));

        let options = self.filtered.iter().map(|&i| {
            AccessNode::new(self.option_id(i))
                .role(Role::Option)
                .text(self.options[i].clone())
                .attr(Attr::Selected, active == Some(i))
        });
        let listbox = AccessNode::new(self.listbox_id())
            .role(Role::Listbox)
            .attr_opt(Attr::Label, self.label.clone())
            .hidden(!self.open)
            .children(options);

        AccessNode::new(self.id.clone()).child(input).child(listbox)
    }
}

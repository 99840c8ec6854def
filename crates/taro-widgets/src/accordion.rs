//! Stacked sections whose headers expand and collapse their panels.
//!
//! Each header is a button inside a heading; its panel is a region labelled
//! by the header. By default one section is open at a time and every section
//! may be closed. Down/Up move between headers (wrapping), Home/End jump to
//! the ends, and Enter/Space toggle the focused header.

use crate::focus::{Nav, RovingFocus};
use crossterm::event::{KeyCode, KeyEvent};
use std::collections::BTreeSet;
use taro_core::{AccessNode, Attr, Command, Component, ElementId, Orientation, Role, TabIndex};

/// One accordion section.
#[derive(Debug, Clone)]
pub struct Section {
    pub title: String,
    pub disabled: bool,
}

impl Section {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            disabled: false,
        }
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

/// Messages for the accordion component.
#[derive(Debug, Clone)]
pub enum Message {
    /// A key press on one of the headers.
    KeyPress(KeyEvent),
    /// Open or close section `i` (a header click).
    Toggle(usize),
    Expand(usize),
    Collapse(usize),
    /// Move focus to header `i`, e.g. when the user tabs onto it.
    FocusHeader(usize),
    /// Emitted after the set of open sections changed.
    Changed(Vec<usize>),
}

pub struct Accordion {
    id: ElementId,
    sections: Vec<Section>,
    expanded: BTreeSet<usize>,
    focus: RovingFocus,
    heading_level: u8,
    allow_multiple: bool,
    allow_collapse_all: bool,
}

impl Accordion {
    pub fn new(sections: Vec<Section>) -> Self {
        Self::with_id(ElementId::unique("accordion"), sections)
    }

    pub fn with_id(id: impl Into<ElementId>, sections: Vec<Section>) -> Self {
        let id = id.into();
        let headers = (0..sections.len()).map(|i| header_id(&id, i)).collect();
        let mut focus = RovingFocus::new(headers);
        for (i, section) in sections.iter().enumerate() {
            if section.disabled {
                focus.set_disabled(i, true);
            }
        }
        Self {
            id,
            sections,
            expanded: BTreeSet::new(),
            focus,
            heading_level: 3,
            allow_multiple: false,
            allow_collapse_all: true,
        }
    }

    /// Let several sections be open at once.
    pub fn with_allow_multiple(mut self, allow: bool) -> Self {
        self.allow_multiple = allow;
        self
    }

    /// When `false`, the last open section cannot be closed and the first
    /// enabled section starts open.
    pub fn with_allow_collapse_all(mut self, allow: bool) -> Self {
        self.allow_collapse_all = allow;
        self.ensure_one_open();
        self
    }

    /// The `aria-level` of the headings wrapping the header buttons.
    pub fn with_heading_level(mut self, level: u8) -> Self {
        self.heading_level = level.clamp(1, 6);
        self
    }

    /// Start with section `index` open.
    pub fn with_expanded(mut self, index: usize) -> Self {
        self.expand(index);
        self
    }

    fn ensure_one_open(&mut self) {
        if !self.allow_collapse_all && self.expanded.is_empty() {
            if let Some(first) = (0..self.sections.len()).find(|&i| !self.sections[i].disabled) {
                self.expanded.insert(first);
            }
        }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn is_expanded(&self, index: usize) -> bool {
        self.expanded.contains(&index)
    }

    /// Open sections in ascending order.
    pub fn expanded(&self) -> Vec<usize> {
        self.expanded.iter().copied().collect()
    }

    /// Index of the header that arrow keys move from.
    pub fn focused_header(&self) -> usize {
        self.focus.active()
    }

    pub fn header_id(&self, index: usize) -> ElementId {
        header_id(&self.id, index)
    }

    pub fn panel_id(&self, index: usize) -> ElementId {
        self.id.child(format!("panel-{index}"))
    }

    /// Whether section `index` is open and closing it is not allowed.
    fn is_locked(&self, index: usize) -> bool {
        !self.allow_collapse_all && self.expanded.len() == 1 && self.expanded.contains(&index)
    }

    fn expand(&mut self, index: usize) -> bool {
        let Some(section) = self.sections.get(index) else {
            tracing::warn!(index, len = self.sections.len(), "expand out of bounds");
            return false;
        };
        if section.disabled {
            tracing::warn!(index, "cannot expand a disabled section");
            return false;
        }
        if self.expanded.contains(&index) {
            return false;
        }
        if !self.allow_multiple {
            self.expanded.clear();
        }
        self.expanded.insert(index);
        true
    }

    fn collapse(&mut self, index: usize) -> bool {
        if !self.expanded.contains(&index) {
            return false;
        }
        if self.is_locked(index) {
            tracing::debug!(index, "last open section stays open");
            return false;
        }
        self.expanded.remove(&index);
        true
    }

    fn changed(&self, changed: bool) -> Command<Message> {
        if changed {
            tracing::debug!(id = %self.id, expanded = ?self.expanded, "accordion changed");
            Command::message(Message::Changed(self.expanded()))
        } else {
            Command::none()
        }
    }
}

fn header_id(id: &ElementId, index: usize) -> ElementId {
    id.child(format!("header-{index}"))
}

impl Component for Accordion {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::KeyPress(key) => {
                if let Some(nav) = Nav::from_key(&key, Orientation::Vertical) {
                    return match self.focus.navigate(nav) {
                        Some(i) => Command::focus(self.header_id(i)),
                        None => Command::none(),
                    };
                }
                match key.code {
                    KeyCode::Enter | KeyCode::Char(' ') => {
                        Command::message(Message::Toggle(self.focus.active()))
                    }
                    _ => Command::none(),
                }
            }
            Message::Toggle(i) => {
                let changed = if self.expanded.contains(&i) {
                    self.collapse(i)
                } else {
                    self.expand(i)
                };
                self.changed(changed)
            }
            Message::Expand(i) => {
                let changed = self.expand(i);
                self.changed(changed)
            }
            Message::Collapse(i) => {
                let changed = self.collapse(i);
                self.changed(changed)
            }
            Message::FocusHeader(i) => {
                if self.focus.focus(i) {
                    Command::focus(self.header_id(i))
                } else {
                    Command::none()
                }
            }
            Message::Changed(_) => Command::none(),
        }
    }

    fn semantics(&self) -> AccessNode {
        let mut root = AccessNode::new(self.id.clone());
        for (i, section) in self.sections.iter().enumerate() {
            let open = self.is_expanded(i);
            let header = self.header_id(i);
            let button = AccessNode::new(header.clone())
                .role(Role::Button)
                .text(section.title.clone())
                .tab_index(TabIndex::Tabbable)
                .attr(Attr::Expanded, open)
                .attr(Attr::Controls, self.panel_id(i))
                .attr_if(section.disabled || self.is_locked(i), Attr::Disabled, true);
            root = root
                .child(
                    AccessNode::new(self.id.child(format!("heading-{i}")))
                        .role(Role::Heading)
                        .attr(Attr::Level, self.heading_level)
                        .child(button),
                )
                .child(
                    AccessNode::new(self.panel_id(i))
                        .role(Role::Region)
                        .attr(Attr::LabelledBy, header)
                        .hidden(!open),
                );
        }
        root
    }
}

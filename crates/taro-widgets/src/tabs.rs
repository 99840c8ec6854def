//! Tabs: a tablist whose selected tab decides which panel is shown.
//!
//! Arrow keys move focus along the tablist (wrapping, skipping disabled
//! tabs) and Home/End jump to the ends. With [`Activation::Automatic`] the
//! focused tab is selected as it moves; with [`Activation::Manual`] the user
//! confirms with Enter or Space.

use crate::focus::{Nav, RovingFocus};
use crossterm::event::{KeyCode, KeyEvent};
use taro_core::{AccessNode, Attr, Command, Component, ElementId, Orientation, Role, TabIndex};

/// When moving focus also changes the selected tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Activation {
    /// Selection follows focus.
    #[default]
    Automatic,
    /// Focus moves freely; Enter/Space select.
    Manual,
}

/// Messages for the tabs component.
#[derive(Debug, Clone)]
pub enum Message {
    /// A key press forwarded while a tab has focus.
    KeyPress(KeyEvent),
    /// Parent-driven selection. Does not emit [`Message::Selected`].
    Select(usize),
    /// The user clicked tab `i`.
    Click(usize),
    /// Emitted when user input selected a different tab.
    Selected(usize),
}

pub struct Tabs {
    id: ElementId,
    titles: Vec<String>,
    selected: usize,
    focus: RovingFocus,
    orientation: Orientation,
    activation: Activation,
    label: Option<String>,
}

impl Tabs {
    pub fn new(titles: Vec<String>) -> Self {
        Self::with_id(ElementId::unique("tabs"), titles)
    }

    pub fn with_id(id: impl Into<ElementId>, titles: Vec<String>) -> Self {
        let id = id.into();
        let ids = (0..titles.len()).map(|i| tab_id(&id, i)).collect();
        Self {
            id,
            titles,
            selected: 0,
            focus: RovingFocus::new(ids),
            orientation: Orientation::Horizontal,
            activation: Activation::Automatic,
            label: None,
        }
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_activation(mut self, activation: Activation) -> Self {
        self.activation = activation;
        self
    }

    /// Accessible name of the tablist.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Disable tab `index`. A disabled selected tab hands selection to the
    /// nearest enabled one.
    pub fn with_disabled(mut self, index: usize) -> Self {
        self.set_disabled(index, true);
        self
    }

    pub fn with_selected(mut self, index: usize) -> Self {
        self.select(index);
        self
    }

    pub fn set_disabled(&mut self, index: usize, disabled: bool) {
        if index >= self.titles.len() {
            tracing::warn!(id = %self.id, index, "no such tab to disable");
            return;
        }
        self.focus.set_disabled(index, disabled);
        if disabled && index == self.selected {
            if let Some(nearest) = self.nearest_enabled(index) {
                self.selected = nearest;
            }
        }
    }

    /// The enabled tab closest to `index`, preferring the later one on a tie.
    fn nearest_enabled(&self, index: usize) -> Option<usize> {
        (1..self.titles.len()).find_map(|distance| {
            [index.checked_add(distance), index.checked_sub(distance)]
                .into_iter()
                .flatten()
                .find(|&i| i < self.titles.len() && self.focus.is_enabled(i))
        })
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// The tab holding the roving tabindex; differs from
    /// [`selected`](Self::selected) only under manual activation.
    pub fn focused_tab(&self) -> usize {
        self.focus.active()
    }

    pub fn is_disabled(&self, index: usize) -> bool {
        !self.focus.is_enabled(index)
    }

    pub fn tab_id(&self, index: usize) -> ElementId {
        tab_id(&self.id, index)
    }

    pub fn panel_id(&self, index: usize) -> ElementId {
        self.id.child(format!("panel-{index}"))
    }

    /// Select `index` and move the roving focus to it. Returns whether the
    /// selection changed.
    fn select(&mut self, index: usize) -> bool {
        if !self.focus.focus(index) {
            return false;
        }
        let changed = self.selected != index;
        self.selected = index;
        changed
    }

    fn selected_if(&mut self, index: usize) -> Command<Message> {
        if self.select(index) {
            Command::message(Message::Selected(index))
        } else {
            Command::none()
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Command<Message> {
        if let Some(nav) = Nav::from_key(&key, self.orientation) {
            let Some(i) = self.focus.navigate(nav) else {
                return Command::none();
            };
            let focus = Command::focus(self.tab_id(i));
            return match self.activation {
                Activation::Automatic => Command::batch([focus, self.selected_if(i)]),
                Activation::Manual => focus,
            };
        }
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => {
                let active = self.focus.active();
                self.selected_if(active)
            }
            _ => Command::none(),
        }
    }
}

fn tab_id(id: &ElementId, index: usize) -> ElementId {
    id.child(format!("tab-{index}"))
}

impl Component for Tabs {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::KeyPress(key) => self.handle_key(key),
            Message::Select(i) => {
                self.select(i);
                Command::none()
            }
            Message::Click(i) => {
                if self.is_disabled(i) {
                    return Command::none();
                }
                let focus = Command::focus(self.tab_id(i));
                Command::batch([focus, self.selected_if(i)])
            }
            Message::Selected(_) => Command::none(),
        }
    }

    fn semantics(&self) -> AccessNode {
        let tabs = self.titles.iter().enumerate().map(|(i, title)| {
            AccessNode::new(self.tab_id(i))
                .role(Role::Tab)
                .text(title.clone())
                .tab_index(self.focus.tab_index(i))
                .attr(Attr::Selected, i == self.selected)
                .attr(Attr::Controls, self.panel_id(i))
                .attr_if(self.is_disabled(i), Attr::Disabled, true)
        });
        let tablist = AccessNode::new(self.id.child("tablist"))
            .role(Role::TabList)
            .attr(Attr::Orientation, self.orientation)
            .attr_opt(Attr::Label, self.label.clone())
            .children(tabs);
        let panels = (0..self.titles.len()).map(|i| {
            AccessNode::new(self.panel_id(i))
                .role(Role::TabPanel)
                .tab_index(TabIndex::Tabbable)
                .attr(Attr::LabelledBy, self.tab_id(i))
                .hidden(i != self.selected)
        });
        AccessNode::new(self.id.clone())
            .child(tablist)
            .children(panels)
    }
}

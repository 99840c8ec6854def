//! Menu button: a button that opens a menu of actions, checkboxes and radio
//! items.
//!
//! Focus moves into the menu when it opens and back to the button when it
//! closes. Items are reached with the arrow keys (wrapping), Home/End and
//! type-to-select; separators and disabled items are skipped.

use crate::focus::{Nav, RovingFocus};
use crate::key::{printable, KeyCombination};
use crate::typeahead::Typeahead;
use crossterm::event::{KeyCode, KeyEvent};
use std::time::Instant;
use taro_core::{
    AccessNode, Attr, AttrValue, Command, Component, ElementId, Orientation, Role, TabIndex,
};

/// What an item does when activated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemKind {
    Action,
    Checkbox(bool),
    /// A radio item; checking it unchecks the rest of `group`.
    Radio { group: String, checked: bool },
    Separator,
}

#[derive(Debug, Clone)]
pub struct MenuItem {
    pub label: String,
    pub kind: ItemKind,
    pub disabled: bool,
    /// Shown to assistive technology as `aria-keyshortcuts`. Handling the
    /// shortcut itself is the application's job.
    pub shortcut: Option<KeyCombination>,
}

impl MenuItem {
    fn with_kind(label: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            label: label.into(),
            kind,
            disabled: false,
            shortcut: None,
        }
    }

    pub fn action(label: impl Into<String>) -> Self {
        Self::with_kind(label, ItemKind::Action)
    }

    pub fn checkbox(label: impl Into<String>, checked: bool) -> Self {
        Self::with_kind(label, ItemKind::Checkbox(checked))
    }

    pub fn radio(label: impl Into<String>, group: impl Into<String>, checked: bool) -> Self {
        Self::with_kind(
            label,
            ItemKind::Radio {
                group: group.into(),
                checked,
            },
        )
    }

    pub fn separator() -> Self {
        Self::with_kind("", ItemKind::Separator)
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn with_shortcut(mut self, shortcut: KeyCombination) -> Self {
        self.shortcut = Some(shortcut);
        self
    }

    pub fn is_checked(&self) -> Option<bool> {
        match &self.kind {
            ItemKind::Checkbox(checked) | ItemKind::Radio { checked, .. } => Some(*checked),
            _ => None,
        }
    }

    fn focusable(&self) -> bool {
        !self.disabled && self.kind != ItemKind::Separator
    }
}

/// Messages for the menu button.
#[derive(Debug, Clone)]
pub enum Message {
    /// A key press on the button or inside the open menu.
    KeyPress(KeyEvent),
    /// Open the menu with the first item focused.
    Open,
    /// Close the menu and refocus the button.
    Close,
    /// A pointer activation of item `i`.
    Click(usize),
    /// Emitted when action item `i` is activated.
    Activated(usize),
    /// Emitted when checkbox or radio item `i` changes state.
    Toggled(usize, bool),
    /// Emitted whenever the menu closes.
    Closed,
}

pub struct MenuButton {
    id: ElementId,
    label: String,
    items: Vec<MenuItem>,
    open: bool,
    focus: RovingFocus,
    typeahead: Typeahead,
}

impl MenuButton {
    pub fn new(label: impl Into<String>, items: Vec<MenuItem>) -> Self {
        Self::with_id(ElementId::unique("menu"), label, items)
    }

    pub fn with_id(
        id: impl Into<ElementId>,
        label: impl Into<String>,
        items: Vec<MenuItem>,
    ) -> Self {
        let id = id.into();
        let ids = (0..items.len()).map(|i| item_id(&id, i)).collect();
        let mut focus = RovingFocus::new(ids);
        for (i, item) in items.iter().enumerate() {
            if !item.focusable() {
                focus.set_disabled(i, true);
            }
        }
        Self {
            id,
            label: label.into(),
            items,
            open: false,
            focus,
            typeahead: Typeahead::new(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    /// The focused item while the menu is open.
    pub fn active(&self) -> Option<usize> {
        self.open.then(|| self.focus.active())
    }

    pub fn button_id(&self) -> ElementId {
        self.id.child("button")
    }

    pub fn menu_id(&self) -> ElementId {
        self.id.child("menu")
    }

    pub fn item_id(&self, index: usize) -> ElementId {
        item_id(&self.id, index)
    }

    fn open_at(&mut self, nav: Nav) -> Command<Message> {
        self.open = true;
        self.typeahead.clear();
        let Some(target) = self.focus.target(nav) else {
            tracing::debug!(id = %self.id, "menu has no enabled items");
            return Command::focus(self.menu_id());
        };
        self.focus.focus(target);
        tracing::debug!(id = %self.id, item = target, "menu opened");
        Command::focus(self.item_id(target))
    }

    /// Close the menu. `refocus` returns focus to the button (Esc, item
    /// activation); Tab lets the host move focus on.
    fn close(&mut self, refocus: bool) -> Command<Message> {
        if !self.open {
            return Command::none();
        }
        self.open = false;
        let closed = Command::message(Message::Closed);
        if refocus {
            Command::batch([Command::focus(self.button_id()), closed])
        } else {
            closed
        }
    }

    /// Perform item `index`'s action. `close` is false for Space on a
    /// checkbox or radio item, which keeps the menu open.
    fn activate(&mut self, index: usize, close: bool) -> Command<Message> {
        let Some(item) = self.items.get(index) else {
            tracing::warn!(index, "menu item out of bounds");
            return Command::none();
        };
        if item.disabled || item.kind == ItemKind::Separator {
            tracing::warn!(index, label = %item.label, "refusing to activate menu item");
            return Command::none();
        }
        let notify = match item.kind.clone() {
            ItemKind::Action => Message::Activated(index),
            ItemKind::Checkbox(checked) => {
                self.items[index].kind = ItemKind::Checkbox(!checked);
                Message::Toggled(index, !checked)
            }
            ItemKind::Radio { group, .. } => {
                for (i, other) in self.items.iter_mut().enumerate() {
                    if let ItemKind::Radio { group: g, checked } = &mut other.kind {
                        if *g == group {
                            *checked = i == index;
                        }
                    }
                }
                Message::Toggled(index, true)
            }
            ItemKind::Separator => return Command::none(),
        };
        let notify = Command::message(notify);
        if close {
            Command::batch([notify, self.close(true)])
        } else {
            notify
        }
    }

    fn handle_open_key(&mut self, key: KeyEvent) -> Command<Message> {
        if let Some(nav) = Nav::from_key(&key, Orientation::Vertical) {
            return match self.focus.navigate(nav) {
                Some(i) => Command::focus(self.item_id(i)),
                None => Command::none(),
            };
        }
        let active = self.focus.active();
        match key.code {
            KeyCode::Enter => self.activate(active, true),
            KeyCode::Char(' ') => {
                let keep_open = self.items.get(active).is_some_and(|item| {
                    matches!(item.kind, ItemKind::Checkbox(_) | ItemKind::Radio { .. })
                });
                self.activate(active, !keep_open)
            }
            KeyCode::Esc => self.close(true),
            KeyCode::Tab | KeyCode::BackTab => self.close(false),
            _ => {
                let Some(c) = printable(&key) else {
                    return Command::none();
                };
                self.typeahead.push(c, Instant::now());
                let labels: Vec<&str> = self.items.iter().map(|i| i.label.as_str()).collect();
                let found = self
                    .typeahead
                    .search(&labels, active, |i| self.focus.is_enabled(i));
                match found {
                    Some(i) if i != active => {
                        self.focus.focus(i);
                        Command::focus(self.item_id(i))
                    }
                    _ => Command::none(),
                }
            }
        }
    }
}

fn item_id(id: &ElementId, index: usize) -> ElementId {
    id.child(format!("item-{index}"))
}

impl Component for MenuButton {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::KeyPress(key) if self.open => self.handle_open_key(key),
            Message::KeyPress(key) => match key.code {
                KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Down => self.open_at(Nav::First),
                KeyCode::Up => self.open_at(Nav::Last),
                _ => Command::none(),
            },
            Message::Open => self.open_at(Nav::First),
            Message::Close => self.close(true),
            Message::Click(i) => self.activate(i, true),
            Message::Activated(_) | Message::Toggled(..) | Message::Closed => Command::none(),
        }
    }

    fn semantics(&self) -> AccessNode {
        let button = AccessNode::new(self.button_id())
            .role(Role::Button)
            .text(self.label.clone())
            .tab_index(TabIndex::Tabbable)
            .attr(Attr::HasPopup, AttrValue::Token("menu"))
            .attr(Attr::Expanded, self.open)
            .attr(Attr::Controls, self.menu_id());

        let items = self.items.iter().enumerate().map(|(i, item)| {
            let node = AccessNode::new(self.item_id(i));
            let role = match item.kind {
                ItemKind::Separator => return node.role(Role::Separator),
                ItemKind::Action => Role::MenuItem,
                ItemKind::Checkbox(_) => Role::MenuItemCheckbox,
                ItemKind::Radio { .. } => Role::MenuItemRadio,
            };
            node.role(role)
                .text(item.label.clone())
                .tab_index(TabIndex::Programmatic)
                .attr_opt(Attr::Checked, item.is_checked())
                .attr_if(item.disabled, Attr::Disabled, true)
                .attr_opt(
                    Attr::KeyShortcuts,
                    item.shortcut.as_ref().map(KeyCombination::aria_key_shortcuts),
                )
        });

        let menu = AccessNode::new(self.menu_id())
            .role(Role::Menu)
            .tab_index(TabIndex::Programmatic)
            .attr(Attr::LabelledBy, self.button_id())
            .hidden(!self.open)
            .children(items);

        AccessNode::new(self.id.clone()).child(button).child(menu)
    }

    fn focused(&self) -> bool {
        self.open
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use taro_core::testing::Harness;

    fn edit_menu() -> MenuButton {
        MenuButton::with_id(
            "edit",
            "Edit",
            vec![
                MenuItem::action("Cut").with_shortcut(KeyCombination::ctrl(KeyCode::Char('x'))),
                MenuItem::action("Copy"),
                MenuItem::action("Paste").disabled(true),
                MenuItem::separator(),
                MenuItem::checkbox("Word wrap", false),
                MenuItem::radio("Spaces", "indent", true),
                MenuItem::radio("Tabs", "indent", false),
            ],
        )
    }

    fn harness() -> Harness<MenuButton> {
        Harness::new(edit_menu()).with_keys(Message::KeyPress)
    }

    #[test]
    fn down_opens_on_first_item() {
        let mut h = harness();
        h.press(KeyCode::Down);
        assert!(h.component().is_open());
        assert_eq!(h.component().active(), Some(0));
        assert_eq!(h.focused_id().unwrap().as_str(), "edit-item-0");
    }

    #[test]
    fn up_opens_on_last_item() {
        let mut h = harness();
        h.press(KeyCode::Up);
        assert_eq!(h.component().active(), Some(6));
    }

    #[test]
    fn navigation_skips_disabled_and_separators() {
        let mut h = harness();
        h.press(KeyCode::Enter);
        h.press(KeyCode::Down);
        h.press(KeyCode::Down);
        assert_eq!(h.component().active(), Some(4));
        h.press(KeyCode::Up);
        assert_eq!(h.component().active(), Some(1));
    }

    #[test]
    fn navigation_wraps() {
        let mut h = harness();
        h.press(KeyCode::Down);
        h.press(KeyCode::Up);
        assert_eq!(h.component().active(), Some(6));
        h.press(KeyCode::Down);
        assert_eq!(h.component().active(), Some(0));
        h.press(KeyCode::End);
        assert_eq!(h.component().active(), Some(6));
        h.press(KeyCode::Home);
        assert_eq!(h.component().active(), Some(0));
    }

    #[test]
    fn enter_activates_and_returns_focus() {
        let mut h = harness();
        h.press(KeyCode::Down);
        h.press(KeyCode::Down);
        h.press(KeyCode::Enter);
        assert!(h.saw("Activated(1)"));
        assert!(h.saw("Closed"));
        assert!(!h.component().is_open());
        assert_eq!(h.focused_id().unwrap().as_str(), "edit-button");
    }

    #[test]
    fn space_toggles_checkbox_without_closing() {
        let mut h = harness();
        h.press(KeyCode::Down);
        h.press(KeyCode::Char('w'));
        assert_eq!(h.component().active(), Some(4));
        h.press(KeyCode::Char(' '));
        assert!(h.saw("Toggled(4, true)"));
        assert!(h.component().is_open());
        assert_eq!(h.component().items()[4].is_checked(), Some(true));
    }

    #[test]
    fn radio_checks_one_in_group() {
        let mut h = harness();
        h.send(Message::Click(6));
        assert_eq!(h.component().items()[5].is_checked(), Some(false));
        assert_eq!(h.component().items()[6].is_checked(), Some(true));
        assert!(h.saw("Toggled(6, true)"));
    }

    #[test]
    fn disabled_item_refuses_activation() {
        let mut h = harness();
        h.send(Message::Open);
        h.send(Message::Click(2));
        assert!(!h.saw("Activated"));
        assert!(h.component().is_open());
        h.send(Message::Click(3));
        assert!(h.component().is_open());
    }

    #[test]
    fn esc_closes_and_refocuses_button() {
        let mut h = harness();
        h.press(KeyCode::Down);
        h.press(KeyCode::Esc);
        assert!(!h.component().is_open());
        assert_eq!(h.focused_id().unwrap().as_str(), "edit-button");
    }

    #[test]
    fn tab_closes_without_moving_focus() {
        let mut h = harness();
        h.press(KeyCode::Down);
        h.take_effects();
        h.press(KeyCode::Tab);
        assert!(!h.component().is_open());
        assert!(h.saw("Closed"));
        assert!(h.focused_id().is_none());
    }

    #[test]
    fn typeahead_focuses_matching_item() {
        let mut h = harness();
        h.press(KeyCode::Down);
        h.press(KeyCode::Char('t'));
        assert_eq!(h.component().active(), Some(6));
        h.press(KeyCode::Char('p'));
        assert_eq!(h.component().active(), Some(6));
    }

    #[test]
    fn closed_menu_ignores_other_keys() {
        let mut h = harness();
        h.press_with(KeyCode::Char('c'), KeyModifiers::CONTROL);
        h.press(KeyCode::Right);
        assert!(!h.component().is_open());
        assert!(h.effects().is_empty());
    }

    #[test]
    fn semantics() {
        let mut h = harness();
        let tree = h.semantics();
        let button = tree.find("edit-button").unwrap();
        assert_eq!(button.attr_string(Attr::HasPopup).as_deref(), Some("menu"));
        assert_eq!(button.attr_string(Attr::Expanded).as_deref(), Some("false"));
        assert!(tree.find("edit-menu").unwrap().is_hidden());

        h.send(Message::Open);
        let tree = h.semantics();
        let menu = tree.find("edit-menu").unwrap();
        assert!(!menu.is_hidden());
        assert_eq!(menu.attr_string(Attr::LabelledBy).as_deref(), Some("edit-button"));
        let cut = tree.find("edit-item-0").unwrap();
        assert_eq!(cut.role, Some(Role::MenuItem));
        assert_eq!(cut.attr_string(Attr::KeyShortcuts).as_deref(), Some("Control+X"));
        let paste = tree.find("edit-item-2").unwrap();
        assert_eq!(paste.attr_string(Attr::Disabled).as_deref(), Some("true"));
        assert_eq!(tree.find("edit-item-3").unwrap().role, Some(Role::Separator));
        let wrap = tree.find("edit-item-4").unwrap();
        assert_eq!(wrap.role, Some(Role::MenuItemCheckbox));
        assert_eq!(wrap.attr_string(Attr::Checked).as_deref(), Some("false"));
        assert_eq!(tree.find_role(Role::MenuItemRadio).len(), 2);
    }
}

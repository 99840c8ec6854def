//! A button that shows and hides a panel of content.

use crossterm::event::{KeyCode, KeyEvent};
use taro_core::{AccessNode, Attr, Command, Component, ElementId, Role, TabIndex};

/// Messages for the disclosure component.
#[derive(Debug, Clone)]
pub enum Message {
    /// A key press on the button.
    KeyPress(KeyEvent),
    /// Flip the panel (a click on the button).
    Toggle,
    /// Parent-driven open state. Does not emit [`Message::Toggled`].
    SetExpanded(bool),
    /// Emitted after a user toggle, carrying the new state.
    Toggled(bool),
}

/// Show/hide toggle with a controlled panel.
///
/// ```
/// use taro_core::{testing::Harness, Component};
/// use taro_widgets::disclosure::{Disclosure, Message};
///
/// let mut h = Harness::new(Disclosure::new("Details"));
/// h.send(Message::Toggle);
/// assert!(h.component().is_expanded());
/// assert!(h.saw("Toggled(true)"));
/// ```
pub struct Disclosure {
    id: ElementId,
    label: String,
    expanded: bool,
}

impl Disclosure {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: ElementId::unique("disclosure"),
            label: label.into(),
            expanded: false,
        }
    }

    pub fn with_id(mut self, id: impl Into<ElementId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_expanded(mut self, expanded: bool) -> Self {
        self.expanded = expanded;
        self
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn button_id(&self) -> ElementId {
        self.id.child("button")
    }

    pub fn panel_id(&self) -> ElementId {
        self.id.child("panel")
    }
}

impl Component for Disclosure {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::KeyPress(key) => match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => Command::message(Message::Toggle),
                _ => Command::none(),
            },
            Message::Toggle => {
                self.expanded = !self.expanded;
                tracing::debug!(id = %self.id, expanded = self.expanded, "disclosure toggled");
                Command::message(Message::Toggled(self.expanded))
            }
            Message::SetExpanded(expanded) => {
                self.expanded = expanded;
                Command::none()
            }
            Message::Toggled(_) => Command::none(),
        }
    }

    fn semantics(&self) -> AccessNode {
        AccessNode::new(self.id.clone())
            .child(
                AccessNode::new(self.button_id())
                    .role(Role::Button)
                    .text(self.label.clone())
                    .tab_index(TabIndex::Tabbable)
                    .attr(Attr::Expanded, self.expanded)
                    .attr(Attr::Controls, self.panel_id()),
            )
            .child(AccessNode::new(self.panel_id()).hidden(!self.expanded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taro_core::testing::{key, Harness};

    #[test]
    fn enter_and_space_toggle() {
        let mut h = Harness::new(Disclosure::new("More")).with_keys(Message::KeyPress);
        h.press(KeyCode::Enter);
        assert!(h.component().is_expanded());
        h.press(KeyCode::Char(' '));
        assert!(!h.component().is_expanded());
        assert!(h.saw("Toggled(false)"));
    }

    #[test]
    fn other_keys_ignored() {
        let mut d = Disclosure::new("More");
        assert!(d.update(Message::KeyPress(key(KeyCode::Char('x')))).is_none());
        assert!(!d.is_expanded());
    }

    #[test]
    fn set_expanded_is_silent() {
        let mut d = Disclosure::new("More");
        assert!(d.update(Message::SetExpanded(true)).is_none());
        assert!(d.is_expanded());
    }

    #[test]
    fn semantics_track_state() {
        let mut h = Harness::new(Disclosure::new("More").with_id("faq"));
        let tree = h.semantics();
        let button = tree.find("faq-button").unwrap();
        assert_eq!(button.attr_string(Attr::Expanded).as_deref(), Some("false"));
        assert_eq!(button.attr_string(Attr::Controls).as_deref(), Some("faq-panel"));
        assert!(tree.find("faq-panel").unwrap().is_hidden());

        h.send(Message::Toggle);
        let tree = h.semantics();
        assert!(!tree.find("faq-panel").unwrap().is_hidden());
        assert_eq!(
            tree.find("faq-button").unwrap().attr_string(Attr::Expanded).as_deref(),
            Some("true")
        );
    }
}

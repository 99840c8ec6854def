//! Modal dialog and alert dialog with a focus trap.
//!
//! While open, Tab and Shift+Tab cycle through the consumer's focusable
//! elements followed by the action buttons, and focus that lands outside the
//! dialog is pulled back in. Closing returns focus to the element that was
//! focused when the dialog opened.

use crate::focus::FocusTrap;
use crate::key::printable;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use taro_core::{AccessNode, Attr, Command, Component, ElementId, Role, TabIndex};

/// Plain dialog or alert dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogKind {
    #[default]
    Dialog,
    /// An urgent message requiring a response; not dismissible with Esc by
    /// default.
    Alert,
}

/// A button in the dialog.
#[derive(Debug, Clone)]
pub struct Action {
    pub label: String,
    /// Pressing this character (case-insensitive) selects the action.
    pub shortcut: Option<char>,
}

impl Action {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            shortcut: None,
        }
    }

    pub fn with_shortcut(mut self, key: char) -> Self {
        self.shortcut = Some(key.to_ascii_lowercase());
        self
    }
}

/// Messages for the dialog component.
#[derive(Debug, Clone)]
pub enum Message {
    KeyPress(KeyEvent),
    /// Open the dialog; `return_focus` receives focus again on close.
    Open { return_focus: Option<ElementId> },
    Close,
    /// Focus moved to `id` (reported by the host).
    FocusIn(ElementId),
    /// Emitted when an action is chosen; the dialog then closes.
    Select(usize),
    /// Emitted when the dialog is dismissed without an action; the dialog
    /// then closes.
    Dismiss,
}

/// A modal dialog.
///
/// # Example
///
/// ```
/// use taro_core::testing::Harness;
/// use taro_widgets::dialog::{Action, Dialog, Message};
///
/// let dialog = Dialog::new("Delete file?")
///     .with_id("confirm")
///     .body("This cannot be undone.")
///     .action(Action::new("Delete").with_shortcut('d'))
///     .action(Action::new("Cancel").with_shortcut('c'));
///
/// let mut h = Harness::new(dialog);
/// h.send(Message::Open { return_focus: Some("delete-button".into()) });
/// assert_eq!(h.focused_id().unwrap().as_str(), "confirm-action-0");
/// ```
pub struct Dialog {
    id: ElementId,
    kind: DialogKind,
    title: String,
    body: Option<String>,
    actions: Vec<Action>,
    focusables: Vec<ElementId>,
    initial_focus: Option<ElementId>,
    dismissible: bool,
    open: bool,
    return_focus: Option<ElementId>,
    current: Option<ElementId>,
    focused_action: usize,
}

impl Dialog {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: ElementId::unique("dialog"),
            kind: DialogKind::Dialog,
            title: title.into(),
            body: None,
            actions: Vec::new(),
            focusables: Vec::new(),
            initial_focus: None,
            dismissible: true,
            open: false,
            return_focus: None,
            current: None,
            focused_action: 0,
        }
    }

    /// An alert dialog. Esc does not dismiss it unless
    /// [`dismissible`](Dialog::dismissible) is set.
    pub fn alert(title: impl Into<String>) -> Self {
        let mut dialog = Self::new(title);
        dialog.id = ElementId::unique("alertdialog");
        dialog.kind = DialogKind::Alert;
        dialog.dismissible = false;
        dialog
    }

    pub fn with_id(mut self, id: impl Into<ElementId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn body(mut self, text: impl Into<String>) -> Self {
        self.body = Some(text.into());
        self
    }

    pub fn action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    /// Consumer-rendered focusable elements inside the dialog, in tab order.
    /// They come before the action buttons in the focus trap.
    pub fn with_focusables(mut self, ids: Vec<ElementId>) -> Self {
        self.focusables = ids;
        self
    }

    /// The element to focus on open instead of the first trapped element.
    pub fn with_initial_focus(mut self, id: impl Into<ElementId>) -> Self {
        self.initial_focus = Some(id.into());
        self
    }

    /// Whether Esc dismisses the dialog.
    pub fn dismissible(mut self, dismissible: bool) -> Self {
        self.dismissible = dismissible;
        self
    }

    pub fn kind(&self) -> DialogKind {
        self.kind
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn focused_action(&self) -> usize {
        self.focused_action
    }

    pub fn action_id(&self, index: usize) -> ElementId {
        self.id.child(format!("action-{index}"))
    }

    pub fn title_id(&self) -> ElementId {
        self.id.child("title")
    }

    pub fn body_id(&self) -> ElementId {
        self.id.child("body")
    }

    fn trap(&self) -> FocusTrap {
        let mut ids = self.focusables.clone();
        ids.extend((0..self.actions.len()).map(|i| self.action_id(i)));
        FocusTrap::new(ids)
    }

    /// Whether focus on `id` counts as inside the dialog: the dialog node,
    /// its initial focus target, or anything in the trap.
    fn contains(&self, id: &ElementId) -> bool {
        *id == self.id || self.initial_focus.as_ref() == Some(id) || self.trap().contains(id)
    }

    fn action_index(&self, id: &ElementId) -> Option<usize> {
        (0..self.actions.len()).find(|&i| self.action_id(i) == *id)
    }

    fn move_to(&mut self, target: ElementId) -> Command<Message> {
        if let Some(i) = self.action_index(&target) {
            self.focused_action = i;
        }
        self.current = Some(target.clone());
        Command::focus(target)
    }

    fn open(&mut self, return_focus: Option<ElementId>) -> Command<Message> {
        self.open = true;
        self.return_focus = return_focus;
        self.focused_action = 0;
        tracing::debug!(id = %self.id, "dialog opened");
        let target = self
            .initial_focus
            .clone()
            .or_else(|| self.trap().first().cloned())
            .unwrap_or_else(|| self.id.clone());
        self.move_to(target)
    }

    fn close(&mut self) -> Command<Message> {
        if !self.open {
            return Command::none();
        }
        self.open = false;
        self.current = None;
        tracing::debug!(id = %self.id, "dialog closed");
        match self.return_focus.take() {
            Some(id) => Command::focus(id),
            None => Command::none(),
        }
    }

    fn cycle(&mut self, forward: bool) -> Command<Message> {
        let trap = self.trap();
        let target = if forward {
            trap.next_after(self.current.as_ref())
        } else {
            trap.prev_before(self.current.as_ref())
        };
        match target.cloned() {
            Some(id) => self.move_to(id),
            None => self.move_to(self.id.clone()),
        }
    }

    /// Whether focus is on a consumer element, where typed keys belong to it.
    fn in_consumer_element(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|c| self.focusables.contains(c))
    }

    fn handle_key(&mut self, key: KeyEvent) -> Command<Message> {
        match key.code {
            KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => self.cycle(false),
            KeyCode::BackTab => self.cycle(false),
            KeyCode::Tab => self.cycle(true),
            KeyCode::Esc if self.dismissible => Command::message(Message::Dismiss),
            KeyCode::Esc => {
                tracing::debug!(id = %self.id, "dialog is not dismissible");
                Command::none()
            }
            KeyCode::Enter if self.in_consumer_element() => Command::none(),
            KeyCode::Enter if self.actions.is_empty() => Command::message(Message::Dismiss),
            KeyCode::Enter => Command::message(Message::Select(self.focused_action)),
            KeyCode::Left | KeyCode::Right if !self.actions.is_empty() => {
                let n = self.actions.len();
                let next = if key.code == KeyCode::Right {
                    (self.focused_action + 1) % n
                } else {
                    (self.focused_action + n - 1) % n
                };
                self.move_to(self.action_id(next))
            }
            _ => {
                if self.in_consumer_element() {
                    return Command::none();
                }
                let Some(c) = printable(&key) else {
                    return Command::none();
                };
                let lower = c.to_ascii_lowercase();
                match self.actions.iter().position(|a| a.shortcut == Some(lower)) {
                    Some(i) => Command::message(Message::Select(i)),
                    None => Command::none(),
                }
            }
        }
    }
}

impl Component for Dialog {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::KeyPress(key) if self.open => self.handle_key(key),
            Message::KeyPress(_) => Command::none(),
            Message::Open { return_focus } => self.open(return_focus),
            Message::Close => self.close(),
            Message::FocusIn(id) if self.open => {
                if self.contains(&id) {
                    if let Some(i) = self.action_index(&id) {
                        self.focused_action = i;
                    }
                    self.current = Some(id);
                    Command::none()
                } else {
                    tracing::debug!(id = %self.id, escaped = %id, "focus left modal dialog");
                    let target = self
                        .current
                        .clone()
                        .or_else(|| self.trap().first().cloned())
                        .unwrap_or_else(|| self.id.clone());
                    self.move_to(target)
                }
            }
            Message::FocusIn(_) => Command::none(),
            Message::Select(_) | Message::Dismiss => self.close(),
        }
    }

    fn semantics(&self) -> AccessNode {
        let role = match self.kind {
            DialogKind::Dialog => Role::Dialog,
            DialogKind::Alert => Role::AlertDialog,
        };
        let mut node = AccessNode::new(self.id.clone())
            .role(role)
            .tab_index(TabIndex::Programmatic)
            .attr(Attr::Modal, true)
            .attr(Attr::LabelledBy, self.title_id())
            .hidden(!self.open)
            .child(AccessNode::new(self.title_id()).text(self.title.clone()));
        if let Some(body) = &self.body {
            node = node
                .attr(Attr::DescribedBy, self.body_id())
                .child(AccessNode::new(self.body_id()).text(body.clone()));
        }
        node.children(self.actions.iter().enumerate().map(|(i, action)| {
            AccessNode::new(self.action_id(i))
                .role(Role::Button)
                .text(action.label.clone())
                .tab_index(TabIndex::Tabbable)
                .attr_opt(
                    Attr::KeyShortcuts,
                    action.shortcut.map(|c| c.to_ascii_uppercase().to_string()),
                )
        }))
    }

    fn focused(&self) -> bool {
        self.open
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taro_core::testing::{key, Harness};

    fn confirm() -> Dialog {
        Dialog::new("Confirm")
            .with_id("dlg")
            .body("Are you sure?")
            .action(Action::new("Yes").with_shortcut('y'))
            .action(Action::new("No").with_shortcut('n'))
    }

    fn opened(dialog: Dialog) -> Harness<Dialog> {
        let mut h = Harness::new(dialog).with_keys(Message::KeyPress);
        h.send(Message::Open {
            return_focus: Some(ElementId::new("opener")),
        });
        h
    }

    #[test]
    fn open_focuses_first_action() {
        let h = opened(confirm());
        assert!(h.component().is_open());
        assert_eq!(h.focused_id().unwrap().as_str(), "dlg-action-0");
    }

    #[test]
    fn initial_focus_wins() {
        let h = opened(confirm().with_initial_focus("dlg-action-1"));
        assert_eq!(h.focused_id().unwrap().as_str(), "dlg-action-1");
        assert_eq!(h.component().focused_action(), 1);
    }

    #[test]
    fn focuses_dialog_itself_without_focusables() {
        let h = opened(Dialog::new("Note").with_id("note"));
        assert_eq!(h.focused_id().unwrap().as_str(), "note");
    }

    #[test]
    fn tab_cycles_within_dialog() {
        let dialog = confirm().with_focusables(vec![ElementId::new("name-input")]);
        let mut h = opened(dialog);
        assert_eq!(h.focused_id().unwrap().as_str(), "name-input");
        h.press(KeyCode::Tab);
        assert_eq!(h.focused_id().unwrap().as_str(), "dlg-action-0");
        h.press(KeyCode::Tab);
        assert_eq!(h.focused_id().unwrap().as_str(), "dlg-action-1");
        h.press(KeyCode::Tab);
        assert_eq!(h.focused_id().unwrap().as_str(), "name-input");
        h.press_with(KeyCode::Tab, KeyModifiers::SHIFT);
        assert_eq!(h.focused_id().unwrap().as_str(), "dlg-action-1");
        h.press(KeyCode::BackTab);
        assert_eq!(h.focused_id().unwrap().as_str(), "dlg-action-0");
    }

    #[test]
    fn esc_dismisses_and_returns_focus() {
        let mut h = opened(confirm());
        h.press(KeyCode::Esc);
        assert!(h.saw("Dismiss"));
        assert!(!h.component().is_open());
        assert_eq!(h.focused_id().unwrap().as_str(), "opener");
    }

    #[test]
    fn alert_dialog_ignores_esc() {
        let mut h = opened(Dialog::alert("Unsaved changes").action(Action::new("OK")));
        h.press(KeyCode::Esc);
        assert!(h.component().is_open());
        assert_eq!(h.semantics().role, Some(Role::AlertDialog));

        let mut h = opened(Dialog::alert("Unsaved changes").dismissible(true));
        h.press(KeyCode::Esc);
        assert!(!h.component().is_open());
    }

    #[test]
    fn enter_selects_focused_action_then_closes() {
        let mut h = opened(confirm());
        h.press(KeyCode::Right);
        assert_eq!(h.focused_id().unwrap().as_str(), "dlg-action-1");
        h.press(KeyCode::Enter);
        assert!(h.saw("Select(1)"));
        assert!(!h.component().is_open());
        assert_eq!(h.focused_id().unwrap().as_str(), "opener");
    }

    #[test]
    fn arrows_wrap_among_actions() {
        let mut h = opened(confirm());
        h.press(KeyCode::Left);
        assert_eq!(h.component().focused_action(), 1);
        h.press(KeyCode::Right);
        assert_eq!(h.component().focused_action(), 0);
    }

    #[test]
    fn enter_without_actions_dismisses() {
        let mut h = opened(Dialog::new("Info"));
        h.press(KeyCode::Enter);
        assert!(h.saw("Dismiss"));
    }

    #[test]
    fn shortcut_selects_action() {
        let mut h = opened(confirm());
        h.press(KeyCode::Char('N'));
        assert!(h.saw("Select(1)"));
    }

    #[test]
    fn typing_in_consumer_field_is_not_a_shortcut() {
        let mut h = opened(confirm().with_focusables(vec![ElementId::new("field")]));
        h.press(KeyCode::Char('y'));
        h.press(KeyCode::Enter);
        assert!(!h.saw("Select"));
        assert!(h.component().is_open());
    }

    #[test]
    fn focus_escaping_is_pulled_back() {
        let mut h = opened(confirm());
        h.send(Message::FocusIn(ElementId::new("dlg-action-1")));
        assert_eq!(h.component().focused_action(), 1);
        h.take_effects();
        h.send(Message::FocusIn(ElementId::new("page-link")));
        assert_eq!(h.focused_id().unwrap().as_str(), "dlg-action-1");
    }

    #[test]
    fn initial_focus_outside_the_trap_stays_put() {
        let mut h = opened(confirm().with_initial_focus("dlg-heading"));
        assert_eq!(h.focused_id().unwrap().as_str(), "dlg-heading");
        h.take_effects();
        h.send(Message::FocusIn(ElementId::new("dlg-heading")));
        assert!(h.effects().is_empty());
        h.press(KeyCode::Tab);
        assert_eq!(h.focused_id().unwrap().as_str(), "dlg-action-0");
    }

    #[test]
    fn keys_ignored_while_closed() {
        let mut d = confirm();
        assert!(d.update(Message::KeyPress(key(KeyCode::Enter))).is_none());
        assert!(d.update(Message::Close).is_none());
    }

    #[test]
    fn semantics() {
        let h = opened(confirm());
        let tree = h.semantics();
        assert_eq!(tree.role, Some(Role::Dialog));
        assert_eq!(tree.attr_string(Attr::Modal).as_deref(), Some("true"));
        assert_eq!(tree.attr_string(Attr::LabelledBy).as_deref(), Some("dlg-title"));
        assert_eq!(tree.attr_string(Attr::DescribedBy).as_deref(), Some("dlg-body"));
        assert!(!tree.is_hidden());
        let yes = tree.find("dlg-action-0").unwrap();
        assert_eq!(yes.attr_string(Attr::KeyShortcuts).as_deref(), Some("Y"));

        let closed = confirm().semantics();
        assert!(closed.is_hidden());
        assert!(closed.focusable_ids().is_empty());
    }
}

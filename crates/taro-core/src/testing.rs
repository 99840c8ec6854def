use crate::a11y::AccessNode;
use crate::command::{Command, Effect};
use crate::component::Component;
use crate::id::ElementId;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};

/// A key press with no modifiers.
pub fn key(code: KeyCode) -> KeyEvent {
    key_with(code, KeyModifiers::NONE)
}

/// A key press with the given modifiers.
pub fn key_with(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
    KeyEvent {
        code,
        modifiers,
        kind: KeyEventKind::Press,
        state: KeyEventState::NONE,
    }
}

/// A synchronous test harness that drives a [`Component`] without a host.
///
/// Every message sent goes through [`Component::update`]; immediate follow-up
/// messages are processed right away (in order) and effects are recorded.
/// Async commands (timers) are dropped: tests deliver the timer's message
/// themselves, which keeps them deterministic.
///
/// # Example
///
/// ```rust,ignore
/// use taro_core::testing::Harness;
/// use crossterm::event::KeyCode;
///
/// let mut h = Harness::new(tabs).with_keys(tabs::Message::KeyPress);
/// h.press(KeyCode::Right);
/// assert_eq!(h.component().selected(), 1);
/// assert_eq!(h.focused_id().unwrap().as_str(), "tabs-1-tab-1");
/// ```
pub struct Harness<C: Component> {
    component: C,
    messages: Vec<String>,
    effects: Vec<Effect>,
    key_map: Option<Box<dyn Fn(KeyEvent) -> C::Message>>,
}

impl<C: Component> Harness<C>
where
    C::Message: std::fmt::Debug,
{
    pub fn new(component: C) -> Self {
        Self {
            component,
            messages: Vec::new(),
            effects: Vec::new(),
            key_map: None,
        }
    }

    /// Tell the harness how to wrap key events, enabling [`press`](Harness::press).
    pub fn with_keys(mut self, map: impl Fn(KeyEvent) -> C::Message + 'static) -> Self {
        self.key_map = Some(Box::new(map));
        self
    }

    /// Send a message, then process the immediate messages it produced.
    pub fn send(&mut self, msg: C::Message) {
        let mut queue = std::collections::VecDeque::from([msg]);
        while let Some(msg) = queue.pop_front() {
            self.messages.push(format!("{msg:?}"));
            let cmd: Command<C::Message> = self.component.update(msg);
            let mut follow_ups = Vec::new();
            cmd.collect_sync(&mut follow_ups, &mut self.effects);
            queue.extend(follow_ups);
        }
    }

    /// Press a key without modifiers.
    ///
    /// # Panics
    ///
    /// Panics when no key mapping was set with [`with_keys`](Harness::with_keys).
    pub fn press(&mut self, code: KeyCode) {
        self.press_with(code, KeyModifiers::NONE);
    }

    /// Press a key with modifiers.
    pub fn press_with(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        let map = self
            .key_map
            .as_ref()
            .expect("Harness::with_keys must be called before pressing keys");
        let msg = map(key_with(code, modifiers));
        self.send(msg);
    }

    /// Type each character of `text`.
    pub fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.press(KeyCode::Char(c));
        }
    }

    pub fn component(&self) -> &C {
        &self.component
    }

    pub fn component_mut(&mut self) -> &mut C {
        &mut self.component
    }

    /// Debug renderings of every message processed so far, in order.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Whether any processed message's debug rendering starts with `prefix`.
    pub fn saw(&self, prefix: &str) -> bool {
        self.messages.iter().any(|m| m.starts_with(prefix))
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    /// Take the recorded effects, leaving the log empty.
    pub fn take_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    /// The target of the most recent focus effect, if any.
    pub fn focused_id(&self) -> Option<&ElementId> {
        self.effects.iter().rev().find_map(|e| match e {
            Effect::Focus(id) => Some(id),
            _ => None,
        })
    }

    pub fn semantics(&self) -> AccessNode {
        self.component.semantics()
    }

    /// The accessibility tree rendered as an indented outline.
    pub fn outline(&self) -> String {
        self.component.semantics().to_string()
    }
}

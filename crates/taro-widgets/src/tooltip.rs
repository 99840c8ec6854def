//! Tooltip: a short description shown while its trigger is hovered or
//! focused.
//!
//! Hovering shows the tooltip after `show_delay`; keyboard focus shows it at
//! once. Leaving schedules a hide after `hide_delay`, and Escape hides it
//! immediately. Each scheduled change is a [`Command::tick`] tagged with a
//! generation number, so a tick that arrives after the state moved on is
//! ignored.

use crossterm::event::{KeyCode, KeyEvent};
use std::time::Duration;
use taro_core::{AccessNode, Attr, Command, Component, ElementId, Role, TabIndex};

const DEFAULT_SHOW_DELAY: Duration = Duration::from_millis(300);
const DEFAULT_HIDE_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum State {
    #[default]
    Hidden,
    /// Hidden, with a show scheduled.
    PendingShow,
    Visible,
    /// Visible, with a hide scheduled.
    PendingHide,
}

impl State {
    pub fn is_visible(self) -> bool {
        matches!(self, State::Visible | State::PendingHide)
    }
}

/// Messages for the tooltip component.
#[derive(Debug, Clone)]
pub enum Message {
    PointerEnter,
    PointerLeave,
    FocusIn,
    FocusOut,
    KeyPress(KeyEvent),
    /// A scheduled delay ran out; carries the generation it was issued for.
    Elapsed(u64),
    /// Show now, cancelling any pending change.
    Show,
    /// Hide now, cancelling any pending change.
    Hide,
    /// Emitted whenever the tooltip appears or disappears.
    VisibilityChanged(bool),
}

pub struct Tooltip {
    id: ElementId,
    trigger: ElementId,
    text: String,
    state: State,
    generation: u64,
    show_delay: Duration,
    hide_delay: Duration,
    hovered: bool,
    focused: bool,
}

impl Tooltip {
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_id(ElementId::unique("tooltip"), text)
    }

    pub fn with_id(id: impl Into<ElementId>, text: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            trigger: id.child("trigger"),
            id,
            text: text.into(),
            state: State::Hidden,
            generation: 0,
            show_delay: DEFAULT_SHOW_DELAY,
            hide_delay: DEFAULT_HIDE_DELAY,
            hovered: false,
            focused: false,
        }
    }

    /// Describe an existing element instead of a generated trigger node.
    pub fn with_trigger(mut self, trigger: impl Into<ElementId>) -> Self {
        self.trigger = trigger.into();
        self
    }

    pub fn with_show_delay(mut self, delay: Duration) -> Self {
        self.show_delay = delay;
        self
    }

    pub fn with_hide_delay(mut self, delay: Duration) -> Self {
        self.hide_delay = delay;
        self
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_visible(&self) -> bool {
        self.state.is_visible()
    }

    /// The generation the next [`Message::Elapsed`] must carry to count.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn tooltip_id(&self) -> ElementId {
        self.id.child("tooltip")
    }

    pub fn trigger_id(&self) -> &ElementId {
        &self.trigger
    }

    /// Move to a settled state, invalidating outstanding ticks.
    fn settle(&mut self, visible: bool) -> Command<Message> {
        self.generation += 1;
        let was_visible = self.state.is_visible();
        self.state = if visible { State::Visible } else { State::Hidden };
        if was_visible == visible {
            Command::none()
        } else {
            Command::message(Message::VisibilityChanged(visible))
        }
    }

    fn schedule(&mut self, pending: State, delay: Duration) -> Command<Message> {
        if delay.is_zero() {
            return self.settle(pending == State::PendingShow);
        }
        self.generation += 1;
        self.state = pending;
        let generation = self.generation;
        Command::tick(delay, move |_| Message::Elapsed(generation))
    }

    fn leave(&mut self) -> Command<Message> {
        if self.hovered || self.focused {
            return Command::none();
        }
        match self.state {
            State::PendingShow => self.settle(false),
            State::Visible => self.schedule(State::PendingHide, self.hide_delay),
            State::Hidden | State::PendingHide => Command::none(),
        }
    }
}

impl Component for Tooltip {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::PointerEnter => {
                self.hovered = true;
                match self.state {
                    State::Hidden => self.schedule(State::PendingShow, self.show_delay),
                    State::PendingHide => self.settle(true),
                    State::PendingShow | State::Visible => Command::none(),
                }
            }
            Message::FocusIn => {
                self.focused = true;
                self.settle(true)
            }
            Message::PointerLeave => {
                self.hovered = false;
                self.leave()
            }
            Message::FocusOut => {
                self.focused = false;
                self.leave()
            }
            Message::KeyPress(key) if key.code == KeyCode::Esc && self.state != State::Hidden => {
                self.settle(false)
            }
            Message::KeyPress(_) => Command::none(),
            Message::Elapsed(generation) if generation != self.generation => {
                tracing::debug!(
                    id = %self.id,
                    generation,
                    current = self.generation,
                    "stale tooltip tick"
                );
                Command::none()
            }
            Message::Elapsed(_) => match self.state {
                State::PendingShow => self.settle(true),
                State::PendingHide => self.settle(false),
                State::Hidden | State::Visible => Command::none(),
            },
            Message::Show => self.settle(true),
            Message::Hide => self.settle(false),
            Message::VisibilityChanged(_) => Command::none(),
        }
    }

    fn semantics(&self) -> AccessNode {
        let visible = self.is_visible();
        let trigger = AccessNode::new(self.trigger.clone())
            .tab_index(TabIndex::Tabbable)
            .attr_if(visible, Attr::DescribedBy, self.tooltip_id());
        let tooltip = AccessNode::new(self.tooltip_id())
            .role(Role::Tooltip)
            .text(self.text.clone())
            .hidden(!visible);
        AccessNode::new(self.id.clone()).child(trigger).child(tooltip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taro_core::testing::Harness;

    fn harness() -> Harness<Tooltip> {
        Harness::new(Tooltip::with_id("tip", "Save the file")).with_keys(Message::KeyPress)
    }

    fn elapse(h: &mut Harness<Tooltip>) {
        let generation = h.component().generation();
        h.send(Message::Elapsed(generation));
    }

    #[test]
    fn hover_shows_after_delay() {
        let mut h = harness();
        h.send(Message::PointerEnter);
        assert_eq!(h.component().state(), State::PendingShow);
        assert!(!h.component().is_visible());
        elapse(&mut h);
        assert_eq!(h.component().state(), State::Visible);
        assert!(h.saw("VisibilityChanged(true)"));
    }

    #[test]
    fn schedule_returns_a_timer() {
        let mut tip = Tooltip::with_id("tip", "x");
        let cmd = tip.update(Message::PointerEnter);
        assert!(cmd.has_async());
    }

    #[test]
    fn focus_shows_immediately() {
        let mut h = harness();
        h.send(Message::FocusIn);
        assert!(h.component().is_visible());
        h.send(Message::FocusOut);
        assert_eq!(h.component().state(), State::PendingHide);
        elapse(&mut h);
        assert_eq!(h.component().state(), State::Hidden);
        assert!(h.saw("VisibilityChanged(false)"));
    }

    #[test]
    fn leaving_before_show_cancels() {
        let mut h = harness();
        h.send(Message::PointerEnter);
        let stale = h.component().generation();
        h.send(Message::PointerLeave);
        assert_eq!(h.component().state(), State::Hidden);
        h.send(Message::Elapsed(stale));
        assert_eq!(h.component().state(), State::Hidden);
        assert!(!h.saw("VisibilityChanged"));
    }

    #[test]
    fn reentering_cancels_pending_hide() {
        let mut h = harness();
        h.send(Message::PointerEnter);
        elapse(&mut h);
        h.send(Message::PointerLeave);
        let stale = h.component().generation();
        h.send(Message::PointerEnter);
        assert_eq!(h.component().state(), State::Visible);
        h.send(Message::Elapsed(stale));
        assert_eq!(h.component().state(), State::Visible);
    }

    #[test]
    fn stays_while_focused_even_if_pointer_leaves() {
        let mut h = harness();
        h.send(Message::FocusIn);
        h.send(Message::PointerEnter);
        h.send(Message::PointerLeave);
        assert_eq!(h.component().state(), State::Visible);
    }

    #[test]
    fn escape_hides_at_once() {
        let mut h = harness();
        h.send(Message::FocusIn);
        h.press(KeyCode::Esc);
        assert_eq!(h.component().state(), State::Hidden);
        let before = h.messages().len();
        h.press(KeyCode::Esc);
        assert_eq!(h.messages().len(), before + 1);
    }

    #[test]
    fn zero_delay_is_immediate() {
        let mut h = Harness::new(Tooltip::with_id("tip", "x").with_show_delay(Duration::ZERO));
        h.send(Message::PointerEnter);
        assert!(h.component().is_visible());
    }

    #[test]
    fn show_and_hide_messages() {
        let mut h = harness();
        h.send(Message::Show);
        h.send(Message::Show);
        assert_eq!(h.messages().iter().filter(|m| m.starts_with("VisibilityChanged")).count(), 1);
        h.send(Message::Hide);
        assert!(!h.component().is_visible());
    }

    #[tokio::test(start_paused = true)]
    async fn host_delivers_the_delayed_show() {
        use taro_core::{Host, UiEvent};

        let (host, _effects) = Host::new(Tooltip::with_id("tip", "x"), |event| match event {
            UiEvent::PointerEnter(_) => Some(Message::PointerEnter),
            _ => None,
        });
        let handle = host.handle();
        let task = tokio::spawn(host.run());
        handle.dispatch(UiEvent::PointerEnter("tip-trigger".into()));
        tokio::time::sleep(Duration::from_millis(400)).await;
        handle.shutdown();
        let tip = task.await.unwrap().unwrap();
        assert_eq!(tip.state(), State::Visible);
    }

    #[test]
    fn semantics_describe_trigger_only_while_visible() {
        let mut h = harness();
        let tree = h.semantics();
        assert!(tree.find("tip-trigger").unwrap().get(Attr::DescribedBy).is_none());
        assert!(tree.find("tip-tooltip").unwrap().is_hidden());

        h.send(Message::FocusIn);
        let tree = h.semantics();
        let trigger = tree.find("tip-trigger").unwrap();
        assert_eq!(trigger.attr_string(Attr::DescribedBy).as_deref(), Some("tip-tooltip"));
        let tooltip = tree.find("tip-tooltip").unwrap();
        assert_eq!(tooltip.role, Some(Role::Tooltip));
        assert_eq!(tooltip.text.as_deref(), Some("Save the file"));
        assert!(!tooltip.is_hidden());
    }
}

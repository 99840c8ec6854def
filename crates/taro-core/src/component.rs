use crate::a11y::AccessNode;
use crate::command::Command;
use crate::subscription::Subscription;

/// A headless, stateful widget.
///
/// A component owns its interaction state and reacts to messages. It does not
/// draw anything: [`semantics`](Component::semantics) describes the elements
/// the consumer should render (roles, `tabindex`, `aria-*` attributes and
/// text), and the consumer styles them however it likes.
///
/// # Composition pattern
///
/// Wrap a child's message type in a variant of the parent message and use
/// [`Command::map`] to translate commands:
///
/// ```rust,ignore
/// use taro_core::{AccessNode, Command, Component};
/// use taro_widgets::tabs::{self, Tabs};
///
/// struct Settings { tabs: Tabs }
///
/// #[derive(Debug)]
/// enum Msg { Tabs(tabs::Message) }
///
/// impl Component for Settings {
///     type Message = Msg;
///
///     fn update(&mut self, msg: Msg) -> Command<Msg> {
///         match msg {
///             Msg::Tabs(m) => self.tabs.update(m).map(Msg::Tabs),
///         }
///     }
///
///     fn semantics(&self) -> AccessNode {
///         self.tabs.semantics()
///     }
/// }
/// ```
pub trait Component: Send + 'static {
    /// The component's message type: input events, parent-driven setters and
    /// the notifications the component emits.
    type Message: Send + 'static;

    /// Process a message, mutate state, and return a [`Command`] for side
    /// effects (follow-up messages, timers, focus moves).
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;

    /// Describe the elements to render and their ARIA semantics.
    fn semantics(&self) -> AccessNode;

    /// Declare active subscriptions for this component.
    ///
    /// The host reconciles the returned list after every update: new
    /// subscriptions start, missing ones are cancelled.
    fn subscriptions(&self) -> Vec<Subscription<Self::Message>> {
        vec![]
    }

    /// Whether this component currently holds focus (or focus is inside it).
    ///
    /// A parent can query `focused()` to decide which child should receive
    /// keyboard events.
    fn focused(&self) -> bool {
        false
    }
}

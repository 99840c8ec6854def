use crate::a11y::Politeness;
use crate::id::ElementId;
use futures::future::BoxFuture;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A side effect returned from [`Component::update`](crate::Component::update).
///
/// Commands carry immediate follow-up messages, async work (timers for
/// tooltip delays, carousel rotation), and host [`Effect`]s such as moving
/// focus. Widgets never touch the host directly: asking for focus is a
/// command like any other.
///
/// # Examples
///
/// ```rust,ignore
/// // Do nothing:
/// let cmd = Command::none();
///
/// // Move focus to the next tab and report the new selection:
/// let cmd = Command::batch([
///     Command::focus(tab_id),
///     Command::message(Message::Selected(2)),
/// ]);
///
/// // Fire a message after a delay:
/// let cmd = Command::tick(Duration::from_millis(300), |_| Message::Elapsed(gen));
/// ```
pub struct Command<Msg: Send + 'static> {
    pub(crate) inner: CommandInner<Msg>,
}

pub(crate) enum CommandInner<Msg: Send + 'static> {
    None,
    Message(Msg),
    Effect(Effect),
    Future(BoxFuture<'static, Msg>),
    Batch(Vec<Command<Msg>>),
    Sequence(Vec<Command<Msg>>),
}

/// Imperative requests a widget makes of its host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Move keyboard focus to the element.
    Focus(ElementId),
    /// Drop focus from whatever currently holds it.
    Blur,
    /// Speak a message through a live region.
    Announce {
        text: String,
        politeness: Politeness,
    },
    /// Scroll the element into view (e.g. an `aria-activedescendant` option).
    ScrollIntoView(ElementId),
}

impl<Msg: Send + 'static> Command<Msg> {
    /// No-op command.
    pub fn none() -> Self {
        Command {
            inner: CommandInner::None,
        }
    }

    /// Deliver a message immediately, before any queued input.
    pub fn message(msg: Msg) -> Self {
        Command {
            inner: CommandInner::Message(msg),
        }
    }

    /// Run an async future, map the result to a message.
    pub fn perform<F, T>(future: F, map: impl FnOnce(T) -> Msg + Send + 'static) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Command {
            inner: CommandInner::Future(Box::pin(async move { map(future.await) })),
        }
    }

    /// One-shot timer: fires once after `duration`, mapping the instant to a message.
    pub fn tick(duration: Duration, map: impl FnOnce(Instant) -> Msg + Send + 'static) -> Self {
        Command {
            inner: CommandInner::Future(Box::pin(async move {
                tokio::time::sleep(duration).await;
                map(Instant::now())
            })),
        }
    }

    /// Ask the host to perform an [`Effect`].
    pub fn effect(effect: Effect) -> Self {
        Command {
            inner: CommandInner::Effect(effect),
        }
    }

    /// Move focus to `id`.
    pub fn focus(id: ElementId) -> Self {
        Command::effect(Effect::Focus(id))
    }

    /// Drop focus.
    pub fn blur() -> Self {
        Command::effect(Effect::Blur)
    }

    /// Announce `text` through a live region.
    pub fn announce(text: impl Into<String>, politeness: Politeness) -> Self {
        Command::effect(Effect::Announce {
            text: text.into(),
            politeness,
        })
    }

    /// Scroll `id` into view.
    pub fn scroll_into_view(id: ElementId) -> Self {
        Command::effect(Effect::ScrollIntoView(id))
    }

    /// Run multiple commands concurrently.
    pub fn batch(cmds: impl IntoIterator<Item = Command<Msg>>) -> Self {
        let mut cmds: Vec<_> = cmds.into_iter().filter(|c| !c.is_none()).collect();
        match cmds.len() {
            0 => Command::none(),
            1 => cmds.remove(0),
            _ => Command {
                inner: CommandInner::Batch(cmds),
            },
        }
    }

    /// Run commands sequentially: each command's output is delivered before
    /// the next command starts.
    pub fn sequence(cmds: impl IntoIterator<Item = Command<Msg>>) -> Self {
        let mut cmds: Vec<_> = cmds.into_iter().filter(|c| !c.is_none()).collect();
        match cmds.len() {
            0 => Command::none(),
            1 => cmds.remove(0),
            _ => Command {
                inner: CommandInner::Sequence(cmds),
            },
        }
    }

    /// Transform the message type (for component composition).
    pub fn map<NewMsg: Send + 'static>(
        self,
        f: impl Fn(Msg) -> NewMsg + Send + Sync + 'static,
    ) -> Command<NewMsg> {
        self.map_with(Arc::new(f))
    }

    fn map_with<NewMsg: Send + 'static>(
        self,
        f: Arc<dyn Fn(Msg) -> NewMsg + Send + Sync>,
    ) -> Command<NewMsg> {
        match self.inner {
            CommandInner::None => Command::none(),
            CommandInner::Message(msg) => Command::message(f(msg)),
            CommandInner::Effect(effect) => Command::effect(effect),
            CommandInner::Future(fut) => Command {
                inner: CommandInner::Future(Box::pin(async move { f(fut.await) })),
            },
            CommandInner::Batch(cmds) => Command {
                inner: CommandInner::Batch(
                    cmds.into_iter().map(|cmd| cmd.map_with(f.clone())).collect(),
                ),
            },
            CommandInner::Sequence(cmds) => Command {
                inner: CommandInner::Sequence(
                    cmds.into_iter().map(|cmd| cmd.map_with(f.clone())).collect(),
                ),
            },
        }
    }

    // --- Inspection methods (useful for testing) ---

    /// Returns `true` if this is a no-op command.
    pub fn is_none(&self) -> bool {
        matches!(self.inner, CommandInner::None)
    }

    /// If this command is an immediate message, return it.
    pub fn into_message(self) -> Option<Msg> {
        match self.inner {
            CommandInner::Message(msg) => Some(msg),
            _ => None,
        }
    }

    /// If this command is a single effect, return it.
    pub fn into_effect(self) -> Option<Effect> {
        match self.inner {
            CommandInner::Effect(effect) => Some(effect),
            _ => None,
        }
    }

    /// If this command is a batch, return the inner commands.
    pub fn into_batch(self) -> Option<Vec<Command<Msg>>> {
        match self.inner {
            CommandInner::Batch(cmds) => Some(cmds),
            _ => None,
        }
    }

    /// Flatten the synchronous parts of this command, in order: immediate
    /// messages and effects. Futures are dropped without being polled.
    pub fn into_sync_parts(self) -> (Vec<Msg>, Vec<Effect>) {
        let mut messages = Vec::new();
        let mut effects = Vec::new();
        self.collect_sync(&mut messages, &mut effects);
        (messages, effects)
    }

    pub(crate) fn collect_sync(self, messages: &mut Vec<Msg>, effects: &mut Vec<Effect>) {
        match self.inner {
            CommandInner::None | CommandInner::Future(_) => {}
            CommandInner::Message(msg) => messages.push(msg),
            CommandInner::Effect(effect) => effects.push(effect),
            CommandInner::Batch(cmds) | CommandInner::Sequence(cmds) => {
                for cmd in cmds {
                    cmd.collect_sync(messages, effects);
                }
            }
        }
    }

    /// Whether any part of this command is async.
    pub fn has_async(&self) -> bool {
        match &self.inner {
            CommandInner::Future(_) => true,
            CommandInner::Batch(cmds) | CommandInner::Sequence(cmds) => {
                cmds.iter().any(|c| c.has_async())
            }
            _ => false,
        }
    }
}

impl<Msg: Send + 'static> std::fmt::Debug for Command<Msg> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.inner {
            CommandInner::None => f.write_str("Command::None"),
            CommandInner::Message(_) => f.write_str("Command::Message(..)"),
            CommandInner::Effect(e) => write!(f, "Command::Effect({e:?})"),
            CommandInner::Future(_) => f.write_str("Command::Future(..)"),
            CommandInner::Batch(cmds) => f.debug_tuple("Command::Batch").field(cmds).finish(),
            CommandInner::Sequence(cmds) => {
                f.debug_tuple("Command::Sequence").field(cmds).finish()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_none_is_none() {
        let cmd: Command<()> = Command::none();
        assert!(cmd.is_none());
    }

    #[test]
    fn command_message_roundtrips() {
        let cmd: Command<i32> = Command::message(42);
        assert_eq!(cmd.into_message(), Some(42));
    }

    #[test]
    fn batch_drops_noops_and_unwraps_single() {
        let cmd: Command<i32> = Command::batch([Command::none(), Command::message(1)]);
        assert_eq!(cmd.into_message(), Some(1));

        let cmd: Command<()> = Command::batch(vec![]);
        assert!(cmd.is_none());
    }

    #[test]
    fn batch_multiple() {
        let cmd: Command<i32> = Command::batch([Command::message(1), Command::message(2)]);
        assert_eq!(cmd.into_batch().map(|c| c.len()), Some(2));
    }

    #[test]
    fn sequence_empty_returns_none() {
        let cmd: Command<()> = Command::sequence(vec![]);
        assert!(cmd.is_none());
    }

    #[test]
    fn focus_is_an_effect() {
        let cmd: Command<()> = Command::focus(ElementId::new("tab-2"));
        assert_eq!(cmd.into_effect(), Some(Effect::Focus(ElementId::new("tab-2"))));
    }

    #[test]
    fn map_message_and_keeps_effects() {
        let cmd: Command<i32> = Command::batch([
            Command::focus(ElementId::new("a")),
            Command::message(7),
        ]);
        let mapped: Command<String> = cmd.map(|n| n.to_string());
        let (msgs, effects) = mapped.into_sync_parts();
        assert_eq!(msgs, vec!["7".to_string()]);
        assert_eq!(effects, vec![Effect::Focus(ElementId::new("a"))]);
    }

    #[test]
    fn sync_parts_preserve_order_and_skip_futures() {
        let cmd: Command<i32> = Command::sequence([
            Command::message(1),
            Command::tick(Duration::from_secs(5), |_| 99),
            Command::announce("done", Politeness::Assertive),
            Command::message(2),
        ]);
        assert!(cmd.has_async());
        let (msgs, effects) = cmd.into_sync_parts();
        assert_eq!(msgs, vec![1, 2]);
        assert_eq!(
            effects,
            vec![Effect::Announce {
                text: "done".into(),
                politeness: Politeness::Assertive
            }]
        );
    }

    #[tokio::test]
    async fn mapped_future_resolves() {
        let cmd: Command<i32> = Command::perform(async { 20 }, |n| n + 1);
        let mapped = cmd.map(|n| n * 2);
        match mapped.inner {
            CommandInner::Future(fut) => assert_eq!(fut.await, 42),
            _ => panic!("expected future"),
        }
    }
}

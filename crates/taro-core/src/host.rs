use crate::command::{Command, CommandInner, Effect};
use crate::component::Component;
use crate::event::UiEvent;
use crate::subscription::SubscriptionManager;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, Notify};

/// Errors that end a [`Host`] run early.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// The receiver returned from [`Host::new`] was dropped, so requested
    /// effects (focus moves, announcements) could no longer be delivered.
    #[error("effect receiver dropped")]
    EffectChannelClosed,
}

/// Configuration options for a [`Host`].
///
/// All fields have sensible defaults (see [`Default`] impl). Use struct update
/// syntax to override only the options you need:
///
/// ```rust,ignore
/// let opts = HostOptions {
///     log_effects: false,
///     ..HostOptions::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct HostOptions {
    /// After a message arrives, keep draining queued messages for this long
    /// before yielding (default: 100 µs).
    pub batch_window: Duration,
    /// Upper bound on messages drained per batch (default: 100).
    pub max_batch: u32,
    /// Log every forwarded effect at `debug` level (default: true).
    pub log_effects: bool,
}

impl Default for HostOptions {
    fn default() -> Self {
        Self {
            batch_window: Duration::from_micros(100),
            max_batch: 100,
            log_effects: true,
        }
    }
}

/// A cloneable handle to a running [`Host`].
///
/// The host keeps running while at least one handle is alive (or until
/// [`shutdown`](HostHandle::shutdown) is called).
pub struct HostHandle<Msg: Send + 'static> {
    msg_tx: mpsc::UnboundedSender<Msg>,
    event_tx: mpsc::UnboundedSender<UiEvent>,
    stop: Arc<AtomicBool>,
    wake: Arc<Notify>,
}

// Manual impl: a derive would demand `Msg: Clone`.
impl<Msg: Send + 'static> Clone for HostHandle<Msg> {
    fn clone(&self) -> Self {
        Self {
            msg_tx: self.msg_tx.clone(),
            event_tx: self.event_tx.clone(),
            stop: self.stop.clone(),
            wake: self.wake.clone(),
        }
    }
}

impl<Msg: Send + 'static> HostHandle<Msg> {
    /// Send a message straight to the component (parent-driven setters).
    /// Returns silently if the host has already exited.
    pub fn send(&self, msg: Msg) {
        let _ = self.msg_tx.send(msg);
    }

    /// Deliver an input event; the host's event map turns it into a message.
    pub fn dispatch(&self, event: UiEvent) {
        let _ = self.event_tx.send(event);
    }

    /// Stop the host at the next opportunity.
    pub fn shutdown(&self) {
        self.stop.store(true, Ordering::SeqCst);
        self.wake.notify_one();
    }
}

type EventMap<Msg> = Box<dyn Fn(UiEvent) -> Option<Msg> + Send>;

/// Drives one [`Component`] outside of any rendering toolkit.
///
/// The host owns the component, turns [`UiEvent`]s into messages through the
/// supplied event map, executes returned [`Command`]s (async work on tokio,
/// effects forwarded to the effect channel), and keeps the component's
/// subscriptions reconciled. A toolkit integration reads the effect channel
/// and applies focus moves and announcements to its real widgets.
///
/// # Example
///
/// ```rust,ignore
/// use taro_core::{Effect, Host, UiEvent};
///
/// let (host, mut effects) = Host::new(tabs, |event| match event {
///     UiEvent::Key(k) => Some(tabs::Message::KeyPress(k)),
///     _ => None,
/// });
/// let handle = host.handle();
/// let task = tokio::spawn(host.run());
///
/// handle.dispatch(UiEvent::Key(right_arrow));
/// if let Some(Effect::Focus(id)) = effects.recv().await {
///     toolkit.focus(&id);
/// }
/// ```
pub struct Host<C: Component> {
    component: C,
    msg_tx: mpsc::UnboundedSender<C::Message>,
    msg_rx: mpsc::UnboundedReceiver<C::Message>,
    event_tx: Option<mpsc::UnboundedSender<UiEvent>>,
    event_rx: mpsc::UnboundedReceiver<UiEvent>,
    event_map: EventMap<C::Message>,
    effect_tx: mpsc::UnboundedSender<Effect>,
    subscriptions: SubscriptionManager<C::Message>,
    options: HostOptions,
    stop: Arc<AtomicBool>,
    wake: Arc<Notify>,
}

impl<C: Component> Host<C> {
    /// Create a host with default options. Returns the host and the receiving
    /// end of its effect channel.
    pub fn new(
        component: C,
        event_map: impl Fn(UiEvent) -> Option<C::Message> + Send + 'static,
    ) -> (Self, mpsc::UnboundedReceiver<Effect>) {
        Self::with_options(component, event_map, HostOptions::default())
    }

    /// Create a host with custom options.
    pub fn with_options(
        component: C,
        event_map: impl Fn(UiEvent) -> Option<C::Message> + Send + 'static,
        options: HostOptions,
    ) -> (Self, mpsc::UnboundedReceiver<Effect>) {
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (effect_tx, effect_rx) = mpsc::unbounded_channel();
        let subscriptions = SubscriptionManager::new(msg_tx.clone());

        let host = Self {
            component,
            msg_tx,
            msg_rx,
            event_tx: Some(event_tx),
            event_rx,
            event_map: Box::new(event_map),
            effect_tx,
            subscriptions,
            options,
            stop: Arc::new(AtomicBool::new(false)),
            wake: Arc::new(Notify::new()),
        };
        (host, effect_rx)
    }

    /// Get a handle for sending messages and events from outside.
    ///
    /// Must be called before [`run`](Host::run); handles are what keep the
    /// host alive.
    pub fn handle(&self) -> HostHandle<C::Message> {
        HostHandle {
            msg_tx: self.msg_tx.clone(),
            event_tx: self
                .event_tx
                .clone()
                .unwrap_or_else(|| mpsc::unbounded_channel().0),
            stop: self.stop.clone(),
            wake: self.wake.clone(),
        }
    }

    /// The component being driven.
    pub fn component(&self) -> &C {
        &self.component
    }

    /// Run until [`HostHandle::shutdown`] or until every handle is dropped.
    /// Returns the component in its final state.
    pub async fn run(mut self) -> Result<C, HostError> {
        // Only handles keep the event channel open from here on.
        self.event_tx = None;
        tracing::debug!("host started");

        let subs = self.component.subscriptions();
        self.subscriptions.reconcile(subs);

        let result = self.event_loop().await;

        tracing::debug!("host shutting down");
        self.subscriptions.shutdown();
        result.map(|()| self.component)
    }

    async fn event_loop(&mut self) -> Result<(), HostError> {
        loop {
            if self.stop.load(Ordering::SeqCst) {
                return Ok(());
            }

            tokio::select! {
                biased;

                _ = self.wake.notified() => {}

                Some(msg) = self.msg_rx.recv() => {
                    self.process_message(msg)?;
                    self.drain_batch()?;
                }

                event = self.event_rx.recv() => match event {
                    Some(event) => {
                        if let Some(msg) = (self.event_map)(event) {
                            self.process_message(msg)?;
                            self.drain_batch()?;
                        }
                    }
                    None => {
                        // No handles left: settle queued messages, then stop.
                        while let Ok(msg) = self.msg_rx.try_recv() {
                            self.process_message(msg)?;
                        }
                        return Ok(());
                    }
                },
            }
        }
    }

    /// Micro-batch: drain queued messages within the batch window.
    fn drain_batch(&mut self) -> Result<(), HostError> {
        let deadline = Instant::now() + self.options.batch_window;
        let mut count = 0u32;
        while Instant::now() < deadline && count < self.options.max_batch {
            match self.msg_rx.try_recv() {
                Ok(msg) => {
                    self.process_message(msg)?;
                    count += 1;
                }
                Err(_) => break,
            }
        }
        Ok(())
    }

    fn process_message(&mut self, msg: C::Message) -> Result<(), HostError> {
        let cmd = self.component.update(msg);
        self.execute_command(cmd)?;

        let subs = self.component.subscriptions();
        self.subscriptions.reconcile(subs);
        Ok(())
    }

    fn execute_command(&mut self, cmd: Command<C::Message>) -> Result<(), HostError> {
        match cmd.inner {
            CommandInner::None => {}
            CommandInner::Message(msg) => {
                let _ = self.msg_tx.send(msg);
            }
            CommandInner::Effect(effect) => {
                if self.options.log_effects {
                    tracing::debug!(?effect, "effect");
                }
                self.effect_tx
                    .send(effect)
                    .map_err(|_| HostError::EffectChannelClosed)?;
            }
            CommandInner::Future(fut) => {
                let tx = self.msg_tx.clone();
                tokio::spawn(async move {
                    let msg = fut.await;
                    let _ = tx.send(msg);
                });
            }
            CommandInner::Batch(cmds) => {
                for cmd in cmds {
                    self.execute_command(cmd)?;
                }
            }
            CommandInner::Sequence(cmds) => {
                let tx = self.msg_tx.clone();
                let effects = self.effect_tx.clone();
                tokio::spawn(async move {
                    for cmd in cmds {
                        execute_sequential(cmd, &tx, &effects).await;
                    }
                });
            }
        }
        Ok(())
    }
}

/// Execute a command to completion (for `Command::sequence`).
fn execute_sequential<'a, Msg: Send + 'static>(
    cmd: Command<Msg>,
    tx: &'a mpsc::UnboundedSender<Msg>,
    effects: &'a mpsc::UnboundedSender<Effect>,
) -> futures::future::BoxFuture<'a, ()> {
    Box::pin(async move {
        match cmd.inner {
            CommandInner::None => {}
            CommandInner::Message(msg) => {
                let _ = tx.send(msg);
            }
            CommandInner::Effect(effect) => {
                let _ = effects.send(effect);
            }
            CommandInner::Future(fut) => {
                let msg = fut.await;
                let _ = tx.send(msg);
            }
            CommandInner::Batch(cmds) => {
                // Inside a sequence, a batch still runs concurrently.
                let handles: Vec<_> = cmds
                    .into_iter()
                    .map(|cmd| {
                        let tx = tx.clone();
                        let effects = effects.clone();
                        tokio::spawn(async move {
                            execute_sequential(cmd, &tx, &effects).await;
                        })
                    })
                    .collect();
                for handle in handles {
                    handle.await.ok();
                }
            }
            CommandInner::Sequence(cmds) => {
                for cmd in cmds {
                    execute_sequential(cmd, tx, effects).await;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::a11y::AccessNode;
    use crate::id::ElementId;
    use crate::subscription::{subscribe, Subscription};
    use crate::subscriptions::Every;
    use crossterm::event::{KeyCode, KeyEvent};

    struct Counter {
        count: i32,
        ticking: bool,
    }

    #[derive(Debug)]
    enum Msg {
        Key(KeyEvent),
        Bump,
        StartTicking,
        Tick,
        Later,
    }

    impl Component for Counter {
        type Message = Msg;

        fn update(&mut self, msg: Msg) -> Command<Msg> {
            match msg {
                Msg::Key(k) if k.code == KeyCode::Enter => {
                    self.count += 1;
                    Command::batch([
                        Command::focus(ElementId::new("counter")),
                        Command::message(Msg::Bump),
                    ])
                }
                Msg::Key(_) => Command::none(),
                Msg::Bump => {
                    self.count += 10;
                    Command::none()
                }
                Msg::StartTicking => {
                    self.ticking = true;
                    Command::none()
                }
                Msg::Tick => {
                    self.count += 100;
                    self.ticking = false;
                    Command::none()
                }
                Msg::Later => {
                    self.count += 1000;
                    Command::announce("later", crate::a11y::Politeness::Polite)
                }
            }
        }

        fn semantics(&self) -> AccessNode {
            AccessNode::new(ElementId::new("counter")).text(self.count.to_string())
        }

        fn subscriptions(&self) -> Vec<Subscription<Msg>> {
            if self.ticking {
                vec![subscribe(Every::new(Duration::from_millis(10), "counter")).map(|_| Msg::Tick)]
            } else {
                vec![]
            }
        }
    }

    fn counter() -> Counter {
        Counter {
            count: 0,
            ticking: false,
        }
    }

    fn map(event: UiEvent) -> Option<Msg> {
        match event {
            UiEvent::Key(k) => Some(Msg::Key(k)),
            _ => None,
        }
    }

    #[tokio::test]
    async fn events_become_messages_and_effects() {
        let (host, mut effects) = Host::new(counter(), map);
        let handle = host.handle();
        let task = tokio::spawn(host.run());

        handle.dispatch(UiEvent::Key(KeyEvent::from(KeyCode::Enter)));
        assert_eq!(
            effects.recv().await,
            Some(Effect::Focus(ElementId::new("counter")))
        );
        drop(handle);

        let counter = task.await.unwrap().unwrap();
        assert_eq!(counter.count, 11);
    }

    #[tokio::test]
    async fn shutdown_stops_the_host() {
        let (host, _effects) = Host::new(counter(), map);
        let handle = host.handle();
        let task = tokio::spawn(host.run());
        handle.shutdown();
        let counter = task.await.unwrap().unwrap();
        assert_eq!(counter.count, 0);
    }

    #[tokio::test]
    async fn dropped_effect_receiver_is_an_error() {
        let (host, effects) = Host::new(counter(), map);
        drop(effects);
        let handle = host.handle();
        let task = tokio::spawn(host.run());
        handle.dispatch(UiEvent::Key(KeyEvent::from(KeyCode::Enter)));
        drop(handle);
        assert!(matches!(
            task.await.unwrap(),
            Err(HostError::EffectChannelClosed)
        ));
    }

    #[tokio::test]
    async fn subscriptions_deliver_ticks() {
        let (host, _effects) = Host::new(counter(), map);
        let handle = host.handle();
        let task = tokio::spawn(host.run());
        handle.send(Msg::StartTicking);
        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.shutdown();
        let counter = task.await.unwrap().unwrap();
        assert!(counter.count >= 100);
    }

    #[tokio::test]
    async fn sequence_forwards_effects_in_order() {
        struct Seq;
        impl Component for Seq {
            type Message = Msg;
            fn update(&mut self, msg: Msg) -> Command<Msg> {
                match msg {
                    Msg::Bump => Command::sequence([
                        Command::focus(ElementId::new("one")),
                        Command::tick(Duration::from_millis(5), |_| Msg::Later),
                        Command::focus(ElementId::new("two")),
                    ]),
                    _ => Command::none(),
                }
            }
            fn semantics(&self) -> AccessNode {
                AccessNode::new(ElementId::new("seq"))
            }
        }

        let (host, mut effects) = Host::new(Seq, |_| None);
        let handle = host.handle();
        let task = tokio::spawn(host.run());
        handle.send(Msg::Bump);
        assert_eq!(effects.recv().await, Some(Effect::Focus(ElementId::new("one"))));
        assert_eq!(effects.recv().await, Some(Effect::Focus(ElementId::new("two"))));
        handle.shutdown();
        task.await.unwrap().unwrap();
    }
}

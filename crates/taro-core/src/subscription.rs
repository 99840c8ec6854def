use futures::stream::BoxStream;
use futures::StreamExt;
use std::any::TypeId;
use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

/// A long-lived message source, such as a carousel's rotation timer.
///
/// Components return subscriptions from
/// [`Component::subscriptions`](crate::Component::subscriptions); the host
/// diffs the list after every update by [`SubscriptionId`], starting the new
/// ones and aborting the ones that disappeared. A carousel that stops rotating
/// simply stops returning its timer.
pub struct Subscription<Msg: Send + 'static> {
    pub(crate) id: SubscriptionId,
    pub(crate) spawn: Box<dyn FnOnce(mpsc::UnboundedSender<Msg>) -> AbortHandle + Send>,
}

/// Identity used to diff subscriptions between update cycles: a Rust
/// [`TypeId`] plus a numeric discriminant.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId {
    type_id: TypeId,
    discriminant: u64,
}

impl SubscriptionId {
    /// An id from a type and a numeric discriminant.
    pub fn new<T: 'static>(discriminant: u64) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            discriminant,
        }
    }

    /// An id from a type alone (for singletons).
    pub fn of<T: 'static>() -> Self {
        Self::new::<T>(0)
    }

    /// An id from a type and a string key, typically an element id.
    pub fn keyed<T: 'static>(key: &str) -> Self {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        Self::new::<T>(hasher.finish())
    }
}

/// Types that produce a stream of values for a [`Subscription`].
///
/// The host calls [`stream`](SubscriptionSource::stream) once when the
/// subscription first appears and drops the stream when it goes away.
pub trait SubscriptionSource: Send + 'static {
    /// The type of values this source emits.
    type Output: Send + 'static;

    /// Identity of this subscription instance.
    fn id(&self) -> SubscriptionId;

    /// Create the stream of values.
    fn stream(self) -> BoxStream<'static, Self::Output>;
}

/// Create a [`Subscription`] from a [`SubscriptionSource`].
///
/// The source's stream is only created once the host starts the
/// subscription, so components can build subscriptions outside a runtime.
pub fn subscribe<S: SubscriptionSource>(source: S) -> Subscription<S::Output> {
    Subscription {
        id: source.id(),
        spawn: Box::new(move |tx| forward(source.stream(), tx)),
    }
}

fn forward<Msg: Send + 'static>(
    stream: BoxStream<'static, Msg>,
    tx: mpsc::UnboundedSender<Msg>,
) -> AbortHandle {
    let handle = tokio::spawn(async move {
        let mut stream = stream;
        while let Some(msg) = stream.next().await {
            if tx.send(msg).is_err() {
                break;
            }
        }
    });
    handle.abort_handle()
}

impl<Msg: Send + 'static> Subscription<Msg> {
    /// Create from a raw stream and id.
    pub fn from_stream(id: SubscriptionId, stream: BoxStream<'static, Msg>) -> Self {
        Subscription {
            id,
            spawn: Box::new(move |tx| forward(stream, tx)),
        }
    }

    pub fn id(&self) -> &SubscriptionId {
        &self.id
    }

    /// Transform the message type (for component composition).
    pub fn map<NewMsg: Send + 'static>(
        self,
        f: impl Fn(Msg) -> NewMsg + Send + Sync + 'static,
    ) -> Subscription<NewMsg> {
        let f = Arc::new(f);
        Subscription {
            id: self.id,
            spawn: Box::new(move |new_tx: mpsc::UnboundedSender<NewMsg>| {
                let (inner_tx, mut inner_rx) = mpsc::unbounded_channel::<Msg>();
                let abort = (self.spawn)(inner_tx);

                // Ends on its own once the source task is aborted and
                // `inner_tx` drops.
                tokio::spawn(async move {
                    while let Some(msg) = inner_rx.recv().await {
                        if new_tx.send(f(msg)).is_err() {
                            break;
                        }
                    }
                });

                abort
            }),
        }
    }
}

/// Keeps the running subscriptions of one host in sync with what the
/// component currently asks for.
pub(crate) struct SubscriptionManager<Msg: Send + 'static> {
    active: HashMap<SubscriptionId, AbortHandle>,
    msg_tx: mpsc::UnboundedSender<Msg>,
}

impl<Msg: Send + 'static> SubscriptionManager<Msg> {
    pub fn new(msg_tx: mpsc::UnboundedSender<Msg>) -> Self {
        Self {
            active: HashMap::new(),
            msg_tx,
        }
    }

    /// Start new subscriptions, stop removed ones, keep unchanged ones.
    pub fn reconcile(&mut self, wanted: Vec<Subscription<Msg>>) {
        let mut wanted: HashMap<SubscriptionId, Subscription<Msg>> =
            wanted.into_iter().map(|s| (s.id.clone(), s)).collect();

        self.active.retain(|id, handle| {
            if wanted.contains_key(id) {
                true
            } else {
                tracing::debug!(?id, "stopping subscription");
                handle.abort();
                false
            }
        });

        for (id, sub) in wanted.drain() {
            if !self.active.contains_key(&id) {
                tracing::debug!(?id, "starting subscription");
                let handle = (sub.spawn)(self.msg_tx.clone());
                self.active.insert(id, handle);
            }
        }
    }

    /// Abort all active subscriptions.
    pub fn shutdown(&mut self) {
        for (_, handle) in self.active.drain() {
            handle.abort();
        }
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}

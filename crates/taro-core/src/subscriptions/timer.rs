use crate::subscription::{SubscriptionId, SubscriptionSource};
use futures::stream::BoxStream;
use futures::StreamExt;
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;

/// A repeating timer, e.g. a carousel's rotation clock.
///
/// The first tick fires one full `interval` after the subscription starts,
/// not immediately. Missed ticks are skipped rather than bursted, so a host
/// that was busy never advances a carousel several slides at once.
///
/// # Example
///
/// ```rust,ignore
/// use std::time::Duration;
/// use taro_core::subscriptions::Every;
/// use taro_core::subscription::subscribe;
///
/// let sub = subscribe(Every::new(Duration::from_secs(5), carousel_id.as_str()))
///     .map(|_| Message::Tick);
/// ```
pub struct Every {
    /// The interval between ticks.
    pub interval: Duration,
    /// Distinguishes this timer from other `Every` timers.
    pub key: String,
}

impl Every {
    pub fn new(interval: Duration, key: impl Into<String>) -> Self {
        Self {
            interval,
            key: key.into(),
        }
    }
}

impl SubscriptionSource for Every {
    type Output = Instant;

    fn id(&self) -> SubscriptionId {
        SubscriptionId::keyed::<Self>(&format!("{}@{}", self.key, self.interval.as_nanos()))
    }

    fn stream(self) -> BoxStream<'static, Instant> {
        let start = tokio::time::Instant::now() + self.interval;
        let mut interval = tokio::time::interval_at(start, self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let stream =
            tokio_stream::wrappers::IntervalStream::new(interval).map(|tick| tick.into_std());
        Box::pin(stream)
    }
}

/// A one-shot delay that fires once after `delay`, then completes.
pub struct After {
    pub delay: Duration,
    pub key: String,
}

impl After {
    pub fn new(delay: Duration, key: impl Into<String>) -> Self {
        Self {
            delay,
            key: key.into(),
        }
    }
}

impl SubscriptionSource for After {
    type Output = Instant;

    fn id(&self) -> SubscriptionId {
        SubscriptionId::keyed::<Self>(&format!("{}@{}", self.key, self.delay.as_nanos()))
    }

    fn stream(self) -> BoxStream<'static, Instant> {
        let delay = self.delay;
        Box::pin(futures::stream::once(async move {
            tokio::time::sleep(delay).await;
            Instant::now()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_depend_on_key_and_interval() {
        let a = Every::new(Duration::from_secs(1), "c1");
        let b = Every::new(Duration::from_secs(1), "c2");
        let c = Every::new(Duration::from_secs(2), "c1");
        assert_ne!(a.id(), b.id());
        assert_ne!(a.id(), c.id());
        assert_eq!(a.id(), Every::new(Duration::from_secs(1), "c1").id());
    }

    #[tokio::test(start_paused = true)]
    async fn every_waits_a_full_interval() {
        let started = tokio::time::Instant::now();
        let mut stream = Every::new(Duration::from_secs(3), "t").stream();
        stream.next().await;
        assert!(started.elapsed() >= Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn after_fires_once() {
        let mut stream = After::new(Duration::from_millis(50), "t").stream();
        assert!(stream.next().await.is_some());
        assert!(stream.next().await.is_none());
    }
}

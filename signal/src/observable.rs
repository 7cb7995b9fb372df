use tracing::debug;

use crate::registry::{BroadcastReport, SignalRegistry, Subscription, SubscriptionId};

/// A source of content-free change signals.
///
/// What a signal means is agreed between the owner of the observable and its
/// observers; typically "my state changed, come and read it".
pub trait Observable: Send + Sync {
    /// Register a new subscription holding at most one pending signal.
    fn subscribe(&self) -> Subscription;

    /// Release a subscription. Unknown or already released ids are ignored
    /// and reported as `false`.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;

    /// Signal every live subscription. Never waits on a consumer.
    fn notify(&self) -> BroadcastReport;
}

/// Observable that signals empty messages.
#[derive(Debug)]
pub struct EmptySignalObservable {
    name: &'static str,
    registry: SignalRegistry,
}

impl EmptySignalObservable {
    /// `name` only shows up in logs.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            registry: SignalRegistry::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry.len()
    }
}

impl Observable for EmptySignalObservable {
    fn subscribe(&self) -> Subscription {
        let subscription = self.registry.add();
        debug!(observable = self.name, subscription = %subscription.id(), "subscribed");
        subscription
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let released = self.registry.remove(id);
        debug!(observable = self.name, subscription = %id, released, "unsubscribed");
        released
    }

    fn notify(&self) -> BroadcastReport {
        let report = self.registry.broadcast();
        if report.coalesced > 0 || report.pruned > 0 {
            debug!(
                observable = self.name,
                delivered = report.delivered,
                coalesced = report.coalesced,
                pruned = report.pruned,
                "notify"
            );
        }
        report
    }
}

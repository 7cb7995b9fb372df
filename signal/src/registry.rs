//! Subscription registry
//!
//! Arena of subscription slots for a single signal source. Each slot is
//! indexed by a generated [`SubscriptionId`] and owns the sending half of a
//! capacity-1 channel; the matching [`Subscription`] owns the receiving half.
//!
//! Guarantees:
//!   • `broadcast` never blocks: a full slot coalesces, a closed slot is pruned
//!   • `remove` is idempotent and safe to race against `broadcast`
//!   • once `remove` returns, the subscription never yields another signal

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::Mutex;
use tokio::sync::mpsc::{self, Receiver, Sender, error::TrySendError};
use tracing::{debug, trace};

/// Pending signals a subscription may hold before new ones are dropped.
pub const SIGNAL_CAPACITY: usize = 1;

/// Ids are unique across every registry in the process, so a registry can
/// never release a slot it did not issue.
static NEXT_SUBSCRIPTION_ID: AtomicU64 = AtomicU64::new(0);

/// Generated identifier of one subscription slot.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Outcome of one broadcast, mostly useful for logs and tests.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct BroadcastReport {
    /// Slots that accepted the signal.
    pub delivered: usize,
    /// Slots that already held an unconsumed signal.
    pub coalesced: usize,
    /// Slots whose receiver was gone; they were removed.
    pub pruned: usize,
}

#[derive(Debug)]
struct Slot {
    sender: Sender<()>,
    released: Arc<AtomicBool>,
}

impl Slot {
    fn release(&self) {
        self.released.store(true, Ordering::Release);
    }
}

/// Receiving end of a subscription.
#[derive(Debug)]
pub struct Subscription {
    id: SubscriptionId,
    receiver: Receiver<()>,
    released: Arc<AtomicBool>,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Wait for the next signal. Returns `None` once the subscription has
    /// been released, even if a signal was still buffered.
    pub async fn recv(&mut self) -> Option<()> {
        let signal = self.receiver.recv().await?;
        if self.is_released() {
            return None;
        }
        Some(signal)
    }

    /// Take a pending signal without waiting.
    pub fn try_recv(&mut self) -> Option<()> {
        match self.receiver.try_recv() {
            Ok(signal) if !self.is_released() => Some(signal),
            _ => None,
        }
    }

    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }
}

/// The set of live subscriptions of one signal source.
#[derive(Debug, Default)]
pub struct SignalRegistry {
    slots: Mutex<HashMap<SubscriptionId, Slot>>,
}

impl SignalRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new slot and hand back its receiving end.
    pub fn add(&self) -> Subscription {
        let id = SubscriptionId(NEXT_SUBSCRIPTION_ID.fetch_add(1, Ordering::Relaxed));
        let (sender, receiver) = mpsc::channel(SIGNAL_CAPACITY);
        let released = Arc::new(AtomicBool::new(false));

        self.slots.lock().insert(
            id,
            Slot {
                sender,
                released: Arc::clone(&released),
            },
        );

        trace!(subscription = %id, "subscription added");

        Subscription {
            id,
            receiver,
            released,
        }
    }

    /// Release a slot. Returns `false` when the id is unknown or was
    /// already released.
    pub fn remove(&self, id: SubscriptionId) -> bool {
        let mut slots = self.slots.lock();
        match slots.remove(&id) {
            Some(slot) => {
                // Flag first: the receiver may still hold a buffered signal.
                slot.release();
                trace!(subscription = %id, "subscription released");
                true
            }
            None => false,
        }
    }

    /// Offer one signal to every live slot without waiting on any of them.
    pub fn broadcast(&self) -> BroadcastReport {
        let mut report = BroadcastReport::default();
        let mut slots = self.slots.lock();

        if slots.is_empty() {
            return report;
        }

        slots.retain(|id, slot| match slot.sender.try_send(()) {
            Ok(()) => {
                report.delivered += 1;
                true
            }
            Err(TrySendError::Full(())) => {
                trace!(subscription = %id, "signal coalesced");
                report.coalesced += 1;
                true
            }
            Err(TrySendError::Closed(())) => {
                debug!(subscription = %id, "receiver dropped; pruning slot");
                slot.release();
                report.pruned += 1;
                false
            }
        });

        report
    }

    pub fn contains(&self, id: SubscriptionId) -> bool {
        self.slots.lock().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.lock().is_empty()
    }
}

//! Observer bindings
//!
//! `watch` turns a subscription into a callback loop on a dedicated task;
//! `ignore` detaches it again. Each binding moves through
//! `Active -> Detaching -> Terminated` and never goes back.
//!
//! Invocations of one callback never overlap: the loop holds the binding's
//! gate while the callback runs, and `ignore` takes the same gate to flip
//! the state. Once `ignore` returns the callback cannot fire again.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, error, warn};

use crate::observable::Observable;
use crate::registry::SubscriptionId;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BindingState {
    /// Subscribed, loop running.
    Active,
    /// Detach requested; the loop will not invoke the callback again.
    Detaching,
    /// Loop exited.
    Terminated,
}

#[derive(Debug)]
struct Binding {
    state: Mutex<BindingState>,
    gate: tokio::sync::Mutex<()>,
}

impl Binding {
    fn new() -> Self {
        Self {
            state: Mutex::new(BindingState::Active),
            gate: tokio::sync::Mutex::new(()),
        }
    }

    fn state(&self) -> BindingState {
        *self.state.lock()
    }

    /// Forward-only transition.
    fn advance(&self, next: BindingState) {
        let mut state = self.state.lock();
        let allowed = matches!(
            (*state, next),
            (BindingState::Active, BindingState::Detaching)
                | (BindingState::Active, BindingState::Terminated)
                | (BindingState::Detaching, BindingState::Terminated)
        );
        if allowed {
            *state = next;
        }
    }
}

/// Handle to a running observer binding, returned by [`Observer::watch`].
#[derive(Debug)]
pub struct WatchHandle {
    id: SubscriptionId,
    binding: Arc<Binding>,
    task: JoinHandle<()>,
}

impl WatchHandle {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn state(&self) -> BindingState {
        self.binding.state()
    }
}

/// Runs a callback once per received signal until detached.
#[async_trait]
pub trait Observer: Send + Sync {
    /// Subscribe to `observable` and start the callback loop.
    ///
    /// Must be called from within a tokio runtime.
    fn watch<F>(&self, observable: &dyn Observable, on_notify: F) -> WatchHandle
    where
        F: FnMut() + Send + 'static;

    /// Unsubscribe and wait for the loop to exit.
    async fn ignore(&self, observable: &dyn Observable, handle: WatchHandle);
}

/// Observer for [`EmptySignalObservable`](crate::EmptySignalObservable) and
/// anything else that speaks [`Observable`].
#[derive(Clone, Copy, Debug, Default)]
pub struct EmptySignalObserver;

impl EmptySignalObserver {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Observer for EmptySignalObserver {
    fn watch<F>(&self, observable: &dyn Observable, mut on_notify: F) -> WatchHandle
    where
        F: FnMut() + Send + 'static,
    {
        let mut subscription = observable.subscribe();
        let id = subscription.id();
        let binding = Arc::new(Binding::new());
        let loop_binding = Arc::clone(&binding);

        let span = tracing::debug_span!("observer_loop", subscription = %id);
        let task = tokio::spawn(
            async move {
                while subscription.recv().await.is_some() {
                    let _gate = loop_binding.gate.lock().await;
                    if loop_binding.state() != BindingState::Active {
                        break;
                    }

                    // A panicking callback must not take the binding down with it.
                    if catch_unwind(AssertUnwindSafe(&mut on_notify)).is_err() {
                        error!("observer callback panicked");
                    }
                }

                loop_binding.advance(BindingState::Terminated);
                debug!("observer loop terminated");
            }
            .instrument(span),
        );

        WatchHandle { id, binding, task }
    }

    async fn ignore(&self, observable: &dyn Observable, handle: WatchHandle) {
        let WatchHandle { id, binding, task } = handle;

        {
            let _gate = binding.gate.lock().await;
            binding.advance(BindingState::Detaching);
        }

        if !observable.unsubscribe(id) {
            // Wrong observable or already released: the channel may never
            // close on its own, so stop the loop directly.
            warn!(subscription = %id, "ignore: subscription not found; aborting observer loop");
            task.abort();
        }

        if let Err(e) = task.await {
            if !e.is_cancelled() {
                error!(subscription = %id, error = ?e, "observer loop failed");
            }
        }

        binding.advance(BindingState::Terminated);
    }
}

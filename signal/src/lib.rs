//! Content-free change signals.
//!
//! An [`Observable`] broadcasts "something changed" to every live
//! subscription; an [`Observer`] turns a subscription into a callback loop
//! running on its own task. Delivery is coalescing: each subscription
//! buffers at most one pending signal and the notifier never waits.

pub mod observable;
pub mod observer;
pub mod registry;

pub use observable::{EmptySignalObservable, Observable};
pub use observer::{BindingState, EmptySignalObserver, Observer, WatchHandle};
pub use registry::{BroadcastReport, SignalRegistry, Subscription, SubscriptionId};

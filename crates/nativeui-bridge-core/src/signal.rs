//! Signal/slot notifications with owned subscriptions.
//!
//! A [`Signal`] delivers a value to every connected slot, synchronously, on
//! the emitting thread. Slots that must touch UI state hop onto the UI
//! context themselves.
//!
//! Long-lived listeners should prefer [`Signal::subscribe`]: the returned
//! [`Subscription`] disconnects when it is dropped, so a listener never
//! outlives the object that registered it.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicI32, Ordering};
//! use nativeui_bridge_core::Signal;
//!
//! let signal = Arc::new(Signal::<i32>::new());
//! let total = Arc::new(AtomicI32::new(0));
//! {
//!     let total = total.clone();
//!     let _subscription = signal.subscribe(move |&n| {
//!         total.fetch_add(n, Ordering::SeqCst);
//!     });
//!     signal.emit(42);
//! }
//! signal.emit(43); // no listener anymore
//! assert_eq!(total.load(Ordering::SeqCst), 42);
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use slotmap::{new_key_type, SlotMap};

use crate::logging::targets;

new_key_type! {
    /// Identifies one slot connected to a [`Signal`].
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// A type-safe signal that can have multiple connected slots.
pub struct Signal<Args> {
    connections: Mutex<SlotMap<ConnectionId, Slot<Args>>>,
    blocked: AtomicBool,
}

impl<Args: Send + 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: Send + 'static> Signal<Args> {
    /// Create a new signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(SlotMap::with_key()),
            blocked: AtomicBool::new(false),
        }
    }

    /// Connect a slot. The connection lives until [`disconnect`](Self::disconnect).
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.connections.lock().insert(Arc::new(slot))
    }

    /// Connect a slot whose lifetime is tied to the returned [`Subscription`].
    pub fn subscribe<F>(self: &Arc<Self>, slot: F) -> Subscription
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let id = self.connect(slot);
        let signal: Weak<Self> = Arc::downgrade(self);
        Subscription {
            disconnect: Some(Box::new(move || {
                signal.upgrade().map(|s| s.disconnect(id)).unwrap_or(false)
            })),
        }
    }

    /// Disconnect a slot.
    ///
    /// Returns `true` if the connection was found and removed.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.lock().remove(id).is_some()
    }

    /// Number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// Temporarily suppress emission.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::SeqCst);
    }

    /// Whether emission is currently suppressed.
    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::SeqCst)
    }

    /// Invoke every connected slot with `args`, in connection order.
    ///
    /// The connection table is snapshotted before any slot runs, so a slot
    /// may connect or disconnect (including itself) without deadlocking.
    pub fn emit(&self, args: Args) {
        if self.is_blocked() {
            tracing::trace!(target: targets::SIGNAL, "signal blocked, skipping emit");
            return;
        }

        let slots: Vec<Slot<Args>> = self.connections.lock().values().cloned().collect();
        tracing::trace!(target: targets::SIGNAL, connection_count = slots.len(), "emitting signal");

        for slot in slots {
            slot(&args);
        }
    }
}

impl<Args> std::fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("connections", &self.connections.lock().len())
            .field("blocked", &self.blocked.load(Ordering::SeqCst))
            .finish()
    }
}

/// An owned connection to a [`Signal`].
///
/// Dropping the subscription disconnects its slot. The subscription holds
/// only a weak reference to the signal, so it never keeps the signal alive.
#[must_use = "dropping a Subscription immediately disconnects it"]
pub struct Subscription {
    disconnect: Option<Box<dyn FnOnce() -> bool + Send + Sync>>,
}

impl Subscription {
    /// Disconnect now.
    ///
    /// Returns `true` if a live connection was removed. Releasing twice, or
    /// after the signal itself was dropped, returns `false`.
    pub fn release(&mut self) -> bool {
        self.disconnect.take().map(|f| f()).unwrap_or(false)
    }

    /// Whether [`release`](Self::release) has not run yet.
    pub fn is_active(&self) -> bool {
        self.disconnect.is_some()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

static_assertions::assert_impl_all!(Signal<i32>: Send, Sync);
static_assertions::assert_impl_all!(Subscription: Send, Sync);

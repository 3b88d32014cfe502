//! Snapshot-plus-listeners observable used for backend push streams.
//!
//! A [`Broadcast`] holds the latest published value and a list of listeners.
//! [`Broadcast::publish`] swaps the snapshot and then invokes every live
//! listener synchronously, in subscription order. Subscribing returns a
//! [`Subscription`] guard; dropping or disposing it unregisters the listener.
//!
//! # Membership
//!
//! Each listener carries an `active` flag that disposal clears before the
//! entry is removed from the list. Publishing iterates a cloned listener list,
//! so the flag is what guarantees a listener disposed mid-publish is not
//! invoked afterwards.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use arc_swap::ArcSwap;
use parking_lot::{Mutex, ReentrantMutex};
use tracing::trace;

type Callback<T> = dyn Fn(&T) + Send + Sync;

struct Listener<T> {
	id: u64,
	active: AtomicBool,
	callback: Box<Callback<T>>,
}

struct ListenerList<T> {
	next_id: u64,
	entries: Vec<Arc<Listener<T>>>,
}

struct Shared<T> {
	name: &'static str,
	current: ArcSwap<T>,
	listeners: Mutex<ListenerList<T>>,
	/// Serializes publishes so listeners observe snapshots in publish order.
	/// Reentrant so a listener may publish without deadlocking; the outer
	/// publish then stops delivering its older snapshot.
	publish_gate: ReentrantMutex<()>,
}

impl<T> Shared<T> {
	fn remove(&self, id: u64) -> bool {
		let mut list = self.listeners.lock();
		let before = list.entries.len();
		list.entries.retain(|entry| entry.id != id);
		before != list.entries.len()
	}
}

/// Latest-value observable with synchronous listener notification.
///
/// Cloning yields another handle to the same snapshot and listener list.
pub struct Broadcast<T> {
	shared: Arc<Shared<T>>,
}

impl<T> Clone for Broadcast<T> {
	fn clone(&self) -> Self {
		Self {
			shared: Arc::clone(&self.shared),
		}
	}
}

impl<T> fmt::Debug for Broadcast<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Broadcast")
			.field("name", &self.shared.name)
			.field("subscribers", &self.shared.listeners.lock().entries.len())
			.finish_non_exhaustive()
	}
}

impl<T: Send + Sync + 'static> Broadcast<T> {
	/// Creates a broadcast holding `initial` as its first snapshot.
	///
	/// `name` only appears in logs.
	pub fn new(name: &'static str, initial: T) -> Self {
		Self {
			shared: Arc::new(Shared {
				name,
				current: ArcSwap::from_pointee(initial),
				listeners: Mutex::new(ListenerList {
					next_id: 0,
					entries: Vec::new(),
				}),
				publish_gate: ReentrantMutex::new(()),
			}),
		}
	}

	/// Returns the latest snapshot.
	pub fn current(&self) -> Arc<T> {
		self.shared.current.load_full()
	}

	/// Replaces the snapshot and notifies listeners in subscription order.
	pub fn publish(&self, value: T) {
		let _gate = self.shared.publish_gate.lock();
		let snapshot = Arc::new(value);
		self.shared.current.store(Arc::clone(&snapshot));

		let listeners = self.shared.listeners.lock().entries.clone();
		trace!(broadcast = self.shared.name, listeners = listeners.len(), "publish");
		for listener in listeners {
			// A listener that published reentrantly already delivered a newer snapshot to everyone.
			if !Arc::ptr_eq(&*self.shared.current.load(), &snapshot) {
				trace!(broadcast = self.shared.name, "publish superseded");
				break;
			}
			if listener.active.load(Ordering::Acquire) {
				(listener.callback)(&snapshot);
			}
		}
	}

	/// Registers `callback` and returns the guard that unregisters it.
	///
	/// The callback is not invoked for the current snapshot; callers that need
	/// an initial value read [`Broadcast::current`] themselves.
	pub fn subscribe(&self, callback: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
		let listener = {
			let mut list = self.shared.listeners.lock();
			let id = list.next_id;
			list.next_id += 1;
			let listener = Arc::new(Listener {
				id,
				active: AtomicBool::new(true),
				callback: Box::new(callback),
			});
			list.entries.push(Arc::clone(&listener));
			listener
		};

		let weak: Weak<Shared<T>> = Arc::downgrade(&self.shared);
		let name = self.shared.name;
		Subscription::from_disposer(move || {
			listener.active.store(false, Ordering::Release);
			if let Some(shared) = weak.upgrade() {
				let removed = shared.remove(listener.id);
				trace!(broadcast = name, id = listener.id, removed, "unsubscribe");
			}
		})
	}

	/// Returns the number of registered listeners.
	pub fn subscriber_count(&self) -> usize {
		self.shared.listeners.lock().entries.len()
	}
}

/// Guard for one registered listener.
///
/// Disposal is idempotent: [`Subscription::dispose`] may be called any number
/// of times, and dropping an already-disposed guard does nothing.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
	disposer: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
	fn from_disposer(disposer: impl FnOnce() + Send + Sync + 'static) -> Self {
		Self {
			disposer: Some(Box::new(disposer)),
		}
	}

	/// Creates a guard that is already disposed.
	pub fn inert() -> Self {
		Self { disposer: None }
	}

	/// Unregisters the listener. Later calls are no-ops.
	pub fn dispose(&mut self) {
		if let Some(disposer) = self.disposer.take() {
			disposer();
		}
	}

	/// Returns true until the guard has been disposed.
	pub fn is_active(&self) -> bool {
		self.disposer.is_some()
	}
}

impl Drop for Subscription {
	fn drop(&mut self) {
		self.dispose();
	}
}

impl fmt::Debug for Subscription {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Subscription")
			.field("active", &self.is_active())
			.finish()
	}
}

/// Subscriptions owned by one view, released together.
#[derive(Debug, Default)]
pub struct SubscriptionSet {
	entries: Vec<Subscription>,
}

impl SubscriptionSet {
	/// Creates an empty set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Takes ownership of a subscription.
	pub fn push(&mut self, subscription: Subscription) {
		self.entries.push(subscription);
	}

	/// Disposes every held subscription and empties the set.
	pub fn dispose_all(&mut self) {
		for mut subscription in self.entries.drain(..) {
			subscription.dispose();
		}
	}

	/// Returns the number of held subscriptions.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns true when the set holds nothing.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

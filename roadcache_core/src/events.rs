//! Event system for resolver reports
//!
//! The resolver does not write to a global logger. It reports what it does on an [`EventBus`] that is
//! handed to it at construction time:
//! - steps (which tier is being consulted)
//! - tier hits
//! - recoverable problems (remote outage, failed write-back)
//! - errors
//!
//! Applications decide where events go, e.g. [`EventBus::forward_to_log`] sends them to the `log` facade.

use crate::Tier;
use arc_swap::ArcSwap;
use std::sync::{
	Arc,
	atomic::{AtomicUsize, Ordering},
};

/// Event types that can be emitted by the resolver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
	/// Step/stage message
	Step { message: String },

	/// A tier served the resource for `key`
	TierHit { tier: Tier, key: String },

	/// Recoverable problem, resolution continues
	Warning { message: String },

	/// Uploading a freshly generated resource to the remote store failed
	WriteBackFailed { key: String, message: String },

	/// Error message
	Error { message: String },
}

/// Unique identifier for event listeners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(usize);

type EventListener = Arc<dyn Fn(&Event) + Send + Sync>;

/// Thread-safe event bus.
///
/// Listeners are called synchronously in registration order. Cloning the bus shares the listener list.
#[derive(Clone)]
pub struct EventBus {
	listeners: Arc<ArcSwap<Vec<EventListener>>>,
	next_id: Arc<AtomicUsize>,
}

impl EventBus {
	pub fn new() -> Self {
		Self {
			listeners: Arc::new(ArcSwap::from_pointee(Vec::new())),
			next_id: Arc::new(AtomicUsize::new(0)),
		}
	}

	/// Register an event listener
	pub fn subscribe<F>(&self, listener: F) -> ListenerId
	where
		F: Fn(&Event) + Send + Sync + 'static,
	{
		let listener: EventListener = Arc::new(listener);
		let id = self.next_id.fetch_add(1, Ordering::Relaxed);
		self.listeners.rcu(|old| {
			let mut new = (**old).clone();
			new.push(listener.clone());
			new
		});
		ListenerId(id)
	}

	/// Emit an event to all listeners
	///
	/// A panicking listener does not keep the others from being called.
	pub fn emit(&self, event: Event) {
		let listeners = self.listeners.load();
		for listener in listeners.iter() {
			let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
				listener(&event);
			}));
		}
	}

	pub fn step(&self, message: String) {
		self.emit(Event::Step { message });
	}

	pub fn hit(&self, tier: Tier, key: &str) {
		self.emit(Event::TierHit {
			tier,
			key: key.to_string(),
		});
	}

	pub fn warn(&self, message: String) {
		self.emit(Event::Warning { message });
	}

	pub fn write_back_failed(&self, key: &str, message: String) {
		self.emit(Event::WriteBackFailed {
			key: key.to_string(),
			message,
		});
	}

	pub fn error(&self, message: String) {
		self.emit(Event::Error { message });
	}

	/// Subscribes a listener that forwards every event to the `log` facade.
	pub fn forward_to_log(&self) -> ListenerId {
		self.subscribe(|event| match event {
			Event::Step { message } => log::debug!(target: "roadcache", "{message}"),
			Event::TierHit { tier, key } => log::info!(target: "roadcache", "loaded '{key}' from {tier}"),
			Event::Warning { message } => log::warn!(target: "roadcache", "{message}"),
			Event::WriteBackFailed { key, message } => {
				log::warn!(target: "roadcache", "failed to upload '{key}' to the remote store: {message}");
			}
			Event::Error { message } => log::error!(target: "roadcache", "{message}"),
		})
	}
}

impl Default for EventBus {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Debug for EventBus {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("EventBus")
			.field("listeners", &self.listeners.load().len())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::Mutex;

	fn capture(bus: &EventBus) -> Arc<Mutex<Vec<Event>>> {
		let captured = Arc::new(Mutex::new(Vec::new()));
		let captured_clone = captured.clone();
		bus.subscribe(move |event| captured_clone.lock().unwrap().push(event.clone()));
		captured
	}

	#[test]
	fn subscribe_returns_increasing_ids() {
		let bus = EventBus::new();
		assert_eq!(bus.subscribe(|_| {}), ListenerId(0));
		assert_eq!(bus.subscribe(|_| {}), ListenerId(1));
		assert_eq!(format!("{bus:?}"), "EventBus { listeners: 2 }");
	}

	#[test]
	fn concurrent_subscribers_get_distinct_ids() {
		let bus = EventBus::new();
		let handles: Vec<_> = (0..8)
			.map(|_| {
				let bus = bus.clone();
				std::thread::spawn(move || bus.subscribe(|_| {}))
			})
			.collect();
		let ids: std::collections::HashSet<ListenerId> = handles.into_iter().map(|h| h.join().unwrap()).collect();
		assert_eq!(ids.len(), 8);
		assert_eq!(format!("{bus:?}"), "EventBus { listeners: 8 }");
	}

	#[test]
	fn helpers_emit_events() {
		let bus = EventBus::new();
		let captured = capture(&bus);

		bus.step("checking local cache".to_string());
		bus.hit(Tier::Remote, "graphs/a.graphml");
		bus.warn("remote unreachable".to_string());
		bus.write_back_failed("graphs/a.graphml", "403".to_string());
		bus.error("origin failed".to_string());

		assert_eq!(
			*captured.lock().unwrap(),
			vec![
				Event::Step {
					message: "checking local cache".to_string()
				},
				Event::TierHit {
					tier: Tier::Remote,
					key: "graphs/a.graphml".to_string()
				},
				Event::Warning {
					message: "remote unreachable".to_string()
				},
				Event::WriteBackFailed {
					key: "graphs/a.graphml".to_string(),
					message: "403".to_string()
				},
				Event::Error {
					message: "origin failed".to_string()
				},
			]
		);
	}

	#[test]
	fn clones_share_listeners() {
		let bus1 = EventBus::new();
		let bus2 = bus1.clone();
		let captured = capture(&bus1);
		bus2.step("Test".to_string());
		assert_eq!(captured.lock().unwrap().len(), 1);
	}

	#[test]
	fn panicking_listener_does_not_stop_others() {
		let bus = EventBus::new();
		bus.subscribe(|_event| panic!("Test panic"));
		let captured = capture(&bus);
		bus.warn("Test".to_string());
		assert_eq!(captured.lock().unwrap().len(), 1);
	}

	#[test]
	fn forward_to_log_accepts_all_events() {
		let bus = EventBus::default();
		bus.forward_to_log();
		bus.step("a".to_string());
		bus.hit(Tier::Local, "k");
		bus.write_back_failed("k", "m".to_string());
	}
}

//! Listener registry and event broadcast
//!
//! Listeners are kept in a copy-on-write list. `dispatch` takes a snapshot of
//! the list and releases the lock before calling out, so a listener may
//! register or unregister listeners (or touch spheres) from inside
//! `on_event`.

use crate::events::SphereEvent;
use parking_lot::RwLock;
use std::sync::Arc;

/// Identity of an external event sink: script object handle plus script type
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId {
    pub object: u64,
    pub script: String,
}

impl ListenerId {
    pub fn new(object: u64, script: impl Into<String>) -> Self {
        Self {
            object,
            script: script.into(),
        }
    }
}

/// Receiver of bone sphere events
pub trait SphereListener: Send + Sync {
    fn id(&self) -> &ListenerId;

    /// Called synchronously for every broadcast event
    fn on_event(&self, event: &SphereEvent);
}

type ListenerList = Vec<Arc<dyn SphereListener>>;

/// Broadcasts events to every registered listener
#[derive(Default)]
pub struct EventDispatcher {
    listeners: RwLock<Arc<ListenerList>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener.
    ///
    /// Registrations accumulate: registering the same identity twice delivers
    /// every event to it twice.
    pub fn register(&self, listener: Arc<dyn SphereListener>) {
        log::info!("Registering bone sphere listener {:?}", listener.id());
        let mut listeners = self.listeners.write();
        Arc::make_mut(&mut listeners).push(listener);
    }

    /// Remove every registration with this identity
    pub fn unregister(&self, id: &ListenerId) {
        let mut listeners = self.listeners.write();
        if !listeners.iter().any(|l| l.id() == id) {
            log::debug!("Unregister of unknown listener {:?} ignored", id);
            return;
        }
        log::info!("Unregistering bone sphere listener {:?}", id);
        Arc::make_mut(&mut listeners).retain(|l| l.id() != id);
    }

    /// Deliver an event to every listener
    pub fn dispatch(&self, event: SphereEvent) {
        let snapshot = {
            let listeners = self.listeners.read();
            if listeners.is_empty() {
                return;
            }
            Arc::clone(&listeners)
        };

        log::trace!("Dispatching {:?} to {} listeners", event, snapshot.len());
        for listener in snapshot.iter() {
            listener.on_event(&event);
        }
    }

    /// Number of registrations (duplicates counted)
    pub fn len(&self) -> usize {
        self.listeners.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.read().is_empty()
    }

    pub fn is_registered(&self, id: &ListenerId) -> bool {
        self.listeners.read().iter().any(|l| l.id() == id)
    }

    pub fn clear(&self) {
        *self.listeners.write() = Arc::new(Vec::new());
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("listener_count", &self.len())
            .finish()
    }
}

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

type Handler<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Handle returned by [`Signal::connect`], used to detach the observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotId(u64);

/// Broadcast channel of synchronous observers.
///
/// Observers run in the order they were attached. Each emission iterates a
/// copy of the observer list, so connecting or disconnecting from inside a
/// callback is allowed and only affects later emissions.
pub struct Signal<T> {
    next_id: AtomicU64,
    slots:   Mutex<BTreeMap<u64, Handler<T>>>,
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("observers", &self.len())
            .finish()
    }
}

impl<T> Signal<T> {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(0),
            slots:   Mutex::new(BTreeMap::new()),
        }
    }

    /// Attach an observer.
    pub fn connect<F>(&self, handler: F) -> SlotId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.lock().insert(id, Arc::new(handler));
        SlotId(id)
    }

    /// Detach an observer. Returns `false` if it was already gone.
    pub fn disconnect(&self, slot: SlotId) -> bool {
        self.lock().remove(&slot.0).is_some()
    }

    pub fn disconnect_all(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Invoke every observer attached at the time of the call.
    pub fn emit(&self, value: &T) {
        self.emit_while(value, || true);
    }

    /// Like [`emit`](Self::emit), but checks `proceed` before each observer
    /// and stops as soon as it returns `false`.
    pub fn emit_while(&self, value: &T, proceed: impl Fn() -> bool) {
        // The lock is released before any observer runs.
        let handlers: Vec<Handler<T>> = self.lock().values().cloned().collect();
        for handler in handlers {
            if !proceed() {
                break;
            }
            handler(value);
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<u64, Handler<T>>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

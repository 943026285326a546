//! Handler registry
//!
//! An ordered list of backend handlers per capability. The inner vector is
//! immutable and replaced wholesale under a mutex, so an in-flight fan-out
//! holding a snapshot never observes a torn registration or reset.

use std::sync::{Arc, Mutex};

/// Ordered, mutex-guarded registry of `Arc`'d handlers.
pub struct HandlerRegistry<H: ?Sized> {
    handlers: Mutex<Arc<Vec<Arc<H>>>>,
}

impl<H: ?Sized> HandlerRegistry<H> {
    pub fn new() -> Self {
        Self {
            handlers: Mutex::new(Arc::new(Vec::new())),
        }
    }

    /// Append a handler. Returns `false` only if the registry lock is
    /// poisoned; registration never panics.
    pub fn add(&self, handler: Arc<H>) -> bool {
        match self.handlers.lock() {
            Ok(mut guard) => {
                let mut next: Vec<Arc<H>> = guard.as_ref().clone();
                next.push(handler);
                *guard = Arc::new(next);
                true
            }
            Err(_) => false,
        }
    }

    /// Drop all handlers (supported reset between runs or reconnects).
    pub fn clear(&self) -> bool {
        match self.handlers.lock() {
            Ok(mut guard) => {
                *guard = Arc::new(Vec::new());
                true
            }
            Err(_) => false,
        }
    }

    /// Cheap clone of the current handler list, in registration order.
    pub fn snapshot(&self) -> Arc<Vec<Arc<H>>> {
        self.handlers
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_else(|_| Arc::new(Vec::new()))
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<H: ?Sized> Default for HandlerRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

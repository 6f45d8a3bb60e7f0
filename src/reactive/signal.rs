use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use super::invalidation::request_frame;
use super::runtime::{notify_write, try_with_runtime, SignalId};

static NEXT_SIGNAL_ID: AtomicUsize = AtomicUsize::new(0);

struct SignalInner<T> {
    id: SignalId,
    value: RwLock<T>,
}

impl<T> Drop for SignalInner<T> {
    fn drop(&mut self) {
        try_with_runtime(|rt| rt.forget_signal(self.id));
    }
}

/// An observable value cell.
///
/// Reading a signal inside an effect subscribes that effect; writing a
/// different value re-runs every subscriber (on the thread that owns them)
/// and raises the frame request flag so a host loop knows to redraw.
///
/// Clones share the same cell. Use [`Signal::ptr_eq`] to tell two cells apart
/// regardless of their current values.
///
/// # Thread Safety
/// The value lives behind an `Arc<RwLock<_>>`, so signals can be moved to
/// other threads. Effects only run on the thread that created them.
pub struct Signal<T> {
    inner: Arc<SignalInner<T>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Signal<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(SignalInner {
                id: NEXT_SIGNAL_ID.fetch_add(1, Ordering::Relaxed),
                value: RwLock::new(value),
            }),
        }
    }

    pub fn id(&self) -> SignalId {
        self.inner.id
    }

    /// Whether both handles point at the same cell.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        try_with_runtime(|rt| rt.track_read(self.inner.id));
        f(&self.inner.value.read().expect("signal lock poisoned"))
    }

    pub fn with_untracked<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.inner.value.read().expect("signal lock poisoned"))
    }

    fn notify(&self) {
        notify_write(self.inner.id);
        request_frame();
    }
}

impl<T: Clone> Signal<T> {
    pub fn get(&self) -> T {
        self.with(T::clone)
    }

    pub fn get_untracked(&self) -> T {
        self.with_untracked(T::clone)
    }
}

impl<T: PartialEq> Signal<T> {
    /// Sets the signal's value, only triggering updates if the value actually changed.
    pub fn set(&self, value: T) {
        let Ok(mut guard) = self.inner.value.write() else {
            return; // Lock poisoned, skip update silently
        };
        if *guard != value {
            *guard = value;
            drop(guard);
            self.notify();
        }
    }
}

impl<T: PartialEq + Clone> Signal<T> {
    /// Updates the signal's value using a closure, only triggering updates if the value changed.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        let Ok(mut guard) = self.inner.value.write() else {
            return; // Lock poisoned, skip update silently
        };
        let old_value = guard.clone();
        f(&mut *guard);
        if *guard != old_value {
            drop(guard);
            self.notify();
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with_untracked(|value| {
            f.debug_struct("Signal")
                .field("id", &self.inner.id)
                .field("value", value)
                .finish()
        })
    }
}

pub fn create_signal<T>(value: T) -> Signal<T> {
    Signal::new(value)
}

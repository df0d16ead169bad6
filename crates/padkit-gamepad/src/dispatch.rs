use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock a mutex, continuing through poison. A listener panicking inside
/// a callback must not wedge the rest of the state machine.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

static NEXT_THREAD_TOKEN: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static THREAD_TOKEN: u64 = NEXT_THREAD_TOKEN.fetch_add(1, Ordering::Relaxed);
}

fn thread_token() -> u64 {
    THREAD_TOKEN.with(|t| *t)
}

/// Serializes listener callbacks and lets `stop_*` wait them out.
///
/// [`DispatchGuard::dispatch`] runs a callback while holding the guard;
/// [`DispatchGuard::drain`] blocks until an in-flight callback on another
/// thread has completed. Both are reentrant from the thread currently
/// dispatching, so a listener may call `stop_listening`/`stop_watching`
/// from inside its own callback without deadlocking.
pub(crate) struct DispatchGuard {
    lock: Mutex<()>,
    /// Token of the thread currently inside `dispatch`, 0 when idle.
    owner: AtomicU64,
}

impl DispatchGuard {
    pub(crate) fn new() -> Self {
        Self {
            lock: Mutex::new(()),
            owner: AtomicU64::new(0),
        }
    }

    /// Run a listener callback inside the guard.
    pub(crate) fn dispatch(&self, f: impl FnOnce()) {
        let token = thread_token();
        if self.owner.load(Ordering::Acquire) == token {
            // Nested dispatch from a callback on this thread; the guard
            // is already held further up the stack.
            f();
            return;
        }
        let _held = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.owner.store(token, Ordering::Release);
        let reset = OwnerReset { owner: &self.owner };
        f();
        drop(reset);
    }

    /// Wait until no callback is in flight on another thread. No-op when
    /// called from within a callback on the current thread.
    pub(crate) fn drain(&self) {
        if self.owner.load(Ordering::Acquire) == thread_token() {
            return;
        }
        drop(self.lock.lock().unwrap_or_else(PoisonError::into_inner));
    }
}

/// Clears the owner token even if the callback panics.
struct OwnerReset<'a> {
    owner: &'a AtomicU64,
}

impl Drop for OwnerReset<'_> {
    fn drop(&mut self) {
        self.owner.store(0, Ordering::Release);
    }
}

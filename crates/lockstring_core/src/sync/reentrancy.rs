//! # Reentrancy Tracker
//!
//! `parking_lot::Mutex` is not reentrant: a thread that locks a container it
//! already holds waits on itself forever. In checked builds (debug assertions
//! or the `reentrancy-check` feature) every session registers the container
//! it holds here, and every entry point asserts the container is not already
//! registered for the calling thread.
//!
//! ```text
//!   ThreadId(3) ──► [#7, #12]     guard on #7, batch callback on #12
//!   ThreadId(5) ──► [#7]          waiting in lock() is not registered
//! ```
//!
//! Release builds without the feature compile every hook to nothing and the
//! rule becomes the caller's obligation.

use super::ContainerId;

#[cfg(any(debug_assertions, feature = "reentrancy-check"))]
mod registry {
    use std::collections::HashMap;
    use std::sync::OnceLock;
    use std::thread::{self, ThreadId};

    use parking_lot::Mutex;

    use super::ContainerId;

    type Sessions = Mutex<HashMap<ThreadId, Vec<ContainerId>>>;

    fn sessions() -> &'static Sessions {
        static SESSIONS: OnceLock<Sessions> = OnceLock::new();
        SESSIONS.get_or_init(|| Mutex::new(HashMap::new()))
    }

    pub(super) fn contains(id: ContainerId) -> bool {
        sessions()
            .lock()
            .get(&thread::current().id())
            .is_some_and(|held| held.contains(&id))
    }

    pub(super) fn snapshot() -> Vec<ContainerId> {
        sessions()
            .lock()
            .get(&thread::current().id())
            .cloned()
            .unwrap_or_default()
    }

    pub(super) fn enter(id: ContainerId) {
        sessions()
            .lock()
            .entry(thread::current().id())
            .or_default()
            .push(id);
    }

    pub(super) fn exit(id: ContainerId) {
        let thread = thread::current().id();
        let mut map = sessions().lock();
        if let Some(held) = map.get_mut(&thread) {
            if let Some(index) = held.iter().rposition(|h| *h == id) {
                held.remove(index);
            }
            if held.is_empty() {
                map.remove(&thread);
            }
        }
    }
}

/// Panics if the calling thread already holds a session on `id`.
///
/// Called before the lock is touched, so a violation panics instead of
/// deadlocking.
#[cfg(any(debug_assertions, feature = "reentrancy-check"))]
#[track_caller]
pub(crate) fn assert_not_held(id: ContainerId) {
    if registry::contains(id) {
        tracing::error!(
            target: "lockstring::session",
            container = id.get(),
            "same-thread reentry on a held container"
        );
        panic!(
            "reentrancy detected: container {id} is already held by this thread; \
             inside a guard or callback, use the provided String instead"
        );
    }
}

#[cfg(not(any(debug_assertions, feature = "reentrancy-check")))]
#[inline]
pub(crate) fn assert_not_held(_id: ContainerId) {}

/// Whether the calling thread holds a session on `id`.
#[cfg(any(debug_assertions, feature = "reentrancy-check"))]
#[must_use]
pub fn is_held_by_current_thread(id: ContainerId) -> bool {
    registry::contains(id)
}

/// Every container the calling thread holds a session on, oldest first.
#[cfg(any(debug_assertions, feature = "reentrancy-check"))]
#[must_use]
pub fn held_by_current_thread() -> Vec<ContainerId> {
    registry::snapshot()
}

/// Registration of one open session; dropping it unregisters.
pub(crate) struct SessionMark {
    #[cfg(any(debug_assertions, feature = "reentrancy-check"))]
    id: ContainerId,
}

impl SessionMark {
    /// Registers `id` for the calling thread.
    ///
    /// The caller must already hold the container's lock.
    #[cfg(any(debug_assertions, feature = "reentrancy-check"))]
    pub(crate) fn enter(id: ContainerId) -> Self {
        registry::enter(id);
        Self { id }
    }

    #[cfg(not(any(debug_assertions, feature = "reentrancy-check")))]
    #[inline]
    pub(crate) fn enter(_id: ContainerId) -> Self {
        Self {}
    }
}

#[cfg(any(debug_assertions, feature = "reentrancy-check"))]
impl Drop for SessionMark {
    fn drop(&mut self) {
        registry::exit(self.id);
    }
}

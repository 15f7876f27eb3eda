//! Session guards.
//!
//! A guard holds the container's lock from acquisition until drop and derefs
//! to the `String` itself, so the full `String` API (slices, iterators,
//! `&mut` access) is available for the session. Everything borrowed through a
//! guard borrows the guard, which the compiler will not let outlive the lock.

use std::fmt;
use std::ops::{Deref, DerefMut};

use parking_lot::MutexGuard;

use super::reentrancy::{self, SessionMark};
use super::{ContainerId, SyncString};

/// Mutable session on a [`SyncString`].
///
/// ## Usage
///
/// ```rust
/// use lockstring_core::{StringEdit, SyncString};
///
/// let text = SyncString::from("value");
/// {
///     let mut guard = text.lock();
///     if guard.starts_with('v') {
///         guard.insert_at(0, "> ").unwrap();
///     }
/// } // lock released here
/// assert_eq!(text, "> value");
/// ```
///
/// Calling any method of the same container while the guard is alive is a
/// reentrancy violation: a panic in checked builds, a deadlock otherwise.
#[must_use = "dropping the guard releases the lock immediately"]
pub struct SyncStringGuard<'a> {
    // Unregister before the lock goes.
    _mark: SessionMark,
    inner: MutexGuard<'a, String>,
    id: ContainerId,
}

impl<'a> SyncStringGuard<'a> {
    pub(super) fn acquire(owner: &'a SyncString) -> Self {
        reentrancy::assert_not_held(owner.id);
        let inner = owner.inner.lock();
        let mark = SessionMark::enter(owner.id);
        tracing::trace!(target: "lockstring::session", container = owner.id.get(), "guard acquired");
        Self {
            _mark: mark,
            inner,
            id: owner.id,
        }
    }

    /// Identity of the container this guard holds.
    #[inline]
    #[must_use]
    pub fn container_id(&self) -> ContainerId {
        self.id
    }

    /// Ends the session before the end of scope.
    ///
    /// Discouraged: prefer a narrower scope. Consuming the guard ends every
    /// borrow taken through it, so nothing obtained from it can be used
    /// afterwards and the lock cannot be released twice.
    #[allow(clippy::needless_pass_by_value)]
    pub fn release(self) {
        tracing::debug!(target: "lockstring::session", container = self.id.get(), "guard released early");
    }
}

impl Deref for SyncStringGuard<'_> {
    type Target = String;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for SyncStringGuard<'_> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

impl Drop for SyncStringGuard<'_> {
    fn drop(&mut self) {
        tracing::trace!(target: "lockstring::session", container = self.id.get(), "guard dropped");
    }
}

impl fmt::Debug for SyncStringGuard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncStringGuard")
            .field("id", &self.id)
            .field("value", &self.inner.as_str())
            .finish()
    }
}

/// Read-only session on a [`SyncString`].
///
/// Still exclusive: the container has a single lock, so readers serialize
/// with writers and with each other.
#[must_use = "dropping the guard releases the lock immediately"]
pub struct SyncStringReadGuard<'a> {
    _mark: SessionMark,
    inner: MutexGuard<'a, String>,
    id: ContainerId,
}

impl<'a> SyncStringReadGuard<'a> {
    pub(super) fn acquire(owner: &'a SyncString) -> Self {
        reentrancy::assert_not_held(owner.id);
        let inner = owner.inner.lock();
        let mark = SessionMark::enter(owner.id);
        tracing::trace!(target: "lockstring::session", container = owner.id.get(), "read guard acquired");
        Self {
            _mark: mark,
            inner,
            id: owner.id,
        }
    }

    /// Identity of the container this guard holds.
    #[inline]
    #[must_use]
    pub fn container_id(&self) -> ContainerId {
        self.id
    }

    /// Ends the session before the end of scope. See
    /// [`SyncStringGuard::release`].
    #[allow(clippy::needless_pass_by_value)]
    pub fn release(self) {
        tracing::debug!(target: "lockstring::session", container = self.id.get(), "read guard released early");
    }
}

impl Deref for SyncStringReadGuard<'_> {
    type Target = String;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Drop for SyncStringReadGuard<'_> {
    fn drop(&mut self) {
        tracing::trace!(target: "lockstring::session", container = self.id.get(), "read guard dropped");
    }
}

impl fmt::Debug for SyncStringReadGuard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncStringReadGuard")
            .field("id", &self.id)
            .field("value", &self.inner.as_str())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{StrSearch, StringEdit};

    #[test]
    fn test_guard_full_api() {
        let text = SyncString::from("hello");
        {
            let mut guard = text.lock();
            guard.push_str(" world");
            let upper: String = guard.chars().map(|c| c.to_ascii_uppercase()).collect();
            let len = guard.len();
            guard.replace_at(0, len, &upper).unwrap();
            assert_eq!(guard.find_from('W', 0), Some(6));
        }
        assert_eq!(text, "HELLO WORLD");
    }

    #[test]
    fn test_guard_reports_bounds_errors() {
        let text = SyncString::from("abc");
        let mut guard = text.lock();
        assert!(guard.erase(4, 1).is_err());
        assert!(guard.char_at(3).is_err());
        assert_eq!(guard.as_str(), "abc");
    }

    #[test]
    fn test_read_guard() {
        let text = SyncString::from("read me");
        let guard = text.read();
        assert_eq!(guard.container_id(), text.id());
        assert_eq!(guard.split(' ').count(), 2);
    }

    #[test]
    fn test_release_unlocks() {
        let text = SyncString::from("x");
        let mut guard = text.lock();
        guard.push('y');
        guard.release();
        // The lock is free again on this thread.
        text.push('z');
        assert_eq!(text, "xyz");
    }

    #[test]
    fn test_guards_on_distinct_containers_nest() {
        let a = SyncString::from("a");
        let b = SyncString::from("b");
        let mut ga = a.lock();
        let gb = b.read();
        ga.push_str(&gb);
        drop(gb);
        drop(ga);
        assert_eq!(a, "ab");
    }

    #[test]
    fn test_guard_blocks_other_threads() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::sync::Arc;
        use std::time::Duration;

        let text = Arc::new(SyncString::from("0"));
        let done = Arc::new(AtomicBool::new(false));

        let mut guard = text.lock();
        let worker = {
            let text = Arc::clone(&text);
            let done = Arc::clone(&done);
            std::thread::spawn(move || {
                text.push('2');
                done.store(true, Ordering::SeqCst);
            })
        };

        std::thread::sleep(Duration::from_millis(50));
        assert!(!done.load(Ordering::SeqCst));
        guard.push('1');
        drop(guard);

        worker.join().unwrap();
        assert_eq!(text.snapshot(), "012");
    }

    #[cfg(any(debug_assertions, feature = "reentrancy-check"))]
    #[test]
    #[should_panic(expected = "reentrancy detected")]
    fn test_second_guard_same_thread_panics() {
        let text = SyncString::from("x");
        let _first = text.lock();
        let _second = text.lock();
    }

    #[cfg(any(debug_assertions, feature = "reentrancy-check"))]
    #[test]
    #[should_panic(expected = "reentrancy detected")]
    fn test_single_call_inside_guard_panics() {
        let text = SyncString::from("x");
        let _guard = text.read();
        let _ = text.len();
    }
}

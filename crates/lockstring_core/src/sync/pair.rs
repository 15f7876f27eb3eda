//! Two-container operations.
//!
//! ```text
//!   thread 1: a.assign_from(&b)      thread 2: b.assign_from(&a)
//!             lock #3, lock #8                 lock #3, lock #8
//! ```
//!
//! Both threads lock the lower id first, so neither can hold one lock while
//! waiting on the other's. Every operation touching two containers goes
//! through [`with_pair`].

use parking_lot::MutexGuard;

use super::reentrancy;
use super::SyncString;

/// Runs `f` on the buffers of `a` and `b`, in that argument order, with both
/// locks held.
///
/// Returns `None` without locking when `a` and `b` are the same container.
pub(super) fn with_pair<R>(
    a: &SyncString,
    b: &SyncString,
    f: impl FnOnce(&mut String, &mut String) -> R,
) -> Option<R> {
    reentrancy::assert_not_held(a.id);
    reentrancy::assert_not_held(b.id);
    if a.id == b.id {
        return None;
    }
    let (mut first, mut second) = lock_ordered(a, b);
    tracing::trace!(
        target: "lockstring::pair",
        left = a.id.get(),
        right = b.id.get(),
        "pair locked"
    );
    Some(f(&mut first, &mut second))
}

/// Locks both containers in ascending id order and returns the guards in
/// argument order.
fn lock_ordered<'a>(
    a: &'a SyncString,
    b: &'a SyncString,
) -> (MutexGuard<'a, String>, MutexGuard<'a, String>) {
    if a.id < b.id {
        let first = a.inner.lock();
        let second = b.inner.lock();
        (first, second)
    } else {
        let second = b.inner.lock();
        let first = a.inner.lock();
        (first, second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_container_is_a_no_op() {
        let a = SyncString::from("self");
        assert_eq!(with_pair(&a, &a, |x, _| x.push('!')), None);
        a.swap(&a);
        a.assign_from(&a);
        a.take_from(&a);
        assert_eq!(a, "self");
    }

    #[test]
    fn test_pair_argument_order_is_preserved() {
        let older = SyncString::from("older");
        let newer = SyncString::from("newer");
        assert!(older.id() < newer.id());

        let seen = with_pair(&newer, &older, |x, y| (x.clone(), y.clone()));
        assert_eq!(seen, Some(("newer".to_owned(), "older".to_owned())));
    }

    #[test]
    fn test_assign_take_swap() {
        let a = SyncString::from("alpha");
        let b = SyncString::from("beta");

        a.swap(&b);
        assert_eq!(a, "beta");
        assert_eq!(b, "alpha");

        a.assign_from(&b);
        assert_eq!(a, "alpha");
        assert_eq!(b, "alpha");

        b.assign("gamma");
        a.take_from(&b);
        assert_eq!(a, "gamma");
        assert!(b.is_empty());
    }

    #[test]
    fn test_pair_ops_do_not_deadlock_in_opposite_directions() {
        use std::sync::Arc;

        let a = Arc::new(SyncString::from("a"));
        let b = Arc::new(SyncString::from("b"));

        let forward = {
            let (a, b) = (Arc::clone(&a), Arc::clone(&b));
            std::thread::spawn(move || {
                for _ in 0..2_000 {
                    a.assign_from(&b);
                    a.swap(&b);
                }
            })
        };
        let backward = {
            let (a, b) = (Arc::clone(&a), Arc::clone(&b));
            std::thread::spawn(move || {
                for _ in 0..2_000 {
                    b.assign_from(&a);
                    b.swap(&a);
                }
            })
        };

        forward.join().unwrap();
        backward.join().unwrap();
    }

    #[cfg(any(debug_assertions, feature = "reentrancy-check"))]
    #[test]
    #[should_panic(expected = "reentrancy detected")]
    fn test_pair_inside_session_panics() {
        let a = SyncString::from("a");
        let b = SyncString::from("b");
        let _guard = b.lock();
        a.assign_from(&b);
    }
}

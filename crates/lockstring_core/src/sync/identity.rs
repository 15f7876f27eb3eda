//! Process-unique container identity.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identity of one [`SyncString`](crate::SyncString).
///
/// Assigned from a global counter at construction and never reused, so it
/// stays stable while the container moves and never aliases a dropped one.
/// Two-container operations lock in ascending id order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContainerId(u64);

impl ContainerId {
    /// Allocates a fresh id.
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw id value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique_and_increasing() {
        let a = ContainerId::next();
        let b = ContainerId::next();
        assert_ne!(a, b);
        assert!(a < b);
        assert_eq!(format!("{b}"), format!("#{}", b.get()));
    }
}

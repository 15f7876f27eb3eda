//! The container and its single-call API.

use std::cmp::Ordering;
use std::fmt;

use parking_lot::Mutex;

use super::guard::{SyncStringGuard, SyncStringReadGuard};
use super::raw_view::RawView;
use super::reentrancy::{self, SessionMark};
use super::{pair, ContainerId};
use crate::error::SyncStringResult;
use crate::text::{try_grow, CharSet, Needle, StrSearch, StringEdit};

/// A `String` that can be shared between threads and edited in place.
///
/// Every method locks, performs one operation and unlocks, returning either a
/// plain value or an owned copy. Sequences of operations that must not
/// interleave with other threads go through [`lock`](Self::lock) or
/// [`with_write`](Self::with_write).
///
/// ## Usage
///
/// ```rust
/// use std::sync::Arc;
/// use lockstring_core::SyncString;
///
/// let log = Arc::new(SyncString::new("start"));
/// let workers: Vec<_> = (0..4)
///     .map(|i| {
///         let log = Arc::clone(&log);
///         std::thread::spawn(move || log.push_str(&format!(" {i}")))
///     })
///     .collect();
/// for w in workers {
///     w.join().unwrap();
/// }
/// assert_eq!(log.len(), "start".len() + 8);
/// ```
///
/// Byte positions follow `String`: a position past the end is
/// [`OutOfBounds`](crate::SyncStringError::OutOfBounds), a position inside a
/// multi-byte character is
/// [`NotCharBoundary`](crate::SyncStringError::NotCharBoundary), and counts
/// running past the end are clamped.
pub struct SyncString {
    pub(super) id: ContainerId,
    pub(super) inner: Mutex<String>,
}

impl SyncString {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Creates a container holding `value`.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            id: ContainerId::next(),
            inner: Mutex::new(value.into()),
        }
    }

    /// Identity used for lock ordering and reentrancy tracking.
    #[inline]
    #[must_use]
    pub fn id(&self) -> ContainerId {
        self.id
    }

    /// Unwraps the buffer. No lock needed, the container is consumed.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.inner.into_inner()
    }

    /// Direct access through a unique borrow. No lock needed.
    #[inline]
    pub fn get_mut(&mut self) -> &mut String {
        self.inner.get_mut()
    }

    #[inline]
    fn read_locked<R>(&self, f: impl FnOnce(&String) -> R) -> R {
        reentrancy::assert_not_held(self.id);
        let inner = self.inner.lock();
        f(&inner)
    }

    #[inline]
    fn write_locked<R>(&self, f: impl FnOnce(&mut String) -> R) -> R {
        reentrancy::assert_not_held(self.id);
        let mut inner = self.inner.lock();
        f(&mut inner)
    }

    // =========================================================================
    // Sessions
    // =========================================================================

    /// Opens a mutable session. Blocks until the lock is free.
    ///
    /// # Panics
    ///
    /// In checked builds, if this thread already holds a session on this
    /// container.
    pub fn lock(&self) -> SyncStringGuard<'_> {
        SyncStringGuard::acquire(self)
    }

    /// Opens a read-only session. Blocks until the lock is free.
    ///
    /// # Panics
    ///
    /// Same as [`lock`](Self::lock).
    pub fn read(&self) -> SyncStringReadGuard<'_> {
        SyncStringReadGuard::acquire(self)
    }

    /// Runs `f` with the buffer locked and returns its result.
    ///
    /// `f` must not call back into this container.
    ///
    /// # Panics
    ///
    /// Same as [`lock`](Self::lock). A panic inside `f` unwinds through and
    /// still releases the lock.
    pub fn with_write<R>(&self, f: impl FnOnce(&mut String) -> R) -> R {
        reentrancy::assert_not_held(self.id);
        let mut inner = self.inner.lock();
        let _mark = SessionMark::enter(self.id);
        f(&mut inner)
    }

    /// Read-only counterpart of [`with_write`](Self::with_write).
    ///
    /// # Panics
    ///
    /// Same as [`lock`](Self::lock).
    pub fn with_read<R>(&self, f: impl FnOnce(&str) -> R) -> R {
        reentrancy::assert_not_held(self.id);
        let inner = self.inner.lock();
        let _mark = SessionMark::enter(self.id);
        f(inner.as_str())
    }

    /// Opens a nul-terminated view of the buffer for interop.
    pub(crate) fn raw_view(&self) -> SyncStringResult<RawView<'_>> {
        RawView::open(self.lock())
    }

    // =========================================================================
    // Assignment and comparison
    // =========================================================================

    /// Replaces the content with a copy of `value`.
    pub fn assign(&self, value: &str) {
        self.write_locked(|s| {
            s.clear();
            s.push_str(value);
        });
    }

    /// Replaces the content with `count` copies of `ch`.
    ///
    /// # Errors
    ///
    /// `LengthOverflow` if the run cannot be allocated; the old content stays.
    pub fn assign_repeated(&self, count: usize, ch: char) -> SyncStringResult<()> {
        self.write_locked(|s| s.assign_repeated(count, ch))
    }

    /// Moves `value` in, dropping the old content.
    pub fn set_value(&self, value: impl Into<String>) {
        let value = value.into();
        self.write_locked(|s| *s = value);
    }

    /// Takes the content out, leaving the container empty.
    #[must_use]
    pub fn take(&self) -> String {
        self.write_locked(std::mem::take)
    }

    /// Copies the content of `other` into this container.
    ///
    /// Both locks are taken in id order, whatever the argument order.
    pub fn assign_from(&self, other: &SyncString) {
        pair::with_pair(self, other, |dst, src| dst.clone_from(src));
    }

    /// Moves the content of `other` into this container, leaving `other`
    /// empty.
    pub fn take_from(&self, other: &SyncString) {
        pair::with_pair(self, other, |dst, src| *dst = std::mem::take(src));
    }

    /// Exchanges contents with `other`. Locks both in id order.
    pub fn swap(&self, other: &SyncString) {
        pair::with_pair(self, other, std::mem::swap);
    }

    /// Exchanges contents with an unshared `String`.
    ///
    /// Only this container is locked.
    pub fn swap_with_string(&self, other: &mut String) {
        self.write_locked(|s| std::mem::swap(s, other));
    }

    /// Lexicographic comparison with `other`.
    #[must_use]
    pub fn compare(&self, other: &str) -> Ordering {
        self.read_locked(|s| s.as_str().cmp(other))
    }

    /// Compares `pos..pos + count` (clamped) with `other`.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` if `pos > len`, `NotCharBoundary` if the range splits a
    /// character.
    pub fn compare_range(&self, pos: usize, count: usize, other: &str) -> SyncStringResult<Ordering> {
        self.read_locked(|s| s.compare_range(pos, count, other))
    }

    // =========================================================================
    // Capacity and status
    // =========================================================================

    /// Length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read_locked(String::len)
    }

    /// Whether the content is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read_locked(String::is_empty)
    }

    /// Number of characters.
    #[must_use]
    pub fn char_count(&self) -> usize {
        self.read_locked(|s| s.chars().count())
    }

    /// Allocated capacity in bytes.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.read_locked(String::capacity)
    }

    /// Largest length a `String` can reach.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub const fn max_size(&self) -> usize {
        isize::MAX.unsigned_abs()
    }

    /// Reserves room for `additional` more bytes.
    ///
    /// # Errors
    ///
    /// `LengthOverflow` if the capacity would pass
    /// [`max_size`](Self::max_size) or the allocation fails.
    pub fn reserve(&self, additional: usize) -> SyncStringResult<()> {
        self.write_locked(|s| try_grow(s, additional))
    }

    /// Releases unused capacity.
    pub fn shrink_to_fit(&self) {
        self.write_locked(String::shrink_to_fit);
    }

    // =========================================================================
    // Element access and setters
    // =========================================================================

    /// The character starting at byte `pos`.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` if `pos >= len`, `NotCharBoundary` if `pos` splits a
    /// character.
    pub fn at(&self, pos: usize) -> SyncStringResult<char> {
        self.read_locked(|s| s.char_at(pos))
    }

    /// The character starting at byte `pos`, if there is one.
    #[must_use]
    pub fn get(&self, pos: usize) -> Option<char> {
        self.at(pos).ok()
    }

    /// First character.
    #[must_use]
    pub fn front(&self) -> Option<char> {
        self.read_locked(|s| s.chars().next())
    }

    /// Last character.
    #[must_use]
    pub fn back(&self) -> Option<char> {
        self.read_locked(|s| s.chars().next_back())
    }

    /// Replaces the character starting at `pos` with `ch`.
    ///
    /// # Errors
    ///
    /// Same as [`at`](Self::at).
    pub fn set(&self, pos: usize, ch: char) -> SyncStringResult<()> {
        self.write_locked(|s| s.set_char(pos, ch))
    }

    /// Replaces the first character.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` if empty.
    pub fn set_front(&self, ch: char) -> SyncStringResult<()> {
        self.write_locked(|s| s.set_front(ch))
    }

    /// Replaces the last character.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` if empty.
    pub fn set_back(&self, ch: char) -> SyncStringResult<()> {
        self.write_locked(|s| s.set_back(ch))
    }

    // =========================================================================
    // Modifiers
    // =========================================================================

    /// Empties the content, keeping the allocation.
    pub fn clear(&self) {
        self.write_locked(String::clear);
    }

    /// Appends one character.
    pub fn push(&self, ch: char) {
        self.write_locked(|s| s.push(ch));
    }

    /// Removes and returns the last character.
    pub fn pop(&self) -> Option<char> {
        self.write_locked(String::pop)
    }

    /// Appends `value`.
    pub fn push_str(&self, value: &str) {
        self.write_locked(|s| s.push_str(value));
    }

    /// Appends `count` copies of `ch`.
    ///
    /// # Errors
    ///
    /// `LengthOverflow` if the content cannot grow past
    /// [`max_size`](Self::max_size) or the allocation fails.
    pub fn append_repeated(&self, count: usize, ch: char) -> SyncStringResult<()> {
        self.write_locked(|s| s.append_repeated(count, ch))
    }

    /// Inserts `value` at byte `pos`.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` if `pos > len`, `NotCharBoundary` if `pos` splits a
    /// character.
    pub fn insert_str(&self, pos: usize, value: &str) -> SyncStringResult<()> {
        self.write_locked(|s| s.insert_at(pos, value))
    }

    /// Inserts `count` copies of `ch` at byte `pos`.
    ///
    /// # Errors
    ///
    /// Same as [`insert_str`](Self::insert_str), plus `LengthOverflow` if the
    /// content cannot grow that far.
    pub fn insert_repeated(&self, pos: usize, count: usize, ch: char) -> SyncStringResult<()> {
        self.write_locked(|s| s.insert_repeated(pos, count, ch))
    }

    /// Removes `pos..pos + count`. A `count` past the end erases through the
    /// end.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` if `pos > len`, `NotCharBoundary` if the range splits a
    /// character.
    pub fn erase(&self, pos: usize, count: usize) -> SyncStringResult<()> {
        self.write_locked(|s| s.erase(pos, count))
    }

    /// Replaces `pos..pos + count` (clamped) with `value`.
    ///
    /// # Errors
    ///
    /// Same as [`erase`](Self::erase).
    pub fn replace(&self, pos: usize, count: usize, value: &str) -> SyncStringResult<()> {
        self.write_locked(|s| s.replace_at(pos, count, value))
    }

    /// Replaces `pos..pos + count` (clamped) with `n` copies of `ch`.
    ///
    /// # Errors
    ///
    /// Same as [`erase`](Self::erase), plus `LengthOverflow` if the content
    /// cannot grow that far.
    pub fn replace_repeated(&self, pos: usize, count: usize, n: usize, ch: char) -> SyncStringResult<()> {
        self.write_locked(|s| s.replace_repeated(pos, count, n, ch))
    }

    /// Truncates or pads with `fill` to `new_len` bytes.
    ///
    /// # Errors
    ///
    /// `NotCharBoundary` if `new_len` cannot be a char boundary of the result,
    /// `LengthOverflow` if the content cannot grow to `new_len`.
    pub fn resize(&self, new_len: usize, fill: char) -> SyncStringResult<()> {
        self.write_locked(|s| s.resize_to(new_len, fill))
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// First occurrence of `needle`.
    #[must_use]
    pub fn find<N: Needle>(&self, needle: N) -> Option<usize> {
        self.find_from(needle, 0)
    }

    /// First occurrence of `needle` at or after byte `pos`.
    #[must_use]
    pub fn find_from<N: Needle>(&self, needle: N, pos: usize) -> Option<usize> {
        self.read_locked(|s| s.find_from(needle, pos))
    }

    /// Last occurrence of `needle`.
    #[must_use]
    pub fn rfind<N: Needle>(&self, needle: N) -> Option<usize> {
        self.rfind_from(needle, usize::MAX)
    }

    /// Last occurrence of `needle` starting at or before byte `pos`.
    #[must_use]
    pub fn rfind_from<N: Needle>(&self, needle: N, pos: usize) -> Option<usize> {
        self.read_locked(|s| s.rfind_from(needle, pos))
    }

    /// First character at or after `pos` that is in `set`.
    #[must_use]
    pub fn find_first_of<S: CharSet>(&self, set: S, pos: usize) -> Option<usize> {
        self.read_locked(|s| s.find_first_of(set, pos))
    }

    /// Last character starting at or before `pos` that is in `set`.
    ///
    /// Any `pos >= len` covers the whole string.
    #[must_use]
    pub fn find_last_of<S: CharSet>(&self, set: S, pos: usize) -> Option<usize> {
        self.read_locked(|s| s.find_last_of(set, pos))
    }

    /// First character at or after `pos` that is not in `set`.
    #[must_use]
    pub fn find_first_not_of<S: CharSet>(&self, set: S, pos: usize) -> Option<usize> {
        self.read_locked(|s| s.find_first_not_of(set, pos))
    }

    /// Last character starting at or before `pos` that is not in `set`.
    #[must_use]
    pub fn find_last_not_of<S: CharSet>(&self, set: S, pos: usize) -> Option<usize> {
        self.read_locked(|s| s.find_last_not_of(set, pos))
    }

    /// Whether `needle` occurs anywhere.
    #[must_use]
    pub fn contains<N: Needle>(&self, needle: N) -> bool {
        self.find(needle).is_some()
    }

    /// Whether the content starts with `prefix`.
    #[must_use]
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.read_locked(|s| s.starts_with(prefix))
    }

    /// Whether the content ends with `suffix`.
    #[must_use]
    pub fn ends_with(&self, suffix: &str) -> bool {
        self.read_locked(|s| s.ends_with(suffix))
    }

    // =========================================================================
    // Extraction
    // =========================================================================

    /// Owned copy of `pos..pos + count` (clamped).
    ///
    /// # Errors
    ///
    /// `OutOfBounds` if `pos > len`, `NotCharBoundary` if the range splits a
    /// character.
    pub fn substr(&self, pos: usize, count: usize) -> SyncStringResult<String> {
        self.read_locked(|s| s.substr(pos, count).map(str::to_owned))
    }

    /// Copies bytes from `pos` into `dest`, as many as fit. Returns the
    /// number copied; no terminator is written.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` if `pos > len`.
    pub fn copy_to(&self, dest: &mut [u8], pos: usize) -> SyncStringResult<usize> {
        self.read_locked(|s| s.copy_to(dest, pos))
    }

    /// Owned copy of the whole content.
    #[must_use]
    pub fn snapshot(&self) -> String {
        self.read_locked(String::clone)
    }
}

impl Default for SyncString {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl Clone for SyncString {
    /// Copies the content under the source's lock into a new container with
    /// its own id.
    fn clone(&self) -> Self {
        Self::new(self.snapshot())
    }

    fn clone_from(&mut self, source: &Self) {
        let dst = self.inner.get_mut();
        source.read_locked(|s| {
            dst.clear();
            dst.push_str(s);
        });
    }
}

impl From<&str> for SyncString {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SyncString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<char> for SyncString {
    fn from(value: char) -> Self {
        Self::new(value)
    }
}

impl From<SyncString> for String {
    fn from(value: SyncString) -> Self {
        value.into_inner()
    }
}

impl fmt::Display for SyncString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.read_locked(|s| f.pad(s))
    }
}

impl fmt::Debug for SyncString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.read_locked(|s| {
            f.debug_struct("SyncString")
                .field("id", &self.id)
                .field("value", &s)
                .finish()
        })
    }
}

impl PartialEq for SyncString {
    fn eq(&self, other: &Self) -> bool {
        pair::with_pair(self, other, |a, b| a == b).unwrap_or(true)
    }
}

impl Eq for SyncString {}

impl PartialEq<str> for SyncString {
    fn eq(&self, other: &str) -> bool {
        self.read_locked(|s| s == other)
    }
}

impl PartialEq<&str> for SyncString {
    fn eq(&self, other: &&str) -> bool {
        self.read_locked(|s| s == *other)
    }
}

impl PartialEq<String> for SyncString {
    fn eq(&self, other: &String) -> bool {
        self.read_locked(|s| s == other)
    }
}

impl PartialEq<SyncString> for str {
    fn eq(&self, other: &SyncString) -> bool {
        other == self
    }
}

impl PartialEq<SyncString> for &str {
    fn eq(&self, other: &SyncString) -> bool {
        other == self
    }
}

impl PartialEq<SyncString> for String {
    fn eq(&self, other: &SyncString) -> bool {
        other == self
    }
}

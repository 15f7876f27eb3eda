//! # Text Operations
//!
//! The editing and query surface of a conventional mutable string, expressed
//! as extension traits so it behaves the same everywhere:
//!
//! ```text
//!   SyncString::erase(..)            ─┐
//!   guard.erase(..)        (session)  ├──►  StringEdit::erase on &mut String
//!   with_write(|s| s.erase(..))      ─┘
//! ```
//!
//! Positions are byte offsets. A position past the end is
//! [`OutOfBounds`](crate::SyncStringError::OutOfBounds), a position inside a
//! multi-byte character is
//! [`NotCharBoundary`](crate::SyncStringError::NotCharBoundary). Counts that
//! run past the end are clamped.

mod edit;
mod search;

pub use edit::StringEdit;
pub use search::StrSearch;

use crate::error::{SyncStringError, SyncStringResult};

/// Something to search for: a string slice or a single character.
pub trait Needle {
    /// Byte length of the needle.
    fn byte_len(&self) -> usize;

    /// First match in `haystack`.
    fn first_in(&self, haystack: &str) -> Option<usize>;

    /// Last match in `haystack`.
    fn last_in(&self, haystack: &str) -> Option<usize>;
}

impl Needle for &str {
    fn byte_len(&self) -> usize {
        self.len()
    }

    fn first_in(&self, haystack: &str) -> Option<usize> {
        haystack.find(*self)
    }

    fn last_in(&self, haystack: &str) -> Option<usize> {
        haystack.rfind(*self)
    }
}

impl Needle for &String {
    fn byte_len(&self) -> usize {
        self.len()
    }

    fn first_in(&self, haystack: &str) -> Option<usize> {
        haystack.find(self.as_str())
    }

    fn last_in(&self, haystack: &str) -> Option<usize> {
        haystack.rfind(self.as_str())
    }
}

impl Needle for char {
    fn byte_len(&self) -> usize {
        self.len_utf8()
    }

    fn first_in(&self, haystack: &str) -> Option<usize> {
        haystack.find(*self)
    }

    fn last_in(&self, haystack: &str) -> Option<usize> {
        haystack.rfind(*self)
    }
}

/// A set of characters for the `find_*_of` family.
///
/// A string slice stands for the set of its characters.
pub trait CharSet {
    /// Whether `ch` is a member of the set.
    fn has(&self, ch: char) -> bool;
}

impl CharSet for char {
    fn has(&self, ch: char) -> bool {
        *self == ch
    }
}

impl CharSet for &str {
    fn has(&self, ch: char) -> bool {
        self.contains(ch)
    }
}

impl CharSet for &String {
    fn has(&self, ch: char) -> bool {
        self.contains(ch)
    }
}

impl CharSet for &[char] {
    fn has(&self, ch: char) -> bool {
        self.contains(&ch)
    }
}

impl<const N: usize> CharSet for [char; N] {
    fn has(&self, ch: char) -> bool {
        self.contains(&ch)
    }
}

/// Fails unless `pos` is a valid insertion point of `s`.
pub(crate) fn check_pos(s: &str, pos: usize) -> SyncStringResult<()> {
    if pos > s.len() {
        return Err(SyncStringError::OutOfBounds { position: pos, length: s.len() });
    }
    if !s.is_char_boundary(pos) {
        return Err(SyncStringError::NotCharBoundary { position: pos });
    }
    Ok(())
}

/// End of the range `pos..pos + count`, clamped to the length of `s`.
///
/// `pos` must already be checked.
pub(crate) fn clamped_end(s: &str, pos: usize, count: usize) -> SyncStringResult<usize> {
    let end = pos.saturating_add(count).min(s.len());
    if s.is_char_boundary(end) {
        Ok(end)
    } else {
        Err(SyncStringError::NotCharBoundary { position: end })
    }
}

/// Byte length of `count` copies of `ch`, saturating at `usize::MAX`.
pub(crate) fn run_bytes(count: usize, ch: char) -> usize {
    count.saturating_mul(ch.len_utf8())
}

/// Reserves `additional` bytes, reporting failure instead of panicking.
pub(crate) fn try_grow(s: &mut String, additional: usize) -> SyncStringResult<()> {
    s.try_reserve(additional)
        .map_err(|_| SyncStringError::LengthOverflow { length: s.len(), additional })
}

/// `count` copies of `ch` as a new string.
pub(crate) fn repeated(count: usize, ch: char) -> SyncStringResult<String> {
    let mut run = String::new();
    try_grow(&mut run, run_bytes(count, ch))?;
    run.extend(std::iter::repeat(ch).take(count));
    Ok(run)
}

/// Smallest char boundary at or after `pos`, capped at the length.
pub(crate) fn ceil_boundary(s: &str, pos: usize) -> usize {
    let mut pos = pos.min(s.len());
    while !s.is_char_boundary(pos) {
        pos += 1;
    }
    pos
}

/// Largest char boundary at or before `pos`, capped at the length.
pub(crate) fn floor_boundary(s: &str, pos: usize) -> usize {
    let mut pos = pos.min(s.len());
    while !s.is_char_boundary(pos) {
        pos -= 1;
    }
    pos
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_pos() {
        let s = "aé";
        assert!(check_pos(s, 0).is_ok());
        assert!(check_pos(s, 3).is_ok());
        assert_eq!(
            check_pos(s, 2),
            Err(SyncStringError::NotCharBoundary { position: 2 })
        );
        assert_eq!(
            check_pos(s, 4),
            Err(SyncStringError::OutOfBounds { position: 4, length: 3 })
        );
    }

    #[test]
    fn test_boundaries() {
        let s = "aé!";
        assert_eq!(ceil_boundary(s, 2), 3);
        assert_eq!(floor_boundary(s, 2), 1);
        assert_eq!(ceil_boundary(s, 99), 4);
        assert_eq!(floor_boundary(s, 99), 4);
    }

    #[test]
    fn test_clamped_end() {
        assert_eq!(clamped_end("hello", 1, usize::MAX), Ok(5));
        assert_eq!(clamped_end("hello", 1, 2), Ok(3));
        assert_eq!(
            clamped_end("aé", 0, 2),
            Err(SyncStringError::NotCharBoundary { position: 2 })
        );
    }

    #[test]
    fn test_repeated_runs() {
        assert_eq!(repeated(3, 'é').as_deref(), Ok("ééé"));
        assert_eq!(run_bytes(usize::MAX, 'é'), usize::MAX);
        assert_eq!(
            repeated(usize::MAX, 'x'),
            Err(SyncStringError::LengthOverflow { length: 0, additional: usize::MAX })
        );

        let mut s = String::from("ab");
        assert!(try_grow(&mut s, 16).is_ok());
        assert!(s.capacity() >= 18);
        assert_eq!(
            try_grow(&mut s, usize::MAX),
            Err(SyncStringError::LengthOverflow { length: 2, additional: usize::MAX })
        );
        assert_eq!(s, "ab");
    }

    #[test]
    fn test_char_sets() {
        assert!('x'.has('x'));
        assert!("xyz".has('y'));
        assert!((&['a', 'b'][..]).has('b'));
        assert!(!['a', 'b'].has('c'));
    }
}

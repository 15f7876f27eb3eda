//! Read-only queries on `str`.

use std::cmp::Ordering;

use super::{ceil_boundary, check_pos, clamped_end, floor_boundary, CharSet, Needle};
use crate::error::{SyncStringError, SyncStringResult};

/// Position-based queries on a string slice.
///
/// Implemented for `str`, so every `String` and every guard gets them
/// through deref.
pub trait StrSearch {
    /// The character starting at byte `pos`.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` if `pos >= len`, `NotCharBoundary` if `pos` splits a
    /// character.
    fn char_at(&self, pos: usize) -> SyncStringResult<char>;

    /// First occurrence of `needle` starting at or after `pos`.
    ///
    /// A `pos` inside a character starts the search at the next one.
    fn find_from<N: Needle>(&self, needle: N, pos: usize) -> Option<usize>;

    /// Last occurrence of `needle` starting at or before `pos`.
    ///
    /// Any `pos >= len` searches the whole string.
    fn rfind_from<N: Needle>(&self, needle: N, pos: usize) -> Option<usize>;

    /// First character at or after `pos` that is in `set`.
    fn find_first_of<S: CharSet>(&self, set: S, pos: usize) -> Option<usize>;

    /// Last character starting at or before `pos` that is in `set`.
    fn find_last_of<S: CharSet>(&self, set: S, pos: usize) -> Option<usize>;

    /// First character at or after `pos` that is not in `set`.
    fn find_first_not_of<S: CharSet>(&self, set: S, pos: usize) -> Option<usize>;

    /// Last character starting at or before `pos` that is not in `set`.
    fn find_last_not_of<S: CharSet>(&self, set: S, pos: usize) -> Option<usize>;

    /// The slice `pos..pos + count`, with `count` clamped to the end.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` if `pos > len`, `NotCharBoundary` if either end of the
    /// range splits a character.
    fn substr(&self, pos: usize, count: usize) -> SyncStringResult<&str>;

    /// Copies bytes starting at `pos` into `dest`, as many as fit.
    ///
    /// Returns the number of bytes copied. No terminator is written.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` if `pos > len`.
    fn copy_to(&self, dest: &mut [u8], pos: usize) -> SyncStringResult<usize>;

    /// Compares the slice `pos..pos + count` against `other`.
    ///
    /// # Errors
    ///
    /// Same as [`substr`](Self::substr).
    fn compare_range(&self, pos: usize, count: usize, other: &str) -> SyncStringResult<Ordering>;
}

impl StrSearch for str {
    fn char_at(&self, pos: usize) -> SyncStringResult<char> {
        if pos >= self.len() {
            return Err(SyncStringError::OutOfBounds { position: pos, length: self.len() });
        }
        self.get(pos..)
            .and_then(|rest| rest.chars().next())
            .ok_or(SyncStringError::NotCharBoundary { position: pos })
    }

    fn find_from<N: Needle>(&self, needle: N, pos: usize) -> Option<usize> {
        if pos > self.len() {
            return None;
        }
        let start = ceil_boundary(self, pos);
        needle.first_in(&self[start..]).map(|i| i + start)
    }

    fn rfind_from<N: Needle>(&self, needle: N, pos: usize) -> Option<usize> {
        let end = pos.saturating_add(needle.byte_len()).min(self.len());
        // Matches never start inside a character.
        let end = floor_boundary(self, end);
        needle.last_in(&self[..end])
    }

    fn find_first_of<S: CharSet>(&self, set: S, pos: usize) -> Option<usize> {
        scan_forward(self, pos, |ch| set.has(ch))
    }

    fn find_last_of<S: CharSet>(&self, set: S, pos: usize) -> Option<usize> {
        scan_backward(self, pos, |ch| set.has(ch))
    }

    fn find_first_not_of<S: CharSet>(&self, set: S, pos: usize) -> Option<usize> {
        scan_forward(self, pos, |ch| !set.has(ch))
    }

    fn find_last_not_of<S: CharSet>(&self, set: S, pos: usize) -> Option<usize> {
        scan_backward(self, pos, |ch| !set.has(ch))
    }

    fn substr(&self, pos: usize, count: usize) -> SyncStringResult<&str> {
        check_pos(self, pos)?;
        let end = clamped_end(self, pos, count)?;
        Ok(&self[pos..end])
    }

    fn copy_to(&self, dest: &mut [u8], pos: usize) -> SyncStringResult<usize> {
        if pos > self.len() {
            return Err(SyncStringError::OutOfBounds { position: pos, length: self.len() });
        }
        let bytes = &self.as_bytes()[pos..];
        let n = bytes.len().min(dest.len());
        dest[..n].copy_from_slice(&bytes[..n]);
        Ok(n)
    }

    fn compare_range(&self, pos: usize, count: usize, other: &str) -> SyncStringResult<Ordering> {
        self.substr(pos, count).map(|part| part.cmp(other))
    }
}

fn scan_forward(s: &str, pos: usize, mut hit: impl FnMut(char) -> bool) -> Option<usize> {
    if pos >= s.len() {
        return None;
    }
    let start = ceil_boundary(s, pos);
    s[start..]
        .char_indices()
        .find(|&(_, ch)| hit(ch))
        .map(|(i, _)| i + start)
}

fn scan_backward(s: &str, pos: usize, mut hit: impl FnMut(char) -> bool) -> Option<usize> {
    // Include the character that starts at (or covers) `pos`.
    let end = ceil_boundary(s, pos.saturating_add(1));
    s[..end]
        .char_indices()
        .rev()
        .find(|&(_, ch)| hit(ch))
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_at() {
        let s = "héllo";
        assert_eq!(s.char_at(0), Ok('h'));
        assert_eq!(s.char_at(1), Ok('é'));
        assert_eq!(s.char_at(2), Err(SyncStringError::NotCharBoundary { position: 2 }));
        assert_eq!(
            s.char_at(6),
            Err(SyncStringError::OutOfBounds { position: 6, length: 6 })
        );
    }

    #[test]
    fn test_find_from() {
        let s = "abcabc";
        assert_eq!(s.find_from("bc", 0), Some(1));
        assert_eq!(s.find_from("bc", 2), Some(4));
        assert_eq!(s.find_from('a', 1), Some(3));
        assert_eq!(s.find_from("zz", 0), None);
        assert_eq!(s.find_from("", 6), Some(6));
        assert_eq!(s.find_from("", 7), None);
    }

    #[test]
    fn test_find_from_inside_char() {
        let s = "éa";
        assert_eq!(s.find_from('a', 1), Some(2));
    }

    #[test]
    fn test_rfind_from() {
        let s = "abcabc";
        assert_eq!(s.rfind_from("bc", usize::MAX), Some(4));
        assert_eq!(s.rfind_from("bc", 3), Some(1));
        assert_eq!(s.rfind_from("bc", 4), Some(4));
        assert_eq!(s.rfind_from('a', 2), Some(0));
        assert_eq!(s.rfind_from("abc", 0), Some(0));
        assert_eq!(s.rfind_from("", usize::MAX), Some(6));
        assert_eq!(s.rfind_from('z', usize::MAX), None);
    }

    #[test]
    fn test_first_and_last_of() {
        let s = "key = value;";
        assert_eq!(s.find_first_of(" =", 0), Some(3));
        assert_eq!(s.find_first_not_of("key ", 0), Some(4));
        assert_eq!(s.find_last_of(['=', ';'], usize::MAX), Some(11));
        assert_eq!(s.find_last_of('=', 10), Some(4));
        assert_eq!(s.find_last_not_of(';', usize::MAX), Some(10));
        assert_eq!(s.find_first_of('k', 1), None);
        assert_eq!(s.find_first_of('k', 99), None);
        assert_eq!("".find_last_of('k', usize::MAX), None);
    }

    #[test]
    fn test_last_of_covers_multibyte_pos() {
        let s = "aé";
        // Position 2 lies inside 'é', which starts at 1.
        assert_eq!(s.find_last_of('é', 2), Some(1));
    }

    #[test]
    fn test_substr() {
        let s = "hello world";
        assert_eq!(s.substr(6, 5), Ok("world"));
        assert_eq!(s.substr(6, usize::MAX), Ok("world"));
        assert_eq!(s.substr(11, 3), Ok(""));
        assert!(s.substr(12, 1).is_err());
    }

    #[test]
    fn test_copy_to() {
        let s = "hello";
        let mut buf = [0u8; 3];
        assert_eq!(s.copy_to(&mut buf, 1), Ok(3));
        assert_eq!(&buf, b"ell");

        let mut big = [0u8; 16];
        assert_eq!(s.copy_to(&mut big, 3), Ok(2));
        assert_eq!(&big[..2], b"lo");
        assert!(s.copy_to(&mut big, 6).is_err());
    }

    #[test]
    fn test_compare_range() {
        let s = "hello world";
        assert_eq!(s.compare_range(6, 5, "world"), Ok(Ordering::Equal));
        assert_eq!(s.compare_range(0, 5, "help"), Ok(Ordering::Less));
        assert!(s.compare_range(20, 1, "x").is_err());
    }
}

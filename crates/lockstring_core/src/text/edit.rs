//! Position-based mutation of `String`.

use super::{check_pos, clamped_end, repeated, run_bytes, try_grow};
use crate::error::{SyncStringError, SyncStringResult};

/// Editing operations with bounds errors instead of panics.
///
/// Method names avoid the inherent `String`/`str` ones so nothing gets
/// shadowed when called through a guard.
pub trait StringEdit {
    /// Replaces the character starting at `pos` with `ch`.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` if `pos >= len`, `NotCharBoundary` if `pos` splits a
    /// character.
    fn set_char(&mut self, pos: usize, ch: char) -> SyncStringResult<()>;

    /// Replaces the first character.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` if the string is empty.
    fn set_front(&mut self, ch: char) -> SyncStringResult<()>;

    /// Replaces the last character.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` if the string is empty.
    fn set_back(&mut self, ch: char) -> SyncStringResult<()>;

    /// Replaces the whole content with `count` copies of `ch`.
    ///
    /// # Errors
    ///
    /// `LengthOverflow` if the run cannot be allocated; the old content stays.
    fn assign_repeated(&mut self, count: usize, ch: char) -> SyncStringResult<()>;

    /// Appends `count` copies of `ch`.
    ///
    /// # Errors
    ///
    /// `LengthOverflow` if the string cannot grow that far; nothing is
    /// appended.
    fn append_repeated(&mut self, count: usize, ch: char) -> SyncStringResult<()>;

    /// Inserts `text` at `pos`.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` if `pos > len`, `NotCharBoundary` if `pos` splits a
    /// character.
    fn insert_at(&mut self, pos: usize, text: &str) -> SyncStringResult<()>;

    /// Inserts `count` copies of `ch` at `pos`.
    ///
    /// # Errors
    ///
    /// Same as [`insert_at`](Self::insert_at), plus `LengthOverflow` if the
    /// string cannot grow that far.
    fn insert_repeated(&mut self, pos: usize, count: usize, ch: char) -> SyncStringResult<()>;

    /// Removes `pos..pos + count`; a `count` past the end erases through the
    /// end.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` if `pos > len`, `NotCharBoundary` if either end of the
    /// range splits a character.
    fn erase(&mut self, pos: usize, count: usize) -> SyncStringResult<()>;

    /// Replaces `pos..pos + count` (clamped) with `text`.
    ///
    /// # Errors
    ///
    /// Same as [`erase`](Self::erase).
    fn replace_at(&mut self, pos: usize, count: usize, text: &str) -> SyncStringResult<()>;

    /// Replaces `pos..pos + count` (clamped) with `n` copies of `ch`.
    ///
    /// # Errors
    ///
    /// Same as [`erase`](Self::erase), plus `LengthOverflow` if the string
    /// cannot grow that far.
    fn replace_repeated(&mut self, pos: usize, count: usize, n: usize, ch: char) -> SyncStringResult<()>;

    /// Truncates to `new_len` bytes, or pads with `fill` up to `new_len`.
    ///
    /// # Errors
    ///
    /// `NotCharBoundary { position: new_len }` when shrinking would split a
    /// character, or when `fill` is wider than one byte and cannot land
    /// exactly on `new_len`. `LengthOverflow` if the string cannot grow to
    /// `new_len`.
    fn resize_to(&mut self, new_len: usize, fill: char) -> SyncStringResult<()>;
}

impl StringEdit for String {
    fn set_char(&mut self, pos: usize, ch: char) -> SyncStringResult<()> {
        if pos >= self.len() {
            return Err(SyncStringError::OutOfBounds { position: pos, length: self.len() });
        }
        check_pos(self, pos)?;
        let old = self[pos..].chars().next().map_or(0, char::len_utf8);
        let mut utf8 = [0u8; 4];
        self.replace_range(pos..pos + old, ch.encode_utf8(&mut utf8));
        Ok(())
    }

    fn set_front(&mut self, ch: char) -> SyncStringResult<()> {
        self.set_char(0, ch)
    }

    fn set_back(&mut self, ch: char) -> SyncStringResult<()> {
        let Some((pos, _)) = self.char_indices().next_back() else {
            return Err(SyncStringError::OutOfBounds { position: 0, length: 0 });
        };
        self.set_char(pos, ch)
    }

    fn assign_repeated(&mut self, count: usize, ch: char) -> SyncStringResult<()> {
        *self = repeated(count, ch)?;
        Ok(())
    }

    fn append_repeated(&mut self, count: usize, ch: char) -> SyncStringResult<()> {
        try_grow(self, run_bytes(count, ch))?;
        self.extend(std::iter::repeat(ch).take(count));
        Ok(())
    }

    fn insert_at(&mut self, pos: usize, text: &str) -> SyncStringResult<()> {
        check_pos(self, pos)?;
        self.insert_str(pos, text);
        Ok(())
    }

    fn insert_repeated(&mut self, pos: usize, count: usize, ch: char) -> SyncStringResult<()> {
        check_pos(self, pos)?;
        let run = repeated(count, ch)?;
        try_grow(self, run.len())?;
        self.insert_str(pos, &run);
        Ok(())
    }

    fn erase(&mut self, pos: usize, count: usize) -> SyncStringResult<()> {
        check_pos(self, pos)?;
        let end = clamped_end(self, pos, count)?;
        self.replace_range(pos..end, "");
        Ok(())
    }

    fn replace_at(&mut self, pos: usize, count: usize, text: &str) -> SyncStringResult<()> {
        check_pos(self, pos)?;
        let end = clamped_end(self, pos, count)?;
        self.replace_range(pos..end, text);
        Ok(())
    }

    fn replace_repeated(&mut self, pos: usize, count: usize, n: usize, ch: char) -> SyncStringResult<()> {
        let run = repeated(n, ch)?;
        try_grow(self, run.len())?;
        self.replace_at(pos, count, &run)
    }

    fn resize_to(&mut self, new_len: usize, fill: char) -> SyncStringResult<()> {
        let len = self.len();
        if new_len <= len {
            if !self.is_char_boundary(new_len) {
                return Err(SyncStringError::NotCharBoundary { position: new_len });
            }
            self.truncate(new_len);
            return Ok(());
        }
        let width = fill.len_utf8();
        let gap = new_len - len;
        if gap % width != 0 {
            return Err(SyncStringError::NotCharBoundary { position: new_len });
        }
        self.append_repeated(gap / width, fill)
    }
}

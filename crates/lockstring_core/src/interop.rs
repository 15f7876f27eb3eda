//! # C Interop
//!
//! Hands a nul-terminated view of a [`SyncString`] to code that wants a C
//! string, without copying and without letting the pointer leave the lock:
//!
//! ```rust
//! use lockstring_core::SyncString;
//!
//! fn c_api_sink(text: &std::ffi::CStr) -> usize {
//!     text.to_bytes().len()
//! }
//!
//! let text = SyncString::from("hello");
//! assert_eq!(text.with_c_str(c_api_sink), Ok(5));
//! ```
//!
//! For a pointer that must outlive the call, take a
//! [`snapshot`](SyncString::snapshot) and convert that instead.

use std::ffi::{c_char, CStr};

use crate::error::SyncStringResult;
use crate::SyncString;

impl SyncString {
    /// Runs `f` with the content as a `&CStr`, lock held for the call.
    ///
    /// `f` must not call back into this container.
    ///
    /// # Errors
    ///
    /// `InteriorNul` if the content contains a nul byte.
    pub fn with_c_str<R>(&self, f: impl FnOnce(&CStr) -> R) -> SyncStringResult<R> {
        let view = self.raw_view()?;
        Ok(f(view.as_c_str()))
    }

    /// Runs `f` with a raw pointer to the nul-terminated content and its
    /// length in bytes (terminator excluded), lock held for the call.
    ///
    /// The pointer is only valid inside `f`.
    ///
    /// # Errors
    ///
    /// `InteriorNul` if the content contains a nul byte.
    pub fn with_c_ptr<R>(&self, f: impl FnOnce(*const c_char, usize) -> R) -> SyncStringResult<R> {
        let view = self.raw_view()?;
        Ok(f(view.as_ptr(), view.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SyncStringError;

    #[test]
    fn test_with_c_str() {
        let text = SyncString::from("payload");
        let copied = text.with_c_str(|c| c.to_owned()).unwrap();
        assert_eq!(copied.as_bytes(), b"payload");
        assert_eq!(text, "payload");
    }

    #[test]
    fn test_with_c_ptr() {
        let text = SyncString::from("xyz");
        let (non_null, len) = text.with_c_ptr(|p, len| (!p.is_null(), len)).unwrap();
        assert!(non_null);
        assert_eq!(len, 3);
    }

    #[test]
    fn test_interior_nul() {
        let text = SyncString::from("nul\0here");
        assert_eq!(
            text.with_c_str(|_| ()),
            Err(SyncStringError::InteriorNul { position: 3 })
        );
    }

    #[cfg(any(debug_assertions, feature = "reentrancy-check"))]
    #[test]
    #[should_panic(expected = "reentrancy detected")]
    fn test_reentry_from_view_panics() {
        let text = SyncString::from("x");
        let _ = text.with_c_str(|_| text.len());
    }
}

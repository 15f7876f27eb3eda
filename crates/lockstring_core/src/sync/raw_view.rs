//! Scoped nul-terminated view for interop.
//!
//! `String` carries no terminator, so the view appends one while it holds the
//! lock and removes it again on drop. The pointer it hands out is stable for
//! the view's lifetime because nothing else can touch the buffer meanwhile.
//!
//! Crate-visible only: outside code reaches it through the scoped helpers in
//! [`interop`](crate::interop), never as a value it could keep around.

use std::ffi::{c_char, CStr};

use super::SyncStringGuard;
use crate::error::{SyncStringError, SyncStringResult};

/// Read-only, nul-terminated view of a locked buffer.
pub(crate) struct RawView<'a> {
    guard: SyncStringGuard<'a>,
}

impl<'a> RawView<'a> {
    /// Terminates the buffer held by `guard`.
    ///
    /// # Errors
    ///
    /// `InteriorNul` if the content already contains a nul byte.
    pub(crate) fn open(mut guard: SyncStringGuard<'a>) -> SyncStringResult<Self> {
        if let Some(position) = guard.bytes().position(|b| b == 0) {
            return Err(SyncStringError::InteriorNul { position });
        }
        guard.push('\0');
        tracing::debug!(
            target: "lockstring::session",
            container = guard.container_id().get(),
            "raw view opened"
        );
        Ok(Self { guard })
    }

    /// The content as a C string.
    pub(crate) fn as_c_str(&self) -> &CStr {
        // Terminated and nul-free by construction.
        CStr::from_bytes_with_nul(self.guard.as_bytes()).unwrap_or_default()
    }

    /// Pointer to the first byte; valid until the view drops.
    pub(crate) fn as_ptr(&self) -> *const c_char {
        self.as_c_str().as_ptr()
    }

    /// Length in bytes, without the terminator.
    pub(crate) fn len(&self) -> usize {
        self.guard.len() - 1
    }
}

impl Drop for RawView<'_> {
    fn drop(&mut self) {
        self.guard.pop();
    }
}

#[cfg(test)]
mod tests {
    use crate::SyncString;
    use crate::SyncStringError;

    #[test]
    fn test_view_is_terminated_and_content_restored() {
        let text = SyncString::from("interop");
        {
            let view = text.raw_view().unwrap();
            assert_eq!(view.as_c_str().to_bytes(), b"interop");
            assert_eq!(view.len(), 7);
            assert!(!view.as_ptr().is_null());
        }
        assert_eq!(text, "interop");
        assert_eq!(text.len(), 7);
    }

    #[test]
    fn test_interior_nul_is_rejected() {
        let text = SyncString::from("a\0b");
        assert_eq!(
            text.raw_view().err(),
            Some(SyncStringError::InteriorNul { position: 1 })
        );
        assert_eq!(text, "a\0b");
    }

    #[test]
    fn test_empty_view() {
        let text = SyncString::default();
        let view = text.raw_view().unwrap();
        assert_eq!(view.len(), 0);
        assert!(view.as_c_str().to_bytes().is_empty());
    }
}

//! # LOCKSTRING Core
//!
//! A mutable string that many threads can share without external locking.
//!
//! ## Rules
//!
//! 1. **One call, one lock** - every [`SyncString`] method is atomic and
//!    returns owned values, never references into the buffer
//! 2. **Sessions for sequences** - check-then-act goes through a guard
//!    ([`SyncString::lock`]) or a callback ([`SyncString::with_write`])
//! 3. **No escaping borrows** - everything borrowed from a guard dies with it
//! 4. **No self-reentry** - calling back into a container whose session this
//!    thread holds panics in checked builds and deadlocks otherwise
//!
//! ## Example
//!
//! ```rust
//! use lockstring_core::{StringEdit, SyncString};
//!
//! let text = SyncString::from("start");
//! text.insert_str(0, "[").unwrap();
//! text.push(']');
//!
//! // Decide and act under one lock.
//! text.with_write(|s| {
//!     if s.ends_with(']') {
//!         s.insert_repeated(1, 3, '*').unwrap();
//!     }
//! });
//! assert_eq!(text, "[***start]");
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod error;
pub mod interop;
pub mod sync;
pub mod text;

pub use error::{SyncStringError, SyncStringResult};
pub use sync::{ContainerId, SyncString, SyncStringGuard, SyncStringReadGuard};
pub use text::{CharSet, Needle, StrSearch, StringEdit};

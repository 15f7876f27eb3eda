//! # Synchronized String
//!
//! One `String`, one lock, three ways in:
//!
//! ```text
//!                    ┌──────────────────────────────┐
//!                    │          SyncString          │
//!                    │  id ── ContainerId           │
//!                    │  inner ── Mutex<String>      │
//!                    └──────────────┬───────────────┘
//!              ┌────────────────────┼────────────────────┐
//!              ▼                    ▼                    ▼
//!      ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//!      │ single calls │     │ lock()/read()│     │ with_write / │
//!      │ lock per call│     │ guard session│     │ with_read    │
//!      └──────────────┘     └──────────────┘     └──────────────┘
//! ```
//!
//! - single calls return owned values, never references into the buffer;
//! - guards and callbacks give the whole `String` API for one session;
//! - two-container operations lock both sides in ascending id order.

mod guard;
mod identity;
mod pair;
mod raw_view;
pub mod reentrancy;
mod string;

pub use guard::{SyncStringGuard, SyncStringReadGuard};
pub use identity::ContainerId;
pub use string::SyncString;

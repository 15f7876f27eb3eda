//! # LOCKSTRING Demo
//!
//! Drives a [`SyncString`](lockstring_core::SyncString) from several writer
//! and reader threads and reports what the readers saw.
//!
//! ```rust,no_run
//! use lockstring::{run_demo, DemoConfig};
//!
//! let config = DemoConfig::load("config/demo.toml")?;
//! let report = run_demo(&config)?;
//! assert_eq!(report.torn_reads(), 0);
//! # Ok::<(), lockstring::DemoError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod driver;
pub mod error;

pub use config::DemoConfig;
pub use driver::{run_demo, DemoReport, ReaderStats};
pub use error::{DemoError, DemoResult};

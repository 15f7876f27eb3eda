//! # Demo Driver
//!
//! Writers keep assigning words to one shared [`SyncString`]; readers keep
//! checking it. Each hit on the target word exercises the three read paths:
//! an owned snapshot, a C-style sink through [`SyncString::with_c_str`], and
//! a read guard.

use std::ffi::CStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use lockstring_core::SyncString;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::DemoConfig;
use crate::error::{DemoError, DemoResult};

/// What one reader saw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReaderStats {
    /// Polls that found the target word.
    pub hits: u64,
    /// Polls in total.
    pub polls: u64,
    /// Values observed that were not one of the configured words.
    pub torn_reads: u64,
    /// Bytes handed to the C-style sink.
    pub sink_bytes: u64,
}

/// Outcome of [`run_demo`].
#[derive(Debug, Clone)]
pub struct DemoReport {
    /// Per-reader statistics, in reader index order.
    pub readers: Vec<ReaderStats>,
    /// Assignments performed by all writers.
    pub writes: u64,
    /// Content of the shared string after every thread finished.
    pub final_value: String,
    /// Wall-clock duration of the run.
    pub elapsed: Duration,
}

impl DemoReport {
    /// Hits across all readers.
    #[must_use]
    pub fn total_hits(&self) -> u64 {
        self.readers.iter().map(|r| r.hits).sum()
    }

    /// Torn reads across all readers. Zero unless the container is broken.
    #[must_use]
    pub fn torn_reads(&self) -> u64 {
        self.readers.iter().map(|r| r.torn_reads).sum()
    }
}

/// Stand-in for a C API that takes a nul-terminated string.
fn c_sink(text: &CStr) -> usize {
    text.to_bytes().len()
}

/// Runs writers and readers over one shared string until every writer has
/// finished its iterations.
///
/// # Errors
///
/// `InvalidConfig` if `config` does not validate, `Container` if a string
/// operation fails, `WorkerPanicked` if a thread panics.
pub fn run_demo(config: &DemoConfig) -> DemoResult<DemoReport> {
    config.validate()?;

    let text = SyncString::from(config.target());
    let finished_writers = AtomicUsize::new(0);
    let start = Instant::now();

    tracing::debug!(
        writers = config.writers,
        readers = config.readers,
        iterations = config.iterations,
        container = %text.id(),
        "demo starting"
    );

    let (writes, readers) = thread::scope(|scope| {
        let writer_handles: Vec<_> = (0..config.writers)
            .map(|index| {
                let text = &text;
                let finished = &finished_writers;
                scope.spawn(move || {
                    let written = run_writer(text, config, index);
                    finished.fetch_add(1, Ordering::Release);
                    written
                })
            })
            .collect();

        let reader_handles: Vec<_> = (0..config.readers)
            .map(|_| {
                let text = &text;
                let finished = &finished_writers;
                scope.spawn(move || run_reader(text, config, finished))
            })
            .collect();

        let mut writes = 0u64;
        let mut outcome = Ok(());
        for (index, handle) in writer_handles.into_iter().enumerate() {
            match handle.join() {
                Ok(n) => writes += n,
                Err(_) => {
                    // Readers stop on the writer count, so count this one too.
                    finished_writers.fetch_add(1, Ordering::Release);
                    outcome = Err(DemoError::WorkerPanicked { role: "writer", index });
                }
            }
        }

        let mut readers = Vec::with_capacity(config.readers);
        for (index, handle) in reader_handles.into_iter().enumerate() {
            match handle.join() {
                Ok(Ok(stats)) => readers.push(stats),
                Ok(Err(e)) => outcome = outcome.and(Err(e)),
                Err(_) => {
                    outcome = outcome.and(Err(DemoError::WorkerPanicked { role: "reader", index }));
                }
            }
        }

        outcome.map(|()| (writes, readers))
    })?;

    let report = DemoReport {
        readers,
        writes,
        final_value: text.into_inner(),
        elapsed: start.elapsed(),
    };

    tracing::debug!(
        writes = report.writes,
        hits = report.total_hits(),
        torn = report.torn_reads(),
        "demo finished"
    );

    Ok(report)
}

fn run_writer(text: &SyncString, config: &DemoConfig, index: usize) -> u64 {
    let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(index as u64));
    let pause = Duration::from_micros(config.pause_micros);

    let mut written = 0u64;
    for _ in 0..config.iterations {
        let word = &config.words[rng.gen_range(0..config.words.len())];
        text.assign(word);
        written += 1;
        if !pause.is_zero() {
            thread::sleep(pause);
        }
    }
    written
}

fn run_reader(
    text: &SyncString,
    config: &DemoConfig,
    finished_writers: &AtomicUsize,
) -> DemoResult<ReaderStats> {
    let target = config.target();
    let is_word = |s: &str| config.words.iter().any(|w| w == s);
    let mut stats = ReaderStats::default();

    loop {
        // Read the flag first so the last poll happens after the last write.
        let done = finished_writers.load(Ordering::Acquire) >= config.writers;
        stats.polls += 1;

        if *text == *target {
            stats.hits += 1;

            let snapshot = text.snapshot();
            if !is_word(snapshot.as_str()) {
                stats.torn_reads += 1;
            }

            let sent = text.with_c_str(c_sink)?;
            stats.sink_bytes += sent as u64;

            let guard = text.read();
            if !is_word(guard.as_str()) {
                stats.torn_reads += 1;
            }
        } else if !text.with_read(is_word) {
            stats.torn_reads += 1;
        }

        if done {
            return Ok(stats);
        }
        thread::yield_now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_config() -> DemoConfig {
        DemoConfig {
            iterations: 50,
            writers: 2,
            readers: 3,
            pause_micros: 0,
            seed: 7,
            words: vec!["hello".into(), "world".into()],
        }
    }

    #[test]
    fn test_run_produces_consistent_report() {
        let config = quick_config();
        let report = run_demo(&config).unwrap();

        assert_eq!(report.readers.len(), 3);
        assert_eq!(report.writes, 100);
        assert_eq!(report.torn_reads(), 0);
        assert!(config.words.contains(&report.final_value));
        for r in &report.readers {
            assert!(r.polls >= 1);
            assert!(r.hits <= r.polls);
            assert_eq!(r.sink_bytes, r.hits * 5);
        }
    }

    #[test]
    fn test_single_word_always_hits() {
        let config = DemoConfig {
            words: vec!["only".into()],
            ..quick_config()
        };
        let report = run_demo(&config).unwrap();
        for r in &report.readers {
            assert_eq!(r.hits, r.polls);
        }
        assert_eq!(report.final_value, "only");
    }

    #[test]
    fn test_writer_choice_is_deterministic() {
        let config = DemoConfig {
            writers: 1,
            readers: 1,
            ..quick_config()
        };
        let first = run_demo(&config).unwrap().final_value;
        let second = run_demo(&config).unwrap().final_value;
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = DemoConfig {
            readers: 0,
            ..quick_config()
        };
        assert!(matches!(run_demo(&config), Err(DemoError::InvalidConfig(_))));
    }
}

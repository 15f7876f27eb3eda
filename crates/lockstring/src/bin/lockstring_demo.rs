//! # LOCKSTRING Demo
//!
//! Runs writer and reader threads over one shared string and prints the
//! report.
//!
//! ## Usage
//!
//! ```bash
//! lockstring_demo --config crates/lockstring/config/demo.toml --writers 4
//! ```

use std::process::ExitCode;

use lockstring::{run_demo, DemoConfig, DemoResult};

fn main() -> ExitCode {
    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║         LOCKSTRING DEMO                                          ║");
    println!("║         ONE STRING, MANY THREADS                                 ║");
    println!("╚══════════════════════════════════════════════════════════════════╝");
    println!();

    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Returns `Ok(false)` if torn reads were observed.
fn run() -> DemoResult<bool> {
    // Parse command line arguments (simple parsing, no external deps)
    let args: Vec<String> = std::env::args().collect();
    let mut config_path: Option<String> = None;
    let mut writers: Option<usize> = None;
    let mut readers: Option<usize> = None;
    let mut iterations: Option<u32> = None;
    let mut seed: Option<u64> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--writers" | "-w" => {
                if i + 1 < args.len() {
                    writers = args[i + 1].parse().ok();
                    i += 1;
                }
            }
            "--readers" | "-r" => {
                if i + 1 < args.len() {
                    readers = args[i + 1].parse().ok();
                    i += 1;
                }
            }
            "--iterations" | "-n" => {
                if i + 1 < args.len() {
                    iterations = args[i + 1].parse().ok();
                    i += 1;
                }
            }
            "--seed" | "-s" => {
                if i + 1 < args.len() {
                    seed = args[i + 1].parse().ok();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Usage: lockstring_demo [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --config <PATH>        TOML config file (default: built-in)");
                println!("  -w, --writers <NUM>        Writer threads");
                println!("  -r, --readers <NUM>        Reader threads");
                println!("  -n, --iterations <NUM>     Assignments per writer");
                println!("  -s, --seed <SEED>          Base seed for word choice");
                println!("  -h, --help                 Show this help");
                return Ok(true);
            }
            _ => {}
        }
        i += 1;
    }

    let mut config = match config_path {
        Some(path) => DemoConfig::load(path)?,
        None => DemoConfig::default(),
    };
    if let Some(n) = writers {
        config.writers = n;
    }
    if let Some(n) = readers {
        config.readers = n;
    }
    if let Some(n) = iterations {
        config.iterations = n;
    }
    if let Some(s) = seed {
        config.seed = s;
    }

    println!("┌─ CONFIGURATION ─────────────────────────────────────────────────┐");
    println!("│ Writers:            {}", config.writers);
    println!("│ Readers:            {}", config.readers);
    println!("│ Iterations:         {} per writer", config.iterations);
    println!("│ Pause:              {} µs", config.pause_micros);
    println!("│ Seed:               {}", config.seed);
    println!("│ Words:              {:?}", config.words);
    println!("└──────────────────────────────────────────────────────────────────┘");
    println!();

    let report = run_demo(&config)?;

    println!("┌─ RESULTS ───────────────────────────────────────────────────────┐");
    for (index, stats) in report.readers.iter().enumerate() {
        println!(
            "│ Reader {index:<3}         {} hits / {} polls ({} bytes to sink)",
            stats.hits, stats.polls, stats.sink_bytes
        );
    }
    println!("│ Writes:             {}", report.writes);
    println!("│ Torn reads:         {}", report.torn_reads());
    println!("│ Final value:        {:?}", report.final_value);
    println!("│ Elapsed:            {:.2?}", report.elapsed);
    println!("└──────────────────────────────────────────────────────────────────┘");

    let clean = report.torn_reads() == 0;
    if clean {
        println!("✅ Every read saw a complete value");
    } else {
        println!("❌ Torn reads observed");
    }
    Ok(clean)
}

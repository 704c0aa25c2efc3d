//! Statistics hooks example
//!
//! Counts warnings and errors through the stat hooks.
//!
//! Run with: cargo run --example stat_funcs

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use svclog::prelude::*;
use svclog::{error, warn};

fn main() -> Result<()> {
    println!("=== svclog - Stat Funcs Example ===\n");

    let errors = Arc::new(AtomicUsize::new(0));
    let warnings = Arc::new(AtomicUsize::new(0));

    let logger = Logger::new();
    logger.open("", "stat-funcs", Flags::NO_PID)?;

    let counter = Arc::clone(&errors);
    let error_hook = stat_fn(move |_| {
        counter.fetch_add(1, Ordering::Relaxed);
    });
    let counter = Arc::clone(&warnings);
    let warning_hook = stat_fn(move |args| {
        counter.fetch_add(1, Ordering::Relaxed);
        println!("   warning seen: {}", args);
    });
    logger.set_stat_funcs(Some(error_hook), Some(warning_hook));

    warn!(logger, "Disk usage at {}%", 91);
    warn!(logger, "Slow response from {}", "db-1");
    error!(logger, "Request {} failed", 17);

    // Hooks can be removed again
    logger.set_stat_funcs(None, None);
    error!(logger, "Not counted");

    logger.close()?;

    println!(
        "\nCounted {} warning(s) and {} error(s)",
        warnings.load(Ordering::Relaxed),
        errors.load(Ordering::Relaxed)
    );
    println!("\n=== Example completed successfully! ===");

    Ok(())
}

//! Basic logger usage example
//!
//! Demonstrates opening a log file, the severity levels and debug gating.
//!
//! Run with: cargo run --example basic_usage

use svclog::prelude::*;
use svclog::{debug, error, info, warn};

fn main() -> Result<()> {
    println!("=== svclog - Basic Usage Example ===\n");

    let path = std::env::temp_dir().join("svclog-basic.log");
    let logger = Logger::new();

    // Open the file with the standard date and time header
    logger.open(&path, "basic-usage", Flags::STD)?;

    println!("1. Logging at different levels:");
    info!(logger, "This is an info message");
    warn!(logger, "This is a warning message");
    error!(logger, "This is an error message (also copied to stderr)");

    println!("\n2. Debug gating:");
    debug!(logger, "Debug message (hidden)");
    logger.set_debug(true);
    debug!(logger, "Debug message (visible)");

    println!("\n3. Changing flags:");
    logger.set_flags(Flags::NO_PID | Flags::SHORT_FILE)?;
    info!(logger, "No pid, but the call site is shown");

    logger.close()?;

    println!("\n=== Example completed successfully! ===");
    println!("Check '{}' for the log output", path.display());

    Ok(())
}

//! Log rotation example
//!
//! Renames the live log file and reopens the logger, the way an external
//! rotation tool would together with a reload signal.
//!
//! Run with: cargo run --example reopen_log

use std::fs;
use svclog::prelude::*;
use svclog::{global, info};

fn main() -> Result<()> {
    println!("=== svclog - Reopen Example ===\n");

    let dir = std::env::temp_dir().join("svclog-reopen");
    fs::create_dir_all(&dir).map_err(|e| LogError::file("create", &dir, e))?;
    let path = dir.join("service.log");
    let rotated = dir.join("service.log.1");

    global::open(&path, "reopen-demo", Flags::STD | Flags::MICROSECONDS)?;

    for i in 1..=3 {
        info!("Processing item {}/3", i);
    }

    println!("1. Rotating {} -> {}", path.display(), rotated.display());
    fs::rename(&path, &rotated).map_err(|e| LogError::file("rename", &path, e))?;

    // Lines after this point land in a fresh file at the original path
    global::reopen()?;
    info!("Logging resumed after rotation");
    global::close()?;

    println!("\n=== Example completed successfully! ===");
    println!("Rotated: '{}'", rotated.display());
    println!("Current: '{}'", path.display());

    Ok(())
}

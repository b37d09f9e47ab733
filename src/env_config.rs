//! Shared environment configuration for all compecon binaries.
//!
//! Consolidates `COMPECON_BASE_PATH` and `RAYON_NUM_THREADS` reads and the
//! tracing subscriber every binary installs first.

use std::path::PathBuf;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::error::{Error, Result};

/// Read `COMPECON_BASE_PATH` (default `"."`) and chdir into it.
pub fn init_base_path() -> Result<PathBuf> {
    let base_path = std::env::var("COMPECON_BASE_PATH").unwrap_or_else(|_| ".".to_string());
    let path = PathBuf::from(&base_path);
    std::env::set_current_dir(&path)
        .map_err(|e| Error::io(format!("failed to change directory to {}", base_path), e))?;
    if let Ok(cwd) = std::env::current_dir() {
        info!("Working directory: {}", cwd.display());
    }
    Ok(path)
}

/// Thread count from `RAYON_NUM_THREADS`, falling back to `OMP_NUM_THREADS`.
pub fn configured_threads() -> Option<usize> {
    std::env::var("RAYON_NUM_THREADS")
        .or_else(|_| std::env::var("OMP_NUM_THREADS"))
        .ok()
        .and_then(|s| s.parse().ok())
}

/// Build the rayon global pool when a thread count is configured.
/// Tolerates an already-initialized pool. Returns the effective thread count.
pub fn init_rayon_threads() -> usize {
    if let Some(num_threads) = configured_threads() {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // May fail if already initialized
    }
    let n = rayon::current_num_threads();
    info!("Rayon threads: {}", n);
    n
}

/// Install a compact stderr subscriber at INFO, or DEBUG when `verbose`.
pub fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Tracing subscriber already installed");
    }
}
